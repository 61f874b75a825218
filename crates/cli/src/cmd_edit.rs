//! `srdfse edit`: interactive editing of one session.
//!
//! Stdin lines and session events are multiplexed in one loop. Lines are
//! parsed by [`crate::repl`] and forwarded as client inputs; events are
//! printed as they arrive.

use std::io::Write;

use console::style;
use srdfse_client::{connect, SessionAddress, SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::render;
use crate::repl::{self, Command};

pub async fn run(address: SessionAddress, lang: &str) -> anyhow::Result<()> {
    let mut session = connect(&address, lang).await?;
    let handle = session.handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "  session {} at {} (`help` lists commands)",
        style(&address.session_id).bold(),
        address.server
    );

    loop {
        tokio::select! {
            event = session.events.recv() => {
                let Some(event) = event else { break };
                let state = handle.snapshot();
                if let Some(text) = render::describe(&event, &state) {
                    println!("{text}");
                }
                match event {
                    SessionEvent::Navigate(landing) => {
                        println!(
                            "  session closed by the server; continue at {}",
                            address.landing_url(landing.path())
                        );
                        break;
                    }
                    SessionEvent::Disconnected { .. } => break,
                    _ => {}
                }
                print_prompt(&render::prompt(&state))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match repl::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{}", repl::HELP),
                    Ok(Some(Command::Show)) => {
                        let state = handle.snapshot();
                        println!("{}", render::ontology_table(&state));
                        println!("  focus: {}", render::focus_line(&state));
                    }
                    Ok(Some(Command::Session(intent))) => {
                        match intent.resolve(&handle.snapshot()) {
                            Ok(input) => handle.send(input).await?,
                            Err(violation) => {
                                eprintln!("{} {} ({})", style("!").red(), violation, violation.code())
                            }
                        }
                    }
                    Err(e) => eprintln!("{} {}", style("!").red(), e),
                }
                print_prompt(&render::prompt(&handle.snapshot()))?;
            }
        }
    }

    info!(
        component = "cli",
        event = "edit.finished",
        session_id = %address.session_id,
        "Editor finished"
    );
    drop(handle);
    drop(session.handle);
    let _ = session.task.await;
    Ok(())
}

fn print_prompt(prompt: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    write!(out, "{prompt}")?;
    out.flush()
}
