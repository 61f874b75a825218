//! One-shot session commands: `new`, `close`, `upload`, `import`, `download`.

use std::path::{Path, PathBuf};

use console::{style, Term};
use srdfse_client::{CloseOutcome, SessionAddress, SessionApi};

use crate::config::Settings;

pub async fn create(settings: &Settings) -> anyhow::Result<SessionAddress> {
    let address = SessionApi::create_session(&settings.server, settings.ws_url.as_deref()).await?;
    println!(
        "  {} Session {} created.",
        style("✓").green(),
        style(&address.session_id).bold()
    );
    println!("  {}", address.session_url());
    Ok(address)
}

pub async fn close(address: SessionAddress, assume_yes: bool) -> anyhow::Result<()> {
    let api = SessionApi::new(address);
    let outcome = api
        .close_session(&|prompt: &str| assume_yes || ask(prompt))
        .await?;
    match outcome {
        CloseOutcome::Cancelled => println!("  Cancelled."),
        CloseOutcome::Closed { landing } => {
            println!("  {} Session closed.", style("✓").green());
            println!("  {landing}");
        }
    }
    Ok(())
}

pub async fn upload(address: SessionAddress, file: &Path) -> anyhow::Result<()> {
    SessionApi::new(address).upload(file).await?;
    println!(
        "  {} Uploaded {}; the session ontology was replaced.",
        style("✓").green(),
        file.display()
    );
    Ok(())
}

pub async fn import(address: SessionAddress, file: &Path) -> anyhow::Result<()> {
    SessionApi::new(address).import(file).await?;
    println!("  {} Imported {}.", style("✓").green(), file.display());
    Ok(())
}

pub async fn download(address: SessionAddress, out: Option<PathBuf>) -> anyhow::Result<()> {
    let turtle = SessionApi::new(address).download().await?;
    match out {
        Some(path) => {
            tokio::fs::write(&path, turtle.as_bytes()).await?;
            println!("  {} Wrote {}", style("✓").green(), path.display());
        }
        None => print!("{turtle}"),
    }
    Ok(())
}

/// y/N question on stderr; anything but yes declines.
fn ask(prompt: &str) -> bool {
    let term = Term::stderr();
    if term.write_str(&format!("  {prompt} [y/N] ")).is_err() {
        return false;
    }
    term.read_line()
        .map(|answer| is_yes(&answer))
        .unwrap_or(false)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
