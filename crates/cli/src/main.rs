//! sRDFSe CLI
//!
//! Edit an RDFS ontology session from the terminal, or run one-shot
//! session actions against the server.

mod cmd_edit;
mod cmd_session;
mod config;
mod logging;
mod render;
mod repl;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use crate::config::{GlobalArgs, Settings};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "srdfse", version)]
#[command(about = "Collaborative RDFS editing sessions from the terminal")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new session on the server and print its address
    New {
        /// Start editing the new session right away
        #[arg(long)]
        edit: bool,
    },
    /// Open the session and edit it interactively
    Edit,
    /// Delete the session and its ontology on the server
    Close {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Replace the session ontology with a Turtle file
    Upload { file: PathBuf },
    /// Add a Turtle file to the session as an extra ontology
    Import { file: PathBuf },
    /// Fetch the session ontology as Turtle
    Download {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "srdfse", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = config::resolve_data_dir(cli.global.data_dir.as_deref())?;
    let file = config::load_file(&data_dir)?;
    let settings = Settings::resolve(&cli.global, file, data_dir);
    let logging = logging::init_logging(&settings.data_dir)?;

    info!(
        component = "cli",
        event = "cli.start",
        version = VERSION,
        run_id = %logging.run_id,
        log_path = %logging.log_path.display(),
        server = %settings.server,
        session = settings.session.as_deref().unwrap_or("-"),
        "srdfse starting"
    );

    if let Commands::New { edit } = cli.command {
        let address = cmd_session::create(&settings).await?;
        if edit {
            return cmd_edit::run(address, &settings.lang).await;
        }
        return Ok(());
    }

    let address = settings.address()?;
    match cli.command {
        Commands::Edit => cmd_edit::run(address, &settings.lang).await,
        Commands::Close { yes } => cmd_session::close(address, yes).await,
        Commands::Upload { file } => cmd_session::upload(address, &file).await,
        Commands::Import { file } => cmd_session::import(address, &file).await,
        Commands::Download { out } => cmd_session::download(address, out).await,
        Commands::New { .. } | Commands::Completions { .. } => Ok(()),
    }
}
