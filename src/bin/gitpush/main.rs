use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use gitpush::load_config;
use gitpush::runner::SystemRunner;
use gitpush::sequence::{self, PushError};
use gitpush::theme::Painter;
use gitpush::{prompt, workdir};

#[derive(Parser, Debug)]
#[command(name = "gitpush", version, about = "Stage, commit and push in one go")]
struct Cli {
    /// Commit message (prompted for if not specified)
    #[arg(short, long)]
    message: Option<String>,

    /// Project directory every git command runs in (defaults to the current directory)
    #[arg(short = 'C', long)]
    dir: Option<PathBuf>,

    /// Path to config file (auto-detected if not specified)
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (diagnostics go to stderr otherwise)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    gitpush::logger::init(log_file);

    let cwd = workdir::current()?;
    let (config, config_path) = load_config(cli.config.as_deref(), &cwd)?;
    if let Some(path) = &config_path {
        info!("Using config file {}", path.display());
    }
    let project_dir = workdir::resolve(cli.dir.as_deref(), config.project_dir.as_deref(), &cwd)?;

    let message = match cli.message {
        Some(message) => message,
        None => prompt::ask_message()?,
    };
    debug!("Commit message is {} bytes", message.len());

    let steps = sequence::plan(&project_dir, &message);
    let mut stdout = std::io::stdout().lock();
    match sequence::run(&mut SystemRunner, &steps, &mut stdout, Painter::for_stdout()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already reported by the sequence
        Err(PushError::CommandFailed { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}
