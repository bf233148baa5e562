//! Entry point for the lnkparse CLI.

use clap::Parser;
use lnkparse::{app::App, cli::Args, cli::Config, error::Result};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args)?;

    if TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Logger already initialized");
    }

    let app = App::new(config);
    let failures = app.run()?;
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
