mod cli;

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use cli::{Args, Command};
use img_to_ascii::config::Config;

/// Default log filter for a `-v` count; `RUST_LOG` takes precedence.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(Command::Config { action }) = &args.command {
        return cli::handle_config_action(action.clone(), args.config.as_deref());
    }

    let Some(image) = args.image.as_deref() else {
        Args::command().print_help()?;
        anyhow::bail!("no image given");
    };

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    let settings = cli::resolve_settings(&args, &config)?;
    log::debug!("settings: {:?}", settings);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    cli::convert(image, &settings, &mut out)
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(args.verbose)),
    )
    .format_timestamp(None)
    .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
