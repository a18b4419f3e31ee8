use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, debug};

#[derive(Parser, Debug)]
#[command(name = "erdot", about = "Render entity-relationship schemas as Graphviz DOT")]
struct Cli {
    /// Schema file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(cli:?; "Parsed arguments");

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> erdot::Result<()> {
    let config = erdot::config::load_config(cli.config.as_deref())?;

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let document = erdot::render_with_config(&input, &config)?;
    match &cli.output {
        Some(path) => document.persist(path)?,
        None => print!("{document}"),
    }
    Ok(())
}
