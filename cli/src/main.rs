mod config;
mod input;
mod menu;

use std::path::PathBuf;

use anyhow::{bail, Result};
use calculator::Session;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, menu::App};

#[derive(Parser, Debug)]
#[command(name = "calculadora")]
#[command(version, about = "Interactive calculator with memory and operation history")]
struct Cli {
    /// Expressions to evaluate instead of opening the interactive menu
    expressions: Vec<String>,

    /// Configuration file (defaults to ~/.config/calculadora/config.toml)
    #[arg(long, env = "CALCULADORA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory where saved histories are written
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Do not clear the screen between menus
    #[arg(long)]
    no_clear: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {err:#}", "Error:".red().bold());
    std::process::exit(1);
}

/// Evaluates each expression in order, the way the menu's expression option
/// does. `U` refers to the previous expression's result.
fn evaluate_all(session: &mut Session, expressions: &[String]) -> Result<()> {
    let mut failed = 0;
    for expression in expressions {
        println!("{expression}");
        match session.evaluate_expression(expression) {
            Ok(calculation) => println!("= {}", calculation.value),
            Err(err) => {
                eprintln!("{} {err}", "Error:".red().bold());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} expressions failed", expressions.len());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load(),
    };
    if cli.no_clear {
        config.clear_screen = false;
    }
    if let Some(dir) = cli.save_dir {
        config.save_dir = Some(dir);
    }

    let mut session = Session::new();
    if !cli.expressions.is_empty() {
        return evaluate_all(&mut session, &cli.expressions);
    }
    App::new(session, config)?.run()
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    std::panic::set_hook(Box::new(|info| {
        eprintln!("\n{} {info}", "Unexpected error:".red().bold());
    }));

    if let Err(err) = run(cli) {
        handle_error(err);
    }
}
