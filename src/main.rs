use std::path::PathBuf;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::config::Config;
use crate::controller::parse_and_run_command;
use crate::dashboard::DashboardRenderer;
use crate::editor::FinsageHelper;
use crate::store::LocalStore;

mod common;
mod config;
mod controller;
mod credential;
mod dashboard;
mod editor;
mod ledger;
mod parser;
mod seed;
mod store;
mod util;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Local storage file path
    #[clap(long)]
    store: Option<PathBuf>,

    /// Config file path
    #[clap(long, default_value = "finsage.toml")]
    config: PathBuf,

    /// Run a single command and exit, e.g. `finsage income Salary 5000`
    command: Vec<String>,
}

static STORE_FILE_NAME: &str = "local_storage.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();
    let config = Config::load_from_file(&cli.config)?;

    let store_path = cli.store.or_else(|| config.store_path.clone()).unwrap_or_else(default_store_path);
    info!("Using store {}", store_path.display());
    let mut store = LocalStore::open(&store_path)?;
    let renderer = DashboardRenderer::new(&config.currency_symbol);

    if !cli.command.is_empty() {
        let command = join_args(&cli.command);
        let output = parse_and_run_command(&mut store, &renderer, &command)?;
        println!("{output}");
        return Ok(());
    }

    let mut rl = Editor::<FinsageHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(FinsageHelper {
        hinter: HistoryHinter {},
        colored_prompt: "\x1b[1;32mfinsage>\x1b[0m ".to_owned(),
    }));
    if rl.load_history(&config.history_file).is_err() {
        info!("No previous history.");
    }

    loop {
        let readline = rl.readline("finsage> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match parse_and_run_command(&mut store, &renderer, line) {
                    Ok(output) => println!("{output}"),
                    Err(err) => println!("{err}"),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break
            }
        }
    }

    if let Err(err) = rl.save_history(&config.history_file) {
        warn!("Unable to save history: {err}");
    }
    Ok(())
}

/// `<data dir>/finsage/local_storage.json`, or the current directory when there is no data dir
fn default_store_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("finsage").join(STORE_FILE_NAME),
        None => PathBuf::from("finsage_storage.json"),
    }
}

/// Re-quote arguments the shell already split so names with spaces survive
fn join_args(args: &[String]) -> String {
    args.iter().map(|arg| {
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            format!("'{arg}'")
        } else {
            arg.clone()
        }
    }).collect::<Vec<String>>().join(" ")
}
