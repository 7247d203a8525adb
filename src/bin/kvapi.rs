use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use kvapi::{Config, ErrorCode, KvStore, KvsEngine};
use tracing::{debug, error};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Opts {
    #[command(subcommand)]
    command: Commands,
    /// Directory holding the store, defaults to the current directory
    #[arg(long)]
    path: Option<PathBuf>,
    /// Engine page cache size in bytes
    #[arg(long)]
    cache_size: Option<usize>,
    /// Log engine activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Add { key: String, value: String },
    Update { key: String, value: String },
    Delete { key: String },
    Get { key: String },
    View,
    Clear,
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if opts.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    if let Err(e) = run(opts) {
        match e.downcast_ref::<kvapi::KvError>().map(|e| &**e) {
            Some(ErrorCode::KeyNotFound { .. }) => println!("Key not found"),
            _ => error!("{}", e),
        }
        exit(1)
    }
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let path = match opts.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let mut config = Config::default();
    if let Some(bytes) = opts.cache_size {
        config = config.cache_size(bytes);
    }
    debug!("store {} with {:?}", path.display(), config);

    let store = KvStore::open_with_config(&path, config)?;
    execute(&store, opts.command)?;
    store.close();
    Ok(())
}

fn execute<E: KvsEngine>(store: &E, command: Commands) -> kvapi::Result<()> {
    match command {
        Commands::Add { key, value } => store.add(key, value),
        Commands::Update { key, value } => store.update(key, value),
        Commands::Delete { key } => store.delete(key),
        Commands::Get { key } => {
            let value = store.get(key)?;
            println!("{}", String::from_utf8_lossy(&value));
            Ok(())
        }
        Commands::View => store.view(|key, value| {
            println!(
                "{}: {}",
                String::from_utf8_lossy(key),
                String::from_utf8_lossy(value)
            )
        }),
        Commands::Clear => store.clear(),
    }
}
