mod cli;

use anyhow::Result;
use cli::{Args, Command};
use fingrowth::{derive_file, run_shell, AppConfig, EnhancedTable, Interpreter};
use std::io;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(&args);
    tracing::info!("fingrowth v{}", fingrowth::VERSION);

    let config = args.to_config();
    config.validate()?;

    match args.command() {
        Command::Derive { .. } => {
            run_derive(&config)?;
        }
        Command::Chat { .. } => {
            let table = EnhancedTable::load_csv(&config.derived_csv)?;
            run_chat(table, &config)?;
        }
        Command::Run { .. } => {
            let table = run_derive(&config)?;
            run_chat(table, &config)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins when set; otherwise the --verbose/--quiet level
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| args.default_filter());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("⚠️  Logging already initialized");
    }
}

fn run_derive(config: &AppConfig) -> Result<EnhancedTable> {
    let (table, summary) = derive_file(&config.input_csv, &config.derived_csv)?;

    for skipped in &summary.skipped {
        eprintln!(
            "⚠️  Skipped {}: {} yearly rows (need 3)",
            skipped.company, skipped.row_count
        );
    }
    eprintln!(
        "✓ {} → {}",
        summary.summary(),
        config.derived_csv.display()
    );

    Ok(table)
}

fn run_chat(table: EnhancedTable, config: &AppConfig) -> Result<()> {
    let interpreter = Interpreter::from_config(table, config)?;

    let stdin = io::stdin();
    let stats = run_shell(&interpreter, stdin.lock(), io::stdout())?;
    tracing::info!(questions = stats.questions, "chat session finished");

    Ok(())
}
