use anyhow::Context;
use clap::Parser;
use poker_cli::{Cli, Error};
use poker_execution::{FileSystemPlayerStore, TexasHoldem, TokioAlerter, WriterSink};
use std::{io, path::PathBuf, str::FromStr, sync::Arc, time::Duration};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a game of poker from the terminal")]
struct Args {
    #[arg(short, long, default_value = "game.db.json")]
    database: PathBuf,

    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Length of one blind unit in seconds (the increment is 5 + players units)
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    blind_unit_secs: u64,
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    let level = Level::from_str(&args.log_level)
        .with_context(|| format!("invalid log level: {}", args.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // Alerts are delivered on the runtime while this thread blocks on stdin
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    let store = FileSystemPlayerStore::from_path(&args.database)
        .with_context(|| format!("problem creating player store from {:?}", args.database))?;
    let game = TexasHoldem::with_unit(
        TokioAlerter::new(runtime.handle().clone()),
        store,
        Duration::from_secs(args.blind_unit_secs),
    );
    info!(database = ?args.database, "ready");

    println!("Let's play poker");
    println!("Type {{Name}} wins to record a win");

    let mut cli = Cli::new(
        io::stdin().lock(),
        io::stdout(),
        game,
        Arc::new(WriterSink::stdout()),
    );
    match cli.play_poker() {
        // Already reported to the user
        Ok(()) | Err(Error::Input(_)) => Ok(()),
        Err(e) => Err(e).context("game failed"),
    }
}
