use anyhow::Context;
use bingo_simulator::{Config, Pacing, Table, TracingSink};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML table configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    rounds: Option<u64>,

    /// Hex table seed (32 bytes)
    #[arg(short, long)]
    seed: Option<String>,

    #[arg(long)]
    cards: Option<u8>,

    #[arg(long)]
    bet: Option<u64>,

    /// Skip spin, reveal and draw delays
    #[arg(long, default_value_t = false)]
    fast: bool,

    /// Emit log lines as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => {
            let file = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            serde_yaml::from_str::<Config>(&file).context("could not parse config file")?
        }
        None => Config::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(cards) = args.cards {
        config.card_count = cards;
    }
    if let Some(bet) = args.bet {
        config.bet = bet;
    }
    let mut config = config.validate().context("invalid config")?;
    if args.fast {
        config.pacing = Pacing::instant();
    }

    // Create logger
    if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(config.log_level)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(config.log_level)
            .init();
    }

    info!(
        seed = commonware_utils::hex(&config.seed),
        rounds = config.rounds,
        cards = config.session.card_count,
        bet = config.session.bet,
        "opening table"
    );
    let mut table = Table::new(config, TracingSink).context("could not open table")?;
    let summary = table
        .run(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(?err, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("table failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode summary")?
    );
    Ok(())
}
