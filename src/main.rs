use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use suimon_arena::{Arena, ArenaConfig, InMemoryPlayerRepo, PlayerRecord, Species};

#[derive(Parser)]
#[command(name = "suimon-arena")]
#[command(about = "Simulate a seeded champion battle and show its settlement")]
struct Args {
    /// Player 1 champion (name or alias, e.g. mander)
    #[arg(long, default_value = "suimander")]
    p1: String,

    /// Player 2 champion
    #[arg(long, default_value = "basaurimon")]
    p2: String,

    #[arg(long, default_value_t = 1)]
    p1_level: u32,

    #[arg(long, default_value_t = 1)]
    p2_level: u32,

    /// RNG seed; the same seed replays the same battle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Use the tactical AI instead of uniform move choice
    #[arg(long, default_value_t = false)]
    tactical: bool,

    /// Optional RON arena config
    #[arg(long)]
    config: Option<PathBuf>,
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn champion_record(id: &str, alias: &str, level: u32) -> Result<PlayerRecord, String> {
    let species =
        Species::from_alias(alias).ok_or_else(|| format!("unknown champion '{alias}'"))?;
    if level == 0 {
        return Err("level must be at least 1".to_string());
    }
    let mut record = PlayerRecord::new(id, format!("{id} ({species})"));
    record.choose_champion(species).map_err(|e| e.to_string())?;
    record.level = level;
    Ok(record)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    // The CLI never touches a store on disk.
    config.player_store_path = None;

    let repo = InMemoryPlayerRepo::with_records([
        champion_record("p1", &args.p1, args.p1_level)?,
        champion_record("p2", &args.p2, args.p2_level)?,
    ]);
    let arena = Arena::new(Arc::new(repo), config).with_tactical_ai(args.tactical);

    let report = arena.run_auto_battle("cli", "p1", "p2", Some(args.seed)).await?;

    for line in &report.log {
        println!("{line}");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&report.settlement)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
