use std::error::Error;
use std::fs;
use std::io::{self, Write};

use kompass_leagues::config::Settings;
use kompass_leagues::{ClubRecord, ClubSet, Partitioner, RunReport};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Optional explicit config file as first argument
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(&path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    if let Err(e) = run(&settings) {
        error!("Partitioning failed: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let path = &settings.input.clubs_path;
    info!("Reading clubs from {}", path.display());
    let records: Vec<ClubRecord> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let clubs = ClubSet::from_records(records)?;

    if let Some(region) = settings.input.region() {
        let outside = clubs.check_region(&region);
        if !outside.is_empty() {
            warn!("{} club(s) outside the expected region", outside.len());
        }
    }

    let partitioner = Partitioner::new(settings.partition_config())?;
    let outcome = partitioner.run(&clubs)?;

    let report = RunReport {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        outcome,
    };
    info!("Run {} finished", report.run_id);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
