//! phonelog: Android phone record extraction and spam screening
//!
//! # Usage
//!
//! ```bash
//! # Pull calls, voicemail and SMS into phone_records_<timestamp>.json
//! phonelog extract
//!
//! # Pull contacts into contacts_<timestamp>.json
//! phonelog contacts
//!
//! # Field statistics of a snapshot
//! phonelog inspect phone_records_20240101_120000.json
//!
//! # Parse and enrich a snapshot into calls.dat, voicemails.dat, sms.dat
//! phonelog process phone_records_20240101_120000.json
//!
//! # Resolve carriers for the numbers in new_numbers.txt
//! phonelog lookup new_numbers.txt
//!
//! # Classify and write spam_<type>.dat
//! phonelog classify
//! ```

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use phonelog_rs::carrier::{refresh_carriers, CarrierLookupClient};
use phonelog_rs::config::{LoggingConfig, API_KEY_ENV};
use phonelog_rs::contacts::extract_contacts;
use phonelog_rs::device::{extract_snapshot, AdbDevice};
use phonelog_rs::pipeline::{process_snapshot, summarize_snapshot};
use phonelog_rs::spam::{RecordKind, Report, SpamClassifier};
use phonelog_rs::storage;
use phonelog_rs::Config;

#[derive(Parser)]
#[command(name = "phonelog")]
#[command(about = "Extract phone records and screen them for spam", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull calls, voicemail and SMS from the device
    Extract,
    /// Pull contacts from the device
    Contacts,
    /// Show field statistics of a snapshot
    Inspect {
        /// Snapshot written by `extract`
        snapshot: PathBuf,
    },
    /// Parse and enrich a snapshot
    Process {
        /// Snapshot written by `extract`
        snapshot: PathBuf,
    },
    /// Resolve carriers for a worklist of numbers
    Lookup {
        /// One number per line; defaults to the configured worklist
        worklist: Option<PathBuf>,
    },
    /// Classify processed records as spam
    Classify {
        /// Contacts snapshot; defaults to the configured contacts file
        #[arg(long)]
        contacts: Option<PathBuf>,
        /// Only this record type (call, sms, voicemail)
        #[arg(long)]
        only: Option<RecordKind>,
    },
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        "pretty" => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None if Path::new("phonelog.toml").exists() => Config::from_file("phonelog.toml")?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    info!("phonelog v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Extract => extract(&config).await,
        Commands::Contacts => contacts(&config).await,
        Commands::Inspect { snapshot } => inspect(&config, &snapshot).await,
        Commands::Process { snapshot } => process(&config, &snapshot).await,
        Commands::Lookup { worklist } => lookup(&config, worklist).await,
        Commands::Classify { contacts, only } => classify(&config, contacts, only).await,
    }
}

async fn extract(config: &Config) -> anyhow::Result<()> {
    info!("Extracting phone records...");
    let device = AdbDevice::new(&config.device.adb_path);
    let snapshot = extract_snapshot(&device, &config.device).await;

    let path = config.data_path(&format!("phone_records_{}.json", timestamp()));
    storage::write_json_pretty(&path, &snapshot).await?;

    println!("\nExtraction complete!");
    for (section, count) in snapshot.counts() {
        println!("{}: {} records", section, count);
    }
    println!("\nData saved to {}", path.display());
    Ok(())
}

async fn contacts(config: &Config) -> anyhow::Result<()> {
    info!("Extracting contacts...");
    let device = AdbDevice::new(&config.device.adb_path);
    let store = extract_contacts(&device, &config.device).await;

    let path = config.data_path(&format!("contacts_{}.json", timestamp()));
    tokio::fs::write(&path, store.to_json()?).await?;

    println!("\nExtracted {} contacts", store.len());
    println!("Data saved to {}", path.display());
    if let Some(contact) = store.iter().next() {
        let fields: Vec<&str> = contact.raw_fields.iter().map(|(k, _)| k).collect();
        println!("\nExample contact: {} ({})", contact.name, contact.raw_number);
        println!("Available fields in raw_data: {:?}", fields);
    }
    Ok(())
}

async fn inspect(config: &Config, snapshot: &Path) -> anyhow::Result<()> {
    let snapshot = storage::read_snapshot(snapshot)
        .await
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;

    for summary in summarize_snapshot(&snapshot) {
        if summary.rows == 0 {
            continue;
        }
        print!("{}", summary.with_top(config.report.top_field_values));
    }
    Ok(())
}

async fn process(config: &Config, snapshot: &Path) -> anyhow::Result<()> {
    let snapshot = storage::read_snapshot(snapshot)
        .await
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;
    let cache = storage::load_carrier_cache(&config.carrier_cache_path()).await?;

    let outcome = process_snapshot(&snapshot, &cache);

    println!(
        "Processed records - Calls: {}, Voicemails: {}, SMS: {}",
        outcome.calls.len(),
        outcome.voicemails.len(),
        outcome.sms.len()
    );
    println!("Found {} new numbers to lookup", outcome.needs_lookup.len());

    for kind in RecordKind::ALL {
        let path = config.data_path(&kind.data_file());
        storage::write_records(&path, outcome.records(kind)).await?;
    }
    storage::write_worklist(&config.worklist_path(), &outcome.needs_lookup).await?;
    Ok(())
}

async fn lookup(config: &Config, worklist: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = config.api_key().with_context(|| {
        format!("no carrier lookup key: set {} or lookup.api_key", API_KEY_ENV)
    })?;

    let worklist_path = worklist.unwrap_or_else(|| config.worklist_path());
    let numbers = storage::read_worklist(&worklist_path)
        .await
        .with_context(|| format!("reading worklist {}", worklist_path.display()))?;

    let cache_path = config.carrier_cache_path();
    let mut cache = storage::load_carrier_cache(&cache_path).await?;
    let mut sink = storage::open_cache_appender(&cache_path).await?;

    let client = CarrierLookupClient::new(
        config.lookup.base_url.clone(),
        api_key,
        config.lookup.timeout_seconds,
    )?;

    let summary = refresh_carriers(&numbers, &mut cache, &client, &mut sink).await?;

    println!(
        "Fetched {}, skipped {}, failed {}",
        summary.fetched, summary.skipped, summary.failed
    );
    for (carrier, count) in &summary.carriers {
        println!("  {}: {}", carrier, count);
    }
    if summary.failed > 0 {
        warn!("{} numbers remain unresolved", summary.failed);
    }
    Ok(())
}

async fn classify(
    config: &Config,
    contacts: Option<PathBuf>,
    only: Option<RecordKind>,
) -> anyhow::Result<()> {
    let contacts_path = contacts.unwrap_or_else(|| config.contacts_path());
    let known = storage::load_known_numbers(&contacts_path)
        .await
        .with_context(|| format!("loading contacts {}", contacts_path.display()))?;
    println!("Loaded {} contacts", known.len());

    let cache = storage::load_carrier_cache(&config.carrier_cache_path()).await?;
    let classifier = SpamClassifier::new(known);

    for kind in RecordKind::ALL {
        if only.is_some_and(|only| only != kind) {
            continue;
        }

        let path = config.data_path(&kind.data_file());
        let records = storage::read_records(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        let result = classifier.classify_batch(&records, kind, config.report.samples);
        storage::write_records(&config.data_path(&kind.spam_file()), &result.spam).await?;

        let report = Report::new(&result.stats, &cache)
            .with_limits(config.report.top_numbers, config.report.top_area_codes);
        println!("\n{}", report);
    }
    Ok(())
}
