//! Recall watcher CLI
//!
//! Polls the RappelConso API once or on a schedule, and searches it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use recall_watcher::{
    config,
    error::Result,
    models::{CanonicalRecord, PollResult, SearchCriteria},
    pipeline::{self, ChannelNotifier, LogNotifier, RecallService},
};

/// recall-watcher - RappelConso product recall monitor
#[derive(Parser, Debug)]
#[command(
    name = "recall-watcher",
    version,
    about = "Watches the French product recall register for new recalls"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single poll cycle
    Poll {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll on a schedule until interrupted, printing new recalls as JSON lines
    Watch {
        /// Seconds between cycles (default: poll.scan_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Search recalls by product name, brand, category or keyword
    Search {
        /// Partial product name match (repeatable)
        #[arg(long = "product-name")]
        product_names: Vec<String>,

        /// Partial brand match (repeatable)
        #[arg(long = "brand")]
        brands: Vec<String>,

        /// Exact category match (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Keyword searched in name, brand, subcategory and recall reason (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Maximum number of results (1-1000)
        #[arg(long)]
        limit: Option<i64>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the API answers
    Check,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_summary(result: &PollResult) {
    println!(
        "{} recalls in dataset, {} new since last poll (updated {})",
        result.total_count,
        result.new_recalls_count,
        result.last_update.to_rfc3339()
    );
    for recall in &result.recent_recalls {
        print_recall(recall);
    }
}

fn print_recall(recall: &CanonicalRecord) {
    println!(
        "  [{}] {} - {} ({})",
        recall.id,
        recall.publication_date().unwrap_or("-"),
        recall.product_name().unwrap_or("-"),
        recall.brand().unwrap_or("-")
    );
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_validated(&cli.config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());
    let service = RecallService::from_config(&config)?.with_notifier(Arc::new(LogNotifier));

    match cli.command {
        Command::Poll { json } => {
            let result = service.coordinator().refresh().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }

        Command::Watch { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| service.coordinator().config().scan_interval());
            let (notifier, mut events) = ChannelNotifier::new();
            let service = service.with_notifier(Arc::new(notifier));

            let printer = tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    match event.envelope() {
                        Ok(line) => println!("{line}"),
                        Err(e) => {
                            log::warn!("Could not serialize event {}: {}", event.recall_id, e)
                        }
                    }
                }
            });

            log::info!("Watching for new recalls every {:?} (Ctrl-C to stop)", interval);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            pipeline::run_watch(service.coordinator(), interval, shutdown).await;

            service.shutdown();
            if let Err(e) = printer.await {
                log::warn!("Event printer stopped abnormally: {}", e);
            }
            return Ok(());
        }

        Command::Search {
            product_names,
            brands,
            categories,
            keywords,
            limit,
            json,
        } => {
            let criteria = SearchCriteria {
                product_names,
                brands,
                categories,
                keywords,
                limit,
            };
            criteria.require_any()?;

            let response = service.search().search_response(&criteria).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{} recall(s) found", response.count);
                for recall in &response.recalls {
                    print_recall(recall);
                }
            }
        }

        Command::Check => {
            let total = service.source().probe().await?;
            log::info!("✓ API reachable, {} recalls in dataset", total);
        }

        Command::Validate => {
            log::info!("✓ Config OK (endpoint {})", config.api.endpoint);
        }
    }

    service.shutdown();
    Ok(())
}
