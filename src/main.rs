//! K-ICFR board harvester CLI
//!
//! Crawls the Q&A and FAQ boards and appends newly observed entries to
//! their spreadsheet tabs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use harvester::{
    error::Result,
    fetch::HttpFetcher,
    models::{BoardVariant, Config},
    pipeline,
    storage::{MemoryStore, RecordStore, SheetsAuth, SheetsStore},
};

/// K-ICFR board harvester
#[derive(Parser, Debug)]
#[command(
    name = "harvester",
    version,
    about = "Harvests K-ICFR board entries into Google Sheets"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl boards and sync new records to the store
    Sync {
        /// Restrict the run to one board
        #[arg(long, value_enum)]
        board: Option<BoardArg>,

        /// Override max_pages for every crawled board
        #[arg(long)]
        max_pages: Option<u32>,

        /// Crawl without touching the spreadsheet (in-memory store)
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoardArg {
    Qna,
    Faq,
}

impl From<BoardArg> for BoardVariant {
    fn from(arg: BoardArg) -> Self {
        match arg {
            BoardArg::Qna => BoardVariant::Qna,
            BoardArg::Faq => BoardVariant::Faq,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Sync {
            board,
            max_pages,
            dry_run,
        } => {
            config.validate()?;
            if let Some(pages) = max_pages {
                config.boards.qna.max_pages = pages;
                config.boards.faq.max_pages = pages;
            }

            let boards: Vec<BoardVariant> = match board {
                Some(arg) => vec![arg.into()],
                None => vec![BoardVariant::Qna, BoardVariant::Faq],
            };

            let fetcher = HttpFetcher::new(&config.crawler)?;

            // The store handle outlives the whole run; credentials are a
            // fatal precondition when we intend to write for real.
            let store: Box<dyn RecordStore> = if dry_run {
                log::info!("Dry run: records will not leave this process");
                Box::new(MemoryStore::new())
            } else {
                let auth = SheetsAuth::from_env()?;
                let spreadsheet_id = config.sheets.resolve_spreadsheet_id()?;
                Box::new(SheetsStore::new(
                    fetcher.client().clone(),
                    auth,
                    spreadsheet_id,
                ))
            };

            let summary = pipeline::run_sync(&config, &fetcher, store.as_ref(), &boards).await?;

            for board in &summary.boards {
                log::info!(
                    "[{}] {} candidates, {} duplicates, {} harvested, {} written{}",
                    board.variant,
                    board.candidates_seen,
                    board.duplicates,
                    board.harvested,
                    board.written,
                    if board.listing_failed {
                        " (crawl cut short by a listing failure)"
                    } else {
                        ""
                    }
                );
            }
            log::info!("Total written: {}", summary.total_written());
        }

        Command::Validate => {
            log::info!("Validating configuration from {}", cli.config.display());
            config.validate()?;
            log::info!("Config OK");
        }
    }

    Ok(())
}
