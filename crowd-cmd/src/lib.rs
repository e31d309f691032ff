//! Command implementations for the crowd CLI.
//!
//! Runs the same selection engine the dashboard uses, with a JSON state file
//! standing in for cookies and command-line flags standing in for URL params.

use clap::Subcommand;
use crowd_selection::PageContext;
use std::path::PathBuf;

pub mod file_store;
pub mod ranking;
pub mod select;

pub use file_store::FileStore;

const DEFAULT_STATE_FILE: &str = "crowd-state.json";

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a selection and fetch its dataset
    Fetch {
        /// Page context: default, purpose or function
        #[arg(short, long, default_value = "default")]
        context: PageContext,

        /// Location id (e.g. old-town, station)
        #[arg(short, long)]
        location: Option<String>,

        /// Purpose sent as `action`
        #[arg(short, long)]
        purpose: Option<String>,

        #[arg(short, long)]
        year: Option<String>,

        #[arg(short, long)]
        month: Option<String>,

        /// File that remembers selections between runs
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state_file: PathBuf,

        #[arg(long, default_value = crowd_api::DEFAULT_BASE_URL)]
        base_url: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Fetch the monthly foreign-visitor ranking
    Ranking {
        #[arg(short, long)]
        month: u32,

        /// Fiscal year label (e.g. R6); the backend picks the latest when omitted
        #[arg(short, long)]
        year: Option<String>,

        #[arg(short = 'n', long, default_value_t = crowd_selection::ranking::DEFAULT_TOP_N)]
        top_n: u32,

        #[arg(long, default_value = crowd_api::DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Forget the remembered selection of a page context
    Reset {
        #[arg(short, long, default_value = "default")]
        context: PageContext,

        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state_file: PathBuf,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            context,
            location,
            purpose,
            year,
            month,
            state_file,
            base_url,
            timeout,
        } => {
            let overrides = select::Overrides {
                location,
                purpose,
                year,
                month,
            };
            select::run_fetch(context, overrides, &state_file, &base_url, timeout).await
        }
        Command::Ranking {
            month,
            year,
            top_n,
            base_url,
        } => ranking::run_ranking(month, year, top_n, &base_url).await,
        Command::Reset {
            context,
            state_file,
        } => select::run_reset(context, &state_file).await,
    }
}
