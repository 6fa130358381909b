//! # CBA Indicators CLI (`cba`)
//!
//! One command per page of the indicator selection flow.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cba home` | Show the two ways into the flow |
//! | `cba upload <FILE>` | Analyze a PDF or Excel project document |
//! | `cba chat` | Describe the project to the intake assistant |
//! | `cba results` | List, filter, and pick recommended indicators |
//! | `cba compare --ids 47,89` | Compare indicators side by side |
//! | `cba open <ROUTE>` | Open a page link such as `/results?session_id=...` |
//!
//! ## Examples
//!
//! ```bash
//! # Analyze a project plan
//! cba upload ./plan.pdf
//!
//! # Continue in chat with what the upload found
//! cba chat --location Kenya
//!
//! # Recommendations for a session, cheap indicators only
//! cba results --session-id abc123 --cost low
//!
//! # Demo comparison without a session
//! cba compare --ids 47,89
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use cba_core::filter::FilterValue;
use cba_core::models::{Component, Level};
use cba_core::route::{parse_ids, ChatParams, CompareParams, ResultsParams};
use cba_core::views::ViewMode;
use cba_indicators::client::HttpApi;
use cba_indicators::config::{self, API_URL_ENV};
use cba_indicators::render::OutputFormat;
use cba_indicators::results::ResultsOptions;
use cba_indicators::{chat, compare, home, logging, open, results, upload};

const DEFAULT_CONFIG: &str = "./config/cba.toml";

/// CBA Indicators: find monitoring indicators for a circular bioeconomy project.
#[derive(Parser)]
#[command(
    name = "cba",
    about = "CBA Indicators: find monitoring indicators for a circular bioeconomy project",
    version,
    long_about = "Describe a project by uploading its plan or chatting with the intake assistant, \
    then browse, filter, and compare the indicators the recommendation service suggests. \
    Without a session the demo catalog is shown."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/cba.toml`; a missing default file is fine.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the recommendation service. Overrides `CBA_API_URL` and
    /// the config file.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Grid,
    List,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Grid => ViewMode::Grid,
            ViewArg::List => ViewMode::List,
        }
    }
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the landing page choices.
    Home,

    /// Analyze a project document.
    ///
    /// Accepts PDF, XLSX, and XLS files. Prints what was found, what is
    /// missing, and where to continue.
    Upload {
        /// Path to the document.
        file: PathBuf,
    },

    /// Chat with the intake assistant.
    ///
    /// Reads one message per line from stdin. `/profile` shows the project
    /// profile, `/quit` ends the conversation.
    Chat {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        commodity: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        /// Technical capacity, or `skipped`.
        #[arg(long)]
        capacity: Option<String>,
        /// Continue an existing session.
        #[arg(long)]
        session_id: Option<String>,
    },

    /// List recommended indicators.
    ///
    /// Without a session the demo catalog is shown.
    Results {
        #[arg(long)]
        session_id: Option<String>,

        /// Comma-separated IDs to pre-select for comparison.
        #[arg(long)]
        ids: Option<String>,

        /// ID to drop from `--ids`.
        #[arg(long)]
        remove: Option<i64>,

        /// Component filter: `all`, `biotic`, `abiotic`, or `socioeconomic`.
        #[arg(long, default_value = "all")]
        component: FilterValue<Component>,

        /// Cost filter: `all`, `low`, `medium`, or `high`.
        #[arg(long, default_value = "all")]
        cost: FilterValue<Level>,

        /// Ease-of-use filter: `all`, `low`, `medium`, or `high`.
        #[arg(long, default_value = "all")]
        ease: FilterValue<Level>,

        /// Toggle an indicator in the comparison set (repeatable).
        #[arg(long)]
        select: Vec<i64>,

        #[arg(long, value_enum, default_value = "grid")]
        view: ViewArg,

        /// Show full detail for one indicator.
        #[arg(long)]
        expand: Option<i64>,
    },

    /// Compare indicators side by side.
    Compare {
        /// Comma-separated indicator IDs.
        #[arg(long, default_value = "")]
        ids: String,

        #[arg(long)]
        session_id: Option<String>,
    },

    /// Open a page link, e.g. `/compare?ids=47,89&session_id=abc`.
    Open {
        route: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let explicit = cli.config.is_some();
    let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let cfg = config::load_or_minimal(&path, explicit)?
        .with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url)?;
    logging::init(&cfg.logging);
    if cfg.api.uses_fallback_url() {
        tracing::warn!(
            url = config::DEFAULT_API_URL,
            "no API base URL configured, using the built-in fallback"
        );
    }
    tracing::debug!(base_url = %cfg.api.base_url, "configuration loaded");

    let api = HttpApi::from_config(&cfg)?;
    let format = cli.format;

    match cli.command {
        Commands::Home => home::run_home(),
        Commands::Upload { file } => upload::run_upload(&api, &file, format).await?,
        Commands::Chat {
            location,
            commodity,
            budget,
            capacity,
            session_id,
        } => {
            let params = ChatParams {
                location,
                commodity,
                budget,
                capacity,
                session_id,
            };
            chat::run_chat(&api, &params, format).await?;
        }
        Commands::Results {
            session_id,
            ids,
            remove,
            component,
            cost,
            ease,
            select,
            view,
            expand,
        } => {
            let params = ResultsParams {
                session_id,
                ids: ids.as_deref().map(parse_ids).unwrap_or_default(),
                remove,
            };
            let mut options = ResultsOptions::new(component, cost, ease);
            options.select = select;
            options.view_mode = view.into();
            options.expand = expand;
            results::run_results(&api, &params, &options, format).await?;
        }
        Commands::Compare { ids, session_id } => {
            let params = CompareParams {
                ids: parse_ids(&ids),
                session_id,
            };
            compare::run_compare(&api, &params, format).await?;
        }
        Commands::Open { route } => open::run_open(&api, &route, format).await?,
    }

    Ok(())
}
