use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, clear, config, history, home, recent, search, show, watchlist};
use mflix_config::{Config, PathManager};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "mflix")]
#[command(about = "MFLIX - Browse the catalog, keep a list, pick up where you left off")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home feed
    #[command(long_about = "Render the home screen: the featured banner followed by Continue Watching, My List, Trending Now, Latest Releases and the genre rails. Empty rails are skipped.")]
    Home,

    /// List every title in a category
    #[command(long_about = "List titles for a category tag: all, trending, latest, 4k, bollywood, hollywood, or any genre name (matched as a substring of the genre list).")]
    Browse {
        /// Category tag
        #[arg(default_value = "all")]
        tag: String,
    },

    /// Search titles by name, genre, cast or director
    #[command(long_about = "Search the catalog. Queries need at least two characters. Without a query, the recent searches are shown. Use --select to open a result and remember it as a recent search.")]
    Search {
        /// Search text
        query: Option<String>,

        /// Remember the given result id as a recent search
        #[arg(long, value_name = "ID")]
        select: Option<String>,
    },

    /// Show a title's details, links, seasons and related titles
    Show {
        /// Title id
        id: String,
    },

    /// Manage My List
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },

    /// Manage watch history and playback progress
    History {
        #[command(subcommand)]
        cmd: Option<HistoryCommands>,
    },

    /// Manage recent searches
    Recent {
        #[command(subcommand)]
        cmd: Option<RecentCommands>,
    },

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },

    /// Clear stored client data
    #[command(long_about = "Clear stored client data. Use --watchlist, --history or --searches to clear one store, or --all to clear everything.")]
    Clear {
        /// Clear every store
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear My List
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        /// Clear watch history
        #[arg(long, action = ArgAction::SetTrue)]
        history: bool,

        /// Clear recent searches
        #[arg(long, action = ArgAction::SetTrue)]
        searches: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List titles on My List
    List,
    /// Add a title, or remove it if already listed
    Toggle { id: String },
    /// Remove a title
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List watch history, most recent first
    List,
    /// Record playback progress for a title
    Save {
        id: String,
        /// Position in seconds
        position: f64,
        /// Duration in seconds
        duration: f64,
    },
    /// Remove a title from history
    Remove { id: String },
    /// Clear the whole history
    Clear,
    /// Show watching statistics
    Stats,
}

#[derive(Subcommand)]
pub enum RecentCommands {
    /// List recent searches
    List,
    /// Clear recent searches
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Write a configuration file
    Init {
        /// Catalog base URL (Firebase-style REST endpoint)
        #[arg(long, conflicts_with = "file")]
        base_url: Option<String>,

        /// Local JSON catalog export instead of an HTTP source
        #[arg(long)]
        file: Option<std::path::PathBuf>,

        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Log to a daily rotated file under the data directory
        #[arg(long, action = ArgAction::SetTrue)]
        log_to_file: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let path_manager = PathManager::default();
    let config = Config::load_or_default(&path_manager.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path_manager.config_file().display(), e))?;

    // Initialize logging with verbose level
    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    tracing::debug!(config_file = %path_manager.config_file().display(), "Configuration loaded");

    // Create output handler
    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Home => home::run_home(&path_manager, config, &output).await,
        Commands::Browse { tag } => browse::run_browse(&path_manager, config, &tag, &output).await,
        Commands::Search { query, select } => {
            search::run_search(&path_manager, config, query, select, &output).await
        }
        Commands::Show { id } => show::run_show(&path_manager, config, &id, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(&path_manager, config, cmd, &output).await
        }
        Commands::History { cmd } => {
            let cmd = cmd.unwrap_or(HistoryCommands::List);
            history::run_history(&path_manager, config, cmd, &output).await
        }
        Commands::Recent { cmd } => {
            let cmd = cmd.unwrap_or(RecentCommands::List);
            recent::run_recent(&path_manager, config, cmd, &output)
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            config::run_config(&path_manager, config, cmd, &output)
        }
        Commands::Clear { all, watchlist, history, searches } => {
            clear::run_clear(&path_manager, config, all, watchlist, history, searches, &output)
        }
    }
}
