use super::{flush_notifications, open_session};
use crate::output::Output;
use color_eyre::Result;
use mflix_config::{Config, PathManager};

pub fn run_clear(
    path_manager: &PathManager,
    config: Config,
    all: bool,
    watchlist: bool,
    history: bool,
    searches: bool,
    output: &Output,
) -> Result<()> {
    if !(all || watchlist || history || searches) {
        output.warn("No clear option specified. Use --watchlist, --history, --searches, or --all");
        output.println("\nExample: mflix clear --history");
        return Ok(());
    }

    let mut session = open_session(path_manager, &config);

    if all || watchlist {
        let count = session.watchlist().len();
        session.clear_watchlist();
        output.success(format!("Cleared My List ({} titles)", count));
    }

    if all || history {
        session.clear_history();
        flush_notifications(&mut session, output);
    }

    if all || searches {
        session.recent_searches_mut().clear();
        output.success("Cleared recent searches");
    }

    Ok(())
}
