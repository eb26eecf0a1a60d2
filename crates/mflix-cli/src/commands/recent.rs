use super::{is_json, open_session};
use crate::output::Output;
use crate::RecentCommands;
use color_eyre::Result;
use mflix_config::{Config, PathManager};
use serde_json::json;

pub fn run_recent(path_manager: &PathManager, config: Config, cmd: RecentCommands, output: &Output) -> Result<()> {
    let mut session = open_session(path_manager, &config);

    match cmd {
        RecentCommands::List => {
            let recent = session.recent_searches().entries();
            if is_json(output) {
                output.json(&json!({ "recent": recent }));
            } else if recent.is_empty() {
                output.info("No recent searches");
            } else {
                for (idx, entry) in recent.iter().enumerate() {
                    output.println(format!("  {}. {}", idx + 1, entry));
                }
            }
        }
        RecentCommands::Clear => {
            session.recent_searches_mut().clear();
            output.success("Recent searches cleared");
        }
    }
    Ok(())
}
