//! History command handler

use anyhow::Result;

use gitship::config::Config;
use gitship::presentation::cli::HistoryArgs;
use gitship::presentation::{create_history_query, output};

use super::deploy_context;

pub fn cmd_history(args: HistoryArgs, config: &Config, json: bool) -> Result<()> {
    let ctx = deploy_context(&args.target, config)?;
    let home = args.home.or_else(|| config.mirror.home.clone());

    let query = create_history_query(&ctx);
    let records = query.show_commits(&ctx, &args.repo_dir, args.limit, home.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", output::render_history(&records)?);
    }
    Ok(())
}
