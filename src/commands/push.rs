//! Push command handler

use anyhow::Result;

use gitship::application::PushRequest;
use gitship::config::Config;
use gitship::presentation::cli::PushArgs;
use gitship::presentation::{create_push_hook_sync, output};

use super::{deploy_context, run_guards};

pub fn cmd_push(args: PushArgs, config: &Config, json: bool) -> Result<()> {
    run_guards(&args.guards)?;
    let ctx = deploy_context(&args.target, config)?;

    let branch = args.branch.unwrap_or_else(|| config.push.branch.clone());
    let request = PushRequest::new(args.repo_url, branch, args.dest_name).with_dest_base_path(
        args.dest_base_path
            .unwrap_or_else(|| config.push.dest_base_path.clone()),
    );

    let sync = create_push_hook_sync(&ctx);
    let report = sync.deploy(&ctx, &request, &mut std::io::stderr())?;

    if json {
        println!(
            "{}",
            output::push_json(&report, &request.dest_name, &request.branch)
        );
    } else {
        println!(
            "{}",
            output::render_push(&report, &request.dest_name, &request.branch)
        );
    }
    Ok(())
}
