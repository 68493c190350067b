//! Mirror command handler

use anyhow::Result;

use gitship::application::{MirrorOptions, MirrorRequest};
use gitship::config::Config;
use gitship::presentation::cli::MirrorArgs;
use gitship::presentation::{create_mirror_sync, output};

use super::{deploy_context, run_guards};

pub fn cmd_mirror(args: MirrorArgs, config: &Config, json: bool) -> Result<()> {
    run_guards(&args.guards)?;
    let ctx = deploy_context(&args.target, config)?;

    let refspec = args
        .refspec
        .unwrap_or_else(|| config.mirror.refspec.clone());
    let request = MirrorRequest::new(args.repo_url, args.repo_dir, refspec);
    let options = MirrorOptions {
        home: args.home.or_else(|| config.mirror.home.clone()),
        base_dir: args
            .base_dir
            .unwrap_or_else(|| config.mirror.base_dir.clone()),
        save_history: args.save_history || config.mirror.save_history,
        delete_extraneous: !args.no_delete && config.mirror.delete_extraneous,
    };

    let sync = create_mirror_sync(&ctx);
    // transfer output goes to stderr so stdout stays parseable
    let report = sync.deploy(&ctx, &request, &options, &mut std::io::stderr())?;

    if json {
        println!(
            "{}",
            output::mirror_json(&report, &request.repo_dir, &request.refspec)
        );
    } else {
        println!(
            "{}",
            output::render_mirror(&report, &request.repo_dir, &request.refspec)
        );
    }
    Ok(())
}
