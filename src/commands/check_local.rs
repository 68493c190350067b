//! check-local command handler

use anyhow::Result;
use serde_json::json;

use gitship::application::CheckoutGuard;
use gitship::infrastructure::LocalShell;
use gitship::presentation::cli::CheckLocalArgs;
use gitship::presentation::output::ok_line;

pub fn cmd_check_local(args: CheckLocalArgs, json: bool) -> Result<()> {
    let guard = CheckoutGuard::new(LocalShell::new());
    if let Some(against) = &args.against {
        guard.ensure_up_to_date(&args.path, against)?;
    }
    if args.clean {
        guard.ensure_clean(&args.path)?;
    }

    let path = args.path.display().to_string();
    if json {
        println!(
            "{}",
            json!({
                "event": "ok",
                "command": "check-local",
                "path": path,
                "against": args.against,
                "clean": args.clean,
            })
        );
    } else {
        println!("{}", ok_line("check_local", &[&path]));
    }
    Ok(())
}
