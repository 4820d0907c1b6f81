use anyhow::{Context, Result};
use log::info;

use trapmodes::default_settings;

use crate::cli::InitArgs;
use crate::config::save_settings;
use crate::display::{Context as DisplayContext, Progress};

pub fn run_init(args: InitArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 1);

    progress.step("Writing settings");
    save_settings(&args.output, default_settings(), args.force)
        .context("Failed to write the default settings")?;
    info!("wrote default settings to {}", args.output.display());

    progress.complete_step(
        "Writing settings",
        &[format!("Defaults → {}", args.output.display())],
    );
    progress.finish();

    Ok(())
}
