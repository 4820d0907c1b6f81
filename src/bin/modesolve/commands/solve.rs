use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use trapmodes::{ModeSolverResult, Settings};

use crate::cli::SolveArgs;
use crate::config::{apply_overrides, load_settings, save_settings};
use crate::display::{
    Context as DisplayContext, Progress, print_crystal_summary, print_search_summary,
};
use crate::io::{create_output, stdout_is_tty};

const TOTAL_STEPS: u8 = 3;

pub fn run_solve(args: SolveArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading settings");
    let mut settings = load_settings(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);
    let ions = settings.ion_list().context("Invalid ion list")?;

    if let Some(path) = &args.output.save {
        save_settings(path, &settings, args.output.force)?;
        info!("saved effective settings to {}", path.display());
    }
    progress.complete_step("Loading settings", &build_load_substeps(&args, &settings));

    if ctx.interactive {
        print_crystal_summary(&ions, &settings);
    }

    progress.step("Searching for equilibrium");
    let result = settings.solve().context("Mode solver failed")?;

    let search_substeps = build_search_substeps(&result);
    if result.diagnostics.success && result.is_finite() {
        progress.complete_step("Searching for equilibrium", &search_substeps);
    } else {
        progress.warn_step("Searching for equilibrium", &search_substeps);
    }

    if ctx.interactive {
        print_search_summary(&result);
    }

    progress.step("Writing report");
    write_report(&result, &args, settings.report.precision)?;

    let target = args
        .output
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    progress.complete_step("Writing report", &[format!("Report → {target}")]);

    progress.finish();

    Ok(())
}

fn build_load_substeps(args: &SolveArgs, settings: &Settings) -> Vec<String> {
    let mut steps = vec![match &args.config {
        Some(path) => format!("Read {}", path.display()),
        None => "Use built-in defaults".to_string(),
    }];

    let mut terms = vec!["harmonic"];
    if settings.field.enabled {
        terms.push("field");
    }
    if settings.cubic.enabled {
        terms.push("cubic");
    }
    if settings.quartic.enabled {
        terms.push("quartic");
    }
    steps.push(format!("Potential: {}", terms.join(" + ")));

    if let Some(path) = &args.output.save {
        steps.push(format!("Save settings → {}", path.display()));
    }

    steps
}

fn build_search_substeps(result: &ModeSolverResult) -> Vec<String> {
    let diag = &result.diagnostics;
    vec![
        format!(
            "{} iterations, {} evaluations",
            diag.iterations, diag.evaluations
        ),
        format!("Stopped: {}", diag.termination),
        format!("{} normal modes", result.modes.len()),
    ]
}

fn write_report(result: &ModeSolverResult, args: &SolveArgs, precision: usize) -> Result<()> {
    let path = args.output.output.as_deref();

    let report = if path.is_none() && stdout_is_tty() {
        result.render_report_styled(precision, |s| format!("\x1b[33m{s}\x1b[0m"))
    } else {
        result.render_report(precision)
    };

    let mut writer = create_output(path)?;
    writer
        .write_all(report.as_bytes())
        .context("Failed to write report")?;
    writer.flush().context("Failed to write report")
}
