use trapmodes::Settings;

use crate::cli::{PerturbationOptions, SolveArgs, SolverOptions, TrapOptions};

/// Layers command-line overrides on top of loaded settings. Giving a
/// perturbation coefficient also switches that term on.
pub fn apply_overrides(settings: &mut Settings, args: &SolveArgs) {
    apply_trap(settings, &args.trap);
    apply_perturbations(settings, &args.perturbation);
    apply_solver(settings, &args.solver);
}

fn apply_trap(settings: &mut Settings, opts: &TrapOptions) {
    if let Some(ions) = &opts.ions {
        settings.ions = ions.clone();
    }
    if let Some(fx) = opts.fx {
        settings.trap.fx = fx;
    }
    if let Some(fy) = opts.fy {
        settings.trap.fy = fy;
    }
    if let Some(fz) = opts.fz {
        settings.trap.fz = fz;
    }
    if let Some(species) = opts.species {
        settings.trap.species = species;
    }
    if let Some(spacing) = opts.spacing {
        settings.crystal.spacing = spacing;
    }
}

fn apply_perturbations(settings: &mut Settings, opts: &PerturbationOptions) {
    if let Some(field) = opts.field {
        let [x, y, z] = field.0;
        settings.field.enabled = true;
        settings.field.x = x;
        settings.field.y = y;
        settings.field.z = z;
    }
    if let Some(coefficient) = opts.cubic {
        settings.cubic.enabled = true;
        settings.cubic.coefficient = coefficient;
    }
    if let Some(coefficient) = opts.quartic {
        settings.quartic.enabled = true;
        settings.quartic.coefficient = coefficient;
    }
}

fn apply_solver(settings: &mut Settings, opts: &SolverOptions) {
    if let Some(max_iterations) = opts.max_iterations {
        settings.minimizer.max_iterations = max_iterations;
    }
    if let Some(precision) = opts.precision {
        settings.report.precision = precision;
    }
    if let Some(title) = &opts.title {
        settings.title = title.clone();
    }
}
