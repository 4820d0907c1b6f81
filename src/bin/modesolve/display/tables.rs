use std::io::{self, Write};

use trapmodes::{Ion, ModeSolverResult, Settings, format_general};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_crystal_summary(ions: &[Ion], settings: &Settings) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let trap = &settings.trap;
    let mut rows = vec![
        ("Ions", ions.len().to_string()),
        ("Composition", composition(ions)),
        (
            "Secular (MHz)",
            format!("{} / {} / {}", trap.fx, trap.fy, trap.fz),
        ),
        ("Reference", trap.species.to_string()),
        ("Seed spacing", format!("{} um", settings.crystal.spacing)),
    ];

    if settings.field.enabled {
        let f = &settings.field;
        rows.push(("Field (V/m)", format!("{}, {}, {}", f.x, f.y, f.z)));
    }
    if settings.cubic.enabled {
        rows.push((
            "Cubic",
            format!("{} x 1e12 V/m^3", settings.cubic.coefficient),
        ));
    }
    if settings.quartic.enabled {
        rows.push((
            "Quartic",
            format!("{} x 1e18 V/m^4", settings.quartic.coefficient),
        ));
    }
    if settings.bounds.is_some() {
        rows.push(("Bounds", "per-axis box".to_string()));
    }

    print_kv_table(&mut out, "Crystal", &rows);
}

pub fn print_search_summary(result: &ModeSolverResult) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let diag = &result.diagnostics;
    let mut rows = vec![
        ("Termination", diag.termination.to_string()),
        ("Iterations", diag.iterations.to_string()),
        ("Evaluations", diag.evaluations.to_string()),
        ("Energy (V)", format_general(result.fun, 6)),
        ("|Gradient| (V/m)", format_general(result.gradient_norm(), 3)),
    ];

    if let Some(lowest) = result.modes.first() {
        rows.push((
            "Lowest mode",
            format!("{} MHz", format_general(lowest.frequency * 1e-6, 4)),
        ));
    }

    let unstable = result.unstable_modes().count();
    if unstable > 0 {
        rows.push(("Unstable modes", unstable.to_string()));
    }

    print_kv_table(&mut out, "Equilibrium Search", &rows);
}

/// `"Ca40 × 2, Be9"`: consecutive runs of one species collapsed.
fn composition(ions: &[Ion]) -> String {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    for ion in ions {
        match runs.last_mut() {
            Some((name, count)) if *name == ion.name() => *count += 1,
            _ => runs.push((ion.name(), 1)),
        }
    }

    runs.iter()
        .map(|(name, count)| {
            if *count == 1 {
                name.to_string()
            } else {
                format!("{name} × {count}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    let _ = writeln!(
        out,
        "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
        "Quantity", "Value"
    );
    let _ = writeln!(out, "{INDENT}├{k_line}┼{v_line}┤");

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
}
