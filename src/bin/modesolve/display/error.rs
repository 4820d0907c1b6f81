use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = Vec::new();

    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<trapmodes::Error>() {
            solver_hints(e, &mut hints);
        } else if let Some(e) = cause.downcast_ref::<io::Error>() {
            io_hints(e, &mut hints);
        }
        if !hints.is_empty() {
            return hints;
        }
    }

    fallback_hints(err, &mut hints);
    hints
}

fn solver_hints(err: &trapmodes::Error, hints: &mut Vec<String>) {
    use trapmodes::Error as E;

    match err {
        E::EmptyCrystal => {
            hints.push("The ion list contains no ions".into());
            hints.push("Pass at least one ion, e.g. --ions \"Ca40 * 2\"".into());
        }
        E::PositionCountMismatch { .. } => {
            hints.push("Every ion needs exactly one seed position".into());
        }
        E::InvalidBounds { axis, .. } => {
            hints.push(format!("The {axis} bound pair must be ordered as [min, max]"));
            hints.push("Bounds are given in metres in the [bounds] setting".into());
        }
        E::InvalidFrequency { .. } => {
            hints.push("Secular frequencies must be positive, in MHz".into());
        }
        E::InvalidIon(_) => {
            let names: Vec<&str> = trapmodes::Species::ALL.iter().map(|s| s.name()).collect();
            hints.push(format!("Supported species: {}", names.join(", ")));
            hints.push("Entries look like \"Ca40\", \"Ca40 * 2\" or \"2 * Ca40\"".into());
        }
        E::SettingsParse(_) => {
            hints.push("The settings file is not valid TOML for this tool".into());
            hints.push("Run `modesolve init` to write a reference file".into());
        }
        E::SettingsSerialize(_) => {
            hints.push("The effective settings could not be written as TOML".into());
        }
    }
}

fn io_hints(err: &io::Error, hints: &mut Vec<String>) {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => {
            hints.push("File or directory not found".into());
            hints.push("Check the path spelling and ensure the file exists".into());
        }
        ErrorKind::PermissionDenied => {
            hints.push("Permission denied accessing the file".into());
            hints.push("Check file permissions with `ls -la`".into());
        }
        ErrorKind::AlreadyExists => {
            hints.push("File already exists".into());
            hints.push("Pass --force to overwrite it".into());
        }
        ErrorKind::BrokenPipe => {
            hints.push("Output consumer terminated early".into());
        }
        _ => {
            hints.push("I/O operation failed".into());
            hints.push("Check file path, permissions, and disk space".into());
        }
    }
}

fn fallback_hints(err: &Error, hints: &mut Vec<String>) {
    let msg = error_chain_text(err);

    if msg.contains("already exists") {
        hints.push("Pass --force to overwrite the existing file".into());
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn solver_errors_get_typed_hints() {
        let err = trapmodes::parse_ion_list("Xe131")
            .map_err(trapmodes::Error::from)
            .context("Failed to read ion list")
            .unwrap_err();
        let hints = collect_hints(&err);
        assert!(hints.iter().any(|h| h.contains("Supported species")));
    }

    #[test]
    fn io_errors_get_hints() {
        let err = Error::new(io::Error::from(io::ErrorKind::NotFound)).context("Failed to open");
        let hints = collect_hints(&err);
        assert!(hints.iter().any(|h| h.contains("not found")));
    }

    #[test]
    fn overwrite_refusal_suggests_force() {
        let err = anyhow::anyhow!("modesolve.toml already exists");
        assert_eq!(collect_hints(&err), ["Pass --force to overwrite the existing file"]);
    }
}
