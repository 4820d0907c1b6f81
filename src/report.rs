//! Plain-text report of a solved crystal.
//!
//! The report has three parts: a title line naming the ion crystal, the
//! equilibrium positions in µm (one bracketed row per ion), and a table of
//! normal modes with one row per mode: the frequency in MHz followed by the
//! x, y and z participation of every ion. Numbers are printed in the general
//! format of C's `%.<precision>g`.
//!
//! Rendering is deterministic; the same result always renders to the same
//! bytes. Section titles can be decorated through
//! [`ModeSolverResult::render_report_styled`], e.g. to colour them on a
//! terminal, without touching the rest of the text.

use std::fmt;

use crate::model::result::ModeSolverResult;

const RULE: &str = "--------------";

/// Mode table assembled from a result, before any layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    /// `"Freq [MHz]"`, then `"", name, ""` for every ion.
    pub headers: Vec<String>,
    /// One row per mode; `1 + 3N` formatted cells each.
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Lays the table out with right-aligned columns and a dashed rule
    /// under the header.
    pub fn render(&self) -> String {
        let n_cols = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(line(&self.headers));
        lines.push(
            widths
                .iter()
                .take(n_cols)
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(line(row));
        }
        lines.join("\n")
    }
}

impl ModeSolverResult {
    /// The normal-mode table with every number at `precision` significant digits.
    pub fn report_table(&self, precision: usize) -> ReportTable {
        let mut headers = vec!["Freq [MHz]".to_string()];
        for ion in &self.ions {
            headers.extend([String::new(), ion.name().to_string(), String::new()]);
        }

        let rows = self
            .modes
            .iter()
            .map(|mode| {
                std::iter::once(mode.frequency * 1e-6)
                    .chain(mode.shape.iter().flatten().copied())
                    .map(|v| format_general(v, precision))
                    .collect()
            })
            .collect();

        ReportTable { headers, rows }
    }

    /// The full report as plain text.
    pub fn render_report(&self, precision: usize) -> String {
        self.render_report_styled(precision, |s| s.to_string())
    }

    /// The full report, with `style` applied to the title and section headings.
    pub fn render_report_styled<F>(&self, precision: usize, style: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let names: Vec<&str> = self.ions.iter().map(|ion| ion.name()).collect();

        let lines = [
            style(RULE),
            style(&format!(
                "Mode solver analysis for ion crystal [{}]: {}",
                names.join(", "),
                self.title
            )),
            style("Equilibrium positions [um]"),
            render_positions(&self.x_eq, precision),
            style("Normal modes"),
            self.report_table(precision).render(),
            String::new(),
        ];
        lines.join("\n")
    }
}

impl fmt::Display for ModeSolverResult {
    /// Uses the formatter precision as the number of significant digits, 4 by default.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_report(f.precision().unwrap_or(4)))
    }
}

fn render_positions(x: &[[f64; 3]], precision: usize) -> String {
    let cells: Vec<[String; 3]> = x
        .iter()
        .map(|row| row.map(|v| format_general(v * 1e6, precision)))
        .collect();
    let width = cells
        .iter()
        .flatten()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    cells
        .iter()
        .map(|row| {
            let inner: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            format!("[{}]", inner.join("  "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats `value` like C's `%.<precision>g`.
///
/// Fixed notation is used when the decimal exponent lies in
/// `-4 ..= precision - 1`, scientific notation otherwise; trailing zeros
/// are removed in both.
///
/// ```
/// use trapmodes::format_general;
///
/// assert_eq!(format_general(1.7320508, 4), "1.732");
/// assert_eq!(format_general(0.5, 4), "0.5");
/// assert_eq!(format_general(1.0e-5, 4), "1e-05");
/// assert_eq!(format_general(123456.0, 4), "1.235e+05");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let p = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp >= -4 && exp < p as i32 {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_zeros(mantissa), exp.abs())
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ion::Species;
    use crate::model::result::{Diagnostics, NormalMode, Termination};
    use crate::solve::{HarmonicTrap, Potential, SecularFrequencies};
    use nalgebra::DMatrix;

    #[test]
    fn general_format_fixed_range() {
        assert_eq!(format_general(1.0, 4), "1");
        assert_eq!(format_general(-2.5, 4), "-2.5");
        assert_eq!(format_general(3.0001, 4), "3");
        assert_eq!(format_general(0.0001234, 4), "0.0001234");
        assert_eq!(format_general(9999.4, 4), "9999");
        assert_eq!(format_general(0.70710678, 4), "0.7071");
    }

    #[test]
    fn general_format_scientific_range() {
        assert_eq!(format_general(0.00001234, 4), "1.234e-05");
        assert_eq!(format_general(99996.0, 4), "1e+05");
        assert_eq!(format_general(-6.02e23, 3), "-6.02e+23");
        assert_eq!(format_general(1.5e-300, 2), "1.5e-300");
    }

    #[test]
    fn general_format_rounding_moves_exponent() {
        assert_eq!(format_general(9.99995, 4), "10");
        assert_eq!(format_general(0.000099999, 2), "0.0001");
    }

    #[test]
    fn general_format_special_values() {
        assert_eq!(format_general(0.0, 4), "0");
        assert_eq!(format_general(-0.0, 4), "-0");
        assert_eq!(format_general(f64::NAN, 4), "nan");
        assert_eq!(format_general(f64::INFINITY, 4), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY, 4), "-inf");
        assert_eq!(format_general(123.456, 0), "1e+02");
    }

    fn sample_result() -> ModeSolverResult {
        let ca = Species::Ca40.ion();
        let trap = HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &ca);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let modes = vec![
            NormalMode {
                eigenvalue: 1.0,
                frequency: 1.0e6,
                shape: vec![[s, 0.0, 0.0], [s, 0.0, 0.0]],
            },
            NormalMode {
                eigenvalue: 3.0,
                frequency: 1.7320508e6,
                shape: vec![[-s, 0.0, 0.0], [s, 0.0, 0.0]],
            },
        ];
        ModeSolverResult {
            ions: vec![ca, ca],
            x0: vec![[-2.5e-6, 0.0, 0.0], [2.5e-6, 0.0, 0.0]],
            x_eq: vec![[-2.8124e-6, 0.0, 0.0], [2.8124e-6, 0.0, 0.0]],
            potential: Potential::from(trap),
            fun: 1.0,
            jac: vec![0.0; 6],
            hess: DMatrix::zeros(6, 6),
            trap_energies: vec![0.5, 0.5],
            modes,
            diagnostics: Diagnostics {
                iterations: 3,
                evaluations: 5,
                success: true,
                termination: Termination::EnergyConverged,
            },
            title: "demo".to_string(),
        }
    }

    #[test]
    fn table_headers_and_rows() {
        let table = sample_result().report_table(4);
        assert_eq!(
            table.headers,
            ["Freq [MHz]", "", "Ca40", "", "", "Ca40", ""]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[1][0], "1.732");
        assert_eq!(table.rows[1][1], "-0.7071");
        assert!(table.rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    fn table_render_aligns_columns() {
        let table = ReportTable {
            headers: vec!["a".into(), "bb".into()],
            rows: vec![vec!["1".into(), "-0.5".into()], vec!["10".into(), "2".into()]],
        };
        assert_eq!(table.render(), " a    bb\n--  ----\n 1  -0.5\n10     2");
    }

    #[test]
    fn report_layout() {
        let text = sample_result().render_report(4);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--------------");
        assert_eq!(lines[1], "Mode solver analysis for ion crystal [Ca40, Ca40]: demo");
        assert_eq!(lines[2], "Equilibrium positions [um]");
        assert_eq!(lines[3], "[-2.812       0       0]");
        assert_eq!(lines[4], "[ 2.812       0       0]");
        assert_eq!(lines[5], "Normal modes");
        assert!(lines[6].starts_with("Freq [MHz]"));
        assert!(lines[7].starts_with("----------"));
        assert_eq!(lines.len(), 10);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn report_is_idempotent_and_matches_display() {
        let result = sample_result();
        let first = result.render_report(4);
        assert_eq!(first, result.render_report(4));
        assert_eq!(first, result.to_string());
        assert_eq!(result.render_report(2), format!("{result:.2}"));
    }

    #[test]
    fn styling_touches_headings_only() {
        let result = sample_result();
        let styled = result.render_report_styled(4, |s| format!("<{s}>"));
        assert!(styled.contains("<Normal modes>"));
        assert!(styled.contains("<Equilibrium positions [um]>"));
        assert!(!styled.contains("<[-2.812"));
        let plain: String = styled.replace(['<', '>'], "");
        assert_eq!(plain, result.render_report(4));
    }
}
