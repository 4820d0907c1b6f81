//! Bound-constrained limited-memory quasi-Newton minimiser.
//!
//! Variables sitting on an active bound are frozen for the step; the rest
//! follow an L-BFGS direction and every trial point is projected back into
//! the box before the Armijo test. Whenever the correction memory is empty
//! the first step is scaled by a finite-difference curvature probe along the
//! gradient, so no length scale has to be supplied by the caller.

use std::collections::VecDeque;

use log::debug;

use super::config::MinimizeOptions;
use crate::model::result::{Diagnostics, Termination};

const ARMIJO_C1: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 60;
const SQRT_EPS: f64 = 1.490_116_119_384_765_6e-8;

/// Outcome of [`minimize`]: the best point found and how the search ended.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub fun: f64,
    pub jac: Vec<f64>,
    pub diagnostics: Diagnostics,
}

struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

struct Evaluator<F> {
    fun: F,
    count: usize,
}

impl<F> Evaluator<F>
where
    F: FnMut(&[f64]) -> (f64, Vec<f64>),
{
    fn eval(&mut self, x: &[f64]) -> (f64, Vec<f64>) {
        self.count += 1;
        (self.fun)(x)
    }
}

/// Minimises `fun` starting from `x0`.
///
/// `fun` returns the objective and its gradient. `bounds`, when given, holds
/// one `(min, max)` pair per coordinate. The returned point is always the
/// last accepted iterate, whether or not the search converged.
pub fn minimize<F>(
    fun: F,
    x0: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: &MinimizeOptions,
) -> Minimum
where
    F: FnMut(&[f64]) -> (f64, Vec<f64>),
{
    let n = x0.len();
    let budget = options.evaluation_budget(n);
    let mut evaluator = Evaluator { fun, count: 0 };

    let mut x = x0.to_vec();
    project(&mut x, bounds);
    let (mut f, mut g) = evaluator.eval(&x);

    let mut memory: VecDeque<Correction> = VecDeque::with_capacity(options.history);
    let mut iterations = 0;

    let termination = loop {
        if !is_finite(f, &g) {
            break Termination::NonFinite;
        }

        let free = free_variables(&x, &g, bounds);
        let pg_max = g
            .iter()
            .zip(&free)
            .filter(|(_, free)| **free)
            .fold(0.0_f64, |m, (gi, _)| m.max(gi.abs()));
        if pg_max <= options.gtol {
            break Termination::GradientConverged;
        }
        if iterations >= options.max_iterations {
            break Termination::MaxIterations;
        }
        if evaluator.count >= budget {
            break Termination::MaxEvaluations;
        }

        let mut d = lbfgs_direction(&g, &free, &memory);
        if memory.is_empty() || dot(&g, &d) >= 0.0 {
            memory.clear();
            let gamma = probe_step(&mut evaluator, &x, &g, &free);
            d = g
                .iter()
                .zip(&free)
                .map(|(gi, free)| if *free { -gamma * gi } else { 0.0 })
                .collect();
        }

        let search = line_search(&mut evaluator, &x, f, &g, &d, bounds, budget);
        let (x_new, f_new, g_new) = match search {
            LineSearch::Accepted { x, f, g } => (x, f, g),
            LineSearch::Exhausted => break Termination::MaxEvaluations,
            LineSearch::Failed if !memory.is_empty() => {
                debug!("line search failed at iteration {iterations}, resetting memory");
                memory.clear();
                continue;
            }
            LineSearch::Failed => break Termination::LineSearchFailed,
        };

        let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > f64::EPSILON * norm(&s) * norm(&y) {
            if memory.len() == options.history.max(1) {
                memory.pop_front();
            }
            memory.push_back(Correction { s: s.clone(), y, rho: 1.0 / sy });
        }

        let df = f - f_new;
        let step_max = s.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let x_max = x_new.iter().fold(0.0_f64, |m, v| m.max(v.abs()));

        x = x_new;
        f = f_new;
        g = g_new;
        iterations += 1;

        debug!(
            "iteration {iterations}: energy {f:.12e} V, decrease {df:.3e} V, step {step_max:.3e} m"
        );

        if !is_finite(f, &g) {
            break Termination::NonFinite;
        }
        if df <= options.ftol {
            break Termination::EnergyConverged;
        }
        if step_max <= options.xtol * x_max {
            break Termination::StepConverged;
        }
    };

    Minimum {
        x,
        fun: f,
        jac: g,
        diagnostics: Diagnostics {
            iterations,
            evaluations: evaluator.count,
            success: termination.is_converged(),
            termination,
        },
    }
}

enum LineSearch {
    Accepted { x: Vec<f64>, f: f64, g: Vec<f64> },
    Failed,
    Exhausted,
}

fn line_search<F>(
    evaluator: &mut Evaluator<F>,
    x: &[f64],
    f: f64,
    g: &[f64],
    d: &[f64],
    bounds: Option<&[(f64, f64)]>,
    budget: usize,
) -> LineSearch
where
    F: FnMut(&[f64]) -> (f64, Vec<f64>),
{
    let mut alpha = 1.0;

    for _ in 0..MAX_BACKTRACKS {
        if evaluator.count >= budget {
            return LineSearch::Exhausted;
        }

        let mut trial: Vec<f64> = x.iter().zip(d).map(|(xi, di)| xi + alpha * di).collect();
        project(&mut trial, bounds);

        let step: Vec<f64> = trial.iter().zip(x).map(|(a, b)| a - b).collect();
        let slope = dot(g, &step);
        if step.iter().all(|s| *s == 0.0) || slope >= 0.0 {
            return LineSearch::Failed;
        }

        let (f_trial, g_trial) = evaluator.eval(&trial);
        if f_trial.is_finite() && f_trial <= f + ARMIJO_C1 * slope {
            return LineSearch::Accepted {
                x: trial,
                f: f_trial,
                g: g_trial,
            };
        }

        alpha *= 0.5;
    }

    LineSearch::Failed
}

/// Inverse curvature along the free part of the gradient, from one
/// finite-difference gradient evaluation.
fn probe_step<F>(evaluator: &mut Evaluator<F>, x: &[f64], g: &[f64], free: &[bool]) -> f64
where
    F: FnMut(&[f64]) -> (f64, Vec<f64>),
{
    let v: Vec<f64> = g
        .iter()
        .zip(free)
        .map(|(gi, free)| if *free { *gi } else { 0.0 })
        .collect();
    let v_norm = norm(&v);
    let x_scale = 1.0 + x.iter().fold(0.0_f64, |m, xi| m.max(xi.abs()));
    let eps = SQRT_EPS * x_scale;

    let shifted: Vec<f64> = x
        .iter()
        .zip(&v)
        .map(|(xi, vi)| xi + eps * vi / v_norm)
        .collect();
    let (_, g_shifted) = evaluator.eval(&shifted);

    let curvature: f64 = g_shifted
        .iter()
        .zip(g)
        .zip(&v)
        .map(|((gs, gi), vi)| (gs - gi) * vi / v_norm)
        .sum::<f64>()
        / eps;

    if curvature.is_finite() && curvature > 0.0 {
        1.0 / curvature
    } else {
        eps / v_norm
    }
}

fn lbfgs_direction(g: &[f64], free: &[bool], memory: &VecDeque<Correction>) -> Vec<f64> {
    let mut q: Vec<f64> = g
        .iter()
        .zip(free)
        .map(|(gi, free)| if *free { *gi } else { 0.0 })
        .collect();

    let mut alphas = Vec::with_capacity(memory.len());
    for c in memory.iter().rev() {
        let a = c.rho * dot(&c.s, &q);
        for (qi, yi) in q.iter_mut().zip(&c.y) {
            *qi -= a * yi;
        }
        alphas.push(a);
    }

    if let Some(last) = memory.back() {
        let gamma = dot(&last.s, &last.y) / dot(&last.y, &last.y);
        for qi in q.iter_mut() {
            *qi *= gamma;
        }
    }

    for (c, a) in memory.iter().zip(alphas.iter().rev()) {
        let b = c.rho * dot(&c.y, &q);
        for (qi, si) in q.iter_mut().zip(&c.s) {
            *qi += (a - b) * si;
        }
    }

    q.iter()
        .zip(free)
        .map(|(qi, free)| if *free { -qi } else { 0.0 })
        .collect()
}

/// A coordinate is free unless it sits on a bound and the gradient pushes it outwards.
fn free_variables(x: &[f64], g: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<bool> {
    match bounds {
        None => vec![true; x.len()],
        Some(bounds) => x
            .iter()
            .zip(g)
            .zip(bounds)
            .map(|((&xi, &gi), &(lo, hi))| !((xi <= lo && gi > 0.0) || (xi >= hi && gi < 0.0)))
            .collect(),
    }
}

fn project(x: &mut [f64], bounds: Option<&[(f64, f64)]>) {
    if let Some(bounds) = bounds {
        for (xi, &(lo, hi)) in x.iter_mut().zip(bounds) {
            *xi = xi.clamp(lo, hi);
        }
    }
}

fn is_finite(f: f64, g: &[f64]) -> bool {
    f.is_finite() && g.iter().all(|v| v.is_finite())
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    /// Anisotropic quadratic bowl centred on `c`.
    fn bowl(c: [f64; 3]) -> impl FnMut(&[f64]) -> (f64, Vec<f64>) {
        let k = [1.0e7, 4.0e7, 2.5e8];
        move |x: &[f64]| {
            let f = (0..3).map(|i| 0.5 * k[i] * (x[i] - c[i]).powi(2)).sum();
            let g = (0..3).map(|i| k[i] * (x[i] - c[i])).collect();
            (f, g)
        }
    }

    fn tight() -> MinimizeOptions {
        MinimizeOptions {
            ftol: 1e-30,
            ..Default::default()
        }
    }

    #[test]
    fn converges_on_quadratic_bowl() {
        let c = [2e-6, -1e-6, 0.5e-6];
        let min = minimize(bowl(c), &[0.0, 0.0, 0.0], None, &tight());

        assert!(min.diagnostics.success, "{:?}", min.diagnostics);
        for i in 0..3 {
            assert!(approx_eq(min.x[i], c[i], 1e-12));
        }
    }

    #[test]
    fn zero_gradient_start_is_converged() {
        let c = [1e-6, 1e-6, 1e-6];
        let min = minimize(bowl(c), &c, None, &MinimizeOptions::default());
        assert_eq!(min.diagnostics.termination, Termination::GradientConverged);
        assert_eq!(min.diagnostics.iterations, 0);
        assert_eq!(min.x, c.to_vec());
    }

    #[test]
    fn bounds_clamp_the_solution() {
        let c = [2e-6, -1e-6, 0.5e-6];
        let bounds = [(-1e-6, 1e-6), (-1e-6, 1e-6), (-1e-6, 1e-6)];
        let min = minimize(bowl(c), &[0.0, 0.0, 0.0], Some(&bounds), &tight());

        assert!(min.diagnostics.success, "{:?}", min.diagnostics);
        assert!(approx_eq(min.x[0], 1e-6, 1e-15));
        assert!(approx_eq(min.x[1], -1e-6, 1e-12));
        assert!(approx_eq(min.x[2], 0.5e-6, 1e-12));
    }

    #[test]
    fn seed_outside_bounds_is_projected() {
        let bounds = [(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)];
        let min = minimize(bowl([0.5; 3]), &[5.0, -5.0, 0.5], Some(&bounds), &tight());
        assert!(min.x.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn iteration_budget_is_reported() {
        let opts = MinimizeOptions {
            max_iterations: 1,
            ..tight()
        };
        let min = minimize(bowl([3e-6, 2e-6, 1e-6]), &[0.0; 3], None, &opts);
        assert_eq!(min.diagnostics.termination, Termination::MaxIterations);
        assert!(!min.diagnostics.success);
        assert_eq!(min.diagnostics.iterations, 1);
    }

    #[test]
    fn evaluation_budget_is_reported() {
        let opts = MinimizeOptions {
            max_evaluations: Some(2),
            ..tight()
        };
        let min = minimize(bowl([3e-6, 2e-6, 1e-6]), &[0.0; 3], None, &opts);
        assert_eq!(min.diagnostics.termination, Termination::MaxEvaluations);
        assert!(!min.diagnostics.success);
    }

    #[test]
    fn non_finite_start_is_reported() {
        let fun = |x: &[f64]| (f64::INFINITY, vec![f64::NAN; x.len()]);
        let min = minimize(fun, &[0.0, 0.0], None, &MinimizeOptions::default());
        assert_eq!(min.diagnostics.termination, Termination::NonFinite);
        assert!(!min.fun.is_finite());
    }

    #[test]
    fn rosenbrock_reaches_minimum() {
        let fun = |x: &[f64]| {
            let (a, b) = (x[0], x[1]);
            let f = (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2);
            let g = vec![
                -2.0 * (1.0 - a) - 400.0 * a * (b - a * a),
                200.0 * (b - a * a),
            ];
            (f, g)
        };
        let opts = MinimizeOptions {
            ftol: 0.0,
            gtol: 1e-8,
            xtol: 0.0,
            max_evaluations: Some(10_000),
            ..Default::default()
        };
        let min = minimize(fun, &[-1.2, 1.0], None, &opts);
        assert!(min.diagnostics.success, "{:?}", min.diagnostics);
        assert!(approx_eq(min.x[0], 1.0, 1e-5));
        assert!(approx_eq(min.x[1], 1.0, 1e-5));
    }
}
