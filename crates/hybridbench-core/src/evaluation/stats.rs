//! Paired significance testing for per-query scores.
//!
//! Both channels answer the same queries, so their per-query recall values
//! form paired observations and the paired t-test applies.
//!
//! # References
//!
//! - Smucker et al. (2007). "A comparison of statistical significance tests for IR evaluation"
//! - Press et al. (2007). "Numerical Recipes", 3rd ed., §6.1 and §6.4

use serde::Serialize;

/// Result of a paired t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    /// Mean of `treatment - control`
    pub mean_difference: f64,
    /// t-statistic (positive if treatment > control)
    pub t_statistic: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub df: usize,
}

impl TTestResult {
    /// Returns true if the difference is significant at the given alpha level.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Formats the result for display, e.g. `t(9)=2.310, p=0.0463*`.
    pub fn format(&self) -> String {
        let marker = if self.is_significant(0.05) { "*" } else { "" };
        format!(
            "t({})={:.3}, p={:.4}{}",
            self.df, self.t_statistic, self.p_value, marker
        )
    }
}

/// Performs a paired t-test of `treatment` against `control`.
///
/// # Returns
///
/// `None` if the slices differ in length or hold fewer than two pairs.
/// Identical samples yield `t = 0, p = 1`; a constant non-zero difference
/// yields an infinite t and `p = 0`.
///
/// # Example
///
/// ```ignore
/// let (baseline, hybrid) = state.recall_pairs();
/// if let Some(result) = paired_ttest(&hybrid, &baseline) {
///     println!("{}", result.format());
/// }
/// ```
pub fn paired_ttest(treatment: &[f64], control: &[f64]) -> Option<TTestResult> {
    if treatment.len() != control.len() || treatment.len() < 2 {
        return None;
    }

    let n = treatment.len() as f64;
    let df = treatment.len() - 1;
    let diffs: Vec<f64> = treatment.iter().zip(control).map(|(t, c)| t - c).collect();

    let mean_difference = diffs.iter().sum::<f64>() / n;
    let variance = diffs
        .iter()
        .map(|d| (d - mean_difference).powi(2))
        .sum::<f64>()
        / df as f64;
    let standard_error = (variance / n).sqrt();

    let (t_statistic, p_value) = if standard_error > 0.0 {
        let t = mean_difference / standard_error;
        (t, student_t_two_tailed(t, df as f64))
    } else if mean_difference == 0.0 {
        (0.0, 1.0)
    } else {
        (mean_difference.signum() * f64::INFINITY, 0.0)
    };

    Some(TTestResult {
        mean_difference,
        t_statistic,
        p_value,
        df,
    })
}

/// `P(|T| >= |t|)` for Student's t with `df` degrees of freedom.
///
/// Uses `p = I_x(df/2, 1/2)` with `x = df / (df + t²)`.
fn student_t_two_tailed(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    regularized_incomplete_beta(x, df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// Regularized incomplete beta `I_x(a, b)`.
fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fastest below the distribution mean
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

const LENTZ_TINY: f64 = 1e-300;
const LENTZ_EPS: f64 = 1e-14;
const LENTZ_MAX_TERMS: usize = 300;

/// Evaluates the incomplete-beta continued fraction with the modified Lentz method.
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let nudge = |v: f64| if v.abs() < LENTZ_TINY { LENTZ_TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / nudge(1.0 - (a + b) * x / (a + 1.0));
    let mut f = d;

    for m in 1..=LENTZ_MAX_TERMS {
        let m = m as f64;

        // d_{2m}
        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 / nudge(1.0 + even * d);
        c = nudge(1.0 + even / c);
        f *= c * d;

        // d_{2m+1}
        let odd = -(a + m) * (a + b + m) * x / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 / nudge(1.0 + odd * d);
        c = nudge(1.0 + odd / c);
        let step = c * d;
        f *= step;

        if (step - 1.0).abs() < LENTZ_EPS {
            break;
        }
    }
    f
}

/// Lanczos approximation (g = 7, n = 9) of `ln Γ(x)` for `x > 0`.
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_known_values() {
        // Γ(1) = Γ(2) = 1, Γ(5) = 24, Γ(0.5) = √π
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_student_t_reference_values() {
        // Two-tailed critical values: t(10) = 2.228 at 0.05, t(1) = 12.706 at 0.05
        assert!((student_t_two_tailed(2.228, 10.0) - 0.05).abs() < 1e-3);
        assert!((student_t_two_tailed(12.706, 1.0) - 0.05).abs() < 1e-3);
        assert!((student_t_two_tailed(0.0, 5.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_paired_ttest_significant() {
        let hybrid = vec![0.9, 0.8, 1.0, 0.7, 0.9, 0.8, 1.0, 0.9];
        let baseline = vec![0.5, 0.4, 0.6, 0.3, 0.5, 0.5, 0.6, 0.4];
        let result = paired_ttest(&hybrid, &baseline).unwrap();
        assert!(result.t_statistic > 0.0);
        assert!(result.is_significant(0.01));
        assert_eq!(result.df, 7);
        assert!((result.mean_difference - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_paired_ttest_not_significant() {
        let a = vec![0.5, 1.0, 0.0, 0.5, 1.0];
        let b = vec![1.0, 0.5, 0.5, 0.0, 1.0];
        let result = paired_ttest(&a, &b).unwrap();
        assert!(!result.is_significant(0.05));
        assert!(result.format().starts_with("t(4)="));
    }

    #[test]
    fn test_paired_ttest_identical_and_constant_shift() {
        let a = vec![0.5, 1.0, 0.0];
        let same = paired_ttest(&a, &a).unwrap();
        assert_eq!((same.t_statistic, same.p_value), (0.0, 1.0));

        let shifted: Vec<f64> = a.iter().map(|x| x + 0.5).collect();
        let result = paired_ttest(&shifted, &a).unwrap();
        assert!(result.t_statistic.is_infinite() && result.t_statistic > 0.0);
        assert_eq!(result.p_value, 0.0);
    }

    #[test]
    fn test_paired_ttest_requires_pairs() {
        assert!(paired_ttest(&[1.0], &[0.0]).is_none());
        assert!(paired_ttest(&[1.0, 0.5], &[0.0]).is_none());
    }
}
