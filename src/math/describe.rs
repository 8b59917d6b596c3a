//! Descriptive statistics over `f64` samples.
//!
//! Every function sorts its input before accumulating, so results are
//! bit-identical regardless of the order the values arrive in.

use super::special::student_t_two_sided_p;

/// Finite values of `values`, sorted ascending.
pub fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Sum of already-sorted values.
fn sum_sorted(sorted: &[f64]) -> f64 {
    sorted.iter().sum()
}

/// Summary of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub n: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample variance (n - 1 denominator); `None` when n < 2.
    pub variance: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Describe {
    pub fn std_dev(&self) -> Option<f64> {
        self.variance.map(f64::sqrt)
    }
}

/// Describe the finite values of a sample. `None` when there are none.
pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<Describe> {
    let sorted = sorted_finite(values);
    let n = sorted.len();
    let (&min, &max) = (sorted.first()?, sorted.last()?);

    let sum = sum_sorted(&sorted);
    let mean = sum / n as f64;

    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let variance = if n >= 2 {
        let mut sq: Vec<f64> = sorted.iter().map(|v| (v - mean).powi(2)).collect();
        sq.sort_by(f64::total_cmp);
        Some(sum_sorted(&sq) / (n as f64 - 1.0))
    } else {
        None
    };

    Some(Describe {
        n,
        sum,
        mean,
        median,
        variance,
        min,
        max,
    })
}

/// Pearson correlation of paired samples.
///
/// `None` with fewer than two pairs or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let mut pairs: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let n = pairs.len() as f64;
    let mean_x = sum_sorted(&sorted_finite(pairs.iter().map(|p| p.0))) / n;
    let mean_y = sum_sorted(&sorted_finite(pairs.iter().map(|p| p.1))) / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Result of Welch's unequal-variance t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Welch's t-test for a difference of means between two samples.
///
/// `None` when either sample has fewer than two values or both samples have
/// zero variance (the statistic is undefined).
pub fn welch_t_test(a: &Describe, b: &Describe) -> Option<WelchTest> {
    let (va, vb) = (a.variance?, b.variance?);
    let (na, nb) = (a.n as f64, b.n as f64);

    let sa = va / na;
    let sb = vb / nb;
    let se2 = sa + sb;
    if se2 <= 0.0 {
        return None;
    }

    let statistic = (a.mean - b.mean) / se2.sqrt();
    let degrees_of_freedom = se2 * se2 / (sa * sa / (na - 1.0) + sb * sb / (nb - 1.0));
    let p_value = student_t_two_sided_p(statistic, degrees_of_freedom);

    Some(WelchTest {
        statistic,
        degrees_of_freedom,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_basic() {
        let d = describe([100.0, 50_000.0, 15.0]).unwrap();
        assert_eq!(d.n, 3);
        assert!((d.mean - 16_705.0).abs() < 1e-9);
        assert_eq!(d.median, 100.0);
        assert_eq!(d.min, 15.0);
        assert_eq!(d.max, 50_000.0);
        assert!(d.std_dev().unwrap() > 0.0);
    }

    #[test]
    fn describe_even_median_and_single_value() {
        let d = describe([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.median, 2.5);
        // Sample variance of 1..=4 is 5/3.
        assert!((d.variance.unwrap() - 5.0 / 3.0).abs() < 1e-12);

        let single = describe([7.0]).unwrap();
        assert_eq!(single.variance, None);
        assert!(describe([]).is_none());
        assert!(describe([f64::NAN]).is_none());
    }

    #[test]
    fn describe_ignores_input_order() {
        let a = describe([0.1, 0.2, 0.3, 1e9, -5.5]).unwrap();
        let b = describe([1e9, 0.3, -5.5, 0.1, 0.2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn pearson_perfect_and_undefined() {
        let up = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        assert!((pearson(&up).unwrap() - 1.0).abs() < 1e-12);

        let down = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        assert!((pearson(&down).unwrap() + 1.0).abs() < 1e-12);

        assert_eq!(pearson(&[(1.0, 1.0)]), None);
        assert_eq!(pearson(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]), None);
    }

    #[test]
    fn welch_matches_hand_computation() {
        // a = [1,2,3,4]: mean 2.5, var 5/3. b = [2,4,6,9]: mean 5.25, var 8.916667.
        let a = describe([1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = describe([2.0, 4.0, 6.0, 9.0]).unwrap();
        let test = welch_t_test(&a, &b).unwrap();

        let sa: f64 = (5.0 / 3.0) / 4.0;
        let sb = (107.0 / 12.0) / 4.0;
        let expected_t = (2.5 - 5.25) / (sa + sb).sqrt();
        assert!((test.statistic - expected_t).abs() < 1e-12);
        assert!(test.degrees_of_freedom > 3.0 && test.degrees_of_freedom < 6.0);
        assert!(test.p_value > 0.05 && test.p_value < 0.5);
    }

    #[test]
    fn welch_undefined_cases() {
        let flat = describe([5.0, 5.0, 5.0]).unwrap();
        assert!(welch_t_test(&flat, &flat).is_none());

        let single = describe([1.0]).unwrap();
        let pair = describe([1.0, 2.0]).unwrap();
        assert!(welch_t_test(&single, &pair).is_none());
    }
}
