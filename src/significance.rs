//! A loose heuristic for whether pause durations cluster around their mean.
//!
//! This is not a statistical significance test. It flags runs whose pauses
//! are spread widely enough that their average says little, and counts the
//! pauses sitting above one standard deviation over the mean.

use model::GcModel;

/// Result of `analyze`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Significance {
    /// Mean pause, seconds
    pub mean: f64,
    /// Sample standard deviation of pauses, seconds
    pub std_dev: f64,
    /// Number of events whose pause exceeds `mean + std_dev`
    pub outlier_count: u64,
}

impl Significance {
    /// Pause above which an event counts as an outlier.
    pub fn threshold(&self) -> f64 {
        self.mean + self.std_dev
    }

    /// See `is_significant`.
    pub fn is_significant(&self) -> bool {
        is_significant(self.mean, self.std_dev)
    }
}

/// Analyze the pauses of `model`.
///
/// Mean and standard deviation come from the model's pause aggregate; only
/// the outlier count walks the events. A model without events yields all
/// zeros.
pub fn analyze(model: &GcModel) -> Significance {
    if model.is_empty() {
        return Significance::default();
    }
    let mean = model.pause.average();
    let std_dev = model.pause.standard_deviation();
    // compared at the precision the aggregate was computed in
    let edge = (mean + std_dev) as f32;
    let outlier_count = model
        .events
        .iter()
        .filter(|e| e.pause as f32 > edge)
        .count() as u64;
    Significance {
        mean: mean,
        std_dev: std_dev,
        outlier_count: outlier_count,
    }
}

/// True when the lower one-sigma bound stays above 75% of the average.
pub fn is_significant(average: f64, std_dev: f64) -> bool {
    average - std_dev > 0.75 * average
}

#[cfg(test)]
mod test {
    use super::*;
    use model::{Concurrency, ExtendedType, GcEvent, Generation};
    use quickcheck::{QuickCheck, TestResult};

    fn model_of(pauses: &[f64]) -> GcModel {
        GcModel::from_events(
            pauses
                .iter()
                .map(|p| {
                    GcEvent::new(
                        ExtendedType::new("GC", Generation::Young, Concurrency::Serial),
                        *p,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn empty_model_is_zero() {
        let sig = analyze(&GcModel::default());
        assert_eq!(0.0, sig.mean);
        assert_eq!(0.0, sig.std_dev);
        assert_eq!(0, sig.outlier_count);
    }

    #[test]
    fn one_outlier_of_three() {
        let sig = analyze(&model_of(&[0.10, 0.12, 0.50]));
        assert!((sig.mean - 0.24).abs() < 1e-6);
        assert!((sig.std_dev - 0.225389).abs() < 1e-5);
        assert_eq!(1, sig.outlier_count);
        assert!(!sig.is_significant());
    }

    #[test]
    fn flat_pauses_are_significant() {
        let sig = analyze(&model_of(&[0.12, 0.12, 0.12, 0.12]));
        assert_eq!(0.0, sig.std_dev);
        assert_eq!(0, sig.outlier_count);
        assert!(sig.is_significant());
    }

    #[test]
    fn predicate() {
        assert!(is_significant(1.0, 0.2));
        assert!(!is_significant(1.0, 0.25));
        assert!(!is_significant(1.0, 0.5));
        assert!(!is_significant(0.0, 0.0));
    }

    #[test]
    fn outliers_never_exceed_events() {
        fn inner(pauses: Vec<u16>) -> TestResult {
            let pauses: Vec<f64> = pauses.iter().map(|p| f64::from(*p) / 1000.0).collect();
            let model = model_of(&pauses);
            let sig = analyze(&model);
            if sig.outlier_count as usize > model.size() {
                return TestResult::failed();
            }
            // a non-empty series always has at least one pause at or
            // below the mean
            if !pauses.is_empty() && sig.outlier_count as usize == model.size() {
                return TestResult::failed();
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(10000)
            .quickcheck(inner as fn(Vec<u16>) -> TestResult);
    }
}
