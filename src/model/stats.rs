use trueno::Vector;

/// Aggregate over a series of samples: count, sum, extremes, average and
/// sample standard deviation.
///
/// Average, deviation and extremes are computed in `f32` through
/// `trueno::Vector`, so they carry single precision. Count and sum are kept
/// exact. An empty `Stats` reports zero for everything, never NaN.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    n: u64,
    sum: f64,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl Stats {
    /// Make an empty `Stats`.
    pub fn new() -> Stats {
        Stats::default()
    }

    /// Aggregate `samples`.
    pub fn from_samples(samples: &[f64]) -> Stats {
        if samples.is_empty() {
            return Stats::new();
        }
        let n = samples.len();
        let narrow: Vec<f32> = samples.iter().map(|x| *x as f32).collect();
        let v = Vector::from_slice(&narrow);

        let min = v.min().unwrap_or(0.0);
        let max = v.max().unwrap_or(0.0);
        let (mean, std_dev) = if min == max {
            // flat series
            (min, 0.0)
        } else {
            let mean = v.mean().unwrap_or(0.0);
            // trueno reports the population variance
            let var = f64::from(v.variance().unwrap_or(0.0)) * n as f64 / (n - 1) as f64;
            (mean, if var > 0.0 { var.sqrt() } else { 0.0 })
        };

        Stats {
            n: n as u64,
            sum: samples.iter().sum(),
            mean: f64::from(mean),
            std_dev: std_dev,
            min: f64::from(min),
            max: f64::from(max),
        }
    }

    /// Number of samples.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Sum of samples.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest sample, 0 when empty.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample, 0 when empty.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean, 0 when empty.
    pub fn average(&self) -> f64 {
        self.mean
    }

    /// Sample (n - 1) standard deviation, 0 with fewer than two samples.
    pub fn standard_deviation(&self) -> f64 {
        self.std_dev
    }
}
