/// Running statistics for the values of one key.
///
/// Missing values are tallied separately; they never reach the mean.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Accumulator {
    n: usize,
    missing: usize,
    mean: f64,
    /// sum of squared deviations from the running mean
    sum_sq: f64,
}

impl Accumulator {
    /// A NaN counts as a value, and poisons both mean and variance.
    pub fn push(&mut self, value: Option<f64>) {
        let x = match value {
            Some(x) => x,
            None => {
                self.missing += 1;
                return;
            }
        };
        self.n += 1;
        let before = x - self.mean;
        self.mean += before / self.n as f64;
        self.sum_sq += before * (x - self.mean);
    }

    /// Values which went into the statistics
    pub fn n(&self) -> usize {
        self.n
    }

    /// Cells which were registered without a value
    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn finish(&self) -> Stats {
        let mean = if self.n == 0 { f64::NAN } else { self.mean };
        let var = match self.n {
            0 | 1 => f64::NAN,
            n => self.sum_sq / (n - 1) as f64,
        };
        Stats {
            count: self.n,
            mean,
            var,
            std_dev: var.sqrt(),
        }
    }
}

/// Sample statistics for a single group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    /// The number of values which went into the statistics
    pub count: usize,
    pub mean: f64,
    /// Sample variance, divisor n-1
    pub var: f64,
    pub std_dev: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn acc(values: &[Option<f64>]) -> Accumulator {
        let mut acc = Accumulator::default();
        for x in values {
            acc.push(*x);
        }
        acc
    }

    #[test]
    fn read_counts() {
        // reads per million for one miRNA across four samples
        let stats = acc(&[Some(12.5), Some(7.5), Some(10.), Some(14.)]).finish();
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean, 11.);
        assert_relative_eq!(stats.var, 24.5 / 3., epsilon = 1e-12);
        assert_relative_eq!(stats.std_dev, (24.5_f64 / 3.).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn one_two_three() {
        let stats = acc(&[Some(3.), Some(1.), Some(2.)]).finish();
        assert_eq!(stats.mean, 2.);
        assert_eq!(stats.var, 1.);
        assert_eq!(stats.std_dev, 1.);
    }

    #[test]
    fn missing_values_are_tallied_not_counted() {
        let acc = acc(&[None, Some(10.), None, Some(30.)]);
        assert_eq!(acc.n(), 2);
        assert_eq!(acc.missing(), 2);
        let stats = acc.finish();
        assert_eq!(stats.mean, 20.);
        assert_eq!(stats.var, 200.);
        assert_relative_eq!(stats.std_dev, 14.142135623730951, epsilon = 1e-9);
    }

    #[test]
    fn too_few_values() {
        let stats = acc(&[None]).finish();
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.var.is_nan());

        let stats = acc(&[Some(-4.25)]).finish();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, -4.25);
        assert!(stats.var.is_nan());
        assert!(stats.std_dev.is_nan());
    }

    #[test]
    fn nan_poisons() {
        let stats = acc(&[Some(5.), Some(f64::NAN), Some(6.)]).finish();
        assert_eq!(stats.count, 3);
        assert!(stats.mean.is_nan());
        assert!(stats.std_dev.is_nan());
    }

    #[test]
    fn large_offset() {
        // values sitting on a large baseline shouldn't lose their spread
        let stats = acc(&[Some(1e9 + 4.), Some(1e9 + 7.), Some(1e9 + 13.), Some(1e9 + 16.)]).finish();
        assert_relative_eq!(stats.mean, 1e9 + 10.);
        assert_relative_eq!(stats.var, 30., epsilon = 1e-6);
    }
}
