//! Fixed-bucket latency histogram
//!
//! A fixed-size histogram for per-operation latency tracking, using an
//! enumerated table of 154 ascending bucket bounds (decade-scaled steps up
//! to 9e9 microseconds, closed by an effectively infinite sentinel). The
//! table, the percentile interpolation and the standard-deviation formula
//! are part of the numeric contract: downstream tooling compares reports
//! across tool versions, so none of them may be "improved".
//!
//! # Example
//!
//! ```
//! use dbpulse::stats::Histogram;
//!
//! let mut hist = Histogram::new();
//! hist.add(35.0);
//! hist.add(120.0);
//! hist.add(410.0);
//!
//! assert_eq!(hist.count(), 3.0);
//! assert_eq!(hist.percentile(100.0), 410.0);
//! println!("{hist}");
//! ```

use std::fmt;

/// Number of buckets in the histogram
pub const NUM_BUCKETS: usize = 154;

/// Upper bound of each bucket, ascending; the final entry catches everything
#[rustfmt::skip]
const BUCKET_LIMIT: [f64; NUM_BUCKETS] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 14.0, 16.0,
    18.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 70.0, 80.0, 90.0,
    100.0, 120.0, 140.0, 160.0, 180.0, 200.0, 250.0, 300.0, 350.0, 400.0,
    450.0, 500.0, 600.0, 700.0, 800.0, 900.0, 1000.0, 1200.0, 1400.0,
    1600.0, 1800.0, 2000.0, 2500.0, 3000.0, 3500.0, 4000.0, 4500.0, 5000.0,
    6000.0, 7000.0, 8000.0, 9000.0, 10000.0, 12000.0, 14000.0, 16000.0,
    18000.0, 20000.0, 25000.0, 30000.0, 35000.0, 40000.0, 45000.0, 50000.0,
    60000.0, 70000.0, 80000.0, 90000.0, 100000.0, 120000.0, 140000.0,
    160000.0, 180000.0, 200000.0, 250000.0, 300000.0, 350000.0, 400000.0,
    450000.0, 500000.0, 600000.0, 700000.0, 800000.0, 900000.0, 1000000.0,
    1200000.0, 1400000.0, 1600000.0, 1800000.0, 2000000.0, 2500000.0,
    3000000.0, 3500000.0, 4000000.0, 4500000.0, 5000000.0, 6000000.0,
    7000000.0, 8000000.0, 9000000.0, 10000000.0, 12000000.0, 14000000.0,
    16000000.0, 18000000.0, 20000000.0, 25000000.0, 30000000.0, 35000000.0,
    40000000.0, 45000000.0, 50000000.0, 60000000.0, 70000000.0, 80000000.0,
    90000000.0, 100000000.0, 120000000.0, 140000000.0, 160000000.0,
    180000000.0, 200000000.0, 250000000.0, 300000000.0, 350000000.0,
    400000000.0, 450000000.0, 500000000.0, 600000000.0, 700000000.0,
    800000000.0, 900000000.0, 1000000000.0, 1200000000.0, 1400000000.0,
    1600000000.0, 1800000000.0, 2000000000.0, 2500000000.0, 3000000000.0,
    3500000000.0, 4000000000.0, 4500000000.0, 5000000000.0, 6000000000.0,
    7000000000.0, 8000000000.0, 9000000000.0, 1e200,
];

/// Latency histogram with a fixed bucket table
///
/// Tracks per-bucket counts plus running aggregates (count, sum, sum of
/// squares, observed min and max). Bucket counts are kept as `f64` so that
/// merged histograms stay exact under the same arithmetic as the running
/// sums.
#[derive(Debug, Clone)]
pub struct Histogram {
    min: f64,
    max: f64,
    num: f64,
    sum: f64,
    sum_squares: f64,
    buckets: [f64; NUM_BUCKETS],
}

impl Histogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        Self {
            min: BUCKET_LIMIT[NUM_BUCKETS - 1],
            max: 0.0,
            num: 0.0,
            sum: 0.0,
            sum_squares: 0.0,
            buckets: [0.0; NUM_BUCKETS],
        }
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Record a sample
    ///
    /// The sample lands in the smallest bucket whose bound is greater than
    /// or equal to the value (bucket upper edges are inclusive); anything
    /// beyond the table falls into the sentinel bucket.
    pub fn add(&mut self, value: f64) {
        let mut b = 0;
        while b < NUM_BUCKETS - 1 && BUCKET_LIMIT[b] < value {
            b += 1;
        }
        self.buckets[b] += 1.0;

        if self.min > value {
            self.min = value;
        }
        if self.max < value {
            self.max = value;
        }
        self.num += 1.0;
        self.sum += value;
        self.sum_squares += value * value;
    }

    /// Fold another histogram into this one
    ///
    /// Associative and commutative: min/max take the extremes, the running
    /// sums add, and bucket counts add elementwise. Valid for combining
    /// per-segment histograms however they were split.
    pub fn merge(&mut self, other: &Histogram) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.num += other.num;
        self.sum += other.sum;
        self.sum_squares += other.sum_squares;
        for (bucket, &count) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *bucket += count;
        }
    }

    /// Number of recorded samples
    pub fn count(&self) -> f64 {
        self.num
    }

    /// Smallest recorded sample (the sentinel bound when empty)
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded sample (0 when empty)
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Count in a single bucket, 0 for out-of-range indexes
    pub fn bucket_count(&self, index: usize) -> f64 {
        if index < NUM_BUCKETS {
            self.buckets[index]
        } else {
            0.0
        }
    }

    /// Mean of the recorded samples, 0 when empty
    pub fn average(&self) -> f64 {
        if self.num == 0.0 {
            return 0.0;
        }
        self.sum / self.num
    }

    /// Spread of the recorded samples, 0 when empty
    ///
    /// Uses `sqrt((sum_squares * n - sum^2) / n^2)` exactly; numeric parity
    /// with existing reports matters more than the textbook estimator.
    pub fn standard_deviation(&self) -> f64 {
        if self.num == 0.0 {
            return 0.0;
        }
        let variance =
            (self.sum_squares * self.num - self.sum * self.sum) / (self.num * self.num);
        variance.sqrt()
    }

    /// Estimated value at percentile `p` in `[0, 100]`
    ///
    /// Walks the buckets until the cumulative count reaches `count * p /
    /// 100`, interpolates linearly inside that bucket, and clamps the
    /// estimate to the observed `[min, max]`.
    pub fn percentile(&self, p: f64) -> f64 {
        let threshold = self.num * (p / 100.0);
        let mut sum = 0.0;
        for b in 0..NUM_BUCKETS {
            sum += self.buckets[b];
            if sum >= threshold {
                let left_point = if b == 0 { 0.0 } else { BUCKET_LIMIT[b - 1] };
                let right_point = BUCKET_LIMIT[b];
                let left_sum = sum - self.buckets[b];
                let right_sum = sum;
                let pos = if right_sum > left_sum {
                    (threshold - left_sum) / (right_sum - left_sum)
                } else {
                    0.0
                };
                let mut r = left_point + (right_point - left_point) * pos;
                if r < self.min {
                    r = self.min;
                }
                if r > self.max {
                    r = self.max;
                }
                return r;
            }
        }
        self.max
    }

    /// Estimated median, `percentile(50)`
    pub fn median(&self) -> f64 {
        self.percentile(50.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Count: {:.0}  Average: {:.4}  StdDev: {:.2}",
            self.num,
            self.average(),
            self.standard_deviation()
        )?;
        writeln!(
            f,
            "Min: {:.4}  Median: {:.4}  Max: {:.4}",
            if self.num == 0.0 { 0.0 } else { self.min },
            self.median(),
            self.max
        )?;
        writeln!(f, "------------------------------------------------------")?;

        let mult = 100.0 / self.num;
        let mut sum = 0.0;
        for b in 0..NUM_BUCKETS {
            if self.buckets[b] <= 0.0 {
                continue;
            }
            sum += self.buckets[b];
            write!(
                f,
                "[ {:7.0}, {:7.0} ) {:7.0} {:7.3}% {:7.3}% ",
                if b == 0 { 0.0 } else { BUCKET_LIMIT[b - 1] },
                BUCKET_LIMIT[b],
                self.buckets[b],
                mult * self.buckets[b],
                mult * sum
            )?;

            // 20 hash marks represent 100% of the samples
            let marks = (20.0 * self.buckets[b] / self.num + 0.5) as usize;
            f.write_str(&"#".repeat(marks))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
