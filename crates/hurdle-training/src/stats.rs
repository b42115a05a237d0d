use serde::Serialize;

/// Summary of one generation's fitness scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessStats {
    /// The lowest score.
    pub min: u32,
    /// The highest score.
    pub max: u32,
    /// The arithmetic mean of the scores.
    pub mean: f64,
    /// The middle score (upper middle for an even count).
    pub median: u32,
    /// The population standard deviation of the scores.
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes statistics over `scores`.
    ///
    /// Returns `None` if `scores` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hurdle_training::stats::FitnessStats;
    /// let stats = FitnessStats::new([9, 32, 9, 32, 9]).unwrap();
    /// assert_eq!(stats.min, 9);
    /// assert_eq!(stats.max, 32);
    /// assert_eq!(stats.median, 9);
    /// assert!((stats.mean - 18.2).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_unstable();

        let min = *scores.first()?;
        let max = *scores.last()?;
        #[expect(clippy::cast_precision_loss)]
        let n = scores.len() as f64;
        let mean = scores.iter().copied().map(f64::from).sum::<f64>() / n;
        let median = scores[scores.len() / 2];
        let variance = scores
            .iter()
            .map(|&s| (f64::from(s) - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores() {
        assert_eq!(FitnessStats::new(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_single_score() {
        let stats = FitnessStats::new([7]).unwrap();
        assert_eq!(stats.min, 7);
        assert_eq!(stats.max, 7);
        assert_eq!(stats.median, 7);
        assert_eq!(stats.mean, 7.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_spread() {
        let stats = FitnessStats::new([2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.median, 5);
    }
}
