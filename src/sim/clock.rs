use super::types::SimConfig;

/// A control clock that walks sampling instants over a fixed horizon.
///
/// Times are derived from the step index rather than by repeated addition.
///
/// # Examples
///
/// ```
/// use ancillary_sim::sim::clock::Clock;
/// use ancillary_sim::sim::types::SimConfig;
///
/// let clock = Clock::new(&SimConfig::new(2.0, 1.0));
/// let times: Vec<f64> = clock.map(|(_, t)| t).collect();
/// assert_eq!(times, vec![0.0, 1.0, 2.0]);
/// ```
pub struct Clock {
    /// Next step to hand out
    current: usize,
    /// Total number of sampling instants
    total: usize,
    config: SimConfig,
}

impl Clock {
    /// Creates a clock covering `0..=horizon_s` in `sample_s` increments.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            current: 0,
            total: config.total_steps(),
            config: config.clone(),
        }
    }

    /// Advances the clock by one sampling instant.
    ///
    /// # Returns
    ///
    /// * `Some((step, time))` - The step index and its simulated time
    /// * `None` - If every instant has been handed out
    pub fn tick(&mut self) -> Option<(usize, f64)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, self.config.time_at(step)))
        } else {
            None
        }
    }

}

impl Iterator for Clock {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.tick()
    }
}
