//! Tuning knobs for the segmented-reduction kernels.
//!
//! Every field affects scheduling and tile geometry only; results are
//! identical (up to floating-point rounding across different worker counts)
//! for any configuration.

/// SpMV kernel configuration.
#[derive(Debug, Clone)]
pub struct SpmvConfig {
    /// Lanes per cooperative worker group in the reduction phase.
    pub workers_per_group: usize,

    /// Merge-path steps each lane consumes per tile.
    pub items_per_lane: usize,

    /// Worker over-subscription relative to available parallelism.
    pub over_subscription: usize,

    /// Lanes per group in the boundary-fixup phase.
    pub fixup_workers_per_group: usize,

    /// Partials each fixup lane consumes per tile.
    pub fixup_items_per_lane: usize,

    /// Number of times the kernel is re-run (benchmark loops; the result of
    /// every iteration is identical).
    pub iterations: usize,

    /// Explicit worker count. `None` sizes the grid from the thread pool and
    /// `over_subscription`.
    pub workers: Option<usize>,
}

impl Default for SpmvConfig {
    fn default() -> Self {
        Self {
            workers_per_group: 64,
            items_per_lane: 10,
            over_subscription: 4,
            fixup_workers_per_group: 256,
            fixup_items_per_lane: 4,
            iterations: 1,
            workers: None,
        }
    }
}

impl SpmvConfig {
    /// Force a specific worker count instead of auto-sizing.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the benchmark iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Merge-path steps consumed per reduction tile.
    #[inline]
    #[must_use]
    pub fn tile_items(&self) -> usize {
        (self.workers_per_group * self.items_per_lane).max(1)
    }

    /// Partials consumed per fixup tile.
    #[inline]
    #[must_use]
    pub fn fixup_tile_items(&self) -> usize {
        (self.fixup_workers_per_group * self.fixup_items_per_lane).max(1)
    }
}
