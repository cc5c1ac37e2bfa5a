// Application layer: batch orchestration over the analyzer, cache and observer port.

pub mod batch_driver;
mod job;

pub use batch_driver::{BatchDriver, BatchHandle};

/// Worker pool settings for a [`BatchDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Pool width. Defaults to the number of logical CPUs; 0 is treated as 1.
    pub workers: usize,
}

impl DriverConfig {
    pub(crate) fn normalized(self) -> Self {
        Self { workers: self.workers.max(1) }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { workers: num_cpus::get() }
    }
}
