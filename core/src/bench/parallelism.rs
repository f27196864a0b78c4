//! bench/parallelism.rs
//! Sizing of the replay worker pool.

/// Bytes a replay keeps live besides the shared corpus: compressed output,
/// backend context and window state. Rough, used only for sizing.
const REPLAY_FOOTPRINT: u64 = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
}

impl ParallelismProfile {
    pub fn fixed(workers: usize) -> Self {
        Self { worker_count: workers.max(1) }
    }

    /// One worker per core but one, capped by how many replays fit in
    /// `mem_fraction` of available memory and by `hard_cap`.
    pub fn dynamic(mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let by_cores = cores.saturating_sub(1).max(1);

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let budget = (sys.available_memory() as f64 * mem_fraction) as u64;
        let by_memory = (budget / REPLAY_FOOTPRINT).max(1) as usize;

        let worker_count = by_cores.min(by_memory).min(hard_cap.max(1));
        log::debug!(
            "parallelism: cores={} memory_slots={} -> {} workers",
            cores, by_memory, worker_count
        );
        Self { worker_count }
    }

    /// `workers == 0` means size from the host.
    pub fn from_config(workers: usize) -> Self {
        if workers == 0 {
            Self::dynamic(0.5, 64)
        } else {
            Self::fixed(workers)
        }
    }
}
