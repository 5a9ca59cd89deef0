// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every HTTP handler through `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the config and the analysis log.
//
// The scoring core is synchronous and stateless; nothing here is persisted.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::api::envelope::AnalysisRecord;
use crate::config::RuntimeConfig;

pub struct AppState {
    /// Monotonically increasing version counter, bumped on every recorded
    /// analysis.
    pub state_version: AtomicU64,

    pub runtime_config: RwLock<RuntimeConfig>,

    /// Most recent analyses, oldest first, bounded by
    /// `RuntimeConfig::max_recent_analyses`.
    pub recent_analyses: RwLock<VecDeque<AnalysisRecord>>,

    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        let capacity = config.max_recent_analyses;
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: RwLock::new(config),
            recent_analyses: RwLock::new(VecDeque::with_capacity(capacity)),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Snapshot of the current config; handlers never hold the lock while
    /// scoring.
    pub fn config(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }

    /// Record an analysis; the oldest entries are evicted past the limit.
    pub fn push_analysis(&self, record: AnalysisRecord) {
        let limit = self.runtime_config.read().max_recent_analyses;
        {
            let mut log = self.recent_analyses.write();
            log.push_back(record);
            while log.len() > limit {
                log.pop_front();
            }
        }
        self.increment_version();
    }

    /// Recent analyses, newest first.
    pub fn recent(&self) -> Vec<AnalysisRecord> {
        self.recent_analyses.read().iter().rev().cloned().collect()
    }
}
