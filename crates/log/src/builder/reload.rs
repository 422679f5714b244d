//! Reload logic for runtime level changes

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, reload};

use crate::config::Level;
use crate::core::{LogError, LogResult};

/// Atomic minimum level shared by every clone of a logger
#[derive(Clone)]
pub struct LevelHandle {
    filter: reload::Handle<LevelFilter, Registry>,
    /// Current level, lock-free reads via ArcSwap
    current: Arc<ArcSwap<Level>>,
}

impl std::fmt::Debug for LevelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelHandle")
            .field("current", &self.get())
            .finish_non_exhaustive()
    }
}

impl LevelHandle {
    /// Current minimum level
    pub fn get(&self) -> Level {
        **self.current.load()
    }

    /// Swap the minimum level
    ///
    /// # Errors
    /// Returns error if the subscriber owning the filter is gone
    pub fn set(&self, level: Level) -> LogResult<()> {
        self.filter
            .reload(level.as_filter())
            .map_err(|e| LogError::build(format!("failed to reload level: {e}")))?;
        self.current.store(Arc::new(level));
        Ok(())
    }
}

/// Create the reloadable level filter layer and its handle
pub(super) fn create_level_layer(
    level: Level,
) -> (reload::Layer<LevelFilter, Registry>, LevelHandle) {
    let (layer, filter) = reload::Layer::new(level.as_filter());
    let handle = LevelHandle {
        filter,
        current: Arc::new(ArcSwap::from_pointee(level)),
    };
    (layer, handle)
}
