//! Size-based file rotation
//!
//! Rolling itself is delegated to `logroller`. Age-based retention is applied
//! here, on construction and after every rotation-sized chunk of writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use logroller::{Compression, LogRoller, LogRollerBuilder, Rotation, RotationSize};
use parking_lot::Mutex;

use crate::core::{LogError, LogResult};

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Rotation parameters.
///
/// Zero values mean: 100 MB for `max_size_mb`, keep every rolled file for
/// `max_backups`, no age limit for `max_age_days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size in megabytes at which the active file is rolled
    pub max_size_mb: u64,
    /// Number of rolled files to keep
    pub max_backups: u64,
    /// Days a rolled file is kept
    pub max_age_days: u64,
    /// Gzip rolled files
    pub compress: bool,
}

impl RotationPolicy {
    /// Create a policy
    pub fn new(max_size_mb: u64, max_backups: u64, max_age_days: u64, compress: bool) -> Self {
        Self {
            max_size_mb,
            max_backups,
            max_age_days,
            compress,
        }
    }

    /// Effective roll size in megabytes
    pub fn size_mb(&self) -> u64 {
        if self.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size_mb
        }
    }

    /// Effective roll size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_mb().saturating_mul(1024 * 1024)
    }

    /// Maximum age of rolled files, if limited
    pub fn max_age(&self) -> Option<Duration> {
        (self.max_age_days > 0)
            .then(|| Duration::from_secs(self.max_age_days.saturating_mul(SECONDS_PER_DAY)))
    }
}

struct State {
    roller: LogRoller,
    written: u64,
}

/// File sink that rolls over by size
pub struct RollingSink {
    path: PathBuf,
    dir: PathBuf,
    file_name: String,
    policy: RotationPolicy,
    state: Mutex<State>,
}

impl std::fmt::Debug for RollingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingSink")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RollingSink {
    /// Open `path` for writing under `policy`, creating its directory.
    pub fn build(path: &str, policy: &RotationPolicy) -> LogResult<Self> {
        let path = PathBuf::from(path.strip_prefix("file://").unwrap_or(path));
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                LogError::config(format!(
                    "invalid rotation target (no filename): '{}'",
                    path.display()
                ))
            })?
            .to_string_lossy()
            .into_owned();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            LogError::build(format!("couldn't create log directory '{}': {e}", dir.display()))
        })?;

        let dir_str = dir.to_string_lossy().into_owned();
        let mut builder = LogRollerBuilder::new(dir_str.as_str(), file_name.as_str())
            .rotation(Rotation::SizeBased(RotationSize::MB(policy.size_mb())));
        if policy.max_backups > 0 {
            builder = builder.max_keep_files(policy.max_backups);
        }
        if policy.compress {
            builder = builder.compression(Compression::Gzip);
        }
        let roller = builder.build().map_err(|e| {
            LogError::build(format!("couldn't open sink '{}': {e}", path.display()))
        })?;

        let sink = Self {
            path,
            dir,
            file_name,
            policy: *policy,
            state: Mutex::new(State { roller, written: 0 }),
        };
        sink.prune();
        Ok(sink)
    }

    /// Active file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Effective policy
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Write one record, pruning expired files once a roll-sized chunk has
    /// gone through.
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let rolled = {
            let mut state = self.state.lock();
            state.roller.write_all(buf)?;
            state.written = state.written.saturating_add(buf.len() as u64);
            if state.written >= self.policy.size_bytes() {
                state.written = 0;
                true
            } else {
                false
            }
        };
        if rolled {
            self.prune();
        }
        Ok(())
    }

    /// Flush the active file
    pub fn flush(&self) -> io::Result<()> {
        self.state.lock().roller.flush()
    }

    /// Delete rolled files older than the age limit. Returns how many went.
    pub fn prune(&self) -> usize {
        let Some(max_age) = self.policy.max_age() else {
            return 0;
        };
        let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
            return 0;
        };
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == self.file_name || !name.starts_with(self.file_name.as_str()) {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff);
            if expired && fs::remove_file(entry.path()).is_ok() {
                tracing::debug!(file = %entry.path().display(), "removed expired log file");
                removed += 1;
            }
        }
        removed
    }
}
