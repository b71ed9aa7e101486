//! Memoization keyed by a source-tree fingerprint.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Holds the last successful result together with the fingerprint it was
/// computed for.
#[derive(Debug, Clone)]
pub struct ClassificationCache<T> {
    entry: Option<(String, T)>,
}

impl<T> Default for ClassificationCache<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T: Clone> ClassificationCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fingerprint from `(file, modification time)` pairs.
    ///
    /// Pairs are sorted by file name, rendered as `file:millis` and joined
    /// with `|`, so the key does not depend on discovery order. Files whose
    /// time is unknown contribute `0`.
    #[must_use]
    pub fn fingerprint<'a>(files: impl IntoIterator<Item = (&'a str, Option<SystemTime>)>) -> String {
        let mut pairs: Vec<(&str, u128)> = files
            .into_iter()
            .map(|(file, mtime)| {
                let millis = mtime
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map_or(0, |d| d.as_millis());
                (file, millis)
            })
            .collect();
        pairs.sort_unstable();

        let mut key = String::new();
        for (i, (file, millis)) in pairs.iter().enumerate() {
            if i > 0 {
                key.push('|');
            }
            let _ = write!(key, "{file}:{millis}");
        }
        key
    }

    /// Whether the cached entry was computed for `key`.
    #[must_use]
    pub fn is_cached(&self, key: &str) -> bool {
        self.entry.as_ref().is_some_and(|(k, _)| k == key)
    }

    /// Returns the cached value for `key`, or computes and stores it.
    ///
    /// A failed computation leaves the previous entry untouched.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute`.
    pub fn get_or_compute<E>(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some((cached_key, value)) = &self.entry {
            if cached_key == key {
                debug!("classification cache hit");
                return Ok(value.clone());
            }
        }

        debug!("classification cache miss");
        let value = compute()?;
        self.entry = Some((key.to_string(), value.clone()));
        Ok(value)
    }

    /// Drops the cached entry.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            warn!("classification cache invalidated");
        }
    }
}
