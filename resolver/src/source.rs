//! Key-value sources for alternate-source lookup.

use std::collections::BTreeMap;

/// A lookup into the alternate value source consulted when the command
/// line did not supply a parameter.
///
/// Lookups happen at application time, once per top-level resolve, so a
/// key set between two resolve calls is observed by the second call.
pub trait KeyValueSource: Send + Sync {
    /// Returns the raw text for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEnv;

impl KeyValueSource for OsEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory source, for tests and for embedding the resolver over
/// non-environment key-value data.
///
/// # Examples
///
/// ```
/// use envarg_resolver::{KeyValueSource, MapSource};
///
/// let source = MapSource::new().with("BAR", "1 2 3");
/// assert_eq!(source.get("BAR").as_deref(), Some("1 2 3"));
/// assert_eq!(source.get("MISSING"), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    entries: BTreeMap<String, String>,
}

impl MapSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder-style.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Inserts or replaces an entry.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Removes an entry.
    pub fn unset(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl KeyValueSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_set_and_unset() {
        let mut source = MapSource::new();
        source.set("KEY", "value");
        assert_eq!(source.get("KEY").as_deref(), Some("value"));
        source.unset("KEY");
        assert_eq!(source.get("KEY"), None);
    }

    #[test]
    fn test_os_env_reads_process_environment() {
        // Unique name so parallel tests cannot collide on it.
        let key = "ENVARG_SOURCE_TEST_F2A9";
        unsafe {
            std::env::set_var(key, "from-env");
        }
        assert_eq!(OsEnv.get(key).as_deref(), Some("from-env"));
        unsafe {
            std::env::remove_var(key);
        }
        assert_eq!(OsEnv.get(key), None);
    }
}
