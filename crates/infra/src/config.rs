//! Configuration loading and representation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DATA_PATH_VAR: &str = "FOODSAVER_DATA_PATH";
pub const INVENTORY_KEY_VAR: &str = "FOODSAVER_INVENTORY_KEY";
pub const BIDS_KEY_VAR: &str = "FOODSAVER_BIDS_KEY";
pub const DONATIONS_KEY_VAR: &str = "FOODSAVER_DONATIONS_KEY";

pub const DEFAULT_DATA_PATH: &str = "foodsaver-data.json";

/// Storage keys of the three collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionKeys {
    pub inventory: String,
    pub bids: String,
    pub donations: String,
}

impl Default for CollectionKeys {
    fn default() -> Self {
        Self {
            inventory: "inventory".to_string(),
            bids: "bids".to_string(),
            donations: "donations".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON document used by the file-backed store.
    pub data_path: PathBuf,
    pub keys: CollectionKeys,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            keys: CollectionKeys::default(),
        }
    }
}

impl StoreConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_or(None)
    }

    /// Like [`StoreConfig::from_env`], with an explicit data path (e.g. a
    /// command-line flag) taking precedence over `FOODSAVER_DATA_PATH`.
    pub fn from_env_or(data_path: Option<PathBuf>) -> Self {
        Self::from_lookup_or(data_path, |name| std::env::var(name).ok())
    }

    /// Build configuration from any variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_lookup_or(None, lookup)
    }

    /// The data path fallback warning fires only when neither `data_path`
    /// nor `FOODSAVER_DATA_PATH` supplies one.
    pub fn from_lookup_or(
        data_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let defaults = Self::default();

        let data_path = data_path.or_else(|| non_empty(lookup(DATA_PATH_VAR)).map(PathBuf::from));
        let data_path = match data_path {
            Some(path) => path,
            None => {
                warn!(
                    "{DATA_PATH_VAR} not set; using {}",
                    defaults.data_path.display()
                );
                defaults.data_path
            }
        };

        let key = |var: &str, default: String| match lookup(var) {
            Some(v) if v.trim().is_empty() => {
                warn!("{var} is empty; using {default:?}");
                default
            }
            Some(v) => v.trim().to_string(),
            None => default,
        };

        Self {
            data_path,
            keys: CollectionKeys {
                inventory: key(INVENTORY_KEY_VAR, defaults.keys.inventory),
                bids: key(BIDS_KEY_VAR, defaults.keys.bids),
                donations: key(DONATIONS_KEY_VAR, defaults.keys.donations),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn warnings_during(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(StoreConfig::from_lookup(lookup(&[])), StoreConfig::default());
    }

    #[test]
    fn overrides_are_applied_and_blank_keys_ignored() {
        let config = StoreConfig::from_lookup(lookup(&[
            (DATA_PATH_VAR, "/var/lib/foodsaver/state.json"),
            (INVENTORY_KEY_VAR, "foodsaver_inventory"),
            (BIDS_KEY_VAR, "   "),
        ]));
        assert_eq!(
            config.data_path,
            PathBuf::from("/var/lib/foodsaver/state.json")
        );
        assert_eq!(config.keys.inventory, "foodsaver_inventory");
        assert_eq!(config.keys.bids, "bids");
        assert_eq!(config.keys.donations, "donations");
    }

    #[test]
    fn explicit_data_path_wins_without_a_fallback_warning() {
        let mut config = None;
        let logs = warnings_during(|| {
            config = Some(StoreConfig::from_lookup_or(
                Some(PathBuf::from("/srv/foodsaver/cli.json")),
                lookup(&[(DATA_PATH_VAR, "/var/lib/foodsaver/state.json")]),
            ));
        });
        assert_eq!(
            config.unwrap().data_path,
            PathBuf::from("/srv/foodsaver/cli.json")
        );
        assert!(!logs.contains(DATA_PATH_VAR), "unexpected warning: {logs}");

        let logs = warnings_during(|| {
            StoreConfig::from_lookup_or(Some(PathBuf::from("cli.json")), lookup(&[]));
        });
        assert!(logs.is_empty(), "unexpected warning: {logs}");
    }

    #[test]
    fn missing_data_path_still_warns() {
        let logs = warnings_during(|| {
            StoreConfig::from_lookup(lookup(&[]));
        });
        assert!(logs.contains(DATA_PATH_VAR));
    }
}
