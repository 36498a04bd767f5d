//! Infrastructure layer: persistence port and adapters, the inventory store,
//! configuration, external collaborators.

pub mod config;
pub mod external;
pub mod storage;
pub mod store;

mod integration_tests;

pub use config::{CollectionKeys, StoreConfig};
pub use storage::{InMemoryKeyValueStore, JsonFileStore, KeyValueStore, StorageError};
pub use store::{InventoryStore, StoreError, StoreResult};
