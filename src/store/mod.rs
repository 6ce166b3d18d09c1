mod config;
pub mod memory;

pub use config::{Config, ConfigMeta, ConfigSpec, Kind, KindParseError};
use thiserror::Error;

use crate::common::ResourceKey;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("resource kind {0} is not served by this store")]
    UnknownKind(Kind),
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: Kind, key: ResourceKey },
    #[error("{kind} {key} not found")]
    NotFound { kind: Kind, key: ResourceKey },
    #[error("store lock poisoned")]
    LockingError,
}

/// Typed, namespaced storage of configuration objects.
///
/// An empty namespace passed to [`ConfigStore::list`] selects every namespace.
pub trait ConfigStore {
    fn list(&self, kind: Kind, namespace: &str) -> Result<Vec<Config>, StoreError>;

    fn get(&self, kind: Kind, name: &str, namespace: &str) -> Result<Option<Config>, StoreError>;

    /// Returns the resource version assigned to the stored object.
    fn create(&self, config: Config) -> Result<String, StoreError>;

    fn update(&self, config: Config) -> Result<String, StoreError>;

    fn delete(&self, kind: Kind, name: &str, namespace: &str) -> Result<(), StoreError>;
}
