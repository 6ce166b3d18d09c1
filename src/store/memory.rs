use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::debug;

use super::{Config, ConfigStore, Kind, StoreError};
use crate::common::ResourceKey;

#[derive(Default)]
struct Collections {
    revision: u64,
    configs: BTreeMap<Kind, BTreeMap<ResourceKey, Config>>,
}

impl Collections {
    fn next_revision(&mut self) -> String {
        self.revision += 1;
        self.revision.to_string()
    }
}

/// In-memory [`ConfigStore`] serving a fixed set of kinds.
///
/// Clones share the same contents. Listing is ordered by namespace and then by name.
#[derive(Clone)]
pub struct MemoryStore {
    kinds: Arc<BTreeSet<Kind>>,
    collections: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new(kinds: &[Kind]) -> Self {
        Self { kinds: Arc::new(kinds.iter().copied().collect()), collections: Arc::new(Mutex::new(Collections::default())) }
    }

    pub fn with_all_kinds() -> Self {
        Self::new(&Kind::ALL)
    }

    fn check_kind(&self, kind: Kind) -> Result<(), StoreError> {
        if self.kinds.contains(&kind) {
            Ok(())
        } else {
            Err(StoreError::UnknownKind(kind))
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections.lock().map_err(|_| StoreError::LockingError)
    }

    fn key(kind: Kind, name: &str, namespace: &str) -> ResourceKey {
        ResourceKey { group: kind.group().to_owned(), namespace: namespace.to_owned(), name: name.to_owned(), kind: kind.kind().to_owned() }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_all_kinds()
    }
}

impl ConfigStore for MemoryStore {
    fn list(&self, kind: Kind, namespace: &str) -> Result<Vec<Config>, StoreError> {
        self.check_kind(kind)?;
        let lock = self.lock()?;
        Ok(lock
            .configs
            .get(&kind)
            .map(|configs| configs.values().filter(|config| namespace.is_empty() || config.meta.namespace == namespace).cloned().collect::<Vec<_>>())
            .unwrap_or_default())
    }

    fn get(&self, kind: Kind, name: &str, namespace: &str) -> Result<Option<Config>, StoreError> {
        self.check_kind(kind)?;
        let lock = self.lock()?;
        Ok(lock.configs.get(&kind).and_then(|configs| configs.get(&Self::key(kind, name, namespace))).cloned())
    }

    fn create(&self, mut config: Config) -> Result<String, StoreError> {
        let kind = config.kind();
        self.check_kind(kind)?;
        let key = config.key();
        let mut lock = self.lock()?;
        if lock.configs.get(&kind).is_some_and(|configs| configs.contains_key(&key)) {
            return Err(StoreError::AlreadyExists { kind, key });
        }
        let revision = lock.next_revision();
        config.meta.resource_version = Some(revision.clone());
        debug!("Created {kind} {key} at revision {revision}");
        lock.configs.entry(kind).or_default().insert(key, config);
        Ok(revision)
    }

    fn update(&self, mut config: Config) -> Result<String, StoreError> {
        let kind = config.kind();
        self.check_kind(kind)?;
        let key = config.key();
        let mut lock = self.lock()?;
        if !lock.configs.get(&kind).is_some_and(|configs| configs.contains_key(&key)) {
            return Err(StoreError::NotFound { kind, key });
        }
        let revision = lock.next_revision();
        config.meta.resource_version = Some(revision.clone());
        debug!("Updated {kind} {key} at revision {revision}");
        lock.configs.entry(kind).or_default().insert(key, config);
        Ok(revision)
    }

    fn delete(&self, kind: Kind, name: &str, namespace: &str) -> Result<(), StoreError> {
        self.check_kind(kind)?;
        let key = Self::key(kind, name, namespace);
        let mut lock = self.lock()?;
        let removed = lock.configs.get_mut(&kind).and_then(|configs| configs.remove(&key));
        match removed {
            Some(_) => {
                lock.next_revision();
                Ok(())
            }
            None => Err(StoreError::NotFound { kind, key }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        apis::v1alpha1::httproutes::HTTPRouteSpec,
        store::{ConfigMeta, ConfigSpec},
    };

    fn route(name: &str, namespace: &str) -> Config {
        Config::new(ConfigMeta::new(name, namespace), ConfigSpec::HttpRoute(HTTPRouteSpec::default()))
    }

    #[test]
    fn list_is_namespaced_and_ordered() {
        let store = MemoryStore::with_all_kinds();
        store.create(route("b", "ns1")).unwrap();
        store.create(route("a", "ns2")).unwrap();
        store.create(route("a", "ns1")).unwrap();

        let names = |configs: Vec<Config>| configs.into_iter().map(|c| format!("{}/{}", c.meta.namespace, c.meta.name)).collect::<Vec<_>>();
        assert_eq!(names(store.list(Kind::HttpRoute, "ns1").unwrap()), vec!["ns1/a", "ns1/b"]);
        assert_eq!(names(store.list(Kind::HttpRoute, "").unwrap()), vec!["ns1/a", "ns1/b", "ns2/a"]);
        assert!(store.list(Kind::KubernetesGateway, "ns1").unwrap().is_empty());
    }

    #[test]
    fn create_update_delete() {
        let store = MemoryStore::with_all_kinds();
        assert_eq!(store.create(route("r", "ns1")), Ok("1".to_owned()));
        assert!(matches!(store.create(route("r", "ns1")), Err(StoreError::AlreadyExists { .. })));

        let stored = store.get(Kind::HttpRoute, "r", "ns1").unwrap().unwrap();
        assert_eq!(stored.meta.resource_version.as_deref(), Some("1"));

        assert_eq!(store.update(route("r", "ns1")), Ok("2".to_owned()));
        assert!(matches!(store.update(route("missing", "ns1")), Err(StoreError::NotFound { .. })));

        store.delete(Kind::HttpRoute, "r", "ns1").unwrap();
        assert_eq!(store.get(Kind::HttpRoute, "r", "ns1"), Ok(None));
        assert!(matches!(store.delete(Kind::HttpRoute, "r", "ns1"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let store = MemoryStore::new(&[Kind::GatewayClass]);
        assert_eq!(store.list(Kind::GatewayClass, ""), Ok(vec![]));
        assert_eq!(store.list(Kind::HttpRoute, "ns1"), Err(StoreError::UnknownKind(Kind::HttpRoute)));
        assert_eq!(store.create(route("r", "ns1")), Err(StoreError::UnknownKind(Kind::HttpRoute)));
    }

    #[test]
    fn clones_share_contents() {
        let store = MemoryStore::with_all_kinds();
        let clone = store.clone();
        clone.create(route("r", "ns1")).unwrap();
        assert_eq!(store.list(Kind::HttpRoute, "ns1").unwrap().len(), 1);
    }
}
