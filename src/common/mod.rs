mod resource_key;

pub use resource_key::{ResourceKey, DEFAULT_GROUP_NAME, DEFAULT_KIND_NAME, DEFAULT_NAMESPACE_NAME};

pub fn create_id(name: &str, namespace: &str) -> String {
    namespace.to_owned() + "." + name
}
