pub mod apis;
pub mod common;
pub mod configuration;
pub mod constants;
pub mod manifests;
pub mod networking;
pub mod store;
pub mod translator;

use configuration::Configuration;
use store::{memory::MemoryStore, Kind};
use tracing::info;
use translator::GatewayTranslator;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

/// Loads the manifests in `content` into a fresh in-memory store and renders the generated objects of `kind` in `namespace` as YAML.
pub fn translate(configuration: &Configuration, content: &str, kind: Kind, namespace: &str) -> Result<String> {
    configuration.validate()?;
    let store = MemoryStore::with_all_kinds();
    let loaded = manifests::load_manifests(&store, content)?;
    info!("Loaded {loaded} resources");

    let translator = GatewayTranslator::new(store, configuration.translator_options());
    let configs = translator.list(kind, namespace)?;
    Ok(manifests::render_configs(&configs)?)
}
