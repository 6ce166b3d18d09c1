//! Translation of service APIs resources into mesh-native routing configuration.
//!
//! Every call to [`GatewayTranslator::list`] lists the inputs from the store, resolves which gateways are owned
//! by this controller and which routes are bound to them, and synthesizes the requested output kind. Nothing is
//! cached between calls, so the output always reflects the store snapshot seen by that call.
mod bindings;
mod gateway;
pub mod names;
mod route_listener_matcher;
mod virtual_service;

pub use bindings::{BindingResolver, Bindings, ResolvedGateway, ResolvedRoute};
pub use route_listener_matcher::{selector_matches, RouteListenerMatcher};
use thiserror::Error;
use tracing::{info, instrument};
use typed_builder::TypedBuilder;

use crate::{
    constants::{DEFAULT_CONTROLLER_NAME, DEFAULT_DOMAIN_SUFFIX},
    store::{Config, ConfigStore, Kind, StoreError},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TranslationError {
    #[error("unsupported output kind {0}, only mesh-native Gateway and VirtualService can be generated")]
    UnsupportedKind(Kind),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The kinds this translator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Gateway,
    VirtualService,
}

type Synthesizer = fn(&Bindings, &TranslatorOptions) -> Vec<Config>;

impl OutputKind {
    fn synthesizer(self) -> Synthesizer {
        match self {
            OutputKind::Gateway => gateway::synthesize,
            OutputKind::VirtualService => virtual_service::synthesize,
        }
    }
}

impl TryFrom<Kind> for OutputKind {
    type Error = TranslationError;

    fn try_from(kind: Kind) -> Result<Self, Self::Error> {
        match kind {
            Kind::Gateway => Ok(OutputKind::Gateway),
            Kind::VirtualService => Ok(OutputKind::VirtualService),
            Kind::GatewayClass | Kind::KubernetesGateway | Kind::HttpRoute => Err(TranslationError::UnsupportedKind(kind)),
        }
    }
}

impl From<OutputKind> for Kind {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Gateway => Kind::Gateway,
            OutputKind::VirtualService => Kind::VirtualService,
        }
    }
}

#[derive(Clone, Debug, TypedBuilder, PartialEq, Eq)]
pub struct TranslatorOptions {
    #[builder(default = DEFAULT_CONTROLLER_NAME.to_owned(), setter(into))]
    pub controller_name: String,
    /// Appended to service names when building destination hosts.
    #[builder(default = DEFAULT_DOMAIN_SUFFIX.to_owned(), setter(into))]
    pub domain_suffix: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct GatewayTranslator<S> {
    store: S,
    options: TranslatorOptions,
}

impl<S: ConfigStore> GatewayTranslator<S> {
    pub fn new(store: S, options: TranslatorOptions) -> Self {
        Self { store, options }
    }

    /// Generated objects of `kind` in `namespace`, an empty namespace meaning all of them.
    ///
    /// Unbound or foreign inputs are left out silently. Only an unsupported kind or a store failure is an error.
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self, kind: Kind, namespace: &str) -> Result<Vec<Config>, TranslationError> {
        let output_kind = OutputKind::try_from(kind)?;
        let bindings = BindingResolver::new(&self.store, &self.options.controller_name).resolve(namespace)?;
        let configs = (output_kind.synthesizer())(&bindings, &self.options);
        info!("Generated {} {} from {} gateways in namespace {namespace:?}", configs.len(), kind.kind(), bindings.gateways().len());
        Ok(configs)
    }
}
