use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use kube::ResourceExt;
use serde::Serialize;
use thiserror::Error;

use crate::{
    apis::v1alpha1::{
        gatewayclasses::{GatewayClass, GatewayClassSpec},
        gateways::{Gateway, GatewaySpec},
        httproutes::{HTTPRoute, HTTPRouteSpec},
    },
    common::ResourceKey,
    constants::{MESH_NETWORKING_GROUP, MESH_NETWORKING_VERSION, SERVICE_APIS_GROUP, SERVICE_APIS_VERSION},
    networking,
};

/// Every kind of configuration the store and the translator know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    GatewayClass,
    /// The service APIs `Gateway`, as opposed to the mesh-native one.
    KubernetesGateway,
    HttpRoute,
    Gateway,
    VirtualService,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::GatewayClass, Kind::KubernetesGateway, Kind::HttpRoute, Kind::Gateway, Kind::VirtualService];

    pub fn group(self) -> &'static str {
        match self {
            Kind::GatewayClass | Kind::KubernetesGateway | Kind::HttpRoute => SERVICE_APIS_GROUP,
            Kind::Gateway | Kind::VirtualService => MESH_NETWORKING_GROUP,
        }
    }

    pub fn version(self) -> &'static str {
        match self {
            Kind::GatewayClass | Kind::KubernetesGateway | Kind::HttpRoute => SERVICE_APIS_VERSION,
            Kind::Gateway | Kind::VirtualService => MESH_NETWORKING_VERSION,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Kind::GatewayClass => "GatewayClass",
            Kind::KubernetesGateway | Kind::Gateway => "Gateway",
            Kind::HttpRoute => "HTTPRoute",
            Kind::VirtualService => "VirtualService",
        }
    }

    pub fn api_version(self) -> String {
        format!("{}/{}", self.group(), self.version())
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.group(), self.version(), self.kind())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown resource kind {0:?}")]
pub struct KindParseError(pub String);

impl FromStr for Kind {
    type Err = KindParseError;

    /// Accepts `group/version/kind`, `group/kind` or a bare kind. A bare `Gateway` is the mesh-native one.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = Kind::ALL.into_iter().find(|k| k.to_string() == value || format!("{}/{}", k.group(), k.kind()) == value) {
            return Ok(kind);
        }
        match value {
            "GatewayClass" => Ok(Kind::GatewayClass),
            "HTTPRoute" => Ok(Kind::HttpRoute),
            "Gateway" => Ok(Kind::Gateway),
            "VirtualService" => Ok(Kind::VirtualService),
            _ => Err(KindParseError(value.to_owned())),
        }
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl ConfigMeta {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self { name: name.to_owned(), namespace: namespace.to_owned(), ..Default::default() }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ConfigSpec {
    GatewayClass(GatewayClassSpec),
    KubernetesGateway(GatewaySpec),
    HttpRoute(HTTPRouteSpec),
    Gateway(networking::Gateway),
    VirtualService(networking::VirtualService),
}

impl ConfigSpec {
    pub fn kind(&self) -> Kind {
        match self {
            ConfigSpec::GatewayClass(_) => Kind::GatewayClass,
            ConfigSpec::KubernetesGateway(_) => Kind::KubernetesGateway,
            ConfigSpec::HttpRoute(_) => Kind::HttpRoute,
            ConfigSpec::Gateway(_) => Kind::Gateway,
            ConfigSpec::VirtualService(_) => Kind::VirtualService,
        }
    }
}

/// A typed, namespaced configuration object as held by a [`super::ConfigStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub meta: ConfigMeta,
    pub spec: ConfigSpec,
}

impl Config {
    pub fn new(meta: ConfigMeta, spec: ConfigSpec) -> Self {
        Self { meta, spec }
    }

    pub fn kind(&self) -> Kind {
        self.spec.kind()
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::from(self)
    }
}

fn meta_from<R: ResourceExt>(resource: &R) -> ConfigMeta {
    ConfigMeta {
        name: resource.name_any(),
        namespace: resource.namespace().unwrap_or_default(),
        labels: resource.labels().clone(),
        annotations: resource.annotations().clone(),
        resource_version: resource.resource_version(),
    }
}

impl From<&GatewayClass> for Config {
    fn from(value: &GatewayClass) -> Self {
        Config::new(meta_from(value), ConfigSpec::GatewayClass(value.spec.clone()))
    }
}

impl From<&Gateway> for Config {
    fn from(value: &Gateway) -> Self {
        Config::new(meta_from(value), ConfigSpec::KubernetesGateway(value.spec.clone()))
    }
}

impl From<&HTTPRoute> for Config {
    fn from(value: &HTTPRoute) -> Self {
        Config::new(meta_from(value), ConfigSpec::HttpRoute(value.spec.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!("VirtualService".parse::<Kind>(), Ok(Kind::VirtualService));
        assert_eq!("Gateway".parse::<Kind>(), Ok(Kind::Gateway));
        assert_eq!("networking.x-k8s.io/v1alpha1/Gateway".parse::<Kind>(), Ok(Kind::KubernetesGateway));
        assert_eq!("networking.x-k8s.io/Gateway".parse::<Kind>(), Ok(Kind::KubernetesGateway));
        assert_eq!("networking.istio.io/v1alpha3/Gateway".parse::<Kind>(), Ok(Kind::Gateway));
        assert_eq!("wrong-kind".parse::<Kind>(), Err(KindParseError("wrong-kind".to_owned())));
    }

    #[test]
    fn kind_follows_spec() {
        let config = Config::new(ConfigMeta::new("vs", "ns1"), ConfigSpec::VirtualService(networking::VirtualService::default()));
        assert_eq!(config.kind(), Kind::VirtualService);
        assert_eq!(config.key().kind, "VirtualService");
        assert_eq!(config.key().group, "networking.istio.io");
    }
}
