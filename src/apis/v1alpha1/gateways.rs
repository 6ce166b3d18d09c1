use std::fmt::Display;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::default_group;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[kube(group = "networking.x-k8s.io", version = "v1alpha1", kind = "Gateway", plural = "gateways", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    pub gateway_class_name: String,
    #[serde(default)]
    pub listeners: Vec<Listener>,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub port: u16,
    #[schemars(with = "String")]
    pub protocol: ProtocolType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<GatewayTlsConfig>,
    pub routes: RouteBindingSelector,
}

/// Core protocols plus domain-prefixed extensions, which are kept verbatim.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum ProtocolType {
    Http,
    Https,
    Tls,
    Tcp,
    Udp,
    Other(String),
}

impl ProtocolType {
    pub fn as_str(&self) -> &str {
        match self {
            ProtocolType::Http => "HTTP",
            ProtocolType::Https => "HTTPS",
            ProtocolType::Tls => "TLS",
            ProtocolType::Tcp => "TCP",
            ProtocolType::Udp => "UDP",
            ProtocolType::Other(protocol) => protocol,
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, ProtocolType::Https | ProtocolType::Tls)
    }
}

impl From<String> for ProtocolType {
    fn from(protocol: String) -> Self {
        match protocol.as_str() {
            "HTTP" => ProtocolType::Http,
            "HTTPS" => ProtocolType::Https,
            "TLS" => ProtocolType::Tls,
            "TCP" => ProtocolType::Tcp,
            "UDP" => ProtocolType::Udp,
            _ => ProtocolType::Other(protocol),
        }
    }
}

impl From<ProtocolType> for String {
    fn from(protocol: ProtocolType) -> Self {
        match protocol {
            ProtocolType::Other(protocol) => protocol,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for ProtocolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which routes a listener accepts.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteBindingSelector {
    #[serde(default)]
    pub namespaces: RouteNamespaces,
    /// Label selector applied to the routes themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,
    #[serde(default = "default_group")]
    pub group: String,
    pub kind: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteNamespaces {
    #[serde(default)]
    pub from: RouteSelectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq)]
pub enum RouteSelectType {
    All,
    #[default]
    Same,
    Selector,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTlsConfig {
    #[serde(default)]
    pub mode: TlsModeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_ref: Option<LocalObjectReference>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, JsonSchema, PartialEq, Eq)]
pub enum TlsModeType {
    #[default]
    Terminate,
    Passthrough,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub kind: String,
    pub name: String,
}
