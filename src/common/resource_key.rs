use std::fmt::Display;

use kube::{Resource, ResourceExt};

use super::create_id;
use crate::{
    apis::v1alpha1::{gatewayclasses::GatewayClass, gateways::Gateway, httproutes::GatewayReference, httproutes::HTTPRoute},
    constants::HTTP_ROUTE_KIND,
    store::Config,
};

pub const DEFAULT_GROUP_NAME: &str = crate::constants::SERVICE_APIS_GROUP;
pub const DEFAULT_NAMESPACE_NAME: &str = "default";
pub const DEFAULT_KIND_NAME: &str = "Gateway";

/// Identity of a resource independent of its content.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceKey {
    pub group: String,
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

impl ResourceKey {
    pub fn namespaced(name: &str, namespace: &str) -> Self {
        Self { name: name.to_owned(), namespace: namespace.to_owned(), ..Default::default() }
    }
}

impl Default for ResourceKey {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP_NAME.to_owned(),
            namespace: DEFAULT_NAMESPACE_NAME.to_owned(),
            name: String::default(),
            kind: DEFAULT_KIND_NAME.to_owned(),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", create_id(&self.name, &self.namespace))
    }
}

impl From<&Config> for ResourceKey {
    fn from(config: &Config) -> Self {
        let kind = config.kind();
        Self {
            group: kind.group().to_owned(),
            namespace: config.meta.namespace.clone(),
            name: config.meta.name.clone(),
            kind: kind.kind().to_owned(),
        }
    }
}

impl From<(&GatewayReference, &str)> for ResourceKey {
    fn from((reference, route_namespace): (&GatewayReference, &str)) -> Self {
        Self {
            group: DEFAULT_GROUP_NAME.to_owned(),
            namespace: reference.namespace.clone().unwrap_or_else(|| route_namespace.to_owned()),
            name: reference.name.clone(),
            kind: DEFAULT_KIND_NAME.to_owned(),
        }
    }
}

impl From<&GatewayClass> for ResourceKey {
    fn from(value: &GatewayClass) -> Self {
        Self {
            group: DEFAULT_GROUP_NAME.to_owned(),
            namespace: value.meta().namespace.clone().unwrap_or_default(),
            name: value.name_any(),
            kind: "GatewayClass".to_owned(),
        }
    }
}

impl From<&Gateway> for ResourceKey {
    fn from(value: &Gateway) -> Self {
        let namespace = value.meta().namespace.clone().unwrap_or(DEFAULT_NAMESPACE_NAME.to_owned());

        Self { group: DEFAULT_GROUP_NAME.to_owned(), namespace, name: value.name_any(), kind: DEFAULT_KIND_NAME.to_owned() }
    }
}

impl From<&HTTPRoute> for ResourceKey {
    fn from(value: &HTTPRoute) -> Self {
        let namespace = value.meta().namespace.clone().unwrap_or(DEFAULT_NAMESPACE_NAME.to_owned());

        Self { group: DEFAULT_GROUP_NAME.to_owned(), namespace, name: value.name_any(), kind: HTTP_ROUTE_KIND.to_owned() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::v1alpha1::httproutes::GatewayReference;

    #[test]
    fn gateway_reference_defaults_to_route_namespace() {
        let reference = GatewayReference { name: "gw".to_owned(), namespace: None };
        let key = ResourceKey::from((&reference, "ns1"));
        assert_eq!(key, ResourceKey::namespaced("gw", "ns1"));
        assert_eq!(key.to_string(), "ns1.gw");

        let reference = GatewayReference { name: "gw".to_owned(), namespace: Some("ns2".to_owned()) };
        assert_eq!(ResourceKey::from((&reference, "ns1")).namespace, "ns2");
    }
}
