use std::collections::BTreeMap;

/// Identity a `GatewayClass` must carry in `spec.controller` to be handled here.
pub const DEFAULT_CONTROLLER_NAME: &str = "istio.io/gateway-controller";

/// Appended to every generated resource name.
pub const AUTOGENERATED_NAME_SUFFIX: &str = "istio-autogenerated-k8s-gateway";

pub const INGRESS_SELECTOR_KEY: &str = "istio";
pub const INGRESS_SELECTOR_VALUE: &str = "ingressgateway";

pub const DEFAULT_DOMAIN_SUFFIX: &str = "cluster.local";

pub const SERVICE_APIS_GROUP: &str = "networking.x-k8s.io";
pub const SERVICE_APIS_VERSION: &str = "v1alpha1";
pub const MESH_NETWORKING_GROUP: &str = "networking.istio.io";
pub const MESH_NETWORKING_VERSION: &str = "v1alpha3";

pub const HTTP_ROUTE_KIND: &str = "HTTPRoute";

pub const WILDCARD_HOST: &str = "*";

pub fn ingress_selector() -> BTreeMap<String, String> {
    BTreeMap::from([(INGRESS_SELECTOR_KEY.to_owned(), INGRESS_SELECTOR_VALUE.to_owned())])
}
