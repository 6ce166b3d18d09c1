//! Name derivation for generated resources. Pure functions of the source identity.
use crate::{apis::v1alpha1::gateways::ProtocolType, constants::AUTOGENERATED_NAME_SUFFIX};

pub fn gateway_name(gateway_name: &str) -> String {
    format!("{gateway_name}-{AUTOGENERATED_NAME_SUFFIX}")
}

pub fn virtual_service_name(route_name: &str) -> String {
    format!("{route_name}-{AUTOGENERATED_NAME_SUFFIX}")
}

/// `<namespace>/<generated gateway name>` as referenced from a virtual service.
pub fn gateway_reference(gateway_name: &str, namespace: &str) -> String {
    format!("{namespace}/{}", self::gateway_name(gateway_name))
}

pub fn server_port_name(protocol: &ProtocolType, port: u16, gateway_name: &str, namespace: &str) -> String {
    format!("{}-{port}-gateway-{gateway_name}-{namespace}", protocol.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        assert_eq!(gateway_name("gwspec"), "gwspec-istio-autogenerated-k8s-gateway");
        assert_eq!(virtual_service_name("http-route"), "http-route-istio-autogenerated-k8s-gateway");
        assert_eq!(gateway_reference("gwspec", "ns1"), "ns1/gwspec-istio-autogenerated-k8s-gateway");
        assert_eq!(server_port_name(&ProtocolType::Http, 9009, "gwspec", "ns1"), "http-9009-gateway-gwspec-ns1");
        assert_eq!(server_port_name(&ProtocolType::Https, 443, "gw", "prod"), "https-443-gateway-gw-prod");
    }
}
