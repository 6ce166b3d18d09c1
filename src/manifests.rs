//! Reading input resources from YAML manifests and writing generated configuration back as YAML.
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    apis::v1alpha1::{gatewayclasses::GatewayClass, gateways::Gateway, httproutes::HTTPRoute},
    common::{ResourceKey, DEFAULT_NAMESPACE_NAME},
    constants::SERVICE_APIS_GROUP,
    store::{Config, ConfigMeta, ConfigSpec, ConfigStore, StoreError},
};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("document {index} has no kind")]
    MissingKind { index: usize },
    #[error("document {index} has unsupported kind {api_version}/{kind}")]
    UnsupportedKind { index: usize, api_version: String, kind: String },
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses every `GatewayClass`, `Gateway` and `HTTPRoute` document of a multi-document YAML stream.
pub fn parse_manifests(content: &str) -> Result<Vec<Config>, ManifestError> {
    let mut configs = vec![];
    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let kind = value.get("kind").and_then(Value::as_str).ok_or(ManifestError::MissingKind { index })?.to_owned();
        let api_version = value.get("apiVersion").and_then(Value::as_str).unwrap_or_default().to_owned();
        if api_version.split('/').next() != Some(SERVICE_APIS_GROUP) {
            return Err(ManifestError::UnsupportedKind { index, api_version, kind });
        }

        let config = match kind.as_str() {
            "GatewayClass" => {
                let gateway_class: GatewayClass = serde_yaml::from_value(value)?;
                debug!("Parsed gateway class {}", ResourceKey::from(&gateway_class));
                Config::from(&gateway_class)
            }
            "Gateway" => {
                let gateway: Gateway = serde_yaml::from_value(value)?;
                debug!("Parsed gateway {}", ResourceKey::from(&gateway));
                with_default_namespace(Config::from(&gateway))
            }
            "HTTPRoute" => {
                let route: HTTPRoute = serde_yaml::from_value(value)?;
                debug!("Parsed http route {}", ResourceKey::from(&route));
                with_default_namespace(Config::from(&route))
            }
            _ => return Err(ManifestError::UnsupportedKind { index, api_version, kind }),
        };
        configs.push(config);
    }
    Ok(configs)
}

fn with_default_namespace(mut config: Config) -> Config {
    if config.meta.namespace.is_empty() {
        DEFAULT_NAMESPACE_NAME.clone_into(&mut config.meta.namespace);
    }
    config
}

/// Creates every resource of `content` in `store`, returning how many were created.
pub fn load_manifests<S: ConfigStore>(store: &S, content: &str) -> Result<usize, ManifestError> {
    let configs = parse_manifests(content)?;
    let count = configs.len();
    for config in configs {
        store.create(config)?;
    }
    Ok(count)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    api_version: String,
    kind: &'static str,
    metadata: &'a ConfigMeta,
    spec: &'a ConfigSpec,
}

/// Renders configs as a multi-document YAML stream.
pub fn render_configs(configs: &[Config]) -> Result<String, serde_yaml::Error> {
    let documents = configs
        .iter()
        .map(|config| {
            let kind = config.kind();
            serde_yaml::to_string(&Manifest { api_version: kind.api_version(), kind: kind.kind(), metadata: &config.meta, spec: &config.spec })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents.join("---\n"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        apis::v1alpha1::{
            gateways::{ProtocolType, RouteSelectType},
            httproutes::GatewayAllowType,
        },
        store::{memory::MemoryStore, Kind},
        translator::{GatewayTranslator, TranslatorOptions},
    };

    const MANIFESTS: &str = r"
apiVersion: networking.x-k8s.io/v1alpha1
kind: GatewayClass
metadata:
  name: gwclass
  namespace: ns1
spec:
  controller: istio.io/gateway-controller
---
apiVersion: networking.x-k8s.io/v1alpha1
kind: Gateway
metadata:
  name: gwspec
  namespace: ns1
spec:
  gatewayClassName: gwclass
  listeners:
  - port: 9009
    protocol: HTTP
    routes:
      namespaces:
        from: All
      group: networking.x-k8s.io
      kind: HTTPRoute
---
apiVersion: networking.x-k8s.io/v1alpha1
kind: HTTPRoute
metadata:
  name: http-route
  namespace: ns1
  labels:
    app: web
spec:
  gateways:
    allow: All
  hostnames:
  - test.cluster.local
";

    #[test]
    fn parse_fixture() {
        let configs = parse_manifests(MANIFESTS).unwrap();
        assert_eq!(configs.iter().map(Config::kind).collect::<Vec<_>>(), vec![Kind::GatewayClass, Kind::KubernetesGateway, Kind::HttpRoute]);

        let ConfigSpec::KubernetesGateway(gateway) = &configs[1].spec else { panic!("not a gateway") };
        assert_eq!(gateway.listeners[0].protocol, ProtocolType::Http);
        assert_eq!(gateway.listeners[0].routes.namespaces.from, RouteSelectType::All);

        let ConfigSpec::HttpRoute(route) = &configs[2].spec else { panic!("not a route") };
        assert_eq!(route.gateways.allow, GatewayAllowType::All);
        assert_eq!(configs[2].meta.labels.get("app").map(String::as_str), Some("web"));
    }

    #[test]
    fn missing_namespace_defaults() {
        let configs = parse_manifests(
            r"
apiVersion: networking.x-k8s.io/v1alpha1
kind: HTTPRoute
metadata:
  name: r
spec: {}
",
        )
        .unwrap();
        assert_eq!(configs[0].meta.namespace, "default");
    }

    #[test]
    fn unsupported_documents() {
        let error = parse_manifests("apiVersion: v1\nkind: Service\nmetadata:\n  name: s\n").unwrap_err();
        assert!(matches!(error, ManifestError::UnsupportedKind { index: 0, .. }));
        let error = parse_manifests("apiVersion: networking.x-k8s.io/v1alpha1\nmetadata:\n  name: s\n").unwrap_err();
        assert!(matches!(error, ManifestError::MissingKind { index: 0 }));
        let error = parse_manifests("apiVersion: networking.x-k8s.io/v1alpha1\nkind: TCPRoute\n").unwrap_err();
        assert!(matches!(error, ManifestError::UnsupportedKind { .. }));
    }

    #[test]
    fn load_translate_and_render() {
        let store = MemoryStore::with_all_kinds();
        assert_eq!(load_manifests(&store, MANIFESTS).unwrap(), 3);
        assert!(matches!(load_manifests(&store, MANIFESTS), Err(ManifestError::Store(StoreError::AlreadyExists { .. }))));

        let translator = GatewayTranslator::new(store, TranslatorOptions::default());
        let mut configs = translator.list(Kind::Gateway, "ns1").unwrap();
        configs.extend(translator.list(Kind::VirtualService, "ns1").unwrap());

        let rendered = render_configs(&configs).unwrap();
        let documents = serde_yaml::Deserializer::from_str(&rendered).map(Value::deserialize).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["apiVersion"], Value::from("networking.istio.io/v1alpha3"));
        assert_eq!(documents[0]["kind"], Value::from("Gateway"));
        assert_eq!(documents[0]["metadata"]["name"], Value::from("gwspec-istio-autogenerated-k8s-gateway"));
        assert_eq!(documents[0]["spec"]["servers"][0]["port"]["name"], Value::from("http-9009-gateway-gwspec-ns1"));
        assert_eq!(documents[1]["kind"], Value::from("VirtualService"));
        assert_eq!(documents[1]["spec"]["gateways"][0], Value::from("ns1/gwspec-istio-autogenerated-k8s-gateway"));
    }

    #[test]
    fn rendered_matches_are_plain_mappings() {
        let store = MemoryStore::with_all_kinds();
        load_manifests(&store, MANIFESTS).unwrap();
        let mut route = parse_manifests(
            r"
apiVersion: networking.x-k8s.io/v1alpha1
kind: HTTPRoute
metadata:
  name: http-route
  namespace: ns1
spec:
  gateways:
    allow: All
  rules:
  - matches:
    - path:
        type: Exact
        value: /login
      headers:
        values:
          version: two
    forwardTo:
    - serviceName: login
      port: 8080
",
        )
        .unwrap();
        store.update(route.remove(0)).unwrap();

        let translator = GatewayTranslator::new(store, TranslatorOptions::default());
        let rendered = render_configs(&translator.list(Kind::VirtualService, "ns1").unwrap()).unwrap();
        assert!(!rendered.contains('!'), "{rendered}");

        let documents = serde_yaml::Deserializer::from_str(&rendered).map(Value::deserialize).collect::<Result<Vec<_>, _>>().unwrap();
        let first_match = &documents[0]["spec"]["http"][0]["match"][0];
        assert_eq!(first_match["uri"]["exact"], Value::from("/login"));
        assert_eq!(first_match["headers"]["version"]["exact"], Value::from("two"));
    }
}
