use tracing::{debug, warn};

use super::{
    bindings::{Bindings, ResolvedGateway},
    names::{gateway_name, server_port_name},
    TranslatorOptions,
};
use crate::{
    apis::v1alpha1::gateways::{Listener, TlsModeType},
    constants::{ingress_selector, WILDCARD_HOST},
    networking::{self, Port, Server, ServerTlsSettings, TlsMode},
    store::{Config, ConfigMeta, ConfigSpec},
};

/// One mesh gateway per owned gateway, one server per listener in listener order.
pub fn synthesize(bindings: &Bindings, _options: &TranslatorOptions) -> Vec<Config> {
    bindings
        .gateways()
        .iter()
        .map(|gateway| {
            debug!("Synthesizing gateway for {} with {} bound routes", gateway.key(), bindings.routes_for(&gateway.key()).count());
            convert_gateway(gateway)
        })
        .collect()
}

fn convert_gateway(gateway: &ResolvedGateway) -> Config {
    let ResolvedGateway { meta, spec } = gateway;
    let servers = spec.listeners.iter().map(|listener| convert_listener(listener, &meta.name, &meta.namespace)).collect();

    Config::new(
        ConfigMeta::new(&gateway_name(&meta.name), &meta.namespace),
        ConfigSpec::Gateway(networking::Gateway { servers, selector: ingress_selector() }),
    )
}

fn convert_listener(listener: &Listener, name: &str, namespace: &str) -> Server {
    let hosts = match listener.hostname.as_deref() {
        Some(hostname) if !hostname.is_empty() => vec![hostname.to_owned()],
        _ => vec![WILDCARD_HOST.to_owned()],
    };

    Server {
        port: Port {
            number: u32::from(listener.port),
            protocol: listener.protocol.as_str().to_owned(),
            name: server_port_name(&listener.protocol, listener.port, name, namespace),
        },
        hosts,
        tls: convert_tls(listener),
    }
}

fn convert_tls(listener: &Listener) -> Option<ServerTlsSettings> {
    if !listener.protocol.is_tls() {
        return None;
    }
    let tls = listener.tls.as_ref()?;
    match tls.mode {
        TlsModeType::Terminate => {
            let Some(reference) = tls.certificate_ref.as_ref() else {
                warn!("Listener {} {} terminates TLS without a certificate reference, skipping TLS settings", listener.protocol, listener.port);
                return None;
            };
            Some(ServerTlsSettings { mode: TlsMode::Simple, credential_name: Some(reference.name.clone()) })
        }
        TlsModeType::Passthrough => Some(ServerTlsSettings { mode: TlsMode::Passthrough, credential_name: None }),
    }
}
