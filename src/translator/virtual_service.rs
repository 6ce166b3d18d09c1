use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{
    bindings::{Bindings, ResolvedGateway, ResolvedRoute},
    names::{gateway_reference, virtual_service_name},
    TranslatorOptions,
};
use crate::{
    apis::v1alpha1::httproutes::{
        HTTPHeaderMatch, HTTPPathMatch, HTTPRouteFilter, HTTPRouteFilterType, HTTPRouteForwardTo, HTTPRouteMatch, HTTPRouteRule, HeaderMatchType,
        PathMatchType,
    },
    networking::{
        self, Destination, HTTPMatchRequest, HTTPRouteDestination, HeaderOperations, Headers, PortSelector, StringMatch,
    },
    store::{Config, ConfigMeta, ConfigSpec},
};

/// One virtual service per bound route, referencing every gateway the route is bound to.
pub fn synthesize(bindings: &Bindings, options: &TranslatorOptions) -> Vec<Config> {
    bindings.route_attachments().into_iter().map(|(route, gateways)| convert_route(route, &gateways, &options.domain_suffix)).collect()
}

fn convert_route(route: &ResolvedRoute, gateways: &[&ResolvedGateway], domain_suffix: &str) -> Config {
    let ResolvedRoute { meta, spec } = route;
    debug!("Synthesizing virtual service for {} bound to {} gateways", route.key(), gateways.len());

    let virtual_service = networking::VirtualService {
        hosts: spec.hostnames.clone(),
        gateways: gateways.iter().map(|gateway| gateway_reference(&gateway.meta.name, &gateway.meta.namespace)).collect(),
        http: spec.rules.iter().map(|rule| convert_rule(rule, &meta.namespace, domain_suffix)).collect(),
    };

    Config::new(ConfigMeta::new(&virtual_service_name(&meta.name), &meta.namespace), ConfigSpec::VirtualService(virtual_service))
}

fn convert_rule(rule: &HTTPRouteRule, namespace: &str, domain_suffix: &str) -> networking::HTTPRoute {
    networking::HTTPRoute {
        matches: rule.matches.iter().map(convert_match).collect(),
        route: rule.forward_to.iter().filter_map(|forward_to| convert_forward_to(forward_to, namespace, domain_suffix)).collect(),
        headers: request_headers(&rule.filters),
    }
}

fn convert_match(route_match: &HTTPRouteMatch) -> HTTPMatchRequest {
    HTTPMatchRequest {
        uri: route_match.path.as_ref().map(convert_path_match),
        headers: route_match.headers.as_ref().map(convert_header_match).unwrap_or_default(),
    }
}

fn convert_path_match(path: &HTTPPathMatch) -> StringMatch {
    let value = path.value.clone();
    match path.match_type {
        PathMatchType::Exact => StringMatch::exact(value),
        PathMatchType::Prefix => StringMatch::prefix(value),
        PathMatchType::RegularExpression => StringMatch::regex(value),
    }
}

fn convert_header_match(headers: &HTTPHeaderMatch) -> BTreeMap<String, StringMatch> {
    headers
        .values
        .iter()
        .map(|(name, value)| {
            let string_match = match headers.match_type {
                HeaderMatchType::Exact => StringMatch::exact(value.clone()),
                HeaderMatchType::RegularExpression => StringMatch::regex(value.clone()),
            };
            (name.clone(), string_match)
        })
        .collect()
}

fn convert_forward_to(forward_to: &HTTPRouteForwardTo, namespace: &str, domain_suffix: &str) -> Option<HTTPRouteDestination> {
    let Some(service_name) = &forward_to.service_name else {
        warn!("Skipping forward without a service name {forward_to:?}");
        return None;
    };

    Some(HTTPRouteDestination {
        destination: Destination {
            host: format!("{service_name}.{namespace}.svc.{domain_suffix}"),
            port: forward_to.port.map(|port| PortSelector { number: u32::from(port) }),
        },
        weight: forward_to.weight,
        headers: request_headers(&forward_to.filters),
    })
}

fn request_headers(filters: &[HTTPRouteFilter]) -> Option<Headers> {
    let mut operations = HeaderOperations::default();
    for filter in filters {
        match (filter.filter_type, &filter.request_header_modifier) {
            (HTTPRouteFilterType::RequestHeaderModifier, Some(modifier)) => {
                operations.set.extend(modifier.set.iter().map(|(k, v)| (k.clone(), v.clone())));
                operations.add.extend(modifier.add.iter().map(|(k, v)| (k.clone(), v.clone())));
                operations.remove.extend(modifier.remove.iter().cloned());
            }
            (filter_type, _) => warn!("Skipping unsupported filter {filter_type:?}"),
        }
    }

    (!operations.is_empty()).then_some(Headers { request: Some(operations), response: None })
}
