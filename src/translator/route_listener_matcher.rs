use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use tracing::debug;

use super::bindings::{ResolvedGateway, ResolvedRoute};
use crate::{
    apis::v1alpha1::{
        gateways::{Listener, RouteSelectType},
        httproutes::GatewayAllowType,
    },
    common::ResourceKey,
    constants::{HTTP_ROUTE_KIND, SERVICE_APIS_GROUP},
};

/// Decides whether a route may attach to a gateway.
///
/// The route has to allow the gateway and at least one listener of the gateway has to accept the route.
pub struct RouteListenerMatcher<'a> {
    gateway: &'a ResolvedGateway,
}

impl<'a> RouteListenerMatcher<'a> {
    pub fn new(gateway: &'a ResolvedGateway) -> Self {
        Self { gateway }
    }

    pub fn is_bound(&self, route: &ResolvedRoute) -> bool {
        if !self.is_allowed_by_route(route) {
            debug!("Route {} does not allow gateway {}", route.key(), self.gateway.key());
            return false;
        }
        let listeners = self.matching_listeners(route);
        if listeners.is_empty() {
            debug!("No listener of gateway {} accepts route {}", self.gateway.key(), route.key());
            return false;
        }
        debug!("Route {} bound to gateway {} via ports {:?}", route.key(), self.gateway.key(), listeners.iter().map(|l| l.port).collect::<Vec<_>>());
        true
    }

    pub fn matching_listeners(&self, route: &ResolvedRoute) -> Vec<&'a Listener> {
        self.gateway
            .spec
            .listeners
            .iter()
            .filter(|listener| Self::is_kind_allowed(listener))
            .filter(|listener| self.is_namespace_allowed(listener, route))
            .filter(|listener| listener.routes.selector.as_ref().map_or(true, |selector| selector_matches(selector, &route.meta.labels)))
            .collect()
    }

    fn is_allowed_by_route(&self, route: &ResolvedRoute) -> bool {
        let gateways = &route.spec.gateways;
        match gateways.allow {
            GatewayAllowType::All => true,
            GatewayAllowType::SameNamespace => self.gateway.meta.namespace == route.meta.namespace,
            GatewayAllowType::FromList => {
                let gateway_key = self.gateway.key();
                gateways.gateway_refs.iter().any(|reference| ResourceKey::from((reference, route.meta.namespace.as_str())) == gateway_key)
            }
        }
    }

    fn is_kind_allowed(listener: &Listener) -> bool {
        listener.routes.group == SERVICE_APIS_GROUP && listener.routes.kind == HTTP_ROUTE_KIND
    }

    fn is_namespace_allowed(&self, listener: &Listener, route: &ResolvedRoute) -> bool {
        match listener.routes.namespaces.from {
            RouteSelectType::All => true,
            RouteSelectType::Same => self.gateway.meta.namespace == route.meta.namespace,
            RouteSelectType::Selector => {
                debug!("Namespace selectors are not supported, listener on port {} of {} accepts no routes", listener.port, self.gateway.key());
                false
            }
        }
    }
}

/// Label selector semantics of the Kubernetes API. An empty selector matches everything.
pub fn selector_matches(selector: &LabelSelector, labels: &BTreeMap<String, String>) -> bool {
    let labels_match =
        selector.match_labels.as_ref().map_or(true, |match_labels| match_labels.iter().all(|(key, value)| labels.get(key) == Some(value)));
    labels_match && selector.match_expressions.iter().flatten().all(|requirement| requirement_matches(requirement, labels))
}

fn requirement_matches(requirement: &LabelSelectorRequirement, labels: &BTreeMap<String, String>) -> bool {
    let value = labels.get(&requirement.key);
    let values = requirement.values.as_deref().unwrap_or_default();
    match requirement.operator.as_str() {
        "In" => value.is_some_and(|value| values.contains(value)),
        "NotIn" => value.map_or(true, |value| !values.contains(value)),
        "Exists" => value.is_some(),
        "DoesNotExist" => value.is_none(),
        operator => {
            debug!("Unknown label selector operator {operator}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn empty_selector_matches_everything() {
        assert!(selector_matches(&LabelSelector::default(), &BTreeMap::new()));
        assert!(selector_matches(&LabelSelector::default(), &labels(&[("app", "web")])));
    }

    #[test]
    fn match_labels_are_a_subset() {
        let selector = LabelSelector { match_labels: Some(labels(&[("app", "web")])), ..Default::default() };
        assert!(selector_matches(&selector, &labels(&[("app", "web"), ("tier", "front")])));
        assert!(!selector_matches(&selector, &labels(&[("app", "db")])));
        assert!(!selector_matches(&selector, &BTreeMap::new()));
    }

    #[test]
    fn match_expressions() {
        let requirement = |operator: &str, values: Option<Vec<&str>>| LabelSelectorRequirement {
            key: "tier".to_owned(),
            operator: operator.to_owned(),
            values: values.map(|values| values.into_iter().map(str::to_owned).collect()),
        };
        let selector = |requirement| LabelSelector { match_expressions: Some(vec![requirement]), ..Default::default() };
        let front = labels(&[("tier", "front")]);
        let none = BTreeMap::new();

        assert!(selector_matches(&selector(requirement("In", Some(vec!["front", "back"]))), &front));
        assert!(!selector_matches(&selector(requirement("In", Some(vec!["back"]))), &front));
        assert!(selector_matches(&selector(requirement("NotIn", Some(vec!["back"]))), &front));
        assert!(selector_matches(&selector(requirement("NotIn", Some(vec!["back"]))), &none));
        assert!(selector_matches(&selector(requirement("Exists", None)), &front));
        assert!(!selector_matches(&selector(requirement("Exists", None)), &none));
        assert!(selector_matches(&selector(requirement("DoesNotExist", None)), &none));
        assert!(!selector_matches(&selector(requirement("Bogus", None)), &front));
    }
}
