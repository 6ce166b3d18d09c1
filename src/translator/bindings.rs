use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::debug;

use super::RouteListenerMatcher;
use crate::{
    apis::v1alpha1::{gateways::GatewaySpec, httproutes::HTTPRouteSpec},
    common::ResourceKey,
    store::{Config, ConfigMeta, ConfigSpec, ConfigStore, Kind, StoreError},
};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGateway {
    pub meta: ConfigMeta,
    pub spec: GatewaySpec,
}

impl ResolvedGateway {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::namespaced(&self.meta.name, &self.meta.namespace)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRoute {
    pub meta: ConfigMeta,
    pub spec: HTTPRouteSpec,
}

impl ResolvedRoute {
    pub fn key(&self) -> ResourceKey {
        ResourceKey { kind: Kind::HttpRoute.kind().to_owned(), ..ResourceKey::namespaced(&self.meta.name, &self.meta.namespace) }
    }
}

/// Gateways owned by this controller together with the routes bound to each of them.
///
/// Gateways and routes keep the order in which the store listed them.
#[derive(Debug, Default)]
pub struct Bindings {
    gateways: Vec<ResolvedGateway>,
    routes: Vec<ResolvedRoute>,
    bound_routes: BTreeMap<ResourceKey, BTreeSet<usize>>,
}

impl Bindings {
    pub fn gateways(&self) -> &[ResolvedGateway] {
        &self.gateways
    }

    pub fn routes_for<'a>(&'a self, gateway: &ResourceKey) -> impl Iterator<Item = &'a ResolvedRoute> + 'a {
        self.bound_routes.get(gateway).into_iter().flatten().map(move |index| &self.routes[*index])
    }

    /// Every bound route once, with all the gateways it is bound to.
    pub fn route_attachments(&self) -> Vec<(&ResolvedRoute, Vec<&ResolvedGateway>)> {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(index, route)| {
                let gateways = self
                    .gateways
                    .iter()
                    .filter(|gateway| self.bound_routes.get(&gateway.key()).is_some_and(|routes| routes.contains(&index)))
                    .collect::<Vec<_>>();
                (!gateways.is_empty()).then_some((route, gateways))
            })
            .collect()
    }
}

/// Joins gateway classes, gateways and routes listed from a [`ConfigStore`].
pub struct BindingResolver<'a, S> {
    store: &'a S,
    controller_name: &'a str,
}

impl<'a, S: ConfigStore> BindingResolver<'a, S> {
    pub fn new(store: &'a S, controller_name: &'a str) -> Self {
        Self { store, controller_name }
    }

    pub fn resolve(&self, namespace: &str) -> Result<Bindings, StoreError> {
        let gateway_classes = self.controlled_gateway_classes()?;
        if gateway_classes.is_empty() {
            debug!("No gateway class is controlled by {}", self.controller_name);
            return Ok(Bindings::default());
        }

        let gateways = self.gateways(namespace, &gateway_classes)?;
        if gateways.is_empty() {
            debug!("No gateways of classes {} in namespace {namespace:?}", gateway_classes.iter().join(", "));
            return Ok(Bindings::default());
        }

        let routes = self.routes(namespace)?;
        let mut bound_routes = BTreeMap::new();
        for gateway in &gateways {
            let matcher = RouteListenerMatcher::new(gateway);
            let bound = routes.iter().enumerate().filter(|(_, route)| matcher.is_bound(route)).map(|(index, _)| index).collect::<BTreeSet<_>>();
            if !bound.is_empty() {
                bound_routes.insert(gateway.key(), bound);
            }
        }

        Ok(Bindings { gateways, routes, bound_routes })
    }

    fn controlled_gateway_classes(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .store
            .list(Kind::GatewayClass, "")?
            .into_iter()
            .filter_map(|Config { meta, spec }| match spec {
                ConfigSpec::GatewayClass(spec) if spec.controller == self.controller_name => Some(meta.name),
                ConfigSpec::GatewayClass(spec) => {
                    debug!("Skipping gateway class {} controlled by {}", meta.name, spec.controller);
                    None
                }
                _ => None,
            })
            .collect())
    }

    fn gateways(&self, namespace: &str, gateway_classes: &BTreeSet<String>) -> Result<Vec<ResolvedGateway>, StoreError> {
        Ok(self
            .store
            .list(Kind::KubernetesGateway, namespace)?
            .into_iter()
            .filter_map(|Config { meta, spec }| match spec {
                ConfigSpec::KubernetesGateway(spec) if gateway_classes.contains(&spec.gateway_class_name) => Some(ResolvedGateway { meta, spec }),
                ConfigSpec::KubernetesGateway(spec) => {
                    debug!("Skipping gateway {}.{} with foreign class {}", meta.namespace, meta.name, spec.gateway_class_name);
                    None
                }
                _ => None,
            })
            .collect())
    }

    fn routes(&self, namespace: &str) -> Result<Vec<ResolvedRoute>, StoreError> {
        Ok(self
            .store
            .list(Kind::HttpRoute, namespace)?
            .into_iter()
            .filter_map(|Config { meta, spec }| match spec {
                ConfigSpec::HttpRoute(spec) => Some(ResolvedRoute { meta, spec }),
                _ => None,
            })
            .collect())
    }
}
