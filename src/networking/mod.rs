//! Mesh-native routing payloads produced by the translator.
//!
//! Field names and enum spellings follow the `networking.istio.io/v1alpha3` schema, downstream
//! consumers match on them.
mod gateway;
mod virtual_service;

pub use gateway::{Gateway, Port, Server, ServerTlsSettings, TlsMode};
pub use virtual_service::{
    Destination, HTTPMatchRequest, HTTPRoute, HTTPRouteDestination, HeaderOperations, Headers, PortSelector, StringMatch, VirtualService,
};
