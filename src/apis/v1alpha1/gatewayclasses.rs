use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A class of gateways handled by a single controller implementation.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[kube(group = "networking.x-k8s.io", version = "v1alpha1", kind = "GatewayClass", plural = "gatewayclasses")]
#[serde(rename_all = "camelCase")]
pub struct GatewayClassSpec {
    /// Identity of the controller owning gateways of this class, e.g. `istio.io/gateway-controller`.
    pub controller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_ref: Option<GatewayClassParametersRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayClassParametersRef {
    pub group: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}
