pub mod gatewayclasses;
pub mod gateways;
pub mod httproutes;

pub(crate) fn default_group() -> String {
    crate::constants::SERVICE_APIS_GROUP.to_owned()
}
