//! Input resources of the service APIs this controller translates.
pub mod v1alpha1;
