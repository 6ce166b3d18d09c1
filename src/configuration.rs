use serde::Deserialize;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    constants::{DEFAULT_CONTROLLER_NAME, DEFAULT_DOMAIN_SUFFIX},
    translator::TranslatorOptions,
    Result,
};

fn default_controller_name() -> String {
    DEFAULT_CONTROLLER_NAME.to_owned()
}

fn default_domain_suffix() -> String {
    DEFAULT_DOMAIN_SUFFIX.to_owned()
}

#[derive(Clone, Debug, TypedBuilder, Deserialize)]
pub struct Configuration {
    #[builder(default = default_controller_name(), setter(into))]
    #[serde(default = "default_controller_name")]
    pub controller_name: String,
    #[builder(default = default_domain_suffix(), setter(into))]
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
    /// Directory of the log file, the working directory when unset.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub log_directory: Option<String>,
}

#[derive(Error, Debug)]
enum ConfigurationError {
    #[error("controller name must be not empty")]
    ControllerName,
    #[error("domain suffix must be not empty")]
    DomainSuffix,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.controller_name.is_empty() {
            return Err(ConfigurationError::ControllerName.into());
        }
        if self.domain_suffix.is_empty() {
            return Err(ConfigurationError::DomainSuffix.into());
        }
        Ok(())
    }

    pub fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions::builder().controller_name(self.controller_name.clone()).domain_suffix(self.domain_suffix.clone()).build()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let configuration: Configuration = serde_yaml::from_str("log_directory: /var/log\n").unwrap();
        assert_eq!(configuration.controller_name, DEFAULT_CONTROLLER_NAME);
        assert_eq!(configuration.domain_suffix, DEFAULT_DOMAIN_SUFFIX);
        assert_eq!(configuration.log_directory.as_deref(), Some("/var/log"));
        assert!(configuration.validate().is_ok());
    }

    #[test]
    fn empty_values_are_rejected() {
        let configuration = Configuration::builder().controller_name("").build();
        assert!(configuration.validate().is_err());
        let configuration = Configuration::builder().domain_suffix("").build();
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn options_follow_configuration() {
        let configuration = Configuration::builder().controller_name("example.com/controller").domain_suffix("mesh.local").build();
        let options = configuration.translator_options();
        assert_eq!(options.controller_name, "example.com/controller");
        assert_eq!(options.domain_suffix, "mesh.local");
    }
}
