use std::collections::HashMap;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub forms: FormsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Maximum number of forms awaiting a response on one connection.
    pub max_pending: usize,
    pub on_send_failure: SendFailurePolicy,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            max_pending: 10,
            on_send_failure: SendFailurePolicy::Propagate,
        }
    }
}

impl FormsConfig {
    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pending == 0 {
            return Err(ConfigError::Message(
                "forms.max_pending must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// What `send` does when the transport refuses a form request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendFailurePolicy {
    /// Return the error and forget the form.
    #[default]
    Propagate,
    /// Log the error and keep the form pending.
    Ignore,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("forms.max_pending", 10)?
            .set_default("forms.on_send_failure", "propagate")?
            .add_source(File::with_name("config/settings").required(false));

        // Explicit overrides replace the process environment so tests stay isolated
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Format: APP_FORMS__MAX_PENDING, APP_FORMS__ON_SEND_FAILURE
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.forms.validate()?;
        Ok(config)
    }
}
