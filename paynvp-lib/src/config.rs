//! Configuration types for the codec and the service client.

use serde::{Deserialize, Serialize};

use crate::key::IndexStyle;
use crate::protocol::Protocol;
use crate::{NvpError, Result};

/// Default bound on path components per key and on tree depth.
///
/// PayPal keys rarely exceed five levels; the bound only exists to keep
/// hostile input from exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default `requestEnvelope.errorLanguage`.
pub const DEFAULT_ERROR_LANGUAGE: &str = "en_US";

/// How a key carrying exactly one raw value is stored on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafPolicy {
    /// One value becomes [`Value::Scalar`](crate::Value::Scalar); more
    /// become [`Value::MultiValue`](crate::Value::MultiValue).
    #[default]
    CollapseSingletons,
    /// Every leaf is a [`Value::MultiValue`](crate::Value::MultiValue), so
    /// re-encoding reproduces the input exactly.
    PreserveCollections,
}

/// Codec settings shared by the decoder and encoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum number of path components per key, and maximum tree depth
    /// accepted by the encoder.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Leaf representation on decode.
    #[serde(default)]
    pub leaf_policy: LeafPolicy,

    /// Marker style used when producing keys.
    #[serde(default)]
    pub index_style: IndexStyle,

    /// Emit per-call `tracing` events (requires the `tracing` feature).
    #[serde(default)]
    pub trace: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            leaf_policy: LeafPolicy::default(),
            index_style: IndexStyle::default(),
            trace: false,
        }
    }
}

impl CodecConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the leaf policy.
    pub fn with_leaf_policy(mut self, policy: LeafPolicy) -> Self {
        self.leaf_policy = policy;
        self
    }

    /// Set the marker style used on encode.
    pub fn with_index_style(mut self, style: IndexStyle) -> Self {
        self.index_style = style;
        self
    }

    /// Enable or disable tracing for calls made with this configuration.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// PayPal environment selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox for development.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl Environment {
    /// Base URL of the web-services endpoint.
    pub fn service_endpoint(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://svcs.sandbox.paypal.com",
            Self::Production => "https://svcs.paypal.com",
        }
    }

    /// Base URL of the customer-facing site (approval redirects).
    pub fn site_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://www.sandbox.paypal.com",
            Self::Production => "https://www.paypal.com",
        }
    }
}

/// Settings for a [`Client`](crate::transport::Client).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Target environment.
    #[serde(default)]
    pub environment: Environment,

    /// Wire format for request and response bodies.
    #[serde(default)]
    pub protocol: Protocol,

    /// Overrides the environment's endpoint when set.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Value of `requestEnvelope.errorLanguage` added to every request.
    #[serde(default = "default_error_language")]
    pub error_language: String,

    /// Codec settings.
    #[serde(default)]
    pub codec: CodecConfig,
}

fn default_error_language() -> String {
    DEFAULT_ERROR_LANGUAGE.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            protocol: Protocol::default(),
            endpoint: None,
            error_language: default_error_language(),
            codec: CodecConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration for the given environment.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Sandbox preset.
    pub fn sandbox() -> Self {
        Self::new(Environment::Sandbox)
    }

    /// Production preset.
    pub fn production() -> Self {
        Self::new(Environment::Production)
    }

    /// Load a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request envelope error language.
    pub fn with_error_language(mut self, language: impl Into<String>) -> Self {
        self.error_language = language.into();
        self
    }

    /// Set the codec configuration.
    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }

    /// Endpoint requests are sent to, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(self.environment.service_endpoint())
            .trim_end_matches('/')
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.endpoint, Some(endpoint) if endpoint.trim().is_empty()) {
            return Err(NvpError::invalid_data(
                "endpoint",
                "endpoint override cannot be empty",
            ));
        }
        if self.codec.max_depth == 0 {
            return Err(NvpError::invalid_data(
                "codec.max_depth",
                "depth limit must be at least 1",
            ));
        }
        Ok(())
    }
}
