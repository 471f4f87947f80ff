//! Transport seam and service client.
//!
//! This crate does not ship an HTTP stack. Callers implement
//! [`NvpTransport`] on top of whatever client they already use and add
//! their own credential headers; [`Client`] takes care of URLs, format
//! headers, body rendering and response decoding.

use async_trait::async_trait;

use crate::config::ServiceConfig;
use crate::protocol::{Protocol, WireFormat};
use crate::{NvpError, NvpResponse, Request, Result};

/// Header announcing the request body format.
pub const REQUEST_FORMAT_HEADER: &str = "X-PAYPAL-REQUEST-DATA-FORMAT";

/// Header selecting the response body format.
pub const RESPONSE_FORMAT_HEADER: &str = "X-PAYPAL-RESPONSE-DATA-FORMAT";

/// A fully rendered HTTP POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Rendered body.
    pub body: String,
}

impl HttpRequest {
    /// Value of the first header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Sends a rendered request and returns the raw response body.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait NvpTransport {
    /// Perform the POST. Non-2xx responses that still carry a body should
    /// return that body; PayPal reports failures inside it.
    async fn post(&self, request: HttpRequest) -> Result<String>;
}

/// Client for PayPal web-service APIs over an injected transport.
pub struct Client<T> {
    transport: T,
    config: ServiceConfig,
    format: &'static dyn WireFormat,
}

impl<T: NvpTransport> Client<T> {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Invalid configuration, or a protocol without a wire format (XML).
    pub fn new(transport: T, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let format = config.protocol.wire_format()?;
        Ok(Self {
            transport,
            config,
            format,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Protocol used for bodies.
    pub fn protocol(&self) -> Protocol {
        self.format.protocol()
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a request with the configured envelope.
    pub fn request(&self) -> Request {
        Request::with_error_language(self.config.error_language.clone())
    }

    /// Format headers sent with every call.
    pub fn headers(&self) -> Vec<(String, String)> {
        let protocol = self.protocol().as_str().to_string();
        vec![
            (REQUEST_FORMAT_HEADER.to_string(), protocol.clone()),
            (RESPONSE_FORMAT_HEADER.to_string(), protocol),
            (
                "Content-Type".to_string(),
                self.protocol().content_type().to_string(),
            ),
        ]
    }

    /// Render the POST for `{endpoint}/{api_group}/{api_action}`.
    pub fn build(&self, api_group: &str, api_action: &str, request: &Request) -> Result<HttpRequest> {
        if api_group.is_empty() || api_action.is_empty() {
            return Err(NvpError::invalid_data(
                "api_action",
                "API group and action cannot be empty",
            ));
        }

        Ok(HttpRequest {
            url: format!("{}/{}/{}", self.config.endpoint(), api_group, api_action),
            headers: self.headers(),
            body: request.render(self.format, &self.config.codec)?,
        })
    }

    /// Send a request and decode the response.
    ///
    /// Transport failures are returned as [`NvpError::Transport`] prefixed
    /// with the action name. A decoded response is returned even when its
    /// ack reports failure; check [`NvpResponse::is_success`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, request), fields(protocol = %self.protocol())))]
    pub async fn call(
        &self,
        api_group: &str,
        api_action: &str,
        request: &Request,
    ) -> Result<NvpResponse> {
        let http = self.build(api_group, api_action, request)?;
        let body = self
            .transport
            .post(http)
            .await
            .map_err(|err| map_transport_error(api_action, err))?;

        let response = NvpResponse::from_body(&body, self.format, &self.config.codec)?;

        #[cfg(feature = "tracing")]
        if !response.is_success() {
            tracing::warn!(
                ack = ?response.ack(),
                errors = response.errors().len(),
                "{api_group}/{api_action} did not succeed"
            );
        }

        Ok(response)
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("protocol", &self.format.protocol())
            .finish_non_exhaustive()
    }
}

fn map_transport_error(label: &str, err: NvpError) -> NvpError {
    match err {
        NvpError::Transport(msg) => NvpError::Transport(format!("{label}: {msg}")),
        _ => err,
    }
}
