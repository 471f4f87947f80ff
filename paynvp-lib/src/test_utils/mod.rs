//! Test utilities for paynvp.
//!
//! This module provides:
//! - Canned PayPal response bodies and flat entries
//! - A mock transport that records requests and replays queued responses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paynvp_lib::test_utils::{fixtures, MockTransport};
//! use paynvp_lib::{Client, ServiceConfig};
//!
//! let transport = MockTransport::new();
//! transport.respond_with(fixtures::PAY_SUCCESS_BODY);
//!
//! let client = Client::new(transport, ServiceConfig::sandbox())?;
//! let response = client.call("AdaptivePayments", "Pay", &client.request()).await?;
//! assert!(response.is_success());
//! ```

pub mod fixtures;
mod mock_transport;

pub use mock_transport::MockTransport;
