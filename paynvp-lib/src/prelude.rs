//! Prelude module for convenient imports.
//!
//! ```rust
//! use paynvp_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Codec: `decode`, `encode`, `FlatEntry`, `Value`
//! - Error types: `NvpError`, `NvpErrorCode`, `Result`
//! - Configuration: `CodecConfig`, `ServiceConfig`, `Environment`
//! - Client: `Client`, `NvpTransport`, `Request`, `NvpResponse`

// Codec
pub use crate::decode::{decode, decode_with, Decoder};
pub use crate::encode::{encode, encode_with, Encoder};
pub use crate::key::IndexStyle;
pub use crate::value::Value;
pub use crate::FlatEntry;

// Error handling
pub use crate::errors::{NvpError, NvpErrorCode};
pub use crate::Result;

// Configuration
pub use crate::config::{CodecConfig, Environment, LeafPolicy, ServiceConfig};

// Protocols
pub use crate::protocol::{JsonFormat, NvpFormat, Protocol, WireFormat};

// Client
pub use crate::request::Request;
pub use crate::response::{Ack, ErrorDetail, NvpResponse};
pub use crate::transport::{Client, HttpRequest, NvpTransport};
