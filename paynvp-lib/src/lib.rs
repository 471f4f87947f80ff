//! PayPal Name-Value Pair (NVP) library.
//!
//! PayPal's NVP format is a query string whose keys carry hierarchy:
//! `responseEnvelope.ack`, `error(0).parameter(1)`,
//! `receiverList.receiver[0].email`. This crate converts between those flat
//! pairs and a nested [`Value`] tree, and provides thin helpers around that
//! codec for assembling requests and reading responses.
//!
//! The codec itself is stateless and synchronous. HTTP is left to callers
//! through the [`NvpTransport`] trait.
//!
//! # Features
//!
//! - **Codec**: [`decode`] / [`encode`] between [`FlatEntry`] lists and trees
//! - **Wire**: [`wire::parse`] / [`wire::render`] for form-encoded bodies
//! - **Protocols**: NVP and JSON bodies behind one [`WireFormat`] seam
//! - **Responses**: ack, timestamp and error list accessors on [`NvpResponse`]
//!
//! # Example
//!
//! ```
//! use paynvp_lib::{wire, Value};
//!
//! let body = "responseEnvelope.ack=Success&receiverList.receiver(0).email=a%40x.com";
//! let tree = wire::parse(body)?;
//! assert_eq!(tree.lookup_str("receiverList.receiver(0).email"), Some("a@x.com"));
//!
//! let mut request = Value::mapping();
//! request.insert_path("receiverList.receiver(0).amount", "10.00".into())?;
//! assert_eq!(wire::render(&request)?, "receiverList.receiver%280%29.amount=10.00");
//! # Ok::<(), paynvp_lib::NvpError>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
pub mod decode;
pub mod encode;
pub mod errors;
pub mod key;
pub mod prelude;
pub mod protocol;
pub mod request;
pub mod response;
pub mod transport;
pub mod value;
pub mod wire;

/// Canned PayPal bodies and a mock transport.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{CodecConfig, Environment, LeafPolicy, ServiceConfig};
pub use decode::{decode, decode_with, Decoder};
pub use encode::{encode, encode_with, Encoder};
pub use errors::{NvpError, NvpErrorCode};
pub use protocol::{Protocol, WireFormat};
pub use request::Request;
pub use response::{Ack, ErrorDetail, NvpResponse};
pub use transport::{Client, HttpRequest, NvpTransport};
pub use value::Value;

/// Common result alias for NVP operations.
pub type Result<T> = std::result::Result<T, NvpError>;

/// A flat key with its raw values.
///
/// A query string may repeat a key, so an entry always carries a list; a
/// key seen once has a one-element list.
///
/// # Example
///
/// ```
/// use paynvp_lib::FlatEntry;
///
/// let entry = FlatEntry::single("responseEnvelope.ack", "Success");
/// assert_eq!(entry.value(), Some("Success"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatEntry {
    /// Flat key in NVP key grammar.
    pub key: String,
    /// Raw values in arrival order.
    pub values: Vec<String>,
}

impl FlatEntry {
    /// Create an entry with any number of values.
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Create an entry with exactly one value.
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: vec![value.into()],
        }
    }

    /// First value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Check if the key carries exactly one value.
    pub fn is_single(&self) -> bool {
        self.values.len() == 1
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for FlatEntry {
    fn from((key, value): (K, V)) -> Self {
        Self::single(key, value)
    }
}

impl std::fmt::Display for FlatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.values.join(","))
    }
}
