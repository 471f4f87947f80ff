//! Request assembly.
//!
//! A [`Request`] is a [`Value`] mapping written through flat key paths, so
//! request-building code can use the same spelling PayPal documents:
//!
//! ```
//! use paynvp_lib::{Request, Value};
//!
//! let mut request = Request::with_error_language("en_US");
//! request
//!     .set("actionType", "PAY")?
//!     .set("currencyCode", "USD")?
//!     .push(
//!         "receiverList.receiver",
//!         Value::mapping_from([
//!             ("email", Value::from("seller@example.com")),
//!             ("amount", Value::from("10.00")),
//!         ]),
//!     )?;
//!
//! assert_eq!(
//!     request.params().lookup_str("receiverList.receiver(0).email"),
//!     Some("seller@example.com")
//! );
//! # Ok::<(), paynvp_lib::NvpError>(())
//! ```

use crate::config::{CodecConfig, DEFAULT_MAX_DEPTH};
use crate::protocol::WireFormat;
use crate::value::Sequence;
use crate::{Result, Value};

/// Path of the error language field in every request envelope.
pub const ERROR_LANGUAGE_PATH: &str = "requestEnvelope.errorLanguage";

/// Parameters of a single API call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    params: Value,
}

impl Request {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request whose envelope carries `language`.
    pub fn with_error_language(language: impl Into<String>) -> Self {
        let mut params = Value::mapping();
        if let Ok(slot) = params.slot_mut(ERROR_LANGUAGE_PATH, DEFAULT_MAX_DEPTH) {
            *slot = Value::Scalar(language.into());
        }
        Self { params }
    }

    /// Set the value at `path`, replacing whatever was there.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        *self.params.slot_mut(path, DEFAULT_MAX_DEPTH)? = value.into();
        Ok(self)
    }

    /// Set the value at `path` only if nothing is there yet.
    pub fn set_default(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self> {
        if self.params.lookup(path).is_none() {
            self.set(path, value)?;
        }
        Ok(self)
    }

    /// Append `item` to the list at `path`, after its highest index.
    ///
    /// A missing node, or one that is not a list, starts a new list at 0.
    pub fn push(&mut self, path: &str, item: impl Into<Value>) -> Result<&mut Self> {
        let slot = self.params.slot_mut(path, DEFAULT_MAX_DEPTH - 1)?;
        if !slot.is_sequence() {
            *slot = Value::sequence();
        }
        if let Value::Sequence(seq) = slot {
            let next = seq.keys().next_back().map_or(0, |last| last + 1);
            seq.insert(next, item.into());
        }
        Ok(self)
    }

    /// Replace the list at `path` with `items`, indexed from zero.
    pub fn list<I>(&mut self, path: &str, items: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let seq: Sequence = (0u64..).zip(items.into_iter().map(Into::into)).collect();
        self.set(path, Value::Sequence(seq))
    }

    /// The assembled parameter tree.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Take ownership of the parameter tree.
    pub fn into_value(self) -> Value {
        self.params
    }

    /// Render the request body with the given format.
    pub fn render(&self, format: &dyn WireFormat, config: &CodecConfig) -> Result<String> {
        format.render(&self.params, config)
    }
}

impl From<Value> for Request {
    /// Non-mapping roots are wrapped as an empty request.
    fn from(params: Value) -> Self {
        if params.is_mapping() {
            Self { params }
        } else {
            Self::default()
        }
    }
}
