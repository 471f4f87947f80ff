//! Flat key/value pairs to a hierarchical [`Value`] tree.
//!
//! # Example
//!
//! ```
//! use paynvp_lib::{decode, FlatEntry};
//!
//! let tree = decode(&[
//!     FlatEntry::single("responseEnvelope.ack", "Success"),
//!     FlatEntry::single("error(0).parameter(1)", "currencyCode"),
//! ])?;
//!
//! assert_eq!(tree.lookup_str("responseEnvelope.ack"), Some("Success"));
//! assert_eq!(tree.lookup_str("error(0).parameter(1)"), Some("currencyCode"));
//! # Ok::<(), paynvp_lib::NvpError>(())
//! ```

use crate::config::{CodecConfig, LeafPolicy};
use crate::{FlatEntry, Result, Value};

/// Reusable decoder bound to a [`CodecConfig`].
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    /// Create a decoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Build a tree from flat entries.
    ///
    /// The root is always a mapping. Entries sharing a prefix are merged;
    /// when two entries address the same full path the later one wins, and
    /// a node of the wrong shape for a later key is replaced.
    ///
    /// # Errors
    ///
    /// [`NvpError::DepthLimitExceeded`](crate::NvpError::DepthLimitExceeded)
    /// when a key has more path components than `max_depth`. Nothing else
    /// fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(entries = entries.len())))]
    pub fn decode(&self, entries: &[FlatEntry]) -> Result<Value> {
        let mut root = Value::mapping();
        for entry in entries {
            #[cfg(feature = "tracing")]
            if self.config.trace {
                tracing::debug!(key = %entry.key, values = entry.values.len(), "decode entry");
            }

            let slot = root.slot_mut(&entry.key, self.config.max_depth)?;
            *slot = self.leaf(&entry.values);
        }
        Ok(root)
    }

    fn leaf(&self, values: &[String]) -> Value {
        match (values, self.config.leaf_policy) {
            ([only], LeafPolicy::CollapseSingletons) => Value::Scalar(only.clone()),
            _ => Value::MultiValue(values.to_vec()),
        }
    }
}

/// Decode with the default configuration.
pub fn decode(entries: &[FlatEntry]) -> Result<Value> {
    Decoder::default().decode(entries)
}

/// Decode with an explicit configuration.
pub fn decode_with(entries: &[FlatEntry], config: &CodecConfig) -> Result<Value> {
    Decoder::new(config.clone()).decode(entries)
}
