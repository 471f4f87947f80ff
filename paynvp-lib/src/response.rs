//! Response unwrapping.
//!
//! Every PayPal web-service response carries a `responseEnvelope` with an
//! `ack` and, on failure, an `error(n)` list. [`NvpResponse`] reads those
//! well-known paths from a decoded tree; everything else is reached through
//! [`NvpResponse::lookup`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use crate::config::{CodecConfig, Environment};
use crate::protocol::WireFormat;
use crate::{Result, Value};

/// Outcome reported in `responseEnvelope.ack`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ack {
    /// `Success`
    Success,
    /// `SuccessWithWarning`
    SuccessWithWarning,
    /// `Warning`
    Warning,
    /// `Failure`
    Failure,
    /// `FailureWithWarning`
    FailureWithWarning,
    /// Any value PayPal may add later.
    Other(String),
}

impl Ack {
    /// Check if the call succeeded, possibly with warnings.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::SuccessWithWarning)
    }

    /// Check if the call failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure | Self::FailureWithWarning)
    }

    /// Canonical PayPal spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::SuccessWithWarning => "SuccessWithWarning",
            Self::Warning => "Warning",
            Self::Failure => "Failure",
            Self::FailureWithWarning => "FailureWithWarning",
            Self::Other(raw) => raw,
        }
    }
}

impl FromStr for Ack {
    type Err = std::convert::Infallible;

    /// Matching is case-insensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "SUCCESS" => Self::Success,
            "SUCCESSWITHWARNING" => Self::SuccessWithWarning,
            "WARNING" => Self::Warning,
            "FAILURE" => Self::Failure,
            "FAILUREWITHWARNING" => Self::FailureWithWarning,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `error(n)` list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Position in the error list.
    pub index: u64,
    /// `errorId`
    pub error_id: Option<String>,
    /// `domain`
    pub domain: Option<String>,
    /// `subdomain`
    pub subdomain: Option<String>,
    /// `severity`
    pub severity: Option<String>,
    /// `category`
    pub category: Option<String>,
    /// `message`
    pub message: Option<String>,
    /// `parameter(n)` values in index order.
    pub parameters: Vec<String>,
}

impl ErrorDetail {
    fn from_value(index: u64, value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        let parameters = value
            .get("parameter")
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.values()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            index,
            error_id: field("errorId"),
            domain: field("domain"),
            subdomain: field("subdomain"),
            severity: field("severity"),
            category: field("category"),
            message: field("message"),
            parameters,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.error_id.as_deref().unwrap_or("?"),
            self.message.as_deref().unwrap_or("no message")
        )
    }
}

/// A decoded PayPal response.
#[derive(Clone, Debug, PartialEq)]
pub struct NvpResponse {
    tree: Value,
    raw: Option<String>,
}

impl NvpResponse {
    /// Wrap an already decoded tree.
    pub fn new(tree: Value) -> Self {
        Self { tree, raw: None }
    }

    /// Decode a body with the given format, keeping the raw text.
    pub fn from_body(body: &str, format: &dyn WireFormat, config: &CodecConfig) -> Result<Self> {
        let tree = format.parse(body, config)?;
        Ok(Self {
            tree,
            raw: Some(body.to_string()),
        })
    }

    /// The decoded tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Take ownership of the decoded tree.
    pub fn into_tree(self) -> Value {
        self.tree
    }

    /// The undecoded body, when built from one.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Node at a flat key path.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.tree.lookup(path)
    }

    /// Scalar at a flat key path.
    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.tree.lookup_str(path)
    }

    /// The `responseEnvelope` group.
    pub fn envelope(&self) -> Option<&Value> {
        self.tree.get("responseEnvelope")
    }

    /// Parsed `responseEnvelope.ack`.
    pub fn ack(&self) -> Option<Ack> {
        self.envelope()?
            .get("ack")?
            .as_str()?
            .parse()
            .ok()
    }

    /// True only when an ack is present and reports success.
    pub fn is_success(&self) -> bool {
        self.ack().is_some_and(|ack| ack.is_success())
    }

    /// `responseEnvelope.timestamp`, when present and RFC 3339 formatted.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.lookup_str("responseEnvelope.timestamp")?;
        DateTime::parse_from_rfc3339(raw).ok()
    }

    /// `responseEnvelope.correlationId`.
    pub fn correlation_id(&self) -> Option<&str> {
        self.lookup_str("responseEnvelope.correlationId")
    }

    /// `responseEnvelope.build`.
    pub fn build(&self) -> Option<&str> {
        self.lookup_str("responseEnvelope.build")
    }

    /// Entries of the `error(n)` list in ascending index order.
    ///
    /// Gaps in the index space are tolerated.
    pub fn errors(&self) -> Vec<ErrorDetail> {
        let Some(seq) = self.tree.get("error").and_then(Value::as_sequence) else {
            return Vec::new();
        };
        seq.iter()
            .map(|(index, value)| ErrorDetail::from_value(*index, value))
            .collect()
    }

    /// Approval redirect for an Adaptive Payments `payKey`, if present.
    pub fn pay_approval_url(&self, environment: Environment) -> Option<String> {
        let pay_key = self.lookup_str("payKey")?;
        Some(format!(
            "{}/cgi-bin/webscr?cmd=_ap-payment&paykey={}",
            environment.site_url(),
            pay_key
        ))
    }
}

impl From<Value> for NvpResponse {
    fn from(tree: Value) -> Self {
        Self::new(tree)
    }
}
