//! Wire protocol selection.
//!
//! The protocol is fixed per client, so it is resolved into a
//! [`WireFormat`] once when the client is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::{wire, NvpError, Result, Value};

/// Request/response data format understood by PayPal's web services.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Form-encoded name-value pairs.
    #[default]
    #[serde(rename = "NV", alias = "NVP")]
    Nvp,
    /// JSON bodies.
    #[serde(rename = "JSON")]
    Json,
    /// XML bodies (recognised, not implemented).
    #[serde(rename = "XML")]
    Xml,
}

impl Protocol {
    /// Value of the `X-PAYPAL-*-DATA-FORMAT` headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nvp => "NV",
            Self::Json => "JSON",
            Self::Xml => "XML",
        }
    }

    /// MIME type of request bodies.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Nvp => "application/x-www-form-urlencoded",
            Self::Json => "application/json",
            Self::Xml => "text/xml",
        }
    }

    /// Resolve the codec for this protocol.
    ///
    /// # Errors
    ///
    /// [`NvpError::Unimplemented`] for XML.
    pub fn wire_format(&self) -> Result<&'static dyn WireFormat> {
        match self {
            Self::Nvp => Ok(&NvpFormat),
            Self::Json => Ok(&JsonFormat),
            Self::Xml => Err(NvpError::Unimplemented("XML wire format")),
        }
    }
}

impl FromStr for Protocol {
    type Err = NvpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NV" | "NVP" => Ok(Self::Nvp),
            "JSON" => Ok(Self::Json),
            "XML" => Ok(Self::Xml),
            _ => Err(NvpError::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts between a body string and a [`Value`] tree.
pub trait WireFormat: Send + Sync {
    /// Protocol implemented by this format.
    fn protocol(&self) -> Protocol;

    /// Decode a response body. The result is always a mapping.
    fn parse(&self, body: &str, config: &CodecConfig) -> Result<Value>;

    /// Encode a request tree.
    fn render(&self, tree: &Value, config: &CodecConfig) -> Result<String>;
}

/// Form-encoded name-value pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NvpFormat;

impl WireFormat for NvpFormat {
    fn protocol(&self) -> Protocol {
        Protocol::Nvp
    }

    fn parse(&self, body: &str, config: &CodecConfig) -> Result<Value> {
        wire::parse_with(body, config)
    }

    fn render(&self, tree: &Value, config: &CodecConfig) -> Result<String> {
        wire::render_with(tree, config)
    }
}

/// JSON bodies, mapped onto the same tree shape as NVP.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormat;

impl WireFormat for JsonFormat {
    fn protocol(&self) -> Protocol {
        Protocol::Json
    }

    fn parse(&self, body: &str, config: &CodecConfig) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_str(body)?;
        if !json.is_object() {
            return Err(NvpError::Serialization(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        let tree = Value::from_json(json);
        let depth = tree.depth();
        if depth > config.max_depth {
            return Err(NvpError::DepthLimitExceeded {
                depth,
                limit: config.max_depth,
            });
        }
        Ok(tree)
    }

    fn render(&self, tree: &Value, config: &CodecConfig) -> Result<String> {
        let depth = tree.depth();
        if depth > config.max_depth {
            return Err(NvpError::DepthLimitExceeded {
                depth,
                limit: config.max_depth,
            });
        }
        Ok(serde_json::to_string(tree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("NV".parse::<Protocol>().unwrap(), Protocol::Nvp);
        assert_eq!("nvp".parse::<Protocol>().unwrap(), Protocol::Nvp);
        assert_eq!(" json ".parse::<Protocol>().unwrap(), Protocol::Json);
        assert_eq!("XML".parse::<Protocol>().unwrap(), Protocol::Xml);

        let err = "SOAP".parse::<Protocol>().unwrap_err();
        assert!(matches!(err, NvpError::UnsupportedProtocol(ref s) if s == "SOAP"));
    }

    #[test]
    fn test_wire_format_resolution() {
        assert_eq!(Protocol::Nvp.wire_format().unwrap().protocol(), Protocol::Nvp);
        assert_eq!(Protocol::Json.wire_format().unwrap().protocol(), Protocol::Json);
        assert!(matches!(
            Protocol::Xml.wire_format(),
            Err(NvpError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_serde_names_match_header_values() {
        let json = serde_json::to_string(&Protocol::Nvp).unwrap();
        assert_eq!(json, "\"NV\"");
        let parsed: Protocol = serde_json::from_str("\"NVP\"").unwrap();
        assert_eq!(parsed, Protocol::Nvp);
    }

    #[test]
    fn test_json_format_roundtrip() {
        let config = CodecConfig::default();
        let body = r#"{"responseEnvelope":{"ack":"Success"},"error":[{"errorId":"580001"}]}"#;
        let tree = JsonFormat.parse(body, &config).unwrap();
        assert_eq!(tree.lookup_str("responseEnvelope.ack"), Some("Success"));
        assert_eq!(tree.lookup_str("error(0).errorId"), Some("580001"));

        let rendered = JsonFormat.render(&tree, &config).unwrap();
        let reparsed = JsonFormat.parse(&rendered, &config).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn test_json_format_keeps_member_order() {
        let config = CodecConfig::default();
        let body = r#"{"responseEnvelope":{"timestamp":"t","ack":"Success"},"payKey":"AP-1","error":[{"message":"m","errorId":"1"}]}"#;
        let tree = JsonFormat.parse(body, &config).unwrap();

        let names: Vec<&str> = tree.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["responseEnvelope", "payKey", "error"]);
        assert_eq!(JsonFormat.render(&tree, &config).unwrap(), body);

        let nvp = NvpFormat.render(&tree, &config).unwrap();
        assert!(nvp.starts_with("responseEnvelope.timestamp=t&responseEnvelope.ack=Success&payKey=AP-1"));
    }

    #[test]
    fn test_json_format_rejects_non_object() {
        let err = JsonFormat.parse("[1, 2]", &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, NvpError::Serialization(_)));
    }

    #[test]
    fn test_json_format_depth_limit() {
        let config = CodecConfig::new().with_max_depth(1);
        let err = JsonFormat.parse(r#"{"a":{"b":"c"}}"#, &config).unwrap_err();
        assert!(matches!(err, NvpError::DepthLimitExceeded { depth: 2, limit: 1 }));
    }

    #[test]
    fn test_nvp_format_matches_wire_module() {
        let config = CodecConfig::default();
        let tree = NvpFormat.parse("a.b=1", &config).unwrap();
        assert_eq!(NvpFormat.render(&tree, &config).unwrap(), "a.b=1");
    }
}
