//! Form-encoded NVP bodies.
//!
//! [`tokenize`] and [`join`] handle percent-coding and key repetition;
//! [`parse`] and [`render`] compose them with the codec.

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::config::CodecConfig;
use crate::{decode, encode, FlatEntry, Result, Value};

/// Split a body into entries, percent-decoding keys and values.
///
/// Repeated keys are grouped into one entry in first-seen order. Blank
/// values are kept; empty `&&` pieces are skipped.
pub fn tokenize(body: &str) -> Vec<FlatEntry> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        grouped
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    grouped
        .into_iter()
        .map(|(key, values)| FlatEntry::new(key, values))
        .collect()
}

/// Join entries into a body, repeating the key for every value.
pub fn join(entries: &[FlatEntry]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for entry in entries {
        for value in &entry.values {
            serializer.append_pair(&entry.key, value);
        }
    }
    serializer.finish()
}

/// Decode a form-encoded body with the default configuration.
pub fn parse(body: &str) -> Result<Value> {
    decode::decode(&tokenize(body))
}

/// Decode a form-encoded body.
pub fn parse_with(body: &str, config: &CodecConfig) -> Result<Value> {
    decode::decode_with(&tokenize(body), config)
}

/// Encode a tree as a form-encoded body with the default configuration.
pub fn render(tree: &Value) -> Result<String> {
    Ok(join(&encode::encode(tree)?))
}

/// Encode a tree as a form-encoded body.
pub fn render_with(tree: &Value, config: &CodecConfig) -> Result<String> {
    Ok(join(&encode::encode_with(tree, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_percent_decoding() {
        let entries = tokenize("memo=Thanks+for+the+tea%21&receiverList.receiver%280%29.email=a%40x.com");
        assert_eq!(
            entries,
            vec![
                FlatEntry::single("memo", "Thanks for the tea!"),
                FlatEntry::single("receiverList.receiver(0).email", "a@x.com"),
            ]
        );
    }

    #[test]
    fn test_tokenize_groups_repeated_keys() {
        let entries = tokenize("tag=a&ack=Success&tag=b");
        assert_eq!(
            entries,
            vec![
                FlatEntry::new("tag", vec!["a".into(), "b".into()]),
                FlatEntry::single("ack", "Success"),
            ]
        );
    }

    #[test]
    fn test_tokenize_blank_values_and_empty_pieces() {
        let entries = tokenize("a=&&b=1");
        assert_eq!(
            entries,
            vec![FlatEntry::single("a", ""), FlatEntry::single("b", "1")]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_join_encodes_and_repeats() {
        let body = join(&[
            FlatEntry::single("cancelUrl", "http://x/?a=1&b=2"),
            FlatEntry::new("tag", vec!["a b".into(), "c".into()]),
        ]);
        assert_eq!(body, "cancelUrl=http%3A%2F%2Fx%2F%3Fa%3D1%26b%3D2&tag=a+b&tag=c");
    }

    #[test]
    fn test_parse_and_render() {
        let tree = parse("responseEnvelope.ack=Success&error%280%29.message=bad").unwrap();
        assert_eq!(tree.lookup_str("responseEnvelope.ack"), Some("Success"));
        assert_eq!(tree.lookup_str("error(0).message"), Some("bad"));

        assert_eq!(
            render(&tree).unwrap(),
            "responseEnvelope.ack=Success&error%280%29.message=bad"
        );
    }
}
