//! Hierarchical [`Value`] tree to flat key/value pairs.
//!
//! Output order is part of the contract: depth first, mapping children in
//! insertion order, sequence children in ascending index order. Request
//! bodies built from the same tree are therefore byte-identical.

use crate::config::CodecConfig;
use crate::key::{self, IndexStyle};
use crate::{FlatEntry, NvpError, Result, Value};

/// Reusable encoder bound to a [`CodecConfig`].
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    /// Create an encoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Flatten a tree into singleton entries.
    ///
    /// A multi-value leaf yields one entry per value under the same key, so
    /// an empty multi-value leaf (from an entry that carried no values)
    /// yields nothing and its key is not written. A bare scalar or sequence
    /// at the root produces keys with an empty name part; that is accepted,
    /// though PayPal will not understand it.
    ///
    /// # Errors
    ///
    /// [`NvpError::DepthLimitExceeded`] when the tree is deeper than
    /// `max_depth`.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn encode(&self, tree: &Value) -> Result<Vec<FlatEntry>> {
        let style = self.config.index_style;
        let mut entries = Vec::new();
        // (key so far, node, depth, whether the key already holds a name)
        let mut stack: Vec<(String, &Value, usize, bool)> =
            vec![(String::new(), tree, 0, false)];

        while let Some((prefix, node, depth, named)) = stack.pop() {
            match node {
                Value::Scalar(value) => entries.push(FlatEntry::single(prefix, value.clone())),
                Value::MultiValue(values) => entries.extend(
                    values
                        .iter()
                        .map(|value| FlatEntry::single(prefix.clone(), value.clone())),
                ),
                Value::Mapping(map) => {
                    if !map.is_empty() {
                        self.check_depth(depth + 1)?;
                    }
                    // Reversed so the first child is popped first.
                    for (name, child) in map.iter().rev() {
                        let mut child_key = prefix.clone();
                        key::push_name(&mut child_key, name, !named);
                        stack.push((child_key, child, depth + 1, true));
                    }
                }
                Value::Sequence(seq) => {
                    if !seq.is_empty() {
                        self.check_depth(depth + 1)?;
                    }
                    for (index, child) in seq.iter().rev() {
                        let mut child_key = prefix.clone();
                        key::push_index(&mut child_key, *index, style);
                        stack.push((child_key, child, depth + 1, named));
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        if self.config.trace {
            for entry in &entries {
                tracing::debug!(key = %entry.key, "encode entry");
            }
        }

        Ok(entries)
    }

    /// Marker style used for sequence children.
    pub fn index_style(&self) -> IndexStyle {
        self.config.index_style
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        let limit = self.config.max_depth;
        if depth > limit {
            return Err(NvpError::DepthLimitExceeded { depth, limit });
        }
        Ok(())
    }
}

/// Encode with the default configuration.
pub fn encode(tree: &Value) -> Result<Vec<FlatEntry>> {
    Encoder::default().encode(tree)
}

/// Encode with an explicit configuration.
pub fn encode_with(tree: &Value, config: &CodecConfig) -> Result<Vec<FlatEntry>> {
    Encoder::new(config.clone()).encode(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::test_utils::fixtures;

    fn pairs(entries: &[FlatEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.key.as_str(), e.values[0].as_str()))
            .collect()
    }

    #[test]
    fn test_encode_pay_request() {
        let tree = Value::mapping_from([
            ("cancelUrl", Value::from("http://x")),
            (
                "receiverList",
                Value::mapping_from([(
                    "receiver",
                    Value::Sequence(
                        [(
                            0,
                            Value::mapping_from([
                                ("email", Value::from("a@x.com")),
                                ("amount", Value::from("1")),
                            ]),
                        )]
                        .into_iter()
                        .collect(),
                    ),
                )]),
            ),
        ]);

        let entries = encode(&tree).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![
                ("cancelUrl", "http://x"),
                ("receiverList.receiver(0).email", "a@x.com"),
                ("receiverList.receiver(0).amount", "1"),
            ]
        );
    }

    #[test]
    fn test_ascending_index_order() {
        let tree = Value::mapping_from([(
            "error",
            Value::Sequence(
                [
                    (10, Value::from("ten")),
                    (2, Value::from("two")),
                    (0, Value::from("zero")),
                ]
                .into_iter()
                .collect(),
            ),
        )]);

        let entries = encode(&tree).unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("error(0)", "zero"), ("error(2)", "two"), ("error(10)", "ten")]
        );
    }

    #[test]
    fn test_nested_sequences_append_markers() {
        let tree = Value::mapping_from([(
            "grid",
            Value::sequence_from(vec![Value::sequence_from(vec![Value::from("cell")])]),
        )]);
        let entries = encode(&tree).unwrap();
        assert_eq!(pairs(&entries), vec![("grid(0)(0)", "cell")]);
    }

    #[test]
    fn test_bracket_style() {
        let config = CodecConfig::new().with_index_style(IndexStyle::Brackets);
        let tree = Value::mapping_from([(
            "receiver",
            Value::sequence_from(vec![Value::mapping_from([("email", Value::from("a@x.com"))])]),
        )]);
        let entries = encode_with(&tree, &config).unwrap();
        assert_eq!(pairs(&entries), vec![("receiver[0].email", "a@x.com")]);
    }

    #[test]
    fn test_multi_value_repeats_key() {
        let tree = Value::mapping_from([("tag", Value::multi(["a", "b"]))]);
        let entries = encode(&tree).unwrap();
        assert_eq!(pairs(&entries), vec![("tag", "a"), ("tag", "b")]);
    }

    #[test]
    fn test_bare_root_values() {
        let entries = encode(&Value::scalar("alone")).unwrap();
        assert_eq!(pairs(&entries), vec![("", "alone")]);

        let entries = encode(&Value::sequence_from(vec![Value::from("x")])).unwrap();
        assert_eq!(pairs(&entries), vec![("(0)", "x")]);
    }

    #[test]
    fn test_empty_containers_emit_nothing() {
        let tree = Value::mapping_from([("empty", Value::mapping()), ("none", Value::sequence())]);
        assert!(encode(&tree).unwrap().is_empty());
    }

    #[test]
    fn test_decoded_request_reencodes_in_order() {
        let entries = fixtures::pay_request_entries();
        let tree = decode(&entries).unwrap();
        assert_eq!(encode(&tree).unwrap(), entries);
    }

    #[test]
    fn test_empty_names_keep_their_separators() {
        let entries = vec![
            FlatEntry::single(".a..b", "1"),
            FlatEntry::single(".b", "2"),
            FlatEntry::single("b", "3"),
        ];
        let tree = decode(&entries).unwrap();
        assert_eq!(encode(&tree).unwrap(), entries);
    }

    #[test]
    fn test_entry_without_values_is_not_written() {
        let tree = decode(&[
            FlatEntry::new("gone", vec![]),
            FlatEntry::single("kept", "1"),
        ])
        .unwrap();
        assert_eq!(tree.get("gone"), Some(&Value::MultiValue(vec![])));
        assert_eq!(pairs(&encode(&tree).unwrap()), vec![("kept", "1")]);
    }

    #[test]
    fn test_depth_limit() {
        let config = CodecConfig::new().with_max_depth(2);
        let mut tree = Value::mapping();
        tree.insert_path("a.b", "ok".into()).unwrap();
        assert!(encode_with(&tree, &config).is_ok());

        tree.insert_path("a.c.d", "deep".into()).unwrap();
        let err = encode_with(&tree, &config).unwrap_err();
        assert!(matches!(
            err,
            NvpError::DepthLimitExceeded { depth: 3, limit: 2 }
        ));
    }

    #[test]
    fn test_rejected_deep_tree_drops_cleanly() {
        let mut tree = Value::scalar("leaf");
        for _ in 0..100_000 {
            tree = Value::mapping_from([("k", tree)]);
        }
        let err = encode(&tree).unwrap_err();
        assert!(matches!(err, NvpError::DepthLimitExceeded { limit: 64, .. }));
        drop(tree);
    }
}
