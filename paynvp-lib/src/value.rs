//! Hierarchical values produced by decoding and consumed by encoding.
//!
//! A [`Value`] tree is plain owned data. The codec builds a fresh tree on
//! every call and never keeps a reference to it afterwards.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::key::{self, KeySegment};
use crate::{NvpError, Result};

/// Named children of a [`Value::Mapping`].
///
/// Insertion order is kept so that encoding is deterministic; equality
/// ignores it.
pub type Mapping = IndexMap<String, Value>;

/// Indexed children of a [`Value::Sequence`], iterated in ascending order.
pub type Sequence = BTreeMap<u64, Value>;

/// A node in a decoded NVP tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A terminal string.
    Scalar(String),
    /// All raw values of a key that was repeated on the wire, in arrival
    /// order. Not index addressed.
    MultiValue(Vec<String>),
    /// Named sub-fields.
    Mapping(Mapping),
    /// Positionally indexed siblings, possibly sparse.
    Sequence(Sequence),
}

impl Default for Value {
    fn default() -> Self {
        Self::mapping()
    }
}

impl Drop for Value {
    /// Children are detached onto a heap stack first, so dropping a tree of
    /// any depth never recurses.
    fn drop(&mut self) {
        let mut pending: Vec<Value> = match self {
            Self::Mapping(map) if !map.is_empty() => std::mem::take(map).into_values().collect(),
            Self::Sequence(seq) if !seq.is_empty() => std::mem::take(seq).into_values().collect(),
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            match &mut node {
                Self::Mapping(map) => pending.extend(std::mem::take(map).into_values()),
                Self::Sequence(seq) => pending.extend(std::mem::take(seq).into_values()),
                Self::Scalar(_) | Self::MultiValue(_) => {}
            }
        }
    }
}

impl Value {
    /// Create a scalar.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Create a multi-value leaf.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiValue(values.into_iter().map(Into::into).collect())
    }

    /// Create an empty mapping.
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Create a mapping from name/value pairs.
    pub fn mapping_from<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create an empty sequence.
    pub fn sequence() -> Self {
        Self::Sequence(Sequence::new())
    }

    /// Create a sequence indexed from zero.
    pub fn sequence_from<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Sequence((0u64..).zip(items).collect())
    }

    /// Check if this value is a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Check if this value is a multi-value leaf.
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::MultiValue(_))
    }

    /// Check if this value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Check if this value is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// The scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The raw values of a multi-value leaf.
    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            Self::MultiValue(values) => Some(values),
            _ => None,
        }
    }

    /// The named children, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable named children, if this is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The indexed children, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Named child of a mapping.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_mapping()?.get(name)
    }

    /// Indexed child of a sequence.
    pub fn item(&self, index: u64) -> Option<&Value> {
        self.as_sequence()?.get(&index)
    }

    /// Follow a flat key such as `error(0).parameter(1)` down the tree.
    ///
    /// Both marker styles are accepted.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut node = self;
        for segment in key::segments(path) {
            node = node.get(segment.name)?;
            if let Some(index) = segment.index {
                node = node.item(index)?;
            }
        }
        Some(node)
    }

    /// Scalar text at `path`.
    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.lookup(path)?.as_str()
    }

    /// Number of path components to the deepest leaf.
    ///
    /// Leaves and empty containers have depth zero.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match node {
                Self::Mapping(map) => stack.extend(map.values().map(|v| (v, depth + 1))),
                Self::Sequence(seq) => stack.extend(seq.values().map(|v| (v, depth + 1))),
                Self::Scalar(_) | Self::MultiValue(_) => {}
            }
        }
        deepest
    }

    /// Interpret a sequence as a dense ordered collection.
    ///
    /// Only succeeds when the indices are exactly `0..len`; callers whose
    /// schema does not guarantee contiguity should walk
    /// [`as_sequence`](Self::as_sequence) instead.
    pub fn densify(&self) -> Result<Vec<&Value>> {
        let seq = self
            .as_sequence()
            .ok_or_else(|| NvpError::invalid_data("value", "not a sequence"))?;

        let mut items = Vec::with_capacity(seq.len());
        for (expected, (index, item)) in (0u64..).zip(seq) {
            if *index != expected {
                return Err(NvpError::Gap { missing: expected });
            }
            items.push(item);
        }
        Ok(items)
    }

    /// Replace every one-element multi-value leaf by a scalar.
    pub fn collapse_singletons(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Self::MultiValue(values) = &mut *node {
                if values.len() == 1 {
                    let only = values.remove(0);
                    *node = Self::Scalar(only);
                }
                continue;
            }
            match node {
                Self::Mapping(map) => stack.extend(map.values_mut()),
                Self::Sequence(seq) => stack.extend(seq.values_mut()),
                Self::Scalar(_) | Self::MultiValue(_) => {}
            }
        }
    }

    /// Write `value` at a flat key path, creating intermediate nodes.
    ///
    /// Follows the decoder's rules: existing groups are merged, a node of
    /// the wrong shape is replaced, and the final write wins.
    pub fn insert_path(&mut self, path: &str, value: Value) -> Result<()> {
        *self.slot_mut(path, DEFAULT_MAX_DEPTH)? = value;
        Ok(())
    }

    /// Locate (creating as needed) the node addressed by `path`.
    ///
    /// The depth check runs before anything is created, so a rejected key
    /// leaves the tree untouched.
    pub(crate) fn slot_mut(&mut self, path: &str, limit: usize) -> Result<&mut Value> {
        path_depth(path, limit)?;

        let mut node = self;
        for segment in key::segments(path) {
            node = node.child_mut(segment.name);
            if let Some(index) = segment.index {
                node = node.item_mut(index);
            }
        }
        Ok(node)
    }

    fn child_mut(&mut self, name: &str) -> &mut Value {
        if !self.is_mapping() {
            *self = Self::mapping();
        }
        match self {
            Self::Mapping(map) => map.entry(name.to_string()).or_default(),
            _ => unreachable!("node was reset to a mapping"),
        }
    }

    fn item_mut(&mut self, index: u64) -> &mut Value {
        if !self.is_sequence() {
            *self = Self::sequence();
        }
        match self {
            Self::Sequence(seq) => seq.entry(index).or_default(),
            _ => unreachable!("node was reset to a sequence"),
        }
    }

    /// Build a tree from JSON.
    ///
    /// Objects become mappings in document order and arrays become
    /// sequences indexed from zero. Numbers and booleans become their
    /// textual scalar. `null` members are dropped; a `null` root yields an
    /// empty mapping.
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::mapping(),
            Json::Bool(b) => Self::Scalar(b.to_string()),
            Json::Number(n) => Self::Scalar(n.to_string()),
            Json::String(s) => Self::Scalar(s),
            Json::Array(items) => Self::Sequence(
                (0u64..)
                    .zip(items)
                    .filter(|(_, item)| !item.is_null())
                    .map(|(index, item)| (index, Self::from_json(item)))
                    .collect(),
            ),
            Json::Object(members) => Self::Mapping(
                members
                    .into_iter()
                    .filter(|(_, member)| !member.is_null())
                    .map(|(name, member)| (name, Self::from_json(member)))
                    .collect(),
            ),
        }
    }

    /// Convert the tree to JSON.
    ///
    /// Dense sequences become arrays; sparse ones become objects keyed by
    /// the decimal index.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Count the path components of `path`, stopping once `limit` is passed.
pub(crate) fn path_depth(path: &str, limit: usize) -> Result<usize> {
    key::segments(path).try_fold(0usize, |depth, segment: KeySegment<'_>| {
        let depth = depth + segment.depth();
        if depth > limit {
            Err(NvpError::DepthLimitExceeded { depth, limit })
        } else {
            Ok(depth)
        }
    })
}

fn is_dense(seq: &Sequence) -> bool {
    seq.keys().zip(0u64..).all(|(index, expected)| *index == expected)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::MultiValue(values) => values.serialize(serializer),
            Self::Mapping(map) => map.serialize(serializer),
            Self::Sequence(seq) if is_dense(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for item in seq.values() {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Self::Sequence(seq) => {
                let mut out = serializer.serialize_map(Some(seq.len()))?;
                for (index, item) in seq {
                    out.serialize_entry(&index.to_string(), item)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from_json)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Self::from_json(json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Self::MultiValue(values)
    }
}
