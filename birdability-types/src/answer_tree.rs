use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{FieldKind, FieldPath, LeafValue, Schema, TreeError, TriState};

/// One entry of an `AnswerTree`: either a leaf answer or a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(LeafValue),
    Group(AnswerTree),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&LeafValue> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&AnswerTree> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

/// The nested tree of answers collected by the survey.
///
/// Sections map to subsections or fields, fields map to `LeafValue`s. Unlike a
/// flat response map, the tree keeps the nesting so it serializes to the
/// report layout directly; `FieldPath`s address individual leaves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerTree {
    entries: BTreeMap<String, Node>,
}

impl AnswerTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Get the leaf at the given path, if there is one.
    pub fn resolve(&self, path: &FieldPath) -> Option<&LeafValue> {
        self.node(path).and_then(Node::as_leaf)
    }

    /// Get the node (leaf or group) at the given path.
    pub fn node(&self, path: &FieldPath) -> Option<&Node> {
        if !path.is_well_formed() {
            return None;
        }
        let mut segments = path.segments();
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;
        for segment in segments {
            node = node.as_group()?.entries.get(segment)?;
        }
        Some(node)
    }

    /// Get the nested mapping at the given path. The empty path is the tree itself.
    pub fn group(&self, path: &FieldPath) -> Option<&AnswerTree> {
        if path.is_empty() {
            return Some(self);
        }
        self.node(path).and_then(Node::as_group)
    }

    fn resolve_mut(&mut self, path: &FieldPath) -> Option<&mut LeafValue> {
        let mut current = self;
        let segments: Vec<&str> = path.segments().collect();
        let (last, parents) = segments.split_last()?;
        for segment in parents {
            match current.entries.get_mut(*segment)? {
                Node::Group(group) => current = group,
                Node::Leaf(_) => return None,
            }
        }
        match current.entries.get_mut(*last)? {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    /// Set the leaf at `path`, creating intermediate mappings as needed.
    ///
    /// `None` stands for "no answer" (an unchecked radio group) and leaves the
    /// prior value in place. A leaf sitting where a mapping is needed is
    /// replaced by one.
    pub fn assign(&mut self, path: &FieldPath, value: Option<LeafValue>) -> Result<(), TreeError> {
        if !path.is_well_formed() {
            return Err(TreeError::MalformedPath(path.clone()));
        }
        let Some(value) = value else {
            return Ok(());
        };

        let segments: Vec<&str> = path.segments().collect();
        self.assign_segments(path, &segments, value);
        Ok(())
    }

    fn assign_segments(&mut self, path: &FieldPath, segments: &[&str], value: LeafValue) {
        match segments {
            [] => {}
            [last] => {
                self.entries.insert((*last).to_string(), Node::Leaf(value));
            }
            [first, rest @ ..] => {
                let node = self
                    .entries
                    .entry((*first).to_string())
                    .or_insert_with(|| Node::Group(AnswerTree::new()));
                if let Node::Leaf(leaf) = node {
                    debug!(%path, segment = first, replaced = %leaf, "replacing leaf with a group");
                    *node = Node::Group(AnswerTree::new());
                }
                if let Node::Group(group) = node {
                    group.assign_segments(path, rest, value);
                }
            }
        }
    }

    /// Insert an answer at the given path.
    pub fn insert(
        &mut self,
        path: impl Into<FieldPath>,
        value: impl Into<LeafValue>,
    ) -> Result<(), TreeError> {
        self.assign(&path.into(), Some(value.into()))
    }

    /// Remove whatever is stored at the given path.
    pub fn remove(&mut self, path: &FieldPath) -> Option<Node> {
        let segments: Vec<&str> = path.segments().collect();
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            match current.entries.get_mut(*segment)? {
                Node::Group(group) => current = group,
                Node::Leaf(_) => return None,
            }
        }
        current.entries.remove(*last)
    }

    /// Check if a leaf exists at the given path.
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.resolve(path).is_some()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every leaf of the tree with its full path, depth-first.
    pub fn leaves(&self) -> Vec<(FieldPath, &LeafValue)> {
        let mut out = Vec::new();
        self.collect_leaves(&FieldPath::empty(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &FieldPath, out: &mut Vec<(FieldPath, &'a LeafValue)>) {
        for (key, node) in &self.entries {
            let path = prefix.child(key);
            match node {
                Node::Leaf(leaf) => out.push((path, leaf)),
                Node::Group(group) => group.collect_leaves(&path, out),
            }
        }
    }

    // === Lenient readers ===

    /// The tri-state answer at `path`; missing or unrecognized values are unanswered.
    pub fn tri_state(&self, path: &FieldPath) -> TriState {
        self.resolve(path)
            .map(LeafValue::as_tri_state)
            .unwrap_or_default()
    }

    /// Whether the answer at `path` is a "yes" in any encoding. Missing is `false`.
    pub fn flag(&self, path: &FieldPath) -> bool {
        self.resolve(path).is_some_and(LeafValue::is_truthy)
    }

    /// The non-empty text at `path`.
    pub fn text(&self, path: &FieldPath) -> Option<&str> {
        self.resolve(path)
            .and_then(LeafValue::as_str)
            .filter(|s| !s.is_empty())
    }

    // === Strict accessors ===

    /// Get a boolean value at the given path.
    pub fn get_bool(&self, path: &FieldPath) -> Result<bool, TreeError> {
        match self.resolve(path) {
            Some(LeafValue::Bool(b)) => Ok(*b),
            Some(other) => Err(TreeError::TypeMismatch {
                path: path.clone(),
                expected: "Bool",
                actual: other.type_name(),
            }),
            None => Err(TreeError::MissingPath(path.clone())),
        }
    }

    /// Get a text value at the given path.
    pub fn get_text(&self, path: &FieldPath) -> Result<&str, TreeError> {
        match self.resolve(path) {
            Some(LeafValue::Text(s)) => Ok(s),
            Some(other) => Err(TreeError::TypeMismatch {
                path: path.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(TreeError::MissingPath(path.clone())),
        }
    }

    /// Get a tri-state value at the given path.
    pub fn get_tri_state(&self, path: &FieldPath) -> Result<TriState, TreeError> {
        match self.resolve(path) {
            Some(LeafValue::TriState(t)) => Ok(*t),
            Some(other) => Err(TreeError::TypeMismatch {
                path: path.clone(),
                expected: "TriState",
                actual: other.type_name(),
            }),
            None => Err(TreeError::MissingPath(path.clone())),
        }
    }

    // === Schema and JSON ===

    /// Convert every leaf the schema knows about to the kind the schema declares.
    ///
    /// Trees read back from JSON only have booleans and strings; this restores
    /// tri-state gates and checkbox flags. Unknown paths are left alone.
    pub fn normalize(&mut self, schema: &Schema) {
        for field in schema.fields() {
            let Some(leaf) = self.resolve_mut(&field.path) else {
                continue;
            };
            let normalized = match (&field.kind, &*leaf) {
                (FieldKind::Flag, LeafValue::Bool(_)) => continue,
                (FieldKind::Flag, other) => LeafValue::Bool(other.is_truthy()),
                (FieldKind::TriState, other) => LeafValue::TriState(other.as_tri_state()),
                (FieldKind::Text | FieldKind::Choice(_), LeafValue::Text(_)) => continue,
                (FieldKind::Text | FieldKind::Choice(_), other) => {
                    LeafValue::Text(other.literal().into_owned())
                }
            };
            *leaf = normalized;
        }
    }

    /// The JSON object form of this tree.
    pub fn to_json(&self) -> Value {
        Value::Object(self.to_json_map())
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, node)| {
                let value = match node {
                    Node::Leaf(leaf) => leaf.to_json(),
                    Node::Group(group) => group.to_json(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Build a tree from a JSON object.
    ///
    /// Objects become mappings and scalars become leaves. `null`, arrays (the
    /// photo list) and keys that could not be addressed by a path are skipped.
    pub fn from_json(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(TreeError::NotAnObject(json_type_name(other))),
        }
    }

    fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut tree = Self::new();
        for (key, value) in map {
            if key.is_empty() || key.contains('.') {
                debug!(key = %key, "skipping key that is not a path segment");
                continue;
            }
            let node = match value {
                Value::Object(inner) => Node::Group(Self::from_json_map(inner)),
                scalar => match LeafValue::from_json(scalar) {
                    Some(leaf) => Node::Leaf(leaf),
                    None => {
                        debug!(key = %key, kind = json_type_name(scalar), "skipping non-scalar value");
                        continue;
                    }
                },
            };
            tree.entries.insert(key.clone(), node);
        }
        tree
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for AnswerTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnswerTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        FieldPath::new(s)
    }

    #[test]
    fn assign_then_resolve() {
        let mut tree = AnswerTree::new();
        let p = path("accessibilityDetailed.parking.curbCuts");
        tree.assign(&p, Some(LeafValue::Bool(true))).unwrap();

        assert_eq!(tree.resolve(&p), Some(&LeafValue::Bool(true)));
        assert!(tree.group(&path("accessibilityDetailed.parking")).is_some());
    }

    #[test]
    fn assign_absent_is_noop() {
        let mut tree = AnswerTree::new();
        let p = path("accessibilityDetailed.parking.hasParking");
        tree.insert(p.clone(), TriState::No).unwrap();
        let before = tree.clone();

        tree.assign(&p, None).unwrap();
        tree.assign(&path("brand.new.path"), None).unwrap();

        assert_eq!(tree, before);
    }

    #[test]
    fn assign_is_idempotent() {
        let mut tree = AnswerTree::new();
        let p = path("generalInformation.trailName");
        tree.insert(p.clone(), "Main Trail").unwrap();
        let once = tree.clone();
        tree.insert(p, "Main Trail").unwrap();
        assert_eq!(tree, once);
    }

    #[test]
    fn assign_replaces_leaf_in_the_way() -> anyhow::Result<()> {
        let mut tree = AnswerTree::new();
        tree.insert("accessibilityDetailed.steps.present", TriState::Yes)?;
        tree.insert("accessibilityDetailed.shadeCover", "")?;
        tree.insert("accessibilityDetailed.shadeCover.somewhat", true)?;
        tree.insert("name", "Park")?;
        tree.insert("name.deeper.still", "x")?;

        assert!(tree.flag(&path("accessibilityDetailed.shadeCover.somewhat")));
        assert!(tree.resolve(&path("accessibilityDetailed.shadeCover")).is_none());
        assert_eq!(
            tree.get_tri_state(&path("accessibilityDetailed.steps.present"))?,
            TriState::Yes
        );
        assert_eq!(tree.get_text(&path("name.deeper.still"))?, "x");
        Ok(())
    }

    #[test]
    fn remove_and_contains() -> anyhow::Result<()> {
        let mut tree = AnswerTree::new();
        tree.insert("finalThoughts.comments", "Lovely")?;

        assert!(tree.contains(&path("finalThoughts.comments")));
        assert!(!tree.contains(&path("finalThoughts")));
        assert!(tree.remove(&path("finalThoughts.comments.more")).is_none());
        assert_eq!(
            tree.remove(&path("finalThoughts.comments")),
            Some(Node::Leaf(LeafValue::from("Lovely")))
        );
        assert!(!tree.contains(&path("finalThoughts.comments")));
        Ok(())
    }

    #[test]
    fn assign_rejects_malformed_path() {
        let mut tree = AnswerTree::new();
        let result = tree.assign(&path("a..b"), Some(LeafValue::Bool(true)));
        assert!(matches!(result, Err(TreeError::MalformedPath(_))));
        assert!(tree.is_empty());
    }

    #[test]
    fn resolve_through_leaf_is_none() {
        let mut tree = AnswerTree::new();
        tree.insert("name", "Park").unwrap();
        assert!(tree.resolve(&path("name.inner")).is_none());
        assert!(tree.resolve(&path("missing")).is_none());
    }

    #[test]
    fn lenient_readers() {
        let mut tree = AnswerTree::new();
        tree.insert("a.gate", "true").unwrap();
        tree.insert("a.flag", true).unwrap();
        tree.insert("a.note", "").unwrap();

        assert_eq!(tree.tri_state(&path("a.gate")), TriState::Yes);
        assert_eq!(tree.tri_state(&path("a.missing")), TriState::Unanswered);
        assert!(tree.flag(&path("a.flag")));
        assert!(!tree.flag(&path("b.flag")));
        assert_eq!(tree.text(&path("a.note")), None);
        assert_eq!(tree.text(&path("a.gate")), Some("true"));
    }

    #[test]
    fn type_mismatch_error() {
        let mut tree = AnswerTree::new();
        tree.insert("a.flag", true).unwrap();

        let result = tree.get_text(&path("a.flag"));
        assert!(matches!(result, Err(TreeError::TypeMismatch { .. })));
        assert!(matches!(
            tree.get_bool(&path("a.other")),
            Err(TreeError::MissingPath(_))
        ));
    }

    #[test]
    fn leaves_are_listed_with_full_paths() {
        let mut tree = AnswerTree::new();
        tree.insert("name", "Park").unwrap();
        tree.insert("accessibilityDetailed.steps.present", TriState::Yes)
            .unwrap();

        let paths: Vec<String> = tree
            .leaves()
            .into_iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(paths, vec!["accessibilityDetailed.steps.present", "name"]);
    }

    #[test]
    fn json_round_trip_skips_arrays_and_nulls() {
        let value = json!({
            "id": "abc",
            "generalInformation": { "locationName": "Test Park", "lengthOfTrail": 2 },
            "photos": [{ "id": "photo_1" }],
            "gone": null,
        });
        let tree = AnswerTree::from_json(&value).unwrap();

        assert_eq!(
            tree.text(&path("generalInformation.lengthOfTrail")),
            Some("2")
        );
        assert!(tree.node(&path("photos")).is_none());
        assert!(tree.node(&path("gone")).is_none());
        assert_eq!(
            tree.to_json(),
            json!({
                "id": "abc",
                "generalInformation": { "locationName": "Test Park", "lengthOfTrail": "2" },
            })
        );
    }

    #[test]
    fn from_json_requires_object() {
        assert!(matches!(
            AnswerTree::from_json(&json!([1])),
            Err(TreeError::NotAnObject("array"))
        ));
    }

    #[test]
    fn normalize_restores_schema_kinds() {
        let schema = Schema::new()
            .with_field("p.hasParking", FieldKind::TriState)
            .with_field("p.curbCuts", FieldKind::Flag)
            .with_field("p.comments", FieldKind::Text);

        let mut tree = AnswerTree::from_json(&json!({
            "p": { "hasParking": "false", "curbCuts": "true", "comments": true, "extra": "x" }
        }))
        .unwrap();
        tree.normalize(&schema);

        assert_eq!(
            tree.get_tri_state(&path("p.hasParking")).unwrap(),
            TriState::No
        );
        assert!(tree.get_bool(&path("p.curbCuts")).unwrap());
        assert_eq!(tree.get_text(&path("p.comments")).unwrap(), "true");
        assert_eq!(tree.get_text(&path("p.extra")).unwrap(), "x");
    }
}
