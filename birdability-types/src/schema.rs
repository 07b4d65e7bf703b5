use std::collections::HashMap;

use crate::{AnswerTree, FieldPath, LeafValue, TriState};

/// The kind of a survey field, determining its leaf type and zero value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// An independent checkbox. Zero value `false`.
    Flag,

    /// Free text (single or multi-line). Zero value `""`.
    Text,

    /// A yes/no radio group that may stay unanswered.
    TriState,

    /// A categorical radio group; the answer is one of the option literals.
    Choice(Vec<String>),
}

impl FieldKind {
    /// Create a choice kind from option literals.
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(options.into_iter().map(Into::into).collect())
    }

    /// The value a field of this kind holds before anybody answers it.
    pub fn zero_value(&self) -> LeafValue {
        match self {
            Self::Flag => LeafValue::Bool(false),
            Self::Text | Self::Choice(_) => LeafValue::Text(String::new()),
            Self::TriState => LeafValue::TriState(TriState::Unanswered),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Text => "text",
            Self::TriState => "tri-state",
            Self::Choice(_) => "choice",
        }
    }
}

/// A single field of a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Where the answer lives in the `AnswerTree`.
    pub path: FieldPath,

    /// What kind of answer it is.
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(path: impl Into<FieldPath>, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// The declarative shape of a survey: every known field with its kind.
///
/// The schema is consumed generically by the codec and the tree helpers, so
/// adding a field never needs a new code path.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDef>,
    index: HashMap<FieldPath, usize>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. A field registered twice keeps its first position and takes the new kind.
    pub fn with_field(mut self, path: impl Into<FieldPath>, kind: FieldKind) -> Self {
        self.push(FieldDef::new(path, kind));
        self
    }

    /// Add a field in place.
    pub fn push(&mut self, field: FieldDef) {
        match self.index.get(&field.path) {
            Some(&existing) => self.fields[existing] = field,
            None => {
                self.index.insert(field.path.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Get the fields, in registration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by path.
    pub fn field(&self, path: &FieldPath) -> Option<&FieldDef> {
        self.index.get(path).map(|&i| &self.fields[i])
    }

    /// Get the kind of the field at `path`, if the schema knows it.
    pub fn kind_of(&self, path: &FieldPath) -> Option<&FieldKind> {
        self.field(path).map(|f| &f.kind)
    }

    /// Check if the schema has any fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// A tree holding every known field at its zero value.
    pub fn default_tree(&self) -> AnswerTree {
        let mut tree = AnswerTree::new();
        for field in &self.fields {
            if let Err(err) = tree.assign(&field.path, Some(field.kind.zero_value())) {
                tracing::warn!(path = %field.path, %err, "schema field cannot be seeded");
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new()
            .with_field("name", FieldKind::Text)
            .with_field("generalInformation.trailType", FieldKind::choice(["loop", "lollipop"]))
            .with_field("accessibilityDetailed.parking.hasParking", FieldKind::TriState)
            .with_field("accessibilityDetailed.parking.curbCuts", FieldKind::Flag)
    }

    #[test]
    fn default_tree_has_zero_values() {
        let tree = sample().default_tree();

        assert_eq!(tree.get_text(&"name".into()).unwrap(), "");
        assert_eq!(
            tree.get_tri_state(&"accessibilityDetailed.parking.hasParking".into())
                .unwrap(),
            TriState::Unanswered
        );
        assert!(
            !tree
                .get_bool(&"accessibilityDetailed.parking.curbCuts".into())
                .unwrap()
        );
        assert_eq!(tree.leaves().len(), 4);
    }

    #[test]
    fn lookup_by_path() {
        let schema = sample();
        assert_eq!(
            schema.kind_of(&"accessibilityDetailed.parking.curbCuts".into()),
            Some(&FieldKind::Flag)
        );
        assert!(schema.field(&"unknown.path".into()).is_none());
    }

    #[test]
    fn duplicate_registration_replaces_kind() {
        let schema = sample().with_field("name", FieldKind::TriState);
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.fields()[0].kind, FieldKind::TriState);
    }
}
