use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// The answer to a yes/no question that may also be left unanswered.
///
/// Gate questions ("is there parking at all?") need three states: an explicit
/// No must not be confused with a question nobody answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    #[default]
    Unanswered,
    Yes,
    No,
}

impl TriState {
    /// Parse the literal value of a radio control (`"true"`, `"false"` or anything else).
    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "true" => Self::Yes,
            "false" => Self::No,
            _ => Self::Unanswered,
        }
    }

    /// The literal stored in JSON and carried by radio controls.
    pub fn as_literal(self) -> &'static str {
        match self {
            Self::Unanswered => "",
            Self::Yes => "true",
            Self::No => "false",
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for TriState {
    fn from(b: bool) -> Self {
        if b { Self::Yes } else { Self::No }
    }
}

/// A single leaf value of an `AnswerTree`.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    /// An independent checkbox.
    Bool(bool),

    /// Free text, or the literal value of a categorical radio group.
    Text(String),

    /// A yes/no radio group that may be unanswered.
    TriState(TriState),
}

impl LeafValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret this value as a tri-state answer.
    ///
    /// Booleans and the strings `"true"`/`"false"` are accepted as well, since
    /// reports written by older form revisions stored gates that way.
    pub fn as_tri_state(&self) -> TriState {
        match self {
            Self::TriState(t) => *t,
            Self::Bool(b) => TriState::from(*b),
            Self::Text(s) => TriState::from_literal(s),
        }
    }

    /// Whether this value means "yes" in any of its encodings.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s == "true",
            Self::TriState(t) => t.is_yes(),
        }
    }

    /// The literal a radio control must carry to represent this value.
    pub fn literal(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Text(s) => Cow::Borrowed(s),
            Self::TriState(t) => Cow::Borrowed(t.as_literal()),
        }
    }

    /// The string written into a text-like control; `false` shows as empty.
    pub fn input_value(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(false) => Cow::Borrowed(""),
            other => other.literal(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Text(_) => "Text",
            Self::TriState(_) => "TriState",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Text(s) => Value::String(s.clone()),
            Self::TriState(t) => Value::String(t.as_literal().to_string()),
        }
    }

    /// Read a JSON scalar. `null`, arrays and objects are not leaves.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

impl From<String> for LeafValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for LeafValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for LeafValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<TriState> for LeafValue {
    fn from(t: TriState) -> Self {
        Self::TriState(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tri_state_literals() {
        assert_eq!(TriState::from_literal("true"), TriState::Yes);
        assert_eq!(TriState::from_literal("false"), TriState::No);
        assert_eq!(TriState::from_literal(""), TriState::Unanswered);
        assert_eq!(TriState::from_literal("maybe"), TriState::Unanswered);
        assert_eq!(TriState::No.as_literal(), "false");
    }

    #[test]
    fn legacy_encodings_read_as_tri_state() {
        assert_eq!(LeafValue::Bool(true).as_tri_state(), TriState::Yes);
        assert_eq!(LeafValue::Bool(false).as_tri_state(), TriState::No);
        assert_eq!(LeafValue::from("false").as_tri_state(), TriState::No);
        assert_eq!(LeafValue::from("").as_tri_state(), TriState::Unanswered);
    }

    #[test]
    fn truthiness() {
        assert!(LeafValue::Bool(true).is_truthy());
        assert!(LeafValue::from("true").is_truthy());
        assert!(LeafValue::TriState(TriState::Yes).is_truthy());
        assert!(!LeafValue::from("yes").is_truthy());
        assert!(!LeafValue::TriState(TriState::No).is_truthy());
    }

    #[test]
    fn input_value_hides_false() {
        assert_eq!(LeafValue::Bool(false).input_value(), "");
        assert_eq!(LeafValue::Bool(true).input_value(), "true");
        assert_eq!(LeafValue::from("Main Trail").input_value(), "Main Trail");
    }

    #[test]
    fn json_scalars() {
        assert_eq!(LeafValue::from_json(&json!(true)), Some(LeafValue::Bool(true)));
        assert_eq!(LeafValue::from_json(&json!(2.5)), Some(LeafValue::from("2.5")));
        assert_eq!(LeafValue::from_json(&json!(null)), None);
        assert_eq!(LeafValue::from_json(&json!([1, 2])), None);
        assert_eq!(LeafValue::TriState(TriState::Yes).to_json(), json!("true"));
    }
}
