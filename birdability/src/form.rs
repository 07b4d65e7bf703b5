//! The form surface the codec reads from and writes to.
//!
//! A surface is anything that exposes named input controls: a browser form,
//! a terminal UI, or the in-memory `ControlSet` used by the CLI and tests.
//! Control names are dotted `FieldPath`s.

use birdability_types::{FieldKind, Schema};

/// What kind of input a control is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// An independent checkbox.
    Checkbox,
    /// One option of a radio group; the group shares a name.
    Radio,
    Text,
    TextArea,
    Select,
}

/// A single named input control.
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub name: String,
    pub kind: ControlKind,
    /// The typed text, or the literal a radio option stands for.
    pub value: String,
    /// Checked state of checkboxes and radio options.
    pub checked: bool,
}

impl FormControl {
    /// Create an unchecked checkbox.
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ControlKind::Checkbox,
            value: "on".to_string(),
            checked: false,
        }
    }

    /// Create an unchecked radio option carrying `literal`.
    pub fn radio(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ControlKind::Radio,
            value: literal.into(),
            checked: false,
        }
    }

    /// Create an empty single-line text input.
    pub fn text(name: impl Into<String>) -> Self {
        Self::text_like(name, ControlKind::Text)
    }

    /// Create an empty multi-line text input.
    pub fn text_area(name: impl Into<String>) -> Self {
        Self::text_like(name, ControlKind::TextArea)
    }

    /// Create a select with nothing selected.
    pub fn select(name: impl Into<String>) -> Self {
        Self::text_like(name, ControlKind::Select)
    }

    fn text_like(name: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: String::new(),
            checked: false,
        }
    }

    /// Set the checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn is_text_like(&self) -> bool {
        matches!(
            self.kind,
            ControlKind::Text | ControlKind::TextArea | ControlKind::Select
        )
    }
}

/// Access to the named controls of a form.
pub trait FormSurface {
    /// A snapshot of every control, in document order.
    fn controls(&self) -> &[FormControl];

    /// Apply `update` to every control called `name`. Returns how many were touched.
    fn update_named(&mut self, name: &str, update: &mut dyn FnMut(&mut FormControl)) -> usize;

    /// The controls called `name`.
    fn named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a FormControl> + 'b
    where
        'a: 'b,
        Self: Sized,
    {
        self.controls().iter().filter(move |c| c.name == name)
    }
}

/// An in-memory form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlSet {
    controls: Vec<FormControl>,
}

impl ControlSet {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control.
    pub fn with_control(mut self, control: FormControl) -> Self {
        self.push(control);
        self
    }

    /// Add a yes/no radio group (`"true"` and `"false"` options).
    pub fn with_yes_no(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with_control(FormControl::radio(name.clone(), "true"))
            .with_control(FormControl::radio(name, "false"))
    }

    /// Add a radio group with one option per literal.
    pub fn with_choice<I, S>(mut self, name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        for option in options {
            self.push(FormControl::radio(name.clone(), option));
        }
        self
    }

    /// A blank form with one control (or radio group) per schema field.
    pub fn for_schema(schema: &Schema) -> Self {
        let mut form = Self::new();
        for field in schema.fields() {
            let name = field.path.as_str();
            form = match &field.kind {
                FieldKind::Flag => form.with_control(FormControl::checkbox(name)),
                FieldKind::Text => form.with_control(FormControl::text(name)),
                FieldKind::TriState => form.with_yes_no(name),
                FieldKind::Choice(options) => form.with_choice(name, options.iter().cloned()),
            };
        }
        form
    }

    pub fn push(&mut self, control: FormControl) {
        self.controls.push(control);
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// The value of the first text-like control called `name`.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.named(name)
            .find(|c| c.is_text_like())
            .map(|c| c.value.as_str())
    }

    /// Whether the first checkbox called `name` is checked.
    pub fn is_checked(&self, name: &str) -> bool {
        self.named(name)
            .any(|c| c.kind == ControlKind::Checkbox && c.checked)
    }

    /// The literal of the checked option of radio group `name`.
    pub fn selected(&self, name: &str) -> Option<&str> {
        self.named(name)
            .find(|c| c.kind == ControlKind::Radio && c.checked)
            .map(|c| c.value.as_str())
    }

    /// Type `value` into the text-like controls called `name`.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> usize {
        let value = value.into();
        self.update_named(name, &mut |c| {
            if c.is_text_like() {
                c.value = value.clone();
            }
        })
    }

    /// Tick or untick the checkboxes called `name`.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> usize {
        self.update_named(name, &mut |c| {
            if c.kind == ControlKind::Checkbox {
                c.checked = checked;
            }
        })
    }

    /// Select the option of radio group `name` whose literal is `literal`.
    pub fn select(&mut self, name: &str, literal: &str) -> usize {
        self.update_named(name, &mut |c| {
            if c.kind == ControlKind::Radio {
                c.checked = c.value == literal;
            }
        })
    }
}

impl FormSurface for ControlSet {
    fn controls(&self) -> &[FormControl] {
        &self.controls
    }

    fn update_named(&mut self, name: &str, update: &mut dyn FnMut(&mut FormControl)) -> usize {
        let mut touched = 0;
        for control in self.controls.iter_mut().filter(|c| c.name == name) {
            update(control);
            touched += 1;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_selection_is_exclusive() {
        let mut form = ControlSet::new().with_yes_no("parking.hasParking");
        form.select("parking.hasParking", "true");
        assert_eq!(form.selected("parking.hasParking"), Some("true"));

        form.select("parking.hasParking", "false");
        assert_eq!(form.selected("parking.hasParking"), Some("false"));
        assert_eq!(
            form.named("parking.hasParking").filter(|c| c.checked).count(),
            1
        );
    }

    #[test]
    fn setters_only_touch_matching_kinds() {
        let mut form = ControlSet::new()
            .with_control(FormControl::text("trailName"))
            .with_control(FormControl::checkbox("trailLoop"));

        form.set_value("trailLoop", "ignored");
        form.set_checked("trailName", true);
        form.set_value("trailName", "Main Trail");

        assert_eq!(form.value_of("trailName"), Some("Main Trail"));
        assert!(!form.is_checked("trailLoop"));
    }

    #[test]
    fn form_for_schema() {
        let schema = Schema::new()
            .with_field("a.flag", FieldKind::Flag)
            .with_field("a.gate", FieldKind::TriState)
            .with_field("a.kind", FieldKind::choice(["x", "y", "z"]))
            .with_field("a.note", FieldKind::Text);
        let form = ControlSet::for_schema(&schema);

        assert_eq!(form.len(), 7);
        assert_eq!(form.named("a.gate").count(), 2);
        assert_eq!(form.value_of("a.note"), Some(""));
    }

    #[test]
    fn lookups_take_borrowed_names() {
        let mut form = ControlSet::new()
            .with_control(FormControl::text("generalInformation.trailName"))
            .with_yes_no("steps.present");
        form.set_value("generalInformation.trailName", "Boardwalk");
        form.select("steps.present", "false");

        let value = {
            let name = String::from("generalInformation.trailName");
            form.value_of(&name)
        };
        let selected = {
            let name = format!("steps.{}", "present");
            form.selected(&name)
        };
        assert_eq!(value, Some("Boardwalk"));
        assert_eq!(selected, Some("false"));
    }

    #[test]
    fn update_counts_touched_controls() {
        let mut form = ControlSet::new().with_choice("trailType", ["loop", "lollipop"]);
        assert_eq!(form.update_named("trailType", &mut |_| {}), 2);
        assert_eq!(form.update_named("missing", &mut |_| {}), 0);
    }
}
