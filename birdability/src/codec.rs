//! Capture answers from a form into an `AnswerTree` and write them back.

use serde_json::Value;
use tracing::debug;

use crate::catalog;
use crate::form::{ControlKind, FormControl, FormSurface};
use crate::report::ReportIdentity;
use birdability_types::{AnswerTree, FieldKind, FieldPath, LeafValue, Schema, TreeError, TriState};

/// Read every named control of `form` into a tree.
///
/// The tree starts from the schema defaults, so fields without a control still
/// appear at their zero value. The report identity is stamped last and always
/// wins over a control of the same name.
pub fn capture<F: FormSurface + ?Sized>(
    form: &F,
    schema: &Schema,
    identity: &ReportIdentity,
) -> AnswerTree {
    let mut tree = schema.default_tree();

    for control in form.controls() {
        let path = FieldPath::new(&control.name);
        if !path.is_well_formed() {
            debug!(name = %control.name, "skipping control without a usable name");
            continue;
        }
        let value = coerce(control, schema.kind_of(&path));
        if let Err(err) = tree.assign(&path, value) {
            debug!(%path, %err, "control value not captured");
        }
    }

    stamp(&mut tree, identity);
    tree
}

/// Write the report identity into the top-level `id` and `createdAt` leaves.
pub fn stamp(tree: &mut AnswerTree, identity: &ReportIdentity) {
    for (path, value) in [
        (catalog::ID, identity.id_string()),
        (catalog::CREATED_AT, identity.created_at_string()),
    ] {
        if let Err(err) = tree.insert(path, value) {
            debug!(path, %err, "identity not stamped");
        }
    }
}

/// Turn a control into the answer it stands for; `None` is "no answer".
fn coerce(control: &FormControl, kind: Option<&FieldKind>) -> Option<LeafValue> {
    match control.kind {
        ControlKind::Checkbox => Some(LeafValue::Bool(control.checked)),
        ControlKind::Radio if !control.checked => None,
        ControlKind::Radio => match (control.value.as_str(), kind) {
            (literal @ ("true" | "false"), Some(FieldKind::TriState)) => {
                Some(TriState::from_literal(literal).into())
            }
            ("true", _) => Some(LeafValue::Bool(true)),
            ("false", _) => Some(LeafValue::Bool(false)),
            (literal, _) => Some(LeafValue::from(literal)),
        },
        ControlKind::Text | ControlKind::TextArea | ControlKind::Select => {
            Some(LeafValue::from(control.value.as_str()))
        }
    }
}

/// Write every leaf of `tree` onto the controls of the same name.
///
/// Paths without a control are ignored and controls without a leaf keep
/// whatever they hold. A radio group is only changed when one of its options
/// carries the leaf's literal. Returns the number of controls touched.
pub fn restore<F: FormSurface + ?Sized>(form: &mut F, tree: &AnswerTree) -> usize {
    let mut touched = 0;
    for (path, leaf) in tree.leaves() {
        let name = path.as_str();
        let literal = leaf.literal();
        let radio_match = form
            .controls()
            .iter()
            .any(|c| c.name == name && c.kind == ControlKind::Radio && c.value == literal);
        let checked = leaf.is_truthy();
        let input = leaf.input_value();

        let count = form.update_named(name, &mut |control| match control.kind {
            ControlKind::Checkbox => control.checked = checked,
            ControlKind::Radio => {
                if radio_match {
                    control.checked = control.value == literal;
                }
            }
            ControlKind::Text | ControlKind::TextArea | ControlKind::Select => {
                control.value = input.clone().into_owned();
            }
        });
        if count == 0 {
            debug!(%path, "no control for path");
        }
        touched += count;
    }
    touched
}

/// `restore` from a raw JSON object. Arrays (the photo list) are skipped.
pub fn restore_json<F: FormSurface + ?Sized>(
    form: &mut F,
    value: &Value,
) -> Result<usize, TreeError> {
    let tree = AnswerTree::from_json(value)?;
    Ok(restore(form, &tree))
}

/// Blank every control: untick checkboxes and radios, empty text.
pub fn reset<F: FormSurface + ?Sized>(form: &mut F) {
    let names: Vec<String> = form.controls().iter().map(|c| c.name.clone()).collect();
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            continue;
        }
        form.update_named(&name, &mut |control| match control.kind {
            ControlKind::Checkbox | ControlKind::Radio => control.checked = false,
            ControlKind::Text | ControlKind::TextArea | ControlKind::Select => {
                control.value.clear()
            }
        });
    }
}
