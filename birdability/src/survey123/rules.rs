//! The mapping from checklist answers to Survey123 questions.
//!
//! Most questions map one field to one key and are driven by the catalog.
//! A handful of Survey123 questions merge several answers; those are the
//! compound rules below.

use birdability_types::{AnswerTree, FieldPath, TriState};

use super::{ExternalParameterSet, ExternalValue};
use crate::catalog::{Answer, CATALOG, CatalogGroup, paths};

const GENERAL_INFORMATION: &str = "generalInformation";

/// A Survey123 question built from several answers.
struct CompoundRule {
    key: &'static str,
    derive: fn(&AnswerTree) -> Option<ExternalValue>,
}

const COMPOUND_RULES: &[CompoundRule] = &[
    CompoundRule {
        key: "general_information/location_name",
        derive: location_name,
    },
    CompoundRule {
        key: "general_information/point",
        derive: point,
    },
    CompoundRule {
        key: "general_information/unit_of_measure",
        derive: unit_of_measure,
    },
    CompoundRule {
        key: "general_information/type_of_trail",
        derive: type_of_trail,
    },
    CompoundRule {
        key: "general_information/park_fee",
        derive: park_fee,
    },
    CompoundRule {
        key: "general_information/park_fee_cost",
        derive: park_fee_cost,
    },
];

pub(super) fn collect(tree: &AnswerTree, out: &mut ExternalParameterSet) {
    if tree.group(&GENERAL_INFORMATION.into()).is_some() {
        for rule in COMPOUND_RULES {
            if let Some(value) = (rule.derive)(tree) {
                out.insert(rule.key, value);
            }
        }
    }
    for group in CATALOG {
        map_group(tree, group, out);
    }
}

/// One-to-one questions of a catalog group.
///
/// Behind a gate, details only count once the gate is answered "yes"; a "no"
/// reports the gate alone. Free text is passed through either way.
fn map_group(tree: &AnswerTree, group: &CatalogGroup, out: &mut ExternalParameterSet) {
    let gate = group
        .gate_field()
        .map(|field| tree.tri_state(&group.field_path(field)));

    for field in group.fields {
        let Some(key) = field.external else {
            continue;
        };
        let path = group.field_path(field);

        if field.answer == Answer::Text {
            if let Some(text) = tree.text(&path) {
                out.insert(key, ExternalValue::Text(text.to_string()));
            }
            continue;
        }

        if group.gate == Some(field.name) {
            if let Some(value) = yes_no(gate.unwrap_or_default()) {
                out.insert(key, value);
            }
            continue;
        }
        if gate.is_some_and(|g| !g.is_yes()) {
            continue;
        }

        let value = match field.answer {
            Answer::Flag => tree.flag(&path).then_some(ExternalValue::Yes),
            Answer::TriState => yes_no(tree.tri_state(&path)),
            Answer::Choice(_) => tree
                .text(&path)
                .map(|text| ExternalValue::Text(text.to_string())),
            Answer::Text => None,
        };
        if let Some(value) = value {
            out.insert(key, value);
        }
    }
}

fn yes_no(answer: TriState) -> Option<ExternalValue> {
    match answer {
        TriState::Yes => Some(ExternalValue::Yes),
        TriState::No => Some(ExternalValue::No),
        TriState::Unanswered => None,
    }
}

fn text<'a>(tree: &'a AnswerTree, path: &str) -> Option<&'a str> {
    tree.text(&FieldPath::new(path))
}

fn joined(parts: Vec<String>) -> Option<ExternalValue> {
    (!parts.is_empty()).then(|| ExternalValue::Text(parts.join(", ")))
}

fn location_name(tree: &AnswerTree) -> Option<ExternalValue> {
    let mut parts = Vec::new();
    if let Some(location) = text(tree, paths::LOCATION_NAME) {
        parts.push(format!("Area/Sanctuary: {location}"));
    }
    if let Some(trail) = text(tree, paths::TRAIL_NAME) {
        parts.push(format!("Trail/Bird Blind: {trail}"));
    }
    joined(parts)
}

fn point(tree: &AnswerTree) -> Option<ExternalValue> {
    let latitude = text(tree, paths::LATITUDE)?;
    let longitude = text(tree, paths::LONGITUDE)?;
    Some(ExternalValue::Text(format!("{latitude} {longitude}")))
}

fn unit_of_measure(tree: &AnswerTree) -> Option<ExternalValue> {
    let unit = match text(tree, paths::UNITS_PREFERRED)? {
        "mi" | "miles" => "mi",
        _ => "km",
    };
    Some(ExternalValue::Text(unit.to_string()))
}

fn type_of_trail(tree: &AnswerTree) -> Option<ExternalValue> {
    if let Some(chosen) = text(tree, paths::TRAIL_TYPE) {
        return Some(ExternalValue::Text(chosen.to_string()));
    }
    [
        (paths::TRAIL_LOOP, "loop"),
        (paths::TRAIL_OUT_AND_BACK, "out_and_back"),
        (paths::TRAIL_LOLLIPOP, "lollipop"),
    ]
    .into_iter()
    .find(|(path, _)| tree.flag(&FieldPath::new(*path)))
    .map(|(_, kind)| ExternalValue::Text(kind.to_string()))
}

fn has_fee(tree: &AnswerTree) -> bool {
    tree.flag(&paths::ENTRANCE_FEE.into()) || tree.flag(&paths::PARKING_FEE.into())
}

fn park_fee(tree: &AnswerTree) -> Option<ExternalValue> {
    Some(ExternalValue::from(has_fee(tree)))
}

fn park_fee_cost(tree: &AnswerTree) -> Option<ExternalValue> {
    if !has_fee(tree) {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(entrance) = text(tree, paths::ENTRANCE_FEE_DETAILS) {
        parts.push(format!("Entrance: {entrance}"));
    }
    if let Some(parking) = text(tree, paths::PARKING_FEE_DETAILS) {
        parts.push(format!("Parking: {parking}"));
    }
    joined(parts)
}
