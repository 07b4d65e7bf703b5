//! The exported report document: identity, JSON export and import.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::photos::PhotoRecord;
use birdability_types::{AnswerTree, FieldPath, TreeError};

/// Key of the photo metadata array in a report.
pub const PHOTOS_KEY: &str = "photos";

const FALLBACK_SLUG: &str = "new_site";

/// Error type for report export and import.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid report JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Report must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// The id and creation time stamped into every capture of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportIdentity {
    id: Uuid,
    created_at: DateTime<Utc>,
}

impl ReportIdentity {
    /// A fresh random identity created now.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4(), Utc::now())
    }

    pub fn new(id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The id as written into reports: hyphenated, upper-case hex.
    pub fn id_string(&self) -> String {
        self.id.hyphenated().to_string().to_ascii_uppercase()
    }

    /// The creation time as ISO-8601 with milliseconds and `Z`.
    pub fn created_at_string(&self) -> String {
        self.created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// The report document: every answer plus the photo metadata list.
pub fn report_json(tree: &AnswerTree, photos: &[PhotoRecord]) -> Result<Value, ReportError> {
    let mut map = tree.to_json_map();
    map.insert(PHOTOS_KEY.to_string(), serde_json::to_value(photos)?);
    Ok(Value::Object(map))
}

/// The report document as pretty-printed JSON.
pub fn report_string(tree: &AnswerTree, photos: &[PhotoRecord]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&report_json(tree, photos)?)?)
}

/// Lower-case ASCII alphanumerics of `name`, everything else as `_`.
pub fn slugify(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `<slug>.json` for a report called `name`.
pub fn report_filename(name: &str) -> String {
    format!("{}.json", slugify(name))
}

/// The filename used for a report of a given tree, from its `name` answer.
pub fn filename_for(tree: &AnswerTree) -> String {
    report_filename(tree.text(&catalog::NAME.into()).unwrap_or_default())
}

/// A report read back from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedReport {
    /// The answers, normalized to the checklist schema.
    pub tree: AnswerTree,
    pub photos: Vec<PhotoRecord>,
}

impl ImportedReport {
    /// The id the report was exported under, if it carries one.
    pub fn id(&self) -> Option<&str> {
        self.tree.text(&catalog::ID.into())
    }
}

/// Parse a report document.
///
/// Photo entries that are not valid metadata are skipped.
pub fn parse_report(text: &str) -> Result<ImportedReport, ReportError> {
    let value: Value = serde_json::from_str(text)?;
    parse_report_value(&value)
}

/// Move answers stored under older top-level keys into their groups.
///
/// All legacy leaves are taken out before any is written back, since
/// `finalThoughts` was a text leaf where the group now lives. An answer
/// already present at the target wins.
fn lift_legacy_fields(tree: &mut AnswerTree) -> Result<(), TreeError> {
    let found: Vec<_> = catalog::LEGACY_PATHS
        .iter()
        .filter_map(|(legacy, target)| {
            let value = tree.resolve(&FieldPath::new(*legacy))?.clone();
            Some((*legacy, *target, value))
        })
        .collect();

    for (legacy, _, _) in &found {
        tree.remove(&FieldPath::new(*legacy));
    }
    for (legacy, target, value) in found {
        let target = FieldPath::new(target);
        if tree.contains(&target) {
            debug!(legacy, %target, "answer already present, dropping legacy value");
            continue;
        }
        debug!(legacy, %target, "lifting legacy answer");
        tree.assign(&target, Some(value))?;
    }
    Ok(())
}

pub fn parse_report_value(value: &Value) -> Result<ImportedReport, ReportError> {
    let Value::Object(map) = value else {
        return Err(ReportError::NotAnObject(json_kind(value)));
    };

    let mut tree = AnswerTree::from_json(value)?;
    lift_legacy_fields(&mut tree)?;
    tree.normalize(catalog::schema());

    let photos: Vec<PhotoRecord> = match map.get(PHOTOS_KEY) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(%err, "skipping unreadable photo entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(kind = json_kind(other), "photos entry is not a list");
            Vec::new()
        }
        None => Vec::new(),
    };

    let report = ImportedReport { tree, photos };
    info!(id = report.id().unwrap_or("-"), photos = report.photos.len(), "report parsed");
    Ok(report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
