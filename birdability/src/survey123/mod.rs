//! Mapping a report onto the ArcGIS Survey123 birding-location form.
//!
//! The transform turns an `AnswerTree` into an `ExternalParameterSet` keyed by
//! Survey123 question paths (`group/sub/field`). `build_request` renders the
//! set as a pre-filled form URL. How keys are rendered depends on the form
//! `Revision`; the mapping itself is shared.

mod rules;

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use birdability_types::AnswerTree;

/// The published Birdability checklist form.
pub const DEFAULT_BASE_URL: &str =
    "https://survey123.arcgis.com/share/7b5a83ebc9044268a03b84ff9fe12c71";

/// Prefix Survey123 expects in front of every pre-filled question.
pub const DEFAULT_FIELD_PREFIX: &str = "field:";

/// Error type for building Survey123 requests.
#[derive(Debug, thiserror::Error)]
pub enum Survey123Error {
    #[error("Invalid Survey123 base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Revision of the Survey123 form, deciding how question keys are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Keys carry their full question path: `field:parking_info/pull_off`.
    V1,
    /// Keys carry only the question name: `field:pull_off`.
    #[default]
    V2,
}

impl Revision {
    /// Render a canonical key the way this revision of the form expects it.
    pub fn render_key(self, key: &str) -> &str {
        match self {
            Self::V1 => key,
            Self::V2 => key.rsplit('/').next().unwrap_or(key),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        })
    }
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown Survey123 revision '{other}' (expected v1 or v2)")),
        }
    }
}

/// The value of one pre-filled Survey123 question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalValue {
    Yes,
    No,
    Text(String),
}

impl ExternalValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Text(s) => s,
        }
    }
}

impl From<bool> for ExternalValue {
    fn from(b: bool) -> Self {
        if b { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for ExternalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Survey123 parameters in the order they were produced.
///
/// Setting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalParameterSet {
    params: Vec<(String, ExternalValue)>,
}

impl ExternalParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ExternalValue) {
        let key = key.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ExternalValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExternalValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for ExternalParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value.as_str())?;
        }
        map.end()
    }
}

/// A transform from answers to the parameters of an external form.
pub trait ExternalTransform {
    /// The form revision the parameters are meant for.
    fn revision(&self) -> Revision;

    /// Map the answers. Missing sections produce no parameters, never an error.
    fn transform(&self, tree: &AnswerTree) -> ExternalParameterSet;
}

/// The Birdability → Survey123 transform and URL builder.
#[derive(Debug, Clone)]
pub struct Survey123Mapper {
    revision: Revision,
    base_url: String,
    field_prefix: String,
}

impl Default for Survey123Mapper {
    fn default() -> Self {
        Self::new(Revision::default())
    }
}

impl Survey123Mapper {
    /// Create a mapper for the published form.
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            base_url: DEFAULT_BASE_URL.to_string(),
            field_prefix: DEFAULT_FIELD_PREFIX.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.field_prefix = prefix.into();
        self
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = revision;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn field_prefix(&self) -> &str {
        &self.field_prefix
    }

    /// The pre-filled form URL for a parameter set.
    pub fn build_request(&self, params: &ExternalParameterSet) -> Result<Url, Survey123Error> {
        self.build(params.iter().map(|(k, v)| (k, v.as_str())))
    }

    /// The pre-filled form URL for an untyped JSON object of parameters.
    ///
    /// Values that are not strings cannot be pre-filled and are dropped.
    pub fn build_request_from_json(&self, params: &Map<String, Value>) -> Result<Url, Survey123Error> {
        let usable = params.iter().filter_map(|(key, value)| match value {
            Value::String(s) => Some((key.as_str(), s.as_str())),
            other => {
                warn!(key = %key, value = %other, "skipping parameter with invalid value");
                None
            }
        });
        self.build(usable)
    }

    /// Transform `tree` and build its URL.
    pub fn request_for(&self, tree: &AnswerTree) -> Result<Url, Survey123Error> {
        self.build_request(&self.transform(tree))
    }

    fn build<'a>(
        &self,
        params: impl Iterator<Item = (&'a str, &'a str)>,
    ) -> Result<Url, Survey123Error> {
        let mut url = Url::parse(&self.base_url).map_err(|source| Survey123Error::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                let rendered = self.revision.render_key(key);
                if rendered.is_empty() {
                    warn!(key, "skipping parameter without a question name");
                    continue;
                }
                query.append_pair(&format!("{}{}", self.field_prefix, rendered), value);
            }
        }
        debug!(revision = %self.revision, url = %url, "built Survey123 request");
        Ok(url)
    }
}

impl ExternalTransform for Survey123Mapper {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn transform(&self, tree: &AnswerTree) -> ExternalParameterSet {
        let mut params = ExternalParameterSet::new();
        rules::collect(tree, &mut params);
        debug!(count = params.len(), "mapped answers to Survey123");
        params
    }
}
