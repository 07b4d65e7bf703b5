//! Photo attachments: durable metadata plus session-only previews.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The most photos a report can carry.
pub const MAX_PHOTOS: usize = 8;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A file the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Metadata of an attached photo, as stored in drafts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
    /// ISO-8601 time of attachment.
    pub timestamp: String,
}

impl PhotoRecord {
    /// Size rounded to whole kilobytes.
    pub fn size_kb(&self) -> u64 {
        self.size / 1024 + u64::from(self.size % 1024 >= 512)
    }
}

/// The displayable form of an attached photo. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPreview {
    pub id: String,
    pub data_url: String,
}

/// The bytes of an accepted photo, waiting to be turned into a preview.
#[derive(Debug)]
#[must_use = "a pending preview does nothing until completed"]
pub struct PendingPreview {
    id: String,
    mime: String,
    bytes: Vec<u8>,
}

impl PendingPreview {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Error type for photo attachment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("Maximum of {limit} photos allowed")]
    LimitReached { limit: usize },

    #[error("'{name}' is not an image (type '{mime}')")]
    NotAnImage { name: String, mime: String },
}

/// Outcome of attaching several files at once.
#[derive(Debug, Default)]
pub struct AttachReport {
    /// Ids of the attached photos, in order.
    pub attached: Vec<String>,
    /// File names that were refused, with the reason.
    pub rejected: Vec<(String, PhotoError)>,
}

/// Keeps the photo list of one report.
#[derive(Debug, Clone)]
pub struct PhotoManager {
    limit: usize,
    records: Vec<PhotoRecord>,
    previews: Vec<PhotoPreview>,
}

impl Default for PhotoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoManager {
    /// Create a manager allowing `MAX_PHOTOS` photos.
    pub fn new() -> Self {
        Self::with_limit(MAX_PHOTOS)
    }

    /// Create a manager with a lower photo limit. The limit never exceeds `MAX_PHOTOS`.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.min(MAX_PHOTOS),
            records: Vec::new(),
            previews: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn previews(&self) -> &[PhotoPreview] {
        &self.previews
    }

    pub fn preview(&self, id: &str) -> Option<&PhotoPreview> {
        self.previews.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.limit
    }

    /// Accept a file and record its metadata.
    ///
    /// Nothing changes when the file is refused.
    pub fn attach(&mut self, file: PhotoFile) -> Result<PendingPreview, PhotoError> {
        if self.is_full() {
            return Err(PhotoError::LimitReached { limit: self.limit });
        }
        if !file.is_image() {
            return Err(PhotoError::NotAnImage {
                name: file.name,
                mime: file.mime,
            });
        }

        let id = self.fresh_id();
        self.records.push(PhotoRecord {
            id: id.clone(),
            name: file.name.clone(),
            size: file.size(),
            mime: file.mime.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        info!(%id, name = %file.name, count = self.records.len(), "photo attached");

        Ok(PendingPreview {
            id,
            mime: file.mime,
            bytes: file.bytes,
        })
    }

    /// Turn pending bytes into a data-URL preview.
    ///
    /// Returns `None` if the photo was removed in the meantime.
    pub fn complete_preview(&mut self, pending: PendingPreview) -> Option<&PhotoPreview> {
        if !self.records.iter().any(|r| r.id == pending.id) {
            debug!(id = %pending.id, "photo removed before its preview was ready");
            return None;
        }
        let data_url = format!(
            "data:{};base64,{}",
            pending.mime,
            STANDARD.encode(&pending.bytes)
        );
        self.previews.push(PhotoPreview {
            id: pending.id,
            data_url,
        });
        self.previews.last()
    }

    /// Attach files one after the other, each with its preview.
    pub fn attach_all(&mut self, files: impl IntoIterator<Item = PhotoFile>) -> AttachReport {
        let mut report = AttachReport::default();
        for file in files {
            let name = file.name.clone();
            match self.attach(file) {
                Ok(pending) => {
                    let id = pending.id().to_string();
                    self.complete_preview(pending);
                    report.attached.push(id);
                }
                Err(err) => {
                    warn!(%name, %err, "photo rejected");
                    report.rejected.push((name, err));
                }
            }
        }
        report
    }

    /// Remove a photo. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.previews.retain(|p| p.id != id);
        let removed = self.records.len() != before;
        if removed {
            info!(%id, "photo removed");
        }
        removed
    }

    /// Replace the list with stored metadata. Previews are gone after a reload.
    pub fn restore_metadata(&mut self, records: Vec<PhotoRecord>) {
        self.clear();
        for record in records {
            if self.is_full() {
                warn!(id = %record.id, limit = self.limit, "dropping stored photo over the limit");
                continue;
            }
            if self.records.iter().any(|r| r.id == record.id) {
                warn!(id = %record.id, "dropping duplicate stored photo");
                continue;
            }
            self.records.push(record);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.previews.clear();
    }

    /// `photo_<unix-millis>_<9 base36 chars>`, unique among current records.
    fn fresh_id(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let suffix: String = (0..9)
                .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
                .collect();
            let id = format!("photo_{}_{}", Utc::now().timestamp_millis(), suffix);
            if !self.records.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }
}
