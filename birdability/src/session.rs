//! One report being filled in: the form's position, its photos, its draft.

use tracing::{debug, info};
use url::Url;

use crate::catalog;
use crate::codec;
use crate::config::BirdabilityConfig;
use crate::drafts::{self, DraftError, DraftStore};
use crate::form::FormSurface;
use crate::mailto::EmailDraft;
use crate::photos::{AttachReport, PhotoFile, PhotoManager};
use crate::report::{self, ImportedReport, ReportError, ReportIdentity};
use crate::storage::Storage;
use crate::survey123::{ExternalParameterSet, ExternalTransform, Survey123Error, Survey123Mapper};
use birdability_types::{AnswerTree, Schema};

/// Number of sections of the questionnaire.
pub const TOTAL_SECTIONS: usize = 21;

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to save draft: {0}")]
    Draft(#[from] DraftError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Survey123 error: {0}")]
    Survey123(#[from] Survey123Error),
}

/// A move between sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    /// Go to a section by number, starting at 1.
    Jump(usize),
    /// Go to the last section.
    Finish,
}

/// A report ready to be written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub filename: String,
    pub contents: String,
}

/// The state of one survey session.
///
/// Every change goes through `&mut self`, so a draft is always saved before
/// the section pointer moves.
#[derive(Debug)]
pub struct Session<S> {
    schema: Schema,
    identity: ReportIdentity,
    section: usize,
    photos: PhotoManager,
    drafts: DraftStore<S>,
    mapper: Survey123Mapper,
}

impl<S: Storage> Session<S> {
    /// Start a session with the built-in checklist and default settings.
    pub fn new(storage: S) -> Self {
        Self {
            schema: catalog::schema().clone(),
            identity: ReportIdentity::generate(),
            section: 1,
            photos: PhotoManager::new(),
            drafts: DraftStore::new(storage),
            mapper: Survey123Mapper::default(),
        }
    }

    /// Start a session using the photo limit and Survey123 settings of `config`.
    pub fn from_config(storage: S, config: &BirdabilityConfig) -> Self {
        Self::new(storage)
            .with_photo_limit(config.photos.max_photos)
            .with_mapper(Survey123Mapper::from(&config.survey123))
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_photo_limit(mut self, limit: usize) -> Self {
        self.photos = PhotoManager::with_limit(limit);
        self
    }

    pub fn with_mapper(mut self, mapper: Survey123Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn identity(&self) -> &ReportIdentity {
        &self.identity
    }

    pub fn photos(&self) -> &PhotoManager {
        &self.photos
    }

    pub fn mapper(&self) -> &Survey123Mapper {
        &self.mapper
    }

    pub fn storage(&self) -> &S {
        self.drafts.storage()
    }

    // === Navigation ===

    /// The current section, starting at 1.
    pub fn section(&self) -> usize {
        self.section
    }

    pub fn is_last_section(&self) -> bool {
        self.section == TOTAL_SECTIONS
    }

    pub fn progress_percent(&self) -> f64 {
        self.section as f64 / TOTAL_SECTIONS as f64 * 100.0
    }

    /// `Section <n> of 21`.
    pub fn progress_label(&self) -> String {
        format!("Section {} of {}", self.section, TOTAL_SECTIONS)
    }

    /// Save the draft, then move.
    ///
    /// A move without a valid target changes nothing and saves nothing.
    /// Returns the section shown afterwards.
    pub fn navigate<F: FormSurface + ?Sized>(
        &mut self,
        form: &F,
        navigation: Navigation,
    ) -> Result<usize, SessionError> {
        let target = match navigation {
            Navigation::Next => self.section + 1,
            Navigation::Previous => self.section.saturating_sub(1),
            Navigation::Jump(section) => section,
            Navigation::Finish => TOTAL_SECTIONS,
        };
        if !(1..=TOTAL_SECTIONS).contains(&target) {
            debug!(?navigation, section = self.section, "navigation out of range");
            return Ok(self.section);
        }

        self.save(form)?;
        self.section = target;
        debug!(section = self.section, "section changed");
        Ok(self.section)
    }

    // === Answers and drafts ===

    /// The answers currently in the form, stamped with this session's identity.
    pub fn capture<F: FormSurface + ?Sized>(&self, form: &F) -> AnswerTree {
        codec::capture(form, &self.schema, &self.identity)
    }

    /// Capture the form and write the draft.
    pub fn save<F: FormSurface + ?Sized>(&mut self, form: &F) -> Result<AnswerTree, SessionError> {
        let tree = self.capture(form);
        self.drafts.save(&tree, self.photos.records())?;
        Ok(tree)
    }

    /// Put a stored draft back onto the form and reload the photo list.
    ///
    /// Returns whether there was anything to resume.
    pub fn resume<F: FormSurface + ?Sized>(&mut self, form: &mut F) -> bool {
        let draft = self.drafts.load();
        if draft.is_empty() {
            return false;
        }
        if let Some(tree) = &draft.tree {
            let touched = codec::restore(form, tree);
            debug!(touched, "draft restored onto form");
        }
        self.photos.restore_metadata(draft.photos);
        info!(photos = self.photos.len(), "draft resumed");
        true
    }

    /// Whether leaving now would lose something worth keeping.
    pub fn has_unsaved_content<F: FormSurface + ?Sized>(&self, form: &F) -> bool {
        !self.photos.is_empty() || drafts::has_names(&self.capture(form))
    }

    /// Forget the draft and start a new report.
    pub fn clear<F: FormSurface + ?Sized>(&mut self, form: &mut F) -> Result<(), SessionError> {
        self.drafts.clear()?;
        codec::reset(form);
        self.photos.clear();
        self.identity = ReportIdentity::generate();
        self.section = 1;
        info!(id = %self.identity.id_string(), "session cleared");
        Ok(())
    }

    // === Photos ===

    /// Attach files in order, then save.
    pub fn attach_photos<F: FormSurface + ?Sized>(
        &mut self,
        form: &F,
        files: impl IntoIterator<Item = PhotoFile>,
    ) -> Result<AttachReport, SessionError> {
        let report = self.photos.attach_all(files);
        if !report.attached.is_empty() {
            self.save(form)?;
        }
        Ok(report)
    }

    /// Remove a photo, then save.
    pub fn remove_photo<F: FormSurface + ?Sized>(
        &mut self,
        form: &F,
        id: &str,
    ) -> Result<bool, SessionError> {
        let removed = self.photos.remove(id);
        self.save(form)?;
        Ok(removed)
    }

    // === Import and export ===

    /// Load a report file onto the form.
    ///
    /// On a parse error the form is left as it was. The report keeps this
    /// session's identity; the imported id is only logged.
    pub fn import_report<F: FormSurface + ?Sized>(
        &mut self,
        form: &mut F,
        text: &str,
    ) -> Result<ImportedReport, SessionError> {
        let imported = report::parse_report(text)?;
        let touched = codec::restore(form, &imported.tree);
        info!(
            imported_id = imported.id().unwrap_or("-"),
            touched, "report imported"
        );
        Ok(imported)
    }

    /// The report document and its filename.
    pub fn export_report<F: FormSurface + ?Sized>(
        &self,
        form: &F,
    ) -> Result<ExportedReport, SessionError> {
        let tree = self.capture(form);
        Ok(ExportedReport {
            filename: report::filename_for(&tree),
            contents: report::report_string(&tree, self.photos.records())?,
        })
    }

    pub fn survey123_parameters<F: FormSurface + ?Sized>(&self, form: &F) -> ExternalParameterSet {
        self.mapper.transform(&self.capture(form))
    }

    pub fn survey123_url<F: FormSurface + ?Sized>(&self, form: &F) -> Result<Url, SessionError> {
        Ok(self.mapper.request_for(&self.capture(form))?)
    }

    pub fn email_draft<F: FormSurface + ?Sized>(&self, form: &F) -> Result<EmailDraft, SessionError> {
        Ok(EmailDraft::compose(
            &self.capture(form),
            self.photos.records(),
        )?)
    }
}
