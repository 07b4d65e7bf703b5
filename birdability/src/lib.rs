#![doc = include_str!("../README.md")]

// Re-export the core types
pub use birdability_types::*;

pub mod catalog;
pub use catalog::schema;

mod form;
pub use form::{ControlKind, ControlSet, FormControl, FormSurface};

pub mod codec;

mod photos;
pub use photos::{
    AttachReport, MAX_PHOTOS, PendingPreview, PhotoError, PhotoFile, PhotoManager, PhotoPreview,
    PhotoRecord,
};

mod storage;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

pub mod drafts;
pub use drafts::{Draft, DraftError, DraftStore};

pub mod report;
pub use report::{ImportedReport, ReportError, ReportIdentity};

mod mailto;
pub use mailto::EmailDraft;

pub mod survey123;
pub use survey123::{
    ExternalParameterSet, ExternalTransform, ExternalValue, Revision, Survey123Error,
    Survey123Mapper,
};

mod session;
pub use session::{ExportedReport, Navigation, Session, SessionError, TOTAL_SECTIONS};

mod config;
pub use config::{
    BirdabilityConfig, DEFAULT_CONFIG_FILE, PhotosConfig, StorageConfig, Survey123Config,
};
