use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use birdability::{
    AnswerTree, BirdabilityConfig, ControlSet, DraftStore, EmailDraft, ExternalTransform,
    FieldKind, FileStorage, MemoryStorage, PhotoManager, PhotoRecord, ReportIdentity, Revision,
    Storage, Survey123Mapper, catalog, codec, report, schema,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

/// A report file brought into the shape of the current checklist.
#[derive(Debug)]
pub struct LoadedReport {
    pub tree: AnswerTree,
    pub photos: Vec<PhotoRecord>,
}

/// Read a report file and lay it over a blank checklist.
///
/// The file keeps its own id and creation time when they are readable;
/// otherwise it gets a fresh identity.
pub fn load_report(config: &BirdabilityConfig, path: &Path) -> Result<LoadedReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let imported = report::parse_report(&text)
        .with_context(|| format!("{} is not a Birdability report", path.display()))?;

    let identity = file_identity(&imported.tree).unwrap_or_else(|| {
        warn!(report = %path.display(), "report has no usable id, issuing a new one");
        ReportIdentity::generate()
    });

    let mut form = ControlSet::for_schema(schema());
    codec::restore(&mut form, &imported.tree);
    let tree = codec::capture(&form, schema(), &identity);

    let mut photos = PhotoManager::with_limit(config.photos.max_photos);
    photos.restore_metadata(imported.photos);

    info!(id = %identity.id_string(), photos = photos.len(), "report loaded");
    Ok(LoadedReport {
        tree,
        photos: photos.records().to_vec(),
    })
}

fn file_identity(tree: &AnswerTree) -> Option<ReportIdentity> {
    let id = Uuid::parse_str(tree.text(&catalog::ID.into())?).ok()?;
    let created_at = DateTime::parse_from_rfc3339(tree.text(&catalog::CREATED_AT.into())?).ok()?;
    Some(ReportIdentity::new(id, created_at.with_timezone(&Utc)))
}

fn mapper(config: &BirdabilityConfig, revision: Option<Revision>) -> Survey123Mapper {
    let mapper = Survey123Mapper::from(&config.survey123);
    match revision {
        Some(revision) => mapper.with_revision(revision),
        None => mapper,
    }
}

fn describe(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Choice(options) => format!("choice({})", options.join("|")),
        other => other.name().to_string(),
    }
}

pub fn schema_listing() -> Vec<String> {
    schema()
        .fields()
        .iter()
        .map(|field| format!("{:<64} {}", field.path.as_str(), describe(&field.kind)))
        .collect()
}

pub fn print_schema() {
    for line in schema_listing() {
        println!("{line}");
    }
}

pub fn params(config: &BirdabilityConfig, path: &Path, revision: Option<Revision>) -> Result<()> {
    let loaded = load_report(config, path)?;
    let params = mapper(config, revision).transform(&loaded.tree);
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

pub fn survey123(
    config: &BirdabilityConfig,
    path: &Path,
    revision: Option<Revision>,
) -> Result<()> {
    let loaded = load_report(config, path)?;
    let url = mapper(config, revision).request_for(&loaded.tree)?;
    println!("{url}");
    Ok(())
}

/// Write the normalized report into `out_dir`, returning where it went.
pub fn write_report(config: &BirdabilityConfig, path: &Path, out_dir: &Path) -> Result<PathBuf> {
    let loaded = load_report(config, path)?;
    let contents = report::report_string(&loaded.tree, &loaded.photos)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let target = out_dir.join(report::filename_for(&loaded.tree));
    fs::write(&target, contents)
        .with_context(|| format!("failed to write {}", target.display()))?;

    info!(target = %target.display(), "report exported");
    Ok(target)
}

pub fn export(config: &BirdabilityConfig, path: &Path, out_dir: &Path) -> Result<()> {
    let target = write_report(config, path, out_dir)?;
    println!("{}", target.display());
    Ok(())
}

pub fn email(config: &BirdabilityConfig, path: &Path) -> Result<()> {
    let loaded = load_report(config, path)?;
    let draft = EmailDraft::compose(&loaded.tree, &loaded.photos)?;
    println!("{}", draft.to_mailto_url());
    Ok(())
}

pub fn draft(config: &BirdabilityConfig, clear: bool) -> Result<()> {
    let output = match &config.storage.dir {
        Some(dir) => {
            let storage = FileStorage::open(dir)
                .with_context(|| format!("failed to open draft directory {}", dir.display()))?;
            draft_with(DraftStore::new(storage), clear)?
        }
        None => {
            warn!("storage.dir is not configured, no draft to show");
            draft_with(DraftStore::new(MemoryStorage::new()), clear)?
        }
    };
    println!("{output}");
    Ok(())
}

fn draft_with<S: Storage>(mut drafts: DraftStore<S>, clear: bool) -> Result<String> {
    if clear {
        drafts.clear()?;
        return Ok("Draft cleared".to_string());
    }

    let loaded = drafts.load();
    match loaded.tree {
        Some(tree) => Ok(report::report_string(&tree, &loaded.photos)?),
        None if !loaded.photos.is_empty() => {
            Ok(format!("Draft has {} photo(s) and no answers", loaded.photos.len()))
        }
        None => Ok("No draft saved".to_string()),
    }
}
