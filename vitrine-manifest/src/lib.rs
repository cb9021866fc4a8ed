//! vitrine-manifest library - regenerates the catalog manifest
//!
//! Scans a data directory for item documents, reports unreadable files and
//! validation warnings, orders the documents most recent first and writes
//! `index.json` for the viewer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use vitrine_common::normalize::{field, keys};
use vitrine_common::{time, validate_raw};

/// Manifest file name, skipped when scanning
pub const MANIFEST_FILE: &str = "index.json";

/// Manifest format version
pub const MANIFEST_VERSION: u32 = 1;

pub const EXIT_OK: u8 = 0;
/// Strict mode and at least one warning
pub const EXIT_STRICT_WARNINGS: u8 = 1;
pub const EXIT_DATA_DIR_MISSING: u8 = 2;
pub const EXIT_WRITE_FAILED: u8 = 3;

/// Manifest generation errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Data directory not found: {0}")]
    DataDirMissing(PathBuf),

    #[error("Failed to scan {0}: {1}")]
    Scan(PathBuf, #[source] std::io::Error),

    #[error("Failed to render manifest: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Failed to write manifest {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

impl ManifestError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            ManifestError::DataDirMissing(_) | ManifestError::Scan(..) => EXIT_DATA_DIR_MISSING,
            ManifestError::Render(_) | ManifestError::Write(..) => EXIT_WRITE_FAILED,
        }
    }
}

/// One listed document and its recency score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// File name relative to the data directory
    pub href: String,
    /// Unix epoch milliseconds, larger is more recent
    pub score: i64,
}

/// Result of scanning the data directory
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Readable documents, most recent first
    pub entries: Vec<ManifestEntry>,
    /// One line per problem file, in file name order
    pub warnings: Vec<String>,
}

/// The manifest document read by the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub version: u32,
    pub generated_at: String,
    pub cafes: Vec<String>,
}

/// Recency score of a document in epoch milliseconds
///
/// Numeric `_ts` first, then the roast date (`YYYY-MM-DD`, UTC midnight),
/// then the file modification time.
pub fn recency_score(doc: &Value, modified_ms: i64) -> i64 {
    if let Some(ts) = doc.get("_ts").and_then(Value::as_f64) {
        if ts.is_finite() {
            return ts as i64;
        }
    }

    let roast_date = field(doc, keys::ROAST_DATE)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0));
    if let Some(midnight) = roast_date {
        return midnight.and_utc().timestamp_millis();
    }

    modified_ms
}

fn modified_millis(path: &Path) -> i64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or(0)
}

/// Item documents in `data_dir`, sorted by file name
fn document_paths(data_dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let read_dir =
        fs::read_dir(data_dir).map_err(|e| ManifestError::Scan(data_dir.to_path_buf(), e))?;

    let mut paths = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ManifestError::Scan(data_dir.to_path_buf(), e))?;
        let path = entry.path();
        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let is_manifest = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.eq_ignore_ascii_case(MANIFEST_FILE));
        if path.is_file() && is_json && !is_manifest {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Scan `data_dir` and score every readable document
pub fn collect_entries(data_dir: &Path) -> Result<Collected, ManifestError> {
    let mut collected = Collected::default();

    for path in document_paths(data_dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let doc: Value = match fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()))
        {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Failed to read {}: {}", name, e);
                collected.warnings.push(format!("{}: invalid or unreadable JSON", name));
                continue;
            }
        };

        let problems = validate_raw(&doc);
        if !problems.is_empty() {
            let message = format!("{}: {}", name, problems.join("; "));
            warn!("{}", message);
            collected.warnings.push(message);
        }

        let score = recency_score(&doc, modified_millis(&path));
        debug!(file = %name, score, "Scored document");
        collected.entries.push(ManifestEntry { href: name, score });
    }

    // Stable: equal scores keep file name order
    collected.entries.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(collected)
}

/// Manifest listing `entries` in order, stamped with the current time
pub fn build_manifest(entries: &[ManifestEntry]) -> Manifest {
    Manifest {
        version: MANIFEST_VERSION,
        generated_at: time::iso_now_seconds(),
        cafes: entries.iter().map(|e| e.href.clone()).collect(),
    }
}

/// Render the manifest as JSON indented by `indent` spaces
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn render_manifest(manifest: &Manifest, indent: usize) -> Result<String, ManifestError> {
    let indent_bytes = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent_bytes);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Options for one generator run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/index.json`
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub dry_run: bool,
    pub indent: usize,
}

impl GenerateOptions {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.data_dir.join(MANIFEST_FILE))
    }
}

/// What a generator run produced
#[derive(Debug, Clone)]
pub struct Report {
    pub manifest: Manifest,
    /// Rendered manifest text (without trailing newline)
    pub rendered: String,
    pub warnings: Vec<String>,
    /// Where the manifest was written (None on dry runs)
    pub written_to: Option<PathBuf>,
    /// Warnings fail the run
    pub strict: bool,
}

impl Report {
    pub fn exit_code(&self) -> u8 {
        if self.strict && !self.warnings.is_empty() {
            EXIT_STRICT_WARNINGS
        } else {
            EXIT_OK
        }
    }
}

/// Scan, build, render and (unless dry-run) write the manifest
pub fn generate(options: &GenerateOptions) -> Result<Report, ManifestError> {
    if !options.data_dir.is_dir() {
        return Err(ManifestError::DataDirMissing(options.data_dir.clone()));
    }

    let collected = collect_entries(&options.data_dir)?;
    let manifest = build_manifest(&collected.entries);
    let rendered = render_manifest(&manifest, options.indent)?;

    let written_to = if options.dry_run {
        None
    } else {
        let path = options.output_path();
        fs::write(&path, format!("{}\n", rendered))
            .map_err(|e| ManifestError::Write(path.clone(), e))?;
        Some(path)
    };

    Ok(Report {
        manifest,
        rendered,
        warnings: collected.warnings,
        written_to,
        strict: options.strict,
    })
}
