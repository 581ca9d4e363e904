//! Attachment intake for the two case file slots.
//!
//! Files are checked for extension and size when they arrive, held in memory
//! until the owning case passes validation, and only then written to the
//! upload directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UploadConfig;

/// The two named attachment slots on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadSlot {
    CaseFile,
    InterimOrdersFile,
}

impl UploadSlot {
    pub const ALL: [Self; 2] = [Self::CaseFile, Self::InterimOrdersFile];

    /// Multipart field name for this slot.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::CaseFile => "case_file",
            Self::InterimOrdersFile => "interim_orders_file",
        }
    }

    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File type not allowed: {filename}")]
    ExtensionNotAllowed { filename: String },

    #[error("File too large: {filename} exceeds {limit} bytes")]
    TooLarge { filename: String, limit: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Only one file may be uploaded for {0}")]
    DuplicateSlot(UploadSlot),

    #[error("Failed to store upload: {0}")]
    Io(String),
}

/// A file that passed the intake checks but has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    slot: UploadSlot,
    filename: String,
    bytes: Vec<u8>,
}

impl PendingFile {
    #[must_use]
    pub const fn slot(&self) -> UploadSlot {
        self.slot
    }

    /// Sanitized original filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Up to one pending file per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUploads {
    pub case_file: Option<PendingFile>,
    pub interim_orders_file: Option<PendingFile>,
}

impl PendingUploads {
    /// Places a file into its slot; a second file for the same slot is rejected.
    pub fn insert(&mut self, file: PendingFile) -> Result<(), UploadError> {
        let target = match file.slot {
            UploadSlot::CaseFile => &mut self.case_file,
            UploadSlot::InterimOrdersFile => &mut self.interim_orders_file,
        };
        if target.is_some() {
            return Err(UploadError::DuplicateSlot(file.slot));
        }
        *target = Some(file);
        Ok(())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.case_file.is_none() && self.interim_orders_file.is_none()
    }
}

/// Writes accepted files under the configured upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            max_file_size: config.max_file_size_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload dir {}", self.root.display()))
    }

    /// Checks extension and size. The original filename is sanitized; an
    /// empty filename (a form field left blank) yields `Ok(None)`.
    pub fn accept(
        &self,
        slot: UploadSlot,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<PendingFile>, UploadError> {
        if original_name.trim().is_empty() {
            return Ok(None);
        }

        if !self.extension_allowed(original_name) {
            return Err(UploadError::ExtensionNotAllowed {
                filename: original_name.to_string(),
            });
        }

        if bytes.len() > self.max_file_size {
            return Err(UploadError::TooLarge {
                filename: original_name.to_string(),
                limit: self.max_file_size,
            });
        }

        let filename = secure_filename(original_name)
            .ok_or_else(|| UploadError::InvalidFilename(original_name.to_string()))?;

        Ok(Some(PendingFile {
            slot,
            filename,
            bytes,
        }))
    }

    fn extension_allowed(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext))
    }

    /// Writes the file and returns the stored filename. A random prefix keeps
    /// two uploads with the same original name from overwriting each other.
    pub async fn persist(&self, file: PendingFile) -> Result<String, UploadError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let stored_name = format!("{}_{}", &token[..12], file.filename);
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| UploadError::Io(format!("{}: {e}", path.display())))?;

        debug!(slot = %file.slot, stored_name = %stored_name, bytes = file.bytes.len(), "Stored upload");
        Ok(stored_name)
    }

    /// Best-effort removal of files written for a mutation that later failed.
    pub async fn discard(&self, stored_names: &[String]) {
        for name in stored_names {
            let path = self.root.join(name);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove orphaned upload {}: {}", path.display(), e);
            }
        }
    }
}

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Path components are dropped, whitespace runs become `_`, and leading dots
/// or underscores are stripped so the result can never escape the upload
/// directory or become a hidden file. Returns `None` if nothing is left.
#[must_use]
pub fn secure_filename(name: &str) -> Option<String> {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars =
        UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("Invalid regex"));

    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars.replace_all(&joined, "");
    let trimmed = cleaned.trim_start_matches(['.', '_']).trim_end_matches(['.', '_']);

    if trimmed.is_empty() || !trimmed.contains('.') {
        None
    } else {
        Some(trimmed.to_string())
    }
}
