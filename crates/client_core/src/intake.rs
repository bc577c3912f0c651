//! File intake: validation and staging of the image the user picked or dropped.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use shared::error::ClientError;

const IMAGE_CATEGORY: &str = "image/";

/// An accepted image, shared cheaply with the upload task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file offered by a picker or a drop event, not yet validated.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    fn declared_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or_default().trim()
    }
}

#[derive(Debug, Default)]
pub struct FileIntake {
    selected: Option<SelectedFile>,
    drag_active: bool,
}

impl FileIntake {
    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Accepts an image candidate, replacing the current selection.
    ///
    /// Rejected candidates leave the previous selection untouched.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<&SelectedFile, ClientError> {
        let declared = candidate.declared_type().to_ascii_lowercase();
        if !declared.starts_with(IMAGE_CATEGORY) {
            tracing::debug!(name = %candidate.name, content_type = %declared, "rejected non-image file");
            return Err(ClientError::InvalidFileType {
                content_type: candidate.declared_type().to_string(),
            });
        }

        tracing::info!(name = %candidate.name, bytes = candidate.bytes.len(), "staged image");
        Ok(&*self.selected.insert(SelectedFile {
            name: candidate.name,
            content_type: declared,
            bytes: candidate.bytes.into(),
        }))
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Handles a drop; the highlight is cleared whether or not the file is accepted.
    pub fn drop_file(&mut self, candidate: FileCandidate) -> Result<&SelectedFile, ClientError> {
        self.drag_active = false;
        self.select_file(candidate)
    }
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
