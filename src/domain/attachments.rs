//! Task attachments
//!
//! Persisted attachments carry a resolvable file path; pending ones own
//! their raw bytes until the task form is submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Image,
    Video,
    Audio,
}

impl FileType {
    pub const ALL: [FileType; 3] = [Self::Image, Self::Video, Self::Audio];

    /// Multipart field group the backend reads files of this type from.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
            Self::Audio => "audios",
        }
    }
}

/// Attachment as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub file_type: FileType,
    /// Absolute URL or a path relative to the backend origin.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A file picked for upload that has not been submitted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl PendingFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Read a file from disk into a pending upload.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, content })
    }
}

/// Files accumulated per media group while a task form is being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFiles {
    images: Vec<PendingFile>,
    videos: Vec<PendingFile>,
    audios: Vec<PendingFile>,
}

impl PendingFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly picked files to a group. Earlier picks are kept.
    pub fn add(&mut self, file_type: FileType, files: impl IntoIterator<Item = PendingFile>) {
        self.group_mut(file_type).extend(files);
    }

    /// Drop the file at `index` from a group. Out-of-range indices are ignored.
    pub fn remove(&mut self, file_type: FileType, index: usize) -> Option<PendingFile> {
        let group = self.group_mut(file_type);
        if index < group.len() {
            Some(group.remove(index))
        } else {
            None
        }
    }

    pub fn group(&self, file_type: FileType) -> &[PendingFile] {
        match file_type {
            FileType::Image => &self.images,
            FileType::Video => &self.videos,
            FileType::Audio => &self.audios,
        }
    }

    fn group_mut(&mut self, file_type: FileType) -> &mut Vec<PendingFile> {
        match file_type {
            FileType::Image => &mut self.images,
            FileType::Video => &mut self.videos,
            FileType::Audio => &mut self.audios,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.videos.len() + self.audios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All pending files tagged with their group, images first.
    pub fn iter(&self) -> impl Iterator<Item = (FileType, &PendingFile)> {
        FileType::ALL
            .into_iter()
            .flat_map(move |ft| self.group(ft).iter().map(move |f| (ft, f)))
    }
}
