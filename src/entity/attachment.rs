// src/entity/attachment.rs
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    #[default]
    Document,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentKind::Image => write!(f, "image"),
            AttachmentKind::Document => write!(f, "document"),
        }
    }
}

/// A file embedded in a record, usually as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl Attachment {
    pub fn new(name: String, url: String, kind: AttachmentKind) -> Self {
        Self {
            id: new_id(),
            name,
            url,
            kind,
            extension: None,
        }
    }

    /// Read a file and embed it as a base64 data URI.
    ///
    /// `image/*` MIME types are tagged as images, everything else as documents.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let kind = if mime.type_() == mime_guess::mime::IMAGE {
            AttachmentKind::Image
        } else {
            AttachmentKind::Document
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let url = format!("data:{};base64,{}", mime, BASE64.encode(bytes));

        let mut attachment = Self::new(name, url, kind);
        attachment.extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        Ok(attachment)
    }

    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_file_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nebula.PNG");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let attachment = Attachment::from_file(&path).unwrap();
        assert_eq!(attachment.name, "nebula.PNG");
        assert!(attachment.is_image());
        assert_eq!(attachment.extension.as_deref(), Some("png"));
        assert!(attachment.url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_from_file_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resume.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let attachment = Attachment::from_file(&path).unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Document);
        assert!(attachment.url.starts_with("data:application/pdf;base64,"));
        assert!(attachment.url.ends_with(&BASE64.encode(b"%PDF-1.4")));
    }

    #[test]
    fn test_from_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(Attachment::from_file(&tmp.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let attachment = Attachment::new(
            "a.txt".to_string(),
            "data:text/plain;base64,".to_string(),
            AttachmentKind::Document,
        );
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "document");
        assert!(json.get("extension").is_none());
    }
}
