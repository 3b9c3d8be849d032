//! In-memory file part received from a client.

use bytes::Bytes;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field the file arrived under (`file1` or `file2`).
    pub field: String,
    /// Original filename, reduced to its last path component.
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        field: impl Into<String>,
        filename: &str,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self {
            field: field.into(),
            filename: base_name(filename).to_string(),
            content_type,
            data,
        }
    }

    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Strips any directory components a client may have sent along with the name.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}
