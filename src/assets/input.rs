use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::WigglegramResult;

/// One uploaded file: its name and undecoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct InputImage {
    /// File name as uploaded (no directory component).
    pub name: String,
    /// Encoded image bytes (JPEG or PNG).
    pub bytes: Vec<u8>,
}

impl InputImage {
    /// Wrap in-memory upload bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read an image file from disk, naming it after its file name.
    pub fn from_path(path: impl AsRef<Path>) -> WigglegramResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

impl std::fmt::Debug for InputImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputImage")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
