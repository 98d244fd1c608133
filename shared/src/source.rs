//! Named byte-blob lookup used to resolve texture files.

use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {name:?}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid texture name {0:?}")]
    InvalidName(String),
}

/// Archive-like store that can hand out a file's bytes by name.
///
/// `Ok(None)` means the name is simply not present, which callers treat as
/// a valid state rather than an error.
pub trait TextureSource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>, SourceError>;
}

/// In-memory archive. Names match exactly first, then ignoring ASCII case.
impl TextureSource for HashMap<String, Vec<u8>> {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>, SourceError> {
        if let Some(data) = self.get(name) {
            return Ok(Some(data.clone()));
        }
        Ok(self
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, data)| data.clone()))
    }
}

/// Texture source backed by a directory of loose files.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextureSource for DirSource {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>, SourceError> {
        // Names come from asset data, keep them inside the root.
        let relative = Path::new(name);
        if name.is_empty()
            || relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(SourceError::InvalidName(name.to_string()));
        }

        match std::fs::read(self.root.join(relative)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
