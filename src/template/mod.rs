//! Units flowing through the pipeline and the sources that produce them.
//!
//! - `provider`: the [`TemplateProvider`] trait and its file-system and in-memory implementations

pub mod provider;

pub use provider::{FileSystemProvider, MemoryProvider, TemplateProvider};

use std::fmt;
use std::io::{Cursor, Read};

use crate::{error::Result, ioutils::read_bytes};

/// A named, destination-relative piece of content.
///
/// The reader is single-pass: whoever holds the template owns the stream and
/// drains it at most once. Forwarding a template after reading it requires
/// building a fresh one, see [`Template::from_bytes`].
pub struct Template {
    /// Optional name used to reference common templates
    pub name: Option<String>,
    /// Destination-relative, `/`-separated path
    pub path: String,
    /// Content stream
    pub reader: Box<dyn Read>,
}

impl Template {
    pub fn new(path: impl Into<String>, reader: Box<dyn Read>) -> Self {
        Self { name: None, path: path.into(), reader }
    }

    pub fn named(
        name: impl Into<String>,
        path: impl Into<String>,
        reader: Box<dyn Read>,
    ) -> Self {
        Self { name: Some(name.into()), path: path.into(), reader }
    }

    /// Builds a template over an in-memory buffer.
    pub fn from_bytes(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(path, Box::new(Cursor::new(content.into())))
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Consumes the template and drains its stream.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        read_bytes(self.reader)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
