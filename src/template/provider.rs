use std::collections::VecDeque;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use super::Template;
use crate::{error::Result, ext::PathExt, filter::Filter};

/// Sequential source of templates.
pub trait TemplateProvider {
    /// Returns the next template, `Ok(None)` once the sequence is exhausted.
    ///
    /// Any `Err` is fatal for the run; it is never treated as end-of-sequence.
    fn next_template(&mut self) -> Result<Option<Template>>;
}

impl<P: TemplateProvider + ?Sized> TemplateProvider for Box<P> {
    fn next_template(&mut self) -> Result<Option<Template>> {
        (**self).next_template()
    }
}

/// Yields every regular file below an input directory, in file name order.
///
/// Both the name and the path of a yielded template are the file's path
/// relative to the input directory, so the provider serves equally as a
/// source of main templates and of named common templates.
pub struct FileSystemProvider {
    input_dir: PathBuf,
    filter: Option<Box<dyn Filter>>,
    entries: Option<walkdir::IntoIter>,
}

impl FileSystemProvider {
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self { input_dir: input_dir.as_ref().to_path_buf(), filter: None, entries: None }
    }

    /// Only files whose relative path is accepted by `filter` are yielded.
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    fn accepts(&self, relative_path: &str) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter.accept(relative_path))
    }
}

impl TemplateProvider for FileSystemProvider {
    fn next_template(&mut self) -> Result<Option<Template>> {
        if self.entries.is_none() {
            debug!("Indexing templates in '{}'", self.input_dir.display());
            self.entries =
                Some(WalkDir::new(&self.input_dir).sort_by_file_name().into_iter());
        }

        loop {
            let Some(entry) = self.entries.as_mut().and_then(|entries| entries.next())
            else {
                return Ok(None);
            };
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.input_dir)
                .map_err(anyhow::Error::from)?
                .to_slash_string()?;
            if !self.accepts(&relative_path) {
                debug!("Skipping filtered template: {relative_path}");
                continue;
            }

            let reader = File::open(entry.path())?;
            return Ok(Some(Template::named(
                relative_path.clone(),
                relative_path,
                Box::new(reader),
            )));
        }
    }
}

/// Provider over templates held in memory.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    items: VecDeque<(Option<String>, String, Vec<u8>)>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(
        mut self,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.items.push_back((None, path.into(), content.into()));
        self
    }

    pub fn with_named_template(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.items.push_back((Some(name.into()), path.into(), content.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TemplateProvider for MemoryProvider {
    fn next_template(&mut self) -> Result<Option<Template>> {
        Ok(self.items.pop_front().map(|(name, path, content)| Template {
            name,
            path,
            reader: Box::new(Cursor::new(content)),
        }))
    }
}
