use std::io::{BufRead, BufReader};

use log::{debug, error};

use super::{BaseCollector, Collector};
use crate::{
    constants::{DEFAULT_MULTI_FILE_HEADER, DEFAULT_MULTI_FILE_PREFIX, HEADER_NAME_ATTRIBUTE},
    error::{Error, Result},
    template::Template,
};

/// Splits multi-file templates into one template per embedded file.
///
/// A template is split only when its file name starts with the multi-file
/// prefix. Its content is a sequence of sections, each introduced by a header
/// line such as `@@ name="src/lib.rs"`; every section becomes a template
/// whose path is the header's name and whose content is the section body,
/// line terminators included.
pub struct SplitterCollector {
    name_prefix: String,
    header_prefix: String,
    base: BaseCollector,
}

impl SplitterCollector {
    pub fn new(next: Option<Box<dyn Collector>>) -> Self {
        Self::with_prefixes(DEFAULT_MULTI_FILE_PREFIX, DEFAULT_MULTI_FILE_HEADER, next)
    }

    pub fn with_prefixes(
        name_prefix: impl Into<String>,
        header_prefix: impl Into<String>,
        next: Option<Box<dyn Collector>>,
    ) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            header_prefix: header_prefix.into(),
            base: BaseCollector::new(next),
        }
    }

    /// Header line announcing a file called `name`.
    pub fn create_header_with_name(&self, name: &str) -> String {
        format!("{}{HEADER_NAME_ATTRIBUTE}\"{name}\"", self.header_prefix)
    }

    fn is_multi_file(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        file_name.starts_with(&self.name_prefix)
    }

    fn is_header(&self, line: &[u8]) -> bool {
        line.starts_with(self.header_prefix.as_bytes())
    }

    /// Extracts the output path from a header line.
    fn parse_header(&self, template_path: &str, line: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(line);
        let invalid = || Error::InvalidHeader {
            template_path: template_path.to_string(),
            line: text.trim_end().to_string(),
        };

        let path = text
            .trim_end()
            .strip_prefix(self.header_prefix.as_str())
            .and_then(|rest| rest.trim_start().strip_prefix(HEADER_NAME_ATTRIBUTE))
            .map(|name| name.replace('"', ""))
            .ok_or_else(invalid)?;
        if path.is_empty() {
            return Err(invalid());
        }
        Ok(path)
    }

    fn split(&mut self, template: Template) -> Result<()> {
        let template_path = template.path;
        let mut reader = BufReader::new(template.reader);
        let mut current: Option<(String, Vec<u8>)> = None;
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            if self.is_header(&line) {
                if let Some((path, content)) = current.take() {
                    self.base.forward(Template::from_bytes(path, content))?;
                }
                let path = self.parse_header(&template_path, &line)?;
                debug!("Splitting '{template_path}': new file '{path}'");
                current = Some((path, Vec::new()));
            } else if let Some((_, content)) = current.as_mut() {
                content.extend_from_slice(&line);
            } else {
                let line = String::from_utf8_lossy(&line).trim_end().to_string();
                error!("Invalid first line in '{template_path}': '{line}'");
                return Err(Error::InvalidFirstLine { template_path, line });
            }
        }

        if let Some((path, content)) = current {
            self.base.forward(Template::from_bytes(path, content))?;
        }
        Ok(())
    }
}

impl Collector for SplitterCollector {
    fn collect(&mut self, template: Template) -> Result<()> {
        if !self.is_multi_file(&template.path) {
            return self.base.forward(template);
        }
        self.split(template)
    }

    fn on_pipeline_completed(&mut self) -> Result<()> {
        self.base.complete()
    }
}
