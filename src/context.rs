//! Assembly of the render context from named sections.

use serde_json::{Map, Value};

use crate::constants::sections;

/// Builds the context every template of a run is rendered against.
///
/// Each section lands under its own top-level key; a section added with an
/// empty prefix has its keys merged at the top level instead.
#[derive(Debug, Default, Clone)]
pub struct ContextBuilder {
    root: Map<String, Value>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, prefix: &str, section: Value) -> Self {
        if prefix.is_empty() {
            match section {
                Value::Object(map) => self.root.extend(map),
                other => log::warn!("Ignoring non-object top-level section: {other}"),
            }
        } else {
            self.root.insert(prefix.to_string(), section);
        }
        self
    }

    pub fn with_metadata(self, metadata: Value) -> Self {
        self.with_section(sections::METADATA, metadata)
    }

    pub fn with_data(self, data: Value) -> Self {
        self.with_section(sections::DATA, data)
    }

    pub fn build(self) -> Value {
        Value::Object(self.root)
    }
}
