use std::cell::RefCell;
use std::rc::Rc;

use super::{BaseCollector, Collector};
use crate::{error::Result, template::Template};

/// Snapshot of a template that went through a [`MemoryCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedTemplate {
    pub name: Option<String>,
    pub path: String,
    pub content: Vec<u8>,
}

impl CollectedTemplate {
    pub fn content_str(&self) -> &str {
        std::str::from_utf8(&self.content).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct Collected {
    templates: Vec<CollectedTemplate>,
    completions: usize,
}

/// Buffers every template it receives and counts completion notifications.
///
/// Useful for dry runs: the handle stays readable after the collector has
/// been moved into a chain or a pipeline.
#[derive(Default)]
pub struct MemoryCollector {
    collected: Rc<RefCell<Collected>>,
    base: BaseCollector,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next(next: Option<Box<dyn Collector>>) -> Self {
        Self { collected: Rc::default(), base: BaseCollector::new(next) }
    }

    pub fn handle(&self) -> MemoryCollectorHandle {
        MemoryCollectorHandle { collected: Rc::clone(&self.collected) }
    }
}

impl Collector for MemoryCollector {
    fn collect(&mut self, template: Template) -> Result<()> {
        let Template { name, path, reader } = template;
        let content = crate::ioutils::read_bytes(reader)?;
        self.collected.borrow_mut().templates.push(CollectedTemplate {
            name: name.clone(),
            path: path.clone(),
            content: content.clone(),
        });
        self.base.forward(Template::from_bytes(path, content).with_name(name))
    }

    fn on_pipeline_completed(&mut self) -> Result<()> {
        self.collected.borrow_mut().completions += 1;
        self.base.complete()
    }
}

/// Read access to what a [`MemoryCollector`] has seen.
#[derive(Debug, Clone)]
pub struct MemoryCollectorHandle {
    collected: Rc<RefCell<Collected>>,
}

impl MemoryCollectorHandle {
    pub fn templates(&self) -> Vec<CollectedTemplate> {
        self.collected.borrow().templates.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.collected.borrow().templates.iter().map(|t| t.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.collected.borrow().templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn completions(&self) -> usize {
        self.collected.borrow().completions
    }
}
