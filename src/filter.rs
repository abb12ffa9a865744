//! Path predicates used to accept or reject templates.
//!
//! Paths handed to a [`Filter`] are destination-relative and `/`-separated.

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use regex::RegexSet;

use crate::error::Result;

/// Decides whether a template path takes part in the run.
pub trait Filter {
    fn accept(&self, path: &str) -> bool;
}

/// Accepts every path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpFilter;

impl Filter for NoOpFilter {
    fn accept(&self, _path: &str) -> bool {
        true
    }
}

/// Regex based filter.
///
/// With `include` set, a path is accepted when at least one pattern matches it.
/// Otherwise the polarity is inverted: any match rejects the path.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    include: bool,
    patterns: RegexSet,
}

impl PatternFilter {
    pub fn new<I, S>(include: bool, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = RegexSet::new(patterns)?;
        debug!(
            "Built {} pattern filter with {} pattern(s)",
            if include { "include" } else { "exclude" },
            patterns.len()
        );
        Ok(Self { include, patterns })
    }
}

impl Filter for PatternFilter {
    fn accept(&self, path: &str) -> bool {
        self.patterns.is_match(path) == self.include
    }
}

/// Glob based filter with the same include/exclude polarity as [`PatternFilter`].
#[derive(Debug, Clone)]
pub struct GlobFilter {
    include: bool,
    globs: GlobSet,
}

impl GlobFilter {
    pub fn new<I, S>(include: bool, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            debug!("Adding glob pattern: {} to globset", pattern.as_ref());
            builder.add(Glob::new(pattern.as_ref())?);
        }
        Ok(Self { include, globs: builder.build()? })
    }
}

impl Filter for GlobFilter {
    fn accept(&self, path: &str) -> bool {
        self.globs.is_match(path) == self.include
    }
}

/// Combines filters: a path is accepted only when every filter accepts it.
#[derive(Default)]
pub struct AllFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AllFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for AllFilter {
    fn accept(&self, path: &str) -> bool {
        self.filters.iter().all(|filter| filter.accept(path))
    }
}
