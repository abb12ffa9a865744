use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use super::{BaseCollector, Collector};
use crate::{
    error::Result,
    ext::PathExt,
    ioutils::{read_bytes, read_existing, write_file},
    template::Template,
};

#[derive(Debug, Clone)]
pub struct FileWriterOptions {
    /// Directory every template path is resolved against
    pub out_dir: PathBuf,
    /// Leave files whose content would not change untouched
    pub skip_unchanged: bool,
    /// Remove files below `out_dir` that the run did not produce
    pub cleanup_untracked: bool,
}

impl FileWriterOptions {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            skip_unchanged: false,
            cleanup_untracked: false,
        }
    }

    pub fn skip_unchanged(mut self, skip_unchanged: bool) -> Self {
        self.skip_unchanged = skip_unchanged;
        self
    }

    pub fn cleanup_untracked(mut self, cleanup_untracked: bool) -> Self {
        self.cleanup_untracked = cleanup_untracked;
        self
    }
}

/// Writes every template to `out_dir/<path>` and forwards a fresh copy.
pub struct FileWriterCollector {
    opts: FileWriterOptions,
    /// Destinations produced during the current run
    generated_files: HashSet<PathBuf>,
    base: BaseCollector,
}

impl FileWriterCollector {
    pub fn new<P: AsRef<Path>>(out_dir: P, next: Option<Box<dyn Collector>>) -> Self {
        Self::with_options(FileWriterOptions::new(out_dir), next)
    }

    pub fn with_options(opts: FileWriterOptions, next: Option<Box<dyn Collector>>) -> Self {
        Self { opts, generated_files: HashSet::new(), base: BaseCollector::new(next) }
    }

    fn destination(&self, path: &str) -> PathBuf {
        self.opts.out_dir.join(path.trim_start_matches('/')).clean()
    }

    /// Forgets the files recorded so far.
    ///
    /// The ledger spans one run and is cleared on completion. A collector
    /// reused after a failed run must be reset first, otherwise cleanup
    /// would spare files the new run never produced.
    pub fn reset(&mut self) {
        self.generated_files.clear();
    }

    /// Regular files below `out_dir` that this run did not write.
    ///
    /// Entries that cannot be read are logged and skipped.
    fn untracked_files(&self) -> Vec<PathBuf> {
        let mut untracked = Vec::new();
        for entry in WalkDir::new(&self.opts.out_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping entry during cleanup: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && !self.generated_files.contains(&entry.path().clean())
            {
                untracked.push(entry.into_path());
            }
        }
        untracked
    }
}

/// Best effort: a file that cannot be removed is logged and the rest are still removed.
fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        info!("Removing untracked file: {}", path.display());
        if let Err(err) = fs::remove_file(path) {
            warn!("Failed to remove untracked file '{}': {err}", path.display());
        }
    }
}

impl Collector for FileWriterCollector {
    fn collect(&mut self, template: Template) -> Result<()> {
        let Template { name, path, reader } = template;
        let destination = self.destination(&path);
        let content = read_bytes(reader)?;

        let unchanged = self.opts.skip_unchanged
            && read_existing(&destination).is_some_and(|existing| existing == content);
        if unchanged {
            debug!("Skipping unchanged file: {}", destination.display());
        } else {
            info!("Writing to '{}'", destination.display());
            write_file(&content, &destination)?;
        }

        self.generated_files.insert(destination);

        self.base.forward(Template::from_bytes(path, content).with_name(name))
    }

    fn on_pipeline_completed(&mut self) -> Result<()> {
        if self.opts.cleanup_untracked {
            remove_files(&self.untracked_files());
        }
        self.reset();

        self.base.complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::MemoryCollector;
    use std::time::{Duration, SystemTime};

    fn backdate(path: &Path) -> SystemTime {
        let past = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options().write(true).open(path).unwrap().set_modified(past).unwrap();
        fs::metadata(path).unwrap().modified().unwrap()
    }

    fn modified(path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn writes_content_below_out_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut collector = FileWriterCollector::new(tmp.path(), None);

        collector.collect(Template::from_bytes("nested/dir/file.txt", "hello")).unwrap();
        collector.on_pipeline_completed().unwrap();

        let written = fs::read_to_string(tmp.path().join("nested/dir/file.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[test]
    fn forwards_an_independent_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let next = MemoryCollector::new();
        let handle = next.handle();
        let mut collector = FileWriterCollector::new(tmp.path(), Some(Box::new(next)));

        collector
            .collect(Template::from_bytes("a.txt", "alpha").with_name(Some("a".into())))
            .unwrap();

        let templates = handle.templates();
        assert_eq!(templates[0].name.as_deref(), Some("a"));
        assert_eq!(templates[0].path, "a.txt");
        assert_eq!(templates[0].content_str(), "alpha");
    }

    #[test]
    fn skip_unchanged_preserves_modification_time() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("file.txt");
        fs::write(&target, "same").unwrap();
        let before = backdate(&target);

        let opts = FileWriterOptions::new(tmp.path()).skip_unchanged(true);
        let mut collector = FileWriterCollector::with_options(opts, None);
        collector.collect(Template::from_bytes("file.txt", "same")).unwrap();

        assert_eq!(modified(&target), before);
    }

    #[test]
    fn changed_content_advances_modification_time() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("file.txt");
        fs::write(&target, "old").unwrap();
        let before = backdate(&target);

        let opts = FileWriterOptions::new(tmp.path()).skip_unchanged(true);
        let mut collector = FileWriterCollector::with_options(opts, None);
        collector.collect(Template::from_bytes("file.txt", "new")).unwrap();

        assert!(modified(&target) > before);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn without_skip_unchanged_identical_content_is_rewritten() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("file.txt");
        fs::write(&target, "same").unwrap();
        let before = backdate(&target);

        let mut collector = FileWriterCollector::new(tmp.path(), None);
        collector.collect(Template::from_bytes("file.txt", "same")).unwrap();

        assert!(modified(&target) > before);
    }

    #[test]
    fn cleanup_removes_untracked_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("stray.txt"), "stray").unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/old.txt"), "old").unwrap();

        let opts = FileWriterOptions::new(tmp.path()).cleanup_untracked(true);
        let mut collector = FileWriterCollector::with_options(opts, None);
        collector.collect(Template::from_bytes("generated.txt", "generated")).unwrap();
        collector.collect(Template::from_bytes("./sub/new.txt", "new")).unwrap();
        collector.on_pipeline_completed().unwrap();

        assert!(tmp.path().join("generated.txt").exists());
        assert!(tmp.path().join("sub/new.txt").exists());
        assert!(!tmp.path().join("stray.txt").exists());
        assert!(!tmp.path().join("sub/old.txt").exists());
    }

    #[test]
    fn without_cleanup_untracked_files_remain() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("stray.txt"), "stray").unwrap();

        let mut collector = FileWriterCollector::new(tmp.path(), None);
        collector.collect(Template::from_bytes("generated.txt", "generated")).unwrap();
        collector.on_pipeline_completed().unwrap();

        assert!(tmp.path().join("generated.txt").exists());
        assert!(tmp.path().join("stray.txt").exists());
    }

    #[test]
    fn cleanup_of_missing_out_dir_still_completes() {
        let tmp = tempfile::tempdir().unwrap();
        let next = MemoryCollector::new();
        let handle = next.handle();
        let opts = FileWriterOptions::new(tmp.path().join("missing")).cleanup_untracked(true);
        let mut collector = FileWriterCollector::with_options(opts, Some(Box::new(next)));

        collector.on_pipeline_completed().unwrap();
        assert_eq!(handle.completions(), 1);
    }

    #[test]
    fn write_errors_abort_collect() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("blocker"), "file, not a directory").unwrap();

        let mut collector = FileWriterCollector::new(tmp.path(), None);
        let result = collector.collect(Template::from_bytes("blocker/child.txt", "x"));
        assert!(matches!(result, Err(crate::error::Error::IoError(_))));
    }

    #[test]
    fn failed_removal_does_not_stop_cleanup() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a_stray.txt", "b_stray.txt", "c_stray.txt"] {
            fs::write(tmp.path().join(name), "stray").unwrap();
        }
        let next = MemoryCollector::new();
        let handle = next.handle();
        let opts = FileWriterOptions::new(tmp.path()).cleanup_untracked(true);
        let mut collector = FileWriterCollector::with_options(opts, Some(Box::new(next)));
        collector.collect(Template::from_bytes("kept.txt", "kept")).unwrap();

        let mut untracked = collector.untracked_files();
        untracked.sort();
        assert_eq!(untracked.len(), 3);
        // Another process got there first.
        fs::remove_file(&untracked[0]).unwrap();
        remove_files(&untracked);

        assert!(!tmp.path().join("b_stray.txt").exists());
        assert!(!tmp.path().join("c_stray.txt").exists());
        assert!(tmp.path().join("kept.txt").exists());

        collector.on_pipeline_completed().unwrap();
        assert_eq!(handle.completions(), 1);
    }

    #[test]
    fn reset_forgets_files_of_an_aborted_run() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = FileWriterOptions::new(tmp.path()).cleanup_untracked(true);
        let mut collector = FileWriterCollector::with_options(opts, None);

        // First run writes a.txt and then fails before completion.
        collector.collect(Template::from_bytes("a.txt", "a")).unwrap();

        collector.reset();
        collector.collect(Template::from_bytes("b.txt", "b")).unwrap();
        collector.on_pipeline_completed().unwrap();

        assert!(!tmp.path().join("a.txt").exists());
        assert!(tmp.path().join("b.txt").exists());
    }
}
