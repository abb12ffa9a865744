//! Generator configuration loaded from `scaffold.json` or `scaffold.yaml`.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::{
    collectors::{
        Collector, FileWriterCollector, FileWriterOptions, FilterCollector, SplitterCollector,
    },
    constants::{
        CONFIG_FILENAMES, DEFAULT_MULTI_FILE_HEADER, DEFAULT_MULTI_FILE_PREFIX,
        DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATES_DIR,
    },
    error::{Error, Result},
    ext::PathExt,
    filter::{AllFilter, NoOpFilter, PatternFilter},
    pipeline::PipelineBuilder,
    renderer::{FunctionSet, TemplateAwareFunctions},
    template::FileSystemProvider,
};

/// Settings of a generator project.
///
/// Relative directories are resolved against the project root handed to
/// [`GeneratorConfig::pipeline_builder`], normally the directory the
/// configuration was loaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "get_default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Directory of named common templates available to every template
    #[serde(default)]
    pub shared_templates_dir: Option<PathBuf>,
    #[serde(default = "get_default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub skip_unchanged: bool,
    #[serde(default)]
    pub cleanup_untracked: bool,
    /// Regexes a rendered path must match at least one of
    #[serde(default)]
    pub include: Vec<String>,
    /// Regexes rejecting any rendered path they match
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "get_default_multi_file_prefix")]
    pub multi_file_prefix: String,
    #[serde(default = "get_default_multi_file_header")]
    pub multi_file_header: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates_dir: get_default_templates_dir(),
            shared_templates_dir: None,
            output_dir: get_default_output_dir(),
            skip_unchanged: false,
            cleanup_untracked: false,
            include: Vec::new(),
            exclude: Vec::new(),
            multi_file_prefix: get_default_multi_file_prefix(),
            multi_file_header: get_default_multi_file_header(),
        }
    }
}

impl GeneratorConfig {
    /// Loads the first configuration file found in `project_root`.
    pub fn load_config<P: AsRef<Path>>(project_root: P) -> Result<Self> {
        let project_root = project_root.as_ref();
        let dir = project_root.to_str_checked()?.to_string();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = project_root.join(config_file_name);

            if config_file_path.exists() {
                debug!("Loading configuration from '{}'", config_file_path.display());
                let content = std::fs::read_to_string(&config_file_path)?;
                let config: Self = if config_file_name.ends_with(".json") {
                    serde_json::from_str(&content)?
                } else {
                    serde_yaml::from_str(&content)?
                };
                config.validate()?;
                return Ok(config);
            }
        }

        Err(Error::ConfigNotFound { dir, config_files: CONFIG_FILENAMES.join(", ") })
    }

    pub fn validate(&self) -> Result<()> {
        if self.multi_file_prefix.is_empty() {
            return Err(Error::ConfigValidation(
                "multi_file_prefix must not be empty".into(),
            ));
        }
        if self.multi_file_header.trim().is_empty() {
            return Err(Error::ConfigValidation(
                "multi_file_header must not be empty".into(),
            ));
        }
        if self.multi_file_prefix.contains('/') {
            return Err(Error::ConfigValidation(
                "multi_file_prefix must not contain '/'".into(),
            ));
        }
        Ok(())
    }

    /// Filter, splitter and file writer, in that order.
    pub fn build_collector_chain<P: AsRef<Path>>(
        &self,
        project_root: P,
    ) -> Result<Box<dyn Collector>> {
        let out_dir = resolve(project_root.as_ref(), &self.output_dir);
        let writer = FileWriterCollector::with_options(
            FileWriterOptions::new(&out_dir)
                .skip_unchanged(self.skip_unchanged)
                .cleanup_untracked(self.cleanup_untracked),
            None,
        );
        let splitter = SplitterCollector::with_prefixes(
            self.multi_file_prefix.as_str(),
            self.multi_file_header.as_str(),
            Some(Box::new(writer)),
        );

        let mut filter = AllFilter::new();
        if !self.include.is_empty() {
            filter = filter.with(PatternFilter::new(true, &self.include)?);
        }
        if !self.exclude.is_empty() {
            filter = filter.with(PatternFilter::new(false, &self.exclude)?);
        }

        let chain: Box<dyn Collector> = if filter.is_empty() {
            Box::new(FilterCollector::new(NoOpFilter, Some(Box::new(splitter))))
        } else {
            Box::new(FilterCollector::new(filter, Some(Box::new(splitter))))
        };
        Ok(chain)
    }

    /// Builder wired with file system providers, the default functions and
    /// the collector chain. Callers may still override any part before
    /// building.
    pub fn pipeline_builder<P: AsRef<Path>>(&self, project_root: P) -> Result<PipelineBuilder> {
        self.validate()?;
        let project_root = project_root.as_ref();
        let templates_dir = resolve(project_root, &self.templates_dir);
        info!("Using templates from '{}'", templates_dir.display());

        let mut builder = PipelineBuilder::new()
            .with_functions(FunctionSet::with_defaults())
            .with_template_aware_functions(TemplateAwareFunctions::with_defaults())
            .with_template_provider(FileSystemProvider::new(templates_dir))
            .with_collector(self.build_collector_chain(project_root)?);

        if let Some(shared_dir) = &self.shared_templates_dir {
            let shared_dir = resolve(project_root, shared_dir);
            info!("Using common templates from '{}'", shared_dir.display());
            builder = builder.with_shared_templates_provider(FileSystemProvider::new(shared_dir));
        }

        Ok(builder)
    }
}

fn resolve(project_root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        project_root.join(dir).clean()
    }
}

fn get_default_templates_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

fn get_default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn get_default_multi_file_prefix() -> String {
    DEFAULT_MULTI_FILE_PREFIX.to_string()
}

fn get_default_multi_file_header() -> String {
    DEFAULT_MULTI_FILE_HEADER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use std::fs;

    #[test]
    fn loads_json_with_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("scaffold.json"), r#"{"output_dir": "gen"}"#).unwrap();

        let config = GeneratorConfig::load_config(tmp.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("gen"));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.multi_file_prefix, "mul_");
        assert_eq!(config.multi_file_header, "@@ ");
        assert!(config.shared_templates_dir.is_none());
        assert!(!config.skip_unchanged);
    }

    #[test]
    fn loads_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("scaffold.yaml"),
            "templates_dir: tpl\nshared_templates_dir: common\nskip_unchanged: true\nexclude:\n  - '\\.bak$'\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_config(tmp.path()).unwrap();
        assert_eq!(config.templates_dir, PathBuf::from("tpl"));
        assert_eq!(config.shared_templates_dir, Some(PathBuf::from("common")));
        assert!(config.skip_unchanged);
        assert_eq!(config.exclude, vec![r"\.bak$".to_string()]);
    }

    #[test]
    fn json_takes_precedence_over_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("scaffold.json"), r#"{"output_dir": "from-json"}"#).unwrap();
        fs::write(tmp.path().join("scaffold.yml"), "output_dir: from-yaml\n").unwrap();

        let config = GeneratorConfig::load_config(tmp.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from-json"));
    }

    #[test]
    fn missing_config_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let result = GeneratorConfig::load_config(tmp.path());
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("scaffold.json"), r#"{"output_dir": "#).unwrap();
        let result = GeneratorConfig::load_config(tmp.path());
        assert!(matches!(result, Err(Error::ConfigParseError(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("scaffold.yml"), "outptu_dir: typo\n").unwrap();
        let result = GeneratorConfig::load_config(tmp.path());
        assert!(matches!(result, Err(Error::ConfigParseError(_))));
    }

    #[test]
    fn empty_markers_fail_validation() {
        let config =
            GeneratorConfig { multi_file_prefix: String::new(), ..GeneratorConfig::default() };
        assert!(matches!(config.validate(), Err(Error::ConfigValidation(_))));

        let config =
            GeneratorConfig { multi_file_header: "  ".into(), ..GeneratorConfig::default() };
        assert!(matches!(config.validate(), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn invalid_filter_pattern_is_reported() {
        let config =
            GeneratorConfig { include: vec!["(unclosed".into()], ..GeneratorConfig::default() };
        let result = config.build_collector_chain("/tmp");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn collector_chain_filters_splits_and_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            exclude: vec![r"\.skip$".into()],
            ..GeneratorConfig::default()
        };
        let mut chain = config.build_collector_chain(tmp.path()).unwrap();

        chain
            .collect(Template::from_bytes("src/mul_parts", "@@ name=\"src/a.rs\"\nA\n@@ name=\"b.txt\"\nB\n"))
            .unwrap();
        chain.collect(Template::from_bytes("ignored.skip", "nope")).unwrap();
        chain.on_pipeline_completed().unwrap();

        let out = tmp.path().join("out");
        assert_eq!(fs::read_to_string(out.join("src/a.rs")).unwrap(), "A\n");
        assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "B\n");
        assert!(!out.join("ignored.skip").exists());
        assert!(!out.join("src/mul_parts").exists());
    }

    #[test]
    fn pipeline_builder_renders_project() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("templates/src")).unwrap();
        fs::create_dir_all(root.join("common")).unwrap();
        fs::write(root.join("common/header.j2"), "// {{ metadata.name }}\n").unwrap();
        fs::write(
            root.join("templates/src/lib.rs"),
            "{% include 'header.j2' %}pub const NAME: &str = \"{{ metadata.name }}\";\n",
        )
        .unwrap();
        fs::write(root.join("scaffold.yml"), "shared_templates_dir: common\n").unwrap();

        let config = GeneratorConfig::load_config(root).unwrap();
        let mut pipeline = config.pipeline_builder(root).unwrap().build().unwrap();
        pipeline.process(serde_json::json!({"metadata": {"name": "demo"}})).unwrap();

        let written = fs::read_to_string(root.join("out/src/lib.rs")).unwrap();
        assert_eq!(written, "// demo\npub const NAME: &str = \"demo\";\n");
    }
}
