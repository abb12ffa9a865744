use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// Parse and execution failures of a template are reported through this single variant.
    #[error("Failed to render. Original error: {0}")]
    RenderError(#[from] minijinja::Error),

    #[error("Invalid first line in multi-file template '{template_path}': '{line}'")]
    InvalidFirstLine { template_path: String, line: String },

    #[error("Invalid header in multi-file template '{template_path}': '{line}'")]
    InvalidHeader { template_path: String, line: String },

    #[error("Common template '{path}' has no name.")]
    MissingTemplateName { path: String },

    #[error("Invalid filter pattern. Original error: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Failed to parse glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(String),

    #[error("No configuration file found in '{dir}'. Tried: {config_files}.")]
    ConfigNotFound { dir: String, config_files: String },

    #[error("Configuration error: {0}.")]
    ConfigValidation(String),

    #[error("Cannot build pipeline: {0}.")]
    PipelineBuildError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParseError(err.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::IoError(err.into())
    }
}

/// Convenience type alias for Results with the crate error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;
