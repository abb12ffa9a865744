//! Constants used throughout the scaffold crate

/// Configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] = &["scaffold.json", "scaffold.yaml", "scaffold.yml"];

/// File name prefix marking a rendered template as a multi-file template
pub const DEFAULT_MULTI_FILE_PREFIX: &str = "mul_";

/// Line prefix introducing a new file inside a multi-file template
pub const DEFAULT_MULTI_FILE_HEADER: &str = "@@ ";

/// Attribute carrying the output path in a multi-file header
pub const HEADER_NAME_ATTRIBUTE: &str = "name=";

/// Default directory holding the main templates
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default destination directory
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Top-level context keys for the standard sections
pub mod sections {
    pub const METADATA: &str = "metadata";
    pub const DATA: &str = "data";
}
