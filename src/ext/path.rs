use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Extension trait for Path to provide convenient conversion methods
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use scaffold::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Converts a path to a `/`-separated string regardless of the platform.
    ///
    /// Template paths travel through the pipeline in this form so that
    /// filters and multi-file headers behave the same on every OS.
    fn to_slash_string(&self) -> Result<String>;

    /// Lexically removes `.` components and resolves `..` against preceding
    /// normal components, without touching the filesystem.
    ///
    /// # Examples
    /// ```
    /// use scaffold::ext::PathExt;
    /// use std::path::{Path, PathBuf};
    ///
    /// let path = Path::new("out/./a/../b.txt");
    /// assert_eq!(path.clean(), PathBuf::from("out/b.txt"));
    /// ```
    fn clean(&self) -> PathBuf;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_slash_string(&self) -> Result<String> {
        let mut parts = Vec::new();
        for component in self.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| {
                            Error::Other(anyhow::anyhow!(
                                "Path '{}' contains invalid Unicode characters",
                                self.display()
                            ))
                        })?
                        .to_string(),
                ),
                Component::CurDir => {}
                other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
            }
        }
        Ok(parts.join("/"))
    }

    fn clean(&self) -> PathBuf {
        let mut cleaned = PathBuf::new();
        for component in self.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    let last_is_normal = matches!(
                        cleaned.components().next_back(),
                        Some(Component::Normal(_))
                    );
                    if last_is_normal {
                        cleaned.pop();
                    } else {
                        cleaned.push(component);
                    }
                }
                other => cleaned.push(other),
            }
        }
        cleaned
    }
}
