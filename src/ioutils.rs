use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(Error::IoError)
}

/// Writes `content` to `dest_path`, creating missing parent directories first.
pub fn write_file<P: AsRef<Path>>(content: &[u8], dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

/// Reads the existing content of `path`, or `None` when it cannot be read.
pub fn read_existing<P: AsRef<Path>>(path: P) -> Option<Vec<u8>> {
    std::fs::read(path.as_ref()).ok()
}

/// Drains the reader into a byte buffer.
pub fn read_bytes(mut reader: impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}

/// Drains the reader into a UTF-8 string.
pub fn read_from(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}
