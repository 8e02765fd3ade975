use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Trait for the file operations the rewriter performs.
pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            let context = Some(format!("read {}", path.display()));
            match e.kind() {
                ErrorKind::NotFound => {
                    Error::internal_io(format!("File not found: {}", path.display()), context)
                }
                ErrorKind::InvalidData => Error::internal_io(
                    format!("File is not valid UTF-8: {}", path.display()),
                    context,
                ),
                _ => Error::internal_io(e.to_string(), context),
            }
        })
    }

    // Overwrites in place so the file keeps its inode and permissions.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
        })
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}
