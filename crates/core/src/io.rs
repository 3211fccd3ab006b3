//! Output file handling.

use std::{
    ffi::OsString,
    fs::{create_dir_all, remove_file, rename, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write font data next to the destination, then move it into place.
    ///
    /// A failed write leaves any existing file at the destination untouched.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;

        let staging = self.staging_path();
        if let Err(e) = write(&staging, data) {
            let _ = remove_file(&staging);
            return Err(e)
                .with_context(|| format!("Failed to write font: {}", self.path.display()));
        }
        rename(&staging, &self.path).with_context(|| {
            let _ = remove_file(&staging);
            format!("Failed to write font: {}", self.path.display())
        })
    }

    /// Create parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".partial");
        self.path.with_file_name(name)
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read;

    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = FontFile::new(dir.path().join("nested/out/font.ttf"));

        file.write(b"data").unwrap();

        assert_eq!(read(file.path()).unwrap(), b"data");
        assert!(!dir.path().join("nested/out/font.ttf.partial").exists());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = FontFile::new(dir.path().join("font.ttf"));

        file.write(b"old").unwrap();
        file.write(b"new").unwrap();

        assert_eq!(read(file.path()).unwrap(), b"new");
    }
}
