//! Test data builders for recording trees and archives

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a scratch directory laid out like a recording dump
pub struct RecordingTreeBuilder {
    dir: TempDir,
}

impl RecordingTreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Should create temp dir"),
        }
    }

    /// Add a file at `relative` with `content`, creating parent directories
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        self
    }

    /// Add a zip archive at `relative` holding `entries`
    pub fn zip(self, relative: &str, entries: &[(&str, &[u8])]) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_zip(&path, entries);
        self
    }

    pub fn build(self) -> RecordingTree {
        RecordingTree { dir: self.dir }
    }
}

/// A built scratch tree; removed on drop
pub struct RecordingTree {
    dir: TempDir,
}

impl RecordingTree {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Write a zip archive with stored (uncompressed) entries
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

/// Bytes of a zip archive, for nesting inside another archive
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.zip");
    write_zip(&path, entries);
    fs::read(path).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_builder() {
        let tree = RecordingTreeBuilder::new()
            .file("a/b.csv", "x\n")
            .zip("c.zip", &[("d.csv", b"y\n".as_slice())])
            .build();

        assert!(tree.path("a/b.csv").is_file());
        assert!(tree.path("c.zip").is_file());
    }
}
