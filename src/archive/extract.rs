//! Per-format archive unpacking
//!
//! Every format is unpacked entry by entry so the same rules hold for all of
//! them: entries with absolute paths, `..` components, or link types abort
//! the extraction of the whole archive.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ResultExt, SessionError};

/// Archive container formats we can unpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the file name suffix, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }

    /// Display name for the format
    pub fn display_name(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

/// Unpack `archive` into the existing directory `dest`
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let format = ArchiveFormat::from_path(archive)
        .ok_or_else(|| SessionError::UnsupportedArchive(archive.to_path_buf()))?;

    let file = File::open(archive)
        .with_context(|| format!("Failed to open {} archive {:?}", format.display_name(), archive))?;
    let reader = BufReader::new(file);

    match format {
        ArchiveFormat::Zip => unpack_zip(reader, archive, dest),
        ArchiveFormat::Tar => unpack_tar(reader, archive, dest),
        ArchiveFormat::TarGz => unpack_tar(flate2::read::GzDecoder::new(reader), archive, dest),
    }
}

/// Reject entry paths that would escape the destination directory
fn checked_relative_path(archive: &Path, entry_path: &Path) -> Result<PathBuf> {
    if entry_path.is_absolute() {
        return Err(SessionError::archive(
            archive,
            format!("entry has absolute path: {}", entry_path.display()),
        ));
    }

    for component in entry_path.components() {
        if !matches!(component, Component::Normal(_) | Component::CurDir) {
            return Err(SessionError::archive(
                archive,
                format!("entry escapes extraction directory: {}", entry_path.display()),
            ));
        }
    }

    Ok(entry_path.to_path_buf())
}

fn write_entry(reader: &mut impl Read, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(target)?;
    std::io::copy(reader, &mut file)?;
    Ok(())
}

fn unpack_zip<R: Read + std::io::Seek>(reader: R, archive: &Path, dest: &Path) -> Result<()> {
    let mut zip = zip::ZipArchive::new(reader)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().to_string();

        let is_link = entry
            .unix_mode()
            .is_some_and(|mode| mode & 0o170000 == 0o120000);
        if is_link {
            return Err(SessionError::archive(
                archive,
                format!("entry is a symlink: {}", name),
            ));
        }

        let relative = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| {
                SessionError::archive(archive, format!("entry has unsafe path: {}", name))
            })?;
        let relative = checked_relative_path(archive, &relative)?;
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            write_entry(&mut entry, &target)?;
        }
    }

    Ok(())
}

fn unpack_tar<R: Read>(reader: R, archive: &Path, dest: &Path) -> Result<()> {
    let mut tar = tar::Archive::new(reader);

    for entry in tar.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.to_path_buf();
        let relative = checked_relative_path(archive, &entry_path)?;

        let entry_type = entry.header().entry_type();
        if entry_type == tar::EntryType::Symlink || entry_type == tar::EntryType::Link {
            return Err(SessionError::archive(
                archive,
                format!("entry is a link: {}", entry_path.display()),
            ));
        }

        let target = dest.join(relative);
        if entry_type == tar::EntryType::Directory {
            fs::create_dir_all(&target)?;
        } else if entry_type == tar::EntryType::Regular
            || entry_type == tar::EntryType::GNUSparse
            || entry_type == tar::EntryType::Continuous
        {
            write_entry(&mut entry, &target)?;
        }
        // Device files, fifos and extended headers are skipped
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ArchiveFormat::from_path(Path::new("a/DATA.ZIP")),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("logs.tar.gz")),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("logs.tgz")),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("logs.tar")),
            Some(ArchiveFormat::Tar)
        );
        assert_eq!(ArchiveFormat::from_path(Path::new("logs.rar")), None);
    }

    #[test]
    fn test_extract_zip_with_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.zip");
        write_zip(&archive, &[("run/sensorlog_orient_a_1.csv", "t,x\n0,1\n")]);

        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        extract_archive(&archive, &dest).unwrap();

        let content = fs::read_to_string(dest.join("run/sensorlog_orient_a_1.csv")).unwrap();
        assert_eq!(content, "t,x\n0,1\n");
    }

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("logs.tgz");
        write_tar_gz(&archive, &[("sensorlog_pos_b_2.csv", "lat,lon,time\n")]);

        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        extract_archive(&archive, &dest).unwrap();

        assert!(dest.join("sensorlog_pos_b_2.csv").is_file());
    }

    #[test]
    fn test_corrupt_zip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        assert!(extract_archive(&archive, &dest).is_err());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let archive = Path::new("evil.tar");
        assert!(checked_relative_path(archive, Path::new("../escape.csv")).is_err());
        assert!(checked_relative_path(archive, Path::new("/etc/passwd")).is_err());
        assert!(checked_relative_path(archive, Path::new("./ok/file.csv")).is_ok());
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("data.7z");
        fs::write(&archive, b"").unwrap();
        assert!(matches!(
            extract_archive(&archive, dir.path()),
            Err(SessionError::UnsupportedArchive(_))
        ));
    }
}
