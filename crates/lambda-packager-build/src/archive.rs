//! Zip archive assembly.
//!
//! The archive mirrors the staging tree with paths relative to the staging
//! root. Output is reproducible: entries are written in a sorted walk order,
//! directories appear as explicit `dir/` entries, and every entry carries the
//! zip epoch (1980-01-01 00:00:00) as its modification time.

use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Required suffix of the archive path.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Result of a successful archive build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub files: usize,
    pub directories: usize,
}

/// Compress `source_dir` into a zip at `target`.
///
/// `target` must end in `.zip`; this is checked before anything is written.
/// The parent directory is created if missing and an existing archive is
/// replaced atomically.
pub fn create_archive(source_dir: &Path, target: &Path) -> Result<ArchiveSummary, ArchiveError> {
    if !target.to_string_lossy().ends_with(ARCHIVE_EXTENSION) {
        return Err(ArchiveError::InvalidExtension(target.to_path_buf()));
    }

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| ArchiveError::CreateDir {
        path: parent.clone(),
        source: e,
    })?;

    let mut staged = tempfile::NamedTempFile::new_in(&parent).map_err(|e| ArchiveError::Write {
        path: parent.clone(),
        source: e,
    })?;
    let (files, directories) = write_entries(source_dir, staged.as_file_mut())?;
    make_readable(staged.as_file()).map_err(|e| ArchiveError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;
    staged
        .persist(target)
        .map_err(|e| ArchiveError::Write {
            path: target.to_path_buf(),
            source: e.error,
        })?;

    tracing::info!(path = %target.display(), files, directories, "archive written");
    Ok(ArchiveSummary {
        path: target.to_path_buf(),
        files,
        directories,
    })
}

fn write_entries(source_dir: &Path, file: &mut File) -> Result<(usize, usize), ArchiveError> {
    let zip_error = |e: zip::result::ZipError| ArchiveError::Zip {
        path: source_dir.to_path_buf(),
        source: e,
    };
    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut writer = zip::ZipWriter::new(file);
    let mut files = 0;
    let mut directories = 0;

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: source_dir.to_path_buf(),
            source: e,
        })?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| ArchiveError::InvalidPath(entry.path().to_path_buf()))?;
        let name = entry_name(relative)?;
        let options = with_permissions(base_options, &entry);

        if entry.file_type().is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(zip_error)?;
            directories += 1;
        } else {
            writer.start_file(name, options).map_err(zip_error)?;
            let mut input = File::open(entry.path()).map_err(|e| ArchiveError::Read {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            std::io::copy(&mut input, &mut writer).map_err(|e| ArchiveError::Read {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            files += 1;
        }
    }

    let file = writer.finish().map_err(zip_error)?;
    file.flush().map_err(|e| ArchiveError::Write {
        path: source_dir.to_path_buf(),
        source: e,
    })?;
    Ok((files, directories))
}

/// Archive member name: `/`-joined UTF-8 components.
fn entry_name(relative: &Path) -> Result<String, ArchiveError> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| ArchiveError::InvalidPath(relative.to_path_buf()))?,
            ),
            _ => return Err(ArchiveError::InvalidPath(relative.to_path_buf())),
        }
    }
    Ok(parts.join("/"))
}

/// Temp files are created owner-only; the archive should not be.
#[cfg(unix)]
fn make_readable(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn make_readable(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, entry: &walkdir::DirEntry) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;

    match entry.metadata() {
        Ok(metadata) => options.unix_permissions(metadata.permissions().mode() & 0o777),
        Err(e) => {
            tracing::debug!(path = %entry.path().display(), error = %e, "no metadata; using default permissions");
            options
        }
    }
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _entry: &walkdir::DirEntry) -> SimpleFileOptions {
    options
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("given target path '{}' does not end with correct extension. should end with '.zip'", .0.display())]
    InvalidExtension(PathBuf),

    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write archive {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk staging directory {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("path cannot be stored in the archive: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to build zip from {path}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_name_joins_with_slash() {
        assert_eq!(entry_name(Path::new("src/pkg/a.py")).unwrap(), "src/pkg/a.py");
        assert_eq!(entry_name(Path::new("handler.py")).unwrap(), "handler.py");
    }

    #[test]
    fn entry_name_rejects_parent_components() {
        assert!(entry_name(Path::new("../escape.py")).is_err());
    }
}
