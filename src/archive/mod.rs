//! Hardened tar+zstd packaging for resource archives.
//!
//! Archives contain only regular files and directories with normalized
//! permissions. Extraction validates every entry path, so a crafted
//! archive cannot write outside its destination.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use tar::EntryType;
use thiserror::Error;
use walkdir::WalkDir;

/// Default file extension for zstd-compressed tar archives.
pub const ARCHIVE_FILE_EXTENSION: &str = ".tar.zst";

/// Permission mode applied to every archived and extracted file.
pub const FILE_MODE: u32 = 0o644;

/// Permission mode applied to every archived and extracted directory.
pub const DIR_MODE: u32 = 0o755;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive creation failed")]
    CreateFailed(#[source] io::Error),

    #[error("extraction failed")]
    ExtractFailed(#[source] io::Error),

    #[error("destination exists")]
    DestinationExists,

    #[error("invalid path {0:?}")]
    InvalidPath(String),

    #[error("unsupported file type at {0:?}")]
    UnsupportedFileType(PathBuf),
}

/// Creates a zstd-compressed tar archive from a directory.
///
/// The archive contains all files and directories under `src` with paths
/// stored relative to `src`, using forward slashes regardless of the host
/// operating system. File modes are forced to `0644` and directory modes
/// to `0755`.
///
/// Only regular files and directories are allowed; symlinks and other
/// special file types fail with [`ArchiveError::UnsupportedFileType`]. If
/// creation fails, the partially written archive is removed.
pub fn create(src: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let result = write_archive(src, dest);
    if result.is_err() {
        let _ = fs::remove_file(dest);
    }
    result
}

/// Extracts a zstd-compressed tar archive to a directory.
///
/// Same behavior as [`extract_from_reader`], reading from a file.
pub fn extract(src: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(src).map_err(ArchiveError::ExtractFailed)?;
    extract_from_reader(file, dest)
}

/// Extracts a zstd-compressed tar archive from a reader to a directory.
///
/// Fails with [`ArchiveError::DestinationExists`] when `dest` already
/// exists. Every entry name must be local — not absolute and free of
/// parent traversal — or extraction fails with
/// [`ArchiveError::InvalidPath`]. Only directories and regular files are
/// accepted. If extraction fails, the destination directory and its
/// contents are removed.
pub fn extract_from_reader<R: Read>(reader: R, dest: &Path) -> Result<(), ArchiveError> {
    if dest.symlink_metadata().is_ok() {
        return Err(ArchiveError::DestinationExists);
    }

    let decoder = zstd::stream::read::Decoder::new(reader).map_err(ArchiveError::ExtractFailed)?;
    let mut archive = tar::Archive::new(decoder);

    let result = extract_entries(&mut archive, dest);
    if result.is_err() {
        let _ = fs::remove_dir_all(dest);
    }
    result
}

/// Finds and reads a single file from a tar stream.
///
/// Returns `None` if no entry has the given name. The reader is consumed
/// up to and including the found entry.
pub fn find_in_tar<R: Read>(reader: R, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
    let mut archive = tar::Archive::new(reader);

    for entry in archive.entries().map_err(ArchiveError::ExtractFailed)? {
        let mut entry = entry.map_err(ArchiveError::ExtractFailed)?;
        if entry.path_bytes().as_ref() == name.as_bytes() {
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(ArchiveError::ExtractFailed)?;
            return Ok(Some(data));
        }
    }

    Ok(None)
}

fn write_archive(src: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::create(dest).map_err(ArchiveError::CreateFailed)?;
    let encoder =
        zstd::stream::write::Encoder::new(file, 0).map_err(ArchiveError::CreateFailed)?;
    let mut builder = tar::Builder::new(encoder);

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::CreateFailed(e.into()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| ArchiveError::InvalidPath(entry.path().display().to_string()))?;
        write_entry(&mut builder, &entry, rel)?;
    }

    let encoder = builder.into_inner().map_err(ArchiveError::CreateFailed)?;
    encoder.finish().map_err(ArchiveError::CreateFailed)?;
    Ok(())
}

fn write_entry<W: io::Write>(
    builder: &mut tar::Builder<W>,
    entry: &walkdir::DirEntry,
    rel: &Path,
) -> Result<(), ArchiveError> {
    let file_type = entry.file_type();
    if file_type.is_symlink() || (!file_type.is_file() && !file_type.is_dir()) {
        return Err(ArchiveError::UnsupportedFileType(entry.path().to_path_buf()));
    }

    let name = slash_path(rel);

    let mut header = tar::Header::new_gnu();
    header.set_mtime(0);

    if file_type.is_dir() {
        header.set_entry_type(EntryType::Directory);
        header.set_mode(DIR_MODE);
        header.set_size(0);
        builder
            .append_data(&mut header, format!("{name}/"), io::empty())
            .map_err(ArchiveError::CreateFailed)?;
    } else {
        let file = File::open(entry.path()).map_err(ArchiveError::CreateFailed)?;
        let size = file
            .metadata()
            .map_err(ArchiveError::CreateFailed)?
            .len();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(FILE_MODE);
        header.set_size(size);
        builder
            .append_data(&mut header, name, file)
            .map_err(ArchiveError::CreateFailed)?;
    }

    Ok(())
}

fn extract_entries<R: Read>(archive: &mut tar::Archive<R>, dest: &Path) -> Result<(), ArchiveError> {
    create_dir(dest)?;

    for entry in archive.entries().map_err(ArchiveError::ExtractFailed)? {
        let mut entry = entry.map_err(ArchiveError::ExtractFailed)?;

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let target = localize(dest, &name)?;

        match entry.header().entry_type() {
            EntryType::Directory => create_dir(&target)?,
            EntryType::Regular => extract_file(&mut entry, &target)?,
            _ => return Err(ArchiveError::UnsupportedFileType(PathBuf::from(name))),
        }
    }

    Ok(())
}

// Validates an archive entry name and joins it with the destination.
//
// The name must be relative, contain no parent traversal, and resolve to
// at least one normal component.
fn localize(dest: &Path, name: &str) -> Result<PathBuf, ArchiveError> {
    let path = Path::new(name);

    if name.is_empty() || path.is_absolute() {
        return Err(ArchiveError::InvalidPath(name.to_string()));
    }

    let mut local = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => local.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::InvalidPath(name.to_string()));
            }
        }
    }

    if local.as_os_str().is_empty() {
        return Err(ArchiveError::InvalidPath(name.to_string()));
    }

    Ok(dest.join(local))
}

fn create_dir(path: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(path).map_err(ArchiveError::ExtractFailed)?;
    set_mode(path, DIR_MODE)
}

fn extract_file<R: Read>(entry: &mut tar::Entry<'_, R>, target: &Path) -> Result<(), ArchiveError> {
    if let Some(parent) = target.parent() {
        create_dir(parent)?;
    }

    let mut file = File::create(target).map_err(ArchiveError::ExtractFailed)?;
    io::copy(entry, &mut file).map_err(ArchiveError::ExtractFailed)?;
    set_mode(target, FILE_MODE)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), ArchiveError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(ArchiveError::ExtractFailed)
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), ArchiveError> {
    Ok(())
}

fn slash_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_source_tree(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("top.txt"), b"top contents").unwrap();
        fs::write(root.join("sub/inner.txt"), b"inner contents").unwrap();
        fs::write(root.join("sub/deeper/leaf.bin"), [0u8, 1, 2, 3]).unwrap();
    }

    // A zstd-compressed tar containing a single empty entry with the given
    // name. The name is written straight into the header, bypassing the
    // validation a well-behaved writer applies, so hostile names like
    // "../etc/passwd" can be produced.
    fn archive_with_entry(name: &str, entry_type: EntryType) -> Vec<u8> {
        let mut header = tar::Header::new_gnu();
        {
            let gnu = header.as_gnu_mut().unwrap();
            gnu.name[..name.len()].copy_from_slice(name.as_bytes());
        }
        header.set_entry_type(entry_type);
        header.set_size(0);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_cksum();

        let mut tar_bytes = header.as_bytes().to_vec();
        tar_bytes.extend_from_slice(&[0u8; 1024]);
        zstd::stream::encode_all(&tar_bytes[..], 0).unwrap()
    }

    #[test]
    fn create_and_extract_round_trip() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        build_source_tree(&src);

        let archive_path = temp.path().join("out.tar.zst");
        create(&src, &archive_path).unwrap();

        let dest = temp.path().join("dest");
        extract(&archive_path, &dest).unwrap();

        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"top contents");
        assert_eq!(
            fs::read(dest.join("sub/inner.txt")).unwrap(),
            b"inner contents"
        );
        assert_eq!(
            fs::read(dest.join("sub/deeper/leaf.bin")).unwrap(),
            [0u8, 1, 2, 3]
        );
    }

    #[cfg(unix)]
    #[test]
    fn extracted_modes_are_normalized() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("dir")).unwrap();
        fs::write(src.join("file.txt"), b"x").unwrap();
        fs::set_permissions(src.join("file.txt"), fs::Permissions::from_mode(0o777)).unwrap();

        let archive_path = temp.path().join("out.tar.zst");
        create(&src, &archive_path).unwrap();

        let dest = temp.path().join("dest");
        extract(&archive_path, &dest).unwrap();

        let file_mode = fs::metadata(dest.join("file.txt")).unwrap().permissions().mode();
        let dir_mode = fs::metadata(dest.join("dir")).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, FILE_MODE);
        assert_eq!(dir_mode & 0o777, DIR_MODE);
    }

    #[cfg(unix)]
    #[test]
    fn create_rejects_symlinks() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("real.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(src.join("real.txt"), src.join("link.txt")).unwrap();

        let archive_path = temp.path().join("out.tar.zst");
        let err = create(&src, &archive_path).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedFileType(_)));

        // The partial archive is removed.
        assert!(!archive_path.exists());
    }

    #[test]
    fn extract_rejects_existing_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let data = archive_with_entry("file.txt", EntryType::Regular);
        let err = extract_from_reader(&data[..], &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::DestinationExists));
    }

    #[test]
    fn extract_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");

        let data = archive_with_entry("../etc/passwd", EntryType::Regular);
        let err = extract_from_reader(&data[..], &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidPath(_)));

        // The destination is cleaned up on failure.
        assert!(!dest.exists());
    }

    #[test]
    fn extract_rejects_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");

        let data = archive_with_entry("/etc/passwd", EntryType::Regular);
        let err = extract_from_reader(&data[..], &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidPath(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn extract_rejects_symlink_entries() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");

        let data = archive_with_entry("evil", EntryType::Symlink);
        let err = extract_from_reader(&data[..], &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedFileType(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn extract_accepts_dot_prefixed_names() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");

        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(5);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder
            .append_data(&mut header, "./file.txt", &b"hello"[..])
            .unwrap();
        let tar_bytes = builder.into_inner().unwrap();
        let data = zstd::stream::encode_all(&tar_bytes[..], 0).unwrap();

        extract_from_reader(&data[..], &dest).unwrap();
        assert_eq!(fs::read(dest.join("file.txt")).unwrap(), b"hello");
    }

    #[test]
    fn find_in_tar_returns_contents() {
        let mut builder = tar::Builder::new(Vec::new());

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(5);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder.append_data(&mut header, "a.txt", &b"first"[..]).unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(6);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder.append_data(&mut header, "b.txt", &b"second"[..]).unwrap();

        let tar_bytes = builder.into_inner().unwrap();

        let found = find_in_tar(&tar_bytes[..], "b.txt").unwrap();
        assert_eq!(found.as_deref(), Some(&b"second"[..]));

        let missing = find_in_tar(&tar_bytes[..], "c.txt").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn corrupt_input_cleans_up_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");

        let data = b"this is not a zstd stream";
        assert!(extract_from_reader(&data[..], &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn empty_directory_round_trip() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("empty")).unwrap();

        let archive_path = temp.path().join("out.tar.zst");
        create(&src, &archive_path).unwrap();

        let dest = temp.path().join("dest");
        extract(&archive_path, &dest).unwrap();
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn writer_failure_removes_partial_archive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("missing-src");
        let archive_path = temp.path().join("out.tar.zst");

        assert!(create(&src, &archive_path).is_err());
        assert!(!archive_path.exists());
    }
}
