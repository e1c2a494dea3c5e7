//! Content-addressed archive storage on the local filesystem.
//!
//! Archives live at `{root}/{namespace}/{resource}/{version}/{digest}.tar.zst`.
//! Uploads stream through a tee that feeds both the staging file and a
//! SHA-256 hasher, then rename the staged file to its digest-derived name.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use super::sql::SqlRegistry;
use crate::archive::ARCHIVE_FILE_EXTENSION;

/// Suffix for temporary upload files.
pub const TEMPORARY_UPLOAD_SUFFIX: &str = ".upload.tmp";

// Tee sink: bytes written to the staging file are also observed by the
// hasher and byte counter, all driven by a single copy loop.
struct DigestWriter<W: Write> {
    inner: W,
    hasher: Sha256,
    written: i64,
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as i64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl SqlRegistry {
    // {archive_root}/{namespace}/{resource}/{version}
    fn archive_dir(&self, namespace: &str, resource: &str, version: &str) -> PathBuf {
        self.archive_root
            .join(namespace)
            .join(resource)
            .join(version)
    }

    fn archive_temp_path(&self, namespace: &str, resource: &str, version: &str) -> PathBuf {
        self.archive_dir(namespace, resource, version)
            .join(TEMPORARY_UPLOAD_SUFFIX)
    }

    fn archive_final_path(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        digest: &str,
    ) -> PathBuf {
        self.archive_dir(namespace, resource, version)
            .join(format!("{digest}{ARCHIVE_FILE_EXTENSION}"))
    }

    /// Stores an archive stream to disk and calculates its digest.
    ///
    /// Data is staged under a temporary name while the SHA-256 digest is
    /// computed, then moved to its final digest-derived name. The staged
    /// file is removed on every failure path. Returns the digest, final
    /// path, and size in bytes.
    pub(super) fn store_archive_file(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        reader: &mut dyn Read,
    ) -> io::Result<(String, PathBuf, i64)> {
        let dir = self.archive_dir(namespace, resource, version);
        fs::create_dir_all(&dir)?;

        let temp_path = self.archive_temp_path(namespace, resource, version);
        let temp_file = File::create(&temp_path)?;

        let mut writer = DigestWriter {
            inner: temp_file,
            hasher: Sha256::new(),
            written: 0,
        };

        if let Err(e) = io::copy(reader, &mut writer) {
            drop(writer);
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        let DigestWriter {
            inner: temp_file,
            hasher,
            written: size,
        } = writer;

        // Close the staged file before renaming; required on some hosts.
        if let Err(e) = temp_file.sync_all() {
            drop(temp_file);
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        drop(temp_file);

        let digest = format!("sha256:{}", hex::encode(hasher.finalize()));

        let final_path = self.archive_final_path(namespace, resource, version, &digest);
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        Ok((digest, final_path, size))
    }
}
