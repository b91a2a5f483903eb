//! Filesystem-backed signing certificate store.
//!
//! Layout: one directory per installed package, holding that package's
//! signing certificates as raw DER files.
//!
//! ```text
//! <root>/com.example.app/release.der
//! <root>/com.example.other/a.cer
//! <root>/com.example.other/b.cer
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use openyolo_contracts::{SigningCertificate, SigningCertificateSource};
use thiserror::Error;

const CERTIFICATE_EXTENSIONS: &[&str] = &["der", "cer", "crt"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("signature store {path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("failed to read signature store entry {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot of a certificate directory, read eagerly so lookups cannot fail.
#[derive(Debug, Clone, Default)]
pub struct FsCertificateStore {
    root: PathBuf,
    packages: BTreeMap<String, Vec<SigningCertificate>>,
}

impl FsCertificateStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::NotADirectory { path: root });
        }

        let mut packages = BTreeMap::new();
        for entry in read_dir(&root)? {
            if !entry.is_dir() {
                continue;
            }
            let Some(package) = entry.file_name().and_then(|n| n.to_str())
            else {
                tracing::debug!(
                    path = %entry.display(),
                    "skipping non UTF-8 package directory"
                );
                continue;
            };
            let certificates = read_certificates(&entry)?;
            tracing::debug!(
                package,
                certificates = certificates.len(),
                "loaded package signatures"
            );
            packages.insert(package.to_string(), certificates);
        }

        Ok(Self { root, packages })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

impl SigningCertificateSource for FsCertificateStore {
    fn lookup_installed_package_signatures(
        &self,
        package_name: &str,
    ) -> Option<Vec<SigningCertificate>> {
        self.packages.get(package_name).cloned()
    }
}

/// Entries of `dir`, sorted by path for a stable certificate order.
fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}

fn read_certificates(
    package_dir: &Path,
) -> Result<Vec<SigningCertificate>, StoreError> {
    let mut certificates = Vec::new();
    for path in read_dir(package_dir)? {
        let is_certificate = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CERTIFICATE_EXTENSIONS.contains(&ext));
        if !is_certificate {
            continue;
        }
        let bytes = fs::read(&path)
            .map_err(|source| StoreError::Io { path, source })?;
        certificates.push(SigningCertificate::from(bytes));
    }
    Ok(certificates)
}
