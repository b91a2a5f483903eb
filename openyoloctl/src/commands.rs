//! Command implementations, kept free of argument parsing and printing so
//! they can be driven from tests.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use openyolo_contracts::{
    PlatformIdentity, SigningCertificate, SigningCertificateSource,
    resolve_installed_package, self_domain,
};
use openyolo_model::{
    AuthenticationDomain, DomainKind, FingerprintAlgorithm, compute_fingerprint,
};
use serde::Serialize;
use url::Url;

use crate::config::CtlConfig;
use crate::store::FsCertificateStore;

/// Structured view of a domain, printed by `parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainReport {
    Android {
        domain: AuthenticationDomain,
        package_name: String,
        fingerprint_algorithm: FingerprintAlgorithm,
        fingerprint_tagged: bool,
        fingerprint: String,
        fingerprint_hex: String,
    },
    Web {
        domain: AuthenticationDomain,
        scheme: String,
        host: String,
        port: Option<u16>,
    },
}

impl DomainReport {
    pub fn describe(domain: &AuthenticationDomain) -> Self {
        match domain.kind() {
            DomainKind::Android(android) => {
                let fingerprint = android.fingerprint();
                DomainReport::Android {
                    domain: domain.clone(),
                    package_name: android.package_name().to_string(),
                    fingerprint_algorithm: fingerprint.algorithm(),
                    fingerprint_tagged: fingerprint.is_tagged(),
                    fingerprint: fingerprint.encoded().to_string(),
                    fingerprint_hex: hex::encode(fingerprint.bytes()),
                }
            }
            DomainKind::Web(web) => DomainReport::Web {
                domain: domain.clone(),
                scheme: web.scheme().to_string(),
                host: web.host().to_string(),
                port: web.port(),
            },
        }
    }
}

impl fmt::Display for DomainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainReport::Android {
                domain,
                package_name,
                fingerprint_algorithm,
                fingerprint_tagged,
                fingerprint,
                fingerprint_hex,
            } => {
                let implied =
                    if *fingerprint_tagged { "" } else { " (implied)" };
                writeln!(f, "domain:      {domain}")?;
                writeln!(f, "kind:        android")?;
                writeln!(f, "package:     {package_name}")?;
                writeln!(f, "algorithm:   {fingerprint_algorithm}{implied}")?;
                writeln!(f, "fingerprint: {fingerprint}")?;
                writeln!(f, "bytes:       {fingerprint_hex}")
            }
            DomainReport::Web {
                domain,
                scheme,
                host,
                port,
            } => {
                writeln!(f, "domain:      {domain}")?;
                writeln!(f, "kind:        web")?;
                writeln!(f, "scheme:      {scheme}")?;
                writeln!(f, "host:        {host}")?;
                match port {
                    Some(port) => writeln!(f, "port:        {port}"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Outcome of resolving a package through a certificate store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Trusted(AuthenticationDomain),
    /// Not installed, or not signed by exactly one certificate.
    Untrusted,
}

pub fn parse(domain: &str) -> Result<DomainReport> {
    let domain = AuthenticationDomain::parse(domain)
        .with_context(|| format!("invalid authentication domain {domain:?}"))?;
    Ok(DomainReport::describe(&domain))
}

pub fn fingerprint(
    cert: &Path,
    algorithm: FingerprintAlgorithm,
) -> Result<String> {
    let bytes = read_certificate(cert)?;
    Ok(compute_fingerprint(&bytes, algorithm))
}

pub fn android(
    package: &str,
    cert: &Path,
    algorithm: FingerprintAlgorithm,
) -> Result<AuthenticationDomain> {
    let bytes = read_certificate(cert)?;
    AuthenticationDomain::for_android_package_with(package, algorithm, &bytes)
        .with_context(|| format!("cannot mint a domain for {package}"))
}

pub fn web(url: &Url) -> Result<AuthenticationDomain> {
    AuthenticationDomain::for_web_origin(url)
        .with_context(|| format!("{url} has no web authentication domain"))
}

pub fn resolve(
    store: &FsCertificateStore,
    package: &str,
    algorithm: FingerprintAlgorithm,
) -> Result<Resolution> {
    let resolved = resolve_installed_package(store, package, algorithm)
        .with_context(|| format!("cannot resolve package {package:?}"))?;
    Ok(match resolved {
        Some(domain) => Resolution::Trusted(domain),
        None => Resolution::Untrusted,
    })
}

/// Certificate store paired with the package name configured as "self".
#[derive(Debug)]
pub struct CtlPlatform {
    store: FsCertificateStore,
    package_name: String,
}

impl CtlPlatform {
    pub fn new(store: FsCertificateStore, package_name: String) -> Self {
        Self {
            store,
            package_name,
        }
    }
}

impl SigningCertificateSource for CtlPlatform {
    fn lookup_installed_package_signatures(
        &self,
        package_name: &str,
    ) -> Option<Vec<SigningCertificate>> {
        self.store.lookup_installed_package_signatures(package_name)
    }
}

impl PlatformIdentity for CtlPlatform {
    fn current_package_name(&self) -> String {
        self.package_name.clone()
    }
}

pub fn self_package(platform: &CtlPlatform) -> Result<AuthenticationDomain> {
    Ok(self_domain(platform)?)
}

pub fn encode(domain: &str) -> Result<String> {
    let domain = AuthenticationDomain::parse(domain)
        .with_context(|| format!("invalid authentication domain {domain:?}"))?;
    Ok(hex::encode(domain.to_wire_bytes()))
}

pub fn decode(encoded: &str) -> Result<AuthenticationDomain> {
    let bytes = hex::decode(encoded.trim()).context("input is not hex")?;
    Ok(AuthenticationDomain::from_wire_bytes(&bytes)?)
}

/// Store named on the command line, falling back to the configured one.
pub fn open_store(
    flag: Option<PathBuf>,
    config: &CtlConfig,
) -> Result<FsCertificateStore> {
    let root = flag
        .or_else(|| config.signature_store.clone())
        .ok_or_else(|| {
            anyhow!(
                "no signature store given; \
                 pass --store or set signature_store"
            )
        })?;
    FsCertificateStore::open(&root).with_context(|| {
        format!("cannot open signature store {}", root.display())
    })
}

fn read_certificate(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| {
        format!("failed to read certificate {}", path.display())
    })?;
    if bytes.is_empty() {
        bail!("certificate {} is empty", path.display());
    }
    Ok(bytes)
}
