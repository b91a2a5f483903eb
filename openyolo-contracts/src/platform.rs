//! Capabilities the host platform provides to authentication domain
//! resolution.

use std::fmt;

/// Raw bytes of an application signing certificate, as reported by the
/// platform's package store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SigningCertificate(Vec<u8>);

impl SigningCertificate {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for SigningCertificate {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for SigningCertificate {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCertificate")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Source of signing certificates for installed applications.
///
/// Lookups are synchronous and may block on local storage.
pub trait SigningCertificateSource {
    /// Signing certificates of `package_name`, or `None` when the package is
    /// not installed. An installed package may report any number of
    /// certificates, including none.
    fn lookup_installed_package_signatures(
        &self,
        package_name: &str,
    ) -> Option<Vec<SigningCertificate>>;
}

/// Identity of the application this code runs in.
pub trait PlatformIdentity {
    fn current_package_name(&self) -> String;
}
