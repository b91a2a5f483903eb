//! Trait surfaces that connect authentication domains to the host platform.
//!
//! The platform supplies two capabilities: the signing certificates of
//! installed applications, and the package name of the running application.
//! Everything else is pure computation in `openyolo-model`.
#![allow(missing_docs)]

pub mod error;
pub mod platform;
pub mod resolve;

pub use error::ContractError;
pub use platform::{
    PlatformIdentity, SigningCertificate, SigningCertificateSource,
};
pub use resolve::{resolve_installed_package, self_domain};

/// Frequently used types for callers resolving domains.
pub mod prelude {
    pub use super::platform::{
        PlatformIdentity, SigningCertificate, SigningCertificateSource,
    };
    pub use super::resolve::{resolve_installed_package, self_domain};
    pub use openyolo_model::{AuthenticationDomain, FingerprintAlgorithm};
}
