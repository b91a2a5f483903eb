//! Authentication domain value types for the OpenYOLO credential exchange
//! protocol.
//!
//! An [`AuthenticationDomain`] names the scope a stored credential is valid
//! for: an Android application (`android://<fingerprint>@<package>`) or a web
//! origin (`https://host[:port]`). Domains are validated once, keep their
//! input string verbatim, and compare by that string.
//!
//! ```
//! use openyolo_model::{AuthenticationDomain, FingerprintAlgorithm};
//!
//! let domain: AuthenticationDomain =
//!     "android://AAAA@com.example.app".parse().unwrap();
//! assert_eq!(
//!     domain.android_fingerprint_algorithm(),
//!     Ok(FingerprintAlgorithm::Sha512)
//! );
//!
//! let bytes = domain.to_wire_bytes();
//! assert_eq!(AuthenticationDomain::from_wire_bytes(&bytes).unwrap(), domain);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serializes domains as their canonical string and fingerprint
//!   algorithms as their tag.
#![allow(missing_docs)]

pub mod auth_domain;
pub mod error;
pub mod fingerprint;
pub mod wire;

pub use auth_domain::{
    AndroidDomain, AuthenticationDomain, DomainKind, SCHEME_ANDROID,
    SCHEME_HTTP, SCHEME_HTTPS, WebDomain, WebScheme, validate_package_name,
};
pub use error::{DomainError, MalformedDataError, Result as DomainResult};
pub use fingerprint::{
    FINGERPRINT_ALGO_SEPARATOR, Fingerprint, FingerprintAlgorithm,
    compute_fingerprint,
};
pub use wire::AuthenticationDomainProto;
