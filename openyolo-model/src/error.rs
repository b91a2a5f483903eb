use thiserror::Error;

/// Invalid arguments passed to authentication domain constructors and
/// accessors.
///
/// These indicate a caller bug: a malformed string handed to a direct
/// constructor, an accessor used on the wrong kind of domain, or an unknown
/// fingerprint algorithm tag. Data arriving from outside the process is
/// reported as [`MalformedDataError`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("authentication domain must not be empty")]
    Empty,

    #[error("authentication domain '{0}' is not an absolute URI")]
    NotAbsolute(String),

    #[error("authentication domain '{0}' has no authority")]
    MissingAuthority(String),

    #[error("unsupported authentication domain scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("authentication domain '{0}' must not contain a path")]
    HasPath(String),

    #[error("authentication domain '{0}' must not contain a query")]
    HasQuery(String),

    #[error("authentication domain '{0}' must not contain a fragment")]
    HasFragment(String),

    #[error("android authentication domain '{0}' has no fingerprint")]
    MissingFingerprint(String),

    #[error("signing certificate must not be empty")]
    EmptySigningCertificate,

    #[error("invalid fingerprint '{0}'")]
    InvalidFingerprint(String),

    #[error("unknown fingerprint algorithm '{0}'")]
    UnknownFingerprintAlgorithm(String),

    #[error("invalid android package name '{0}'")]
    InvalidPackageName(String),

    #[error("invalid host '{0}'")]
    InvalidHost(String),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("web authentication domain '{0}' must not carry user info")]
    UnexpectedUserInfo(String),

    #[error("authentication domain is not an android domain")]
    NotAndroidDomain,

    #[error("authentication domain is not a web domain")]
    NotWebDomain,
}

/// Untrusted input that could not be turned into an authentication domain.
///
/// Envelope decode failures and validation failures share this type so that
/// protocol boundaries handle a single rejection path.
#[derive(Debug, Error)]
pub enum MalformedDataError {
    #[error("unable to decode authentication domain message")]
    Decode(#[source] prost::DecodeError),

    #[error("malformed authentication domain")]
    InvalidDomain(#[source] DomainError),
}

impl From<prost::DecodeError> for MalformedDataError {
    fn from(err: prost::DecodeError) -> Self {
        MalformedDataError::Decode(err)
    }
}

impl From<DomainError> for MalformedDataError {
    fn from(err: DomainError) -> Self {
        MalformedDataError::InvalidDomain(err)
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
