//! Authentication domains: the scope within which a stored credential is
//! valid.
//!
//! Two classes of domain exist. Android domains have the form
//! `android://<fingerprint>@<packageName>` and web domains have the form
//! `http(s)://host[:port]`. Both are absolute hierarchical URIs with no path,
//! query or fragment, so they are always `scheme://authority`.
//!
//! A domain is a validated wrapper around its string form. Validation never
//! rewrites the input, and equality and ordering compare that string exactly.
//! Deciding whether two different domains are equivalent is left to the
//! credential provider.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use url::{Host, Url};

use crate::error::{DomainError, Result};
use crate::fingerprint::{
    Fingerprint, FingerprintAlgorithm, compute_fingerprint,
};

pub const SCHEME_ANDROID: &str = "android";
pub const SCHEME_HTTP: &str = "http";
pub const SCHEME_HTTPS: &str = "https";

const SCHEME_SEPARATOR: &str = "://";

/// Scheme of a web authentication domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WebScheme {
    Http,
    Https,
}

impl WebScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            WebScheme::Http => SCHEME_HTTP,
            WebScheme::Https => SCHEME_HTTPS,
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            WebScheme::Http => 80,
            WebScheme::Https => 443,
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            SCHEME_HTTP => Some(WebScheme::Http),
            SCHEME_HTTPS => Some(WebScheme::Https),
            _ => None,
        }
    }
}

impl fmt::Display for WebScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An installed Android application identified by package name and
/// signing-key fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AndroidDomain {
    package_name: String,
    fingerprint: Fingerprint,
}

impl AndroidDomain {
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

/// A web origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WebDomain {
    scheme: WebScheme,
    host: String,
    port: Option<u16>,
}

impl WebDomain {
    pub fn scheme(&self) -> WebScheme {
        self.scheme
    }

    /// Host exactly as written, including brackets for IPv6 literals.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port written in the domain, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Explicit port, falling back to the scheme's default.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }
}

/// Structural view of an authentication domain, computed once at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Android(AndroidDomain),
    Web(WebDomain),
}

/// A validated authentication domain URI.
#[derive(Debug, Clone)]
pub struct AuthenticationDomain {
    uri: String,
    /// Byte offset of `://` in `uri`.
    scheme_end: usize,
    kind: DomainKind,
}

impl AuthenticationDomain {
    /// Validates `candidate` as an authentication domain, keeping the string
    /// verbatim as the canonical form.
    pub fn parse(candidate: &str) -> Result<Self> {
        Self::from_uri(candidate.to_string())
    }

    /// Android domain for `package_name` signed with `signing_key_bytes`,
    /// fingerprinted with the default algorithm.
    pub fn for_android_package(
        package_name: &str,
        signing_key_bytes: &[u8],
    ) -> Result<Self> {
        Self::for_android_package_with(
            package_name,
            FingerprintAlgorithm::default(),
            signing_key_bytes,
        )
    }

    pub fn for_android_package_with(
        package_name: &str,
        algorithm: FingerprintAlgorithm,
        signing_key_bytes: &[u8],
    ) -> Result<Self> {
        if signing_key_bytes.is_empty() {
            return Err(DomainError::EmptySigningCertificate);
        }
        let fingerprint = compute_fingerprint(signing_key_bytes, algorithm);
        Self::from_android_fingerprint(package_name, algorithm, &fingerprint)
    }

    /// Android domain from an already encoded fingerprint. The result is
    /// always in the tagged `algorithm~fingerprint` form.
    pub fn from_android_fingerprint(
        package_name: &str,
        algorithm: FingerprintAlgorithm,
        fingerprint_base64: &str,
    ) -> Result<Self> {
        validate_package_name(package_name)?;
        if fingerprint_base64.is_empty() {
            return Err(DomainError::InvalidFingerprint(String::new()));
        }

        Self::from_uri(format!(
            "{SCHEME_ANDROID}{SCHEME_SEPARATOR}{algorithm}~\
             {fingerprint_base64}@{package_name}"
        ))
    }

    /// Web domain for the origin of `url`. Path, query and fragment are
    /// dropped, and default ports are omitted.
    pub fn for_web_origin(url: &Url) -> Result<Self> {
        let scheme = WebScheme::from_scheme(url.scheme()).ok_or_else(|| {
            DomainError::UnsupportedScheme(url.scheme().to_string())
        })?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| DomainError::InvalidHost(url.to_string()))?;

        let origin = match url.port() {
            Some(port) => format!("{scheme}{SCHEME_SEPARATOR}{host}:{port}"),
            None => format!("{scheme}{SCHEME_SEPARATOR}{host}"),
        };
        Self::from_uri(origin)
    }

    fn from_uri(uri: String) -> Result<Self> {
        let (scheme_end, kind) = parse_structure(&uri)?;
        Ok(Self {
            uri,
            scheme_end,
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn into_string(self) -> String {
        self.uri
    }

    pub fn scheme(&self) -> &str {
        &self.uri[..self.scheme_end]
    }

    pub fn authority(&self) -> &str {
        &self.uri[self.scheme_end + SCHEME_SEPARATOR.len()..]
    }

    pub fn kind(&self) -> &DomainKind {
        &self.kind
    }

    pub fn is_android(&self) -> bool {
        matches!(self.kind, DomainKind::Android(_))
    }

    pub fn is_web(&self) -> bool {
        matches!(self.kind, DomainKind::Web(_))
    }

    pub fn android(&self) -> Option<&AndroidDomain> {
        match &self.kind {
            DomainKind::Android(android) => Some(android),
            DomainKind::Web(_) => None,
        }
    }

    pub fn web(&self) -> Option<&WebDomain> {
        match &self.kind {
            DomainKind::Web(web) => Some(web),
            DomainKind::Android(_) => None,
        }
    }

    pub fn require_android(&self) -> Result<&AndroidDomain> {
        self.android().ok_or(DomainError::NotAndroidDomain)
    }

    pub fn require_web(&self) -> Result<&WebDomain> {
        self.web().ok_or(DomainError::NotWebDomain)
    }

    pub fn android_package_name(&self) -> Result<&str> {
        Ok(self.require_android()?.package_name())
    }

    pub fn android_fingerprint(&self) -> Result<&Fingerprint> {
        Ok(self.require_android()?.fingerprint())
    }

    /// The user info component, i.e. the fingerprint as written.
    pub fn android_fingerprint_raw(&self) -> Result<&str> {
        self.require_android()?;
        self.authority()
            .rsplit_once('@')
            .map(|(user_info, _)| user_info)
            .ok_or(DomainError::NotAndroidDomain)
    }

    pub fn android_fingerprint_algorithm(
        &self,
    ) -> Result<FingerprintAlgorithm> {
        Ok(self.android_fingerprint()?.algorithm())
    }

    pub fn android_fingerprint_bytes(&self) -> Result<&[u8]> {
        Ok(self.android_fingerprint()?.bytes())
    }
}

/// Splits `uri` into scheme and authority and validates each part against
/// the scheme's grammar. Returns the offset of `://` with the parsed view.
fn parse_structure(uri: &str) -> Result<(usize, DomainKind)> {
    if uri.is_empty() {
        return Err(DomainError::Empty);
    }

    let Some((scheme, rest)) = uri.split_once(SCHEME_SEPARATOR) else {
        return Err(match uri.split_once(':') {
            Some((scheme, _)) if is_uri_scheme(scheme) => {
                DomainError::MissingAuthority(uri.to_string())
            }
            _ => DomainError::NotAbsolute(uri.to_string()),
        });
    };

    if !is_uri_scheme(scheme) {
        return Err(DomainError::NotAbsolute(uri.to_string()));
    }

    if let Some(index) = rest.find(['/', '?', '#']) {
        let uri = uri.to_string();
        return Err(match rest.as_bytes()[index] {
            b'/' => DomainError::HasPath(uri),
            b'?' => DomainError::HasQuery(uri),
            _ => DomainError::HasFragment(uri),
        });
    }

    if rest.is_empty() {
        return Err(DomainError::MissingAuthority(uri.to_string()));
    }

    let (user_info, host_port) = match rest.rsplit_once('@') {
        Some((user_info, host_port)) => (Some(user_info), host_port),
        None => (None, rest),
    };

    let kind = if scheme == SCHEME_ANDROID {
        DomainKind::Android(parse_android(uri, user_info, host_port)?)
    } else if let Some(web_scheme) = WebScheme::from_scheme(scheme) {
        if user_info.is_some() {
            return Err(DomainError::UnexpectedUserInfo(uri.to_string()));
        }
        DomainKind::Web(parse_web(web_scheme, host_port)?)
    } else {
        return Err(DomainError::UnsupportedScheme(scheme.to_string()));
    };

    Ok((scheme.len(), kind))
}

fn parse_android(
    uri: &str,
    user_info: Option<&str>,
    package_name: &str,
) -> Result<AndroidDomain> {
    let user_info = user_info
        .filter(|user_info| !user_info.is_empty())
        .ok_or_else(|| DomainError::MissingFingerprint(uri.to_string()))?;

    validate_package_name(package_name)?;
    let fingerprint = Fingerprint::parse(user_info)?;

    Ok(AndroidDomain {
        package_name: package_name.to_string(),
        fingerprint,
    })
}

fn parse_web(scheme: WebScheme, host_port: &str) -> Result<WebDomain> {
    let (host, port) = if host_port.starts_with('[') {
        let close = host_port
            .find(']')
            .ok_or_else(|| DomainError::InvalidHost(host_port.to_string()))?;
        let (host, tail) = host_port.split_at(close + 1);
        match tail {
            "" => (host, None),
            _ => match tail.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => {
                    return Err(DomainError::InvalidHost(
                        host_port.to_string(),
                    ));
                }
            },
        }
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if !is_uri_host(host) || Host::parse(host).is_err() {
        return Err(DomainError::InvalidHost(host.to_string()));
    }

    let port = port.map(parse_port).transpose()?;

    Ok(WebDomain {
        scheme,
        host: host.to_string(),
        port,
    })
}

fn parse_port(port: &str) -> Result<u16> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::InvalidPort(port.to_string()));
    }
    port.parse()
        .map_err(|_| DomainError::InvalidPort(port.to_string()))
}

/// ASCII URI host syntax: a bracketed IP literal, or a reg-name of
/// unreserved and sub-delim characters (which covers IPv4). Percent-encoded
/// and non-ASCII hosts are rejected outright.
fn is_uri_host(host: &str) -> bool {
    if let Some(literal) = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return !literal.is_empty()
            && literal
                .chars()
                .all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '.'));
    }

    !host.is_empty()
        && host.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '-' | '.'
                        | '_'
                        | '~'
                        | '!'
                        | '$'
                        | '&'
                        | '\''
                        | '('
                        | ')'
                        | '*'
                        | '+'
                        | ','
                        | ';'
                        | '='
                )
        })
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_uri_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Package names are dot-separated segments of ASCII letters, digits and
/// underscores.
pub fn validate_package_name(package_name: &str) -> Result<()> {
    let valid = !package_name.is_empty()
        && package_name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidPackageName(package_name.to_string()))
    }
}

impl PartialEq for AuthenticationDomain {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for AuthenticationDomain {}

impl PartialOrd for AuthenticationDomain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AuthenticationDomain {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri)
    }
}

impl Hash for AuthenticationDomain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for AuthenticationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for AuthenticationDomain {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl FromStr for AuthenticationDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AuthenticationDomain {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_uri(value)
    }
}

impl TryFrom<&str> for AuthenticationDomain {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<AuthenticationDomain> for String {
    fn from(domain: AuthenticationDomain) -> Self {
        domain.uri
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AuthenticationDomain {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.uri)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AuthenticationDomain {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Self::try_from(uri).map_err(serde::de::Error::custom)
    }
}
