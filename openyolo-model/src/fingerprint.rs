//! Signing-key fingerprints for Android authentication domains.

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{DomainError, Result};

/// Separates the algorithm tag from the Base64 fingerprint bytes.
pub const FINGERPRINT_ALGO_SEPARATOR: char = '~';

/// Digest used to derive a fingerprint from signing certificate bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FingerprintAlgorithm {
    /// Used when minting new domains.
    #[default]
    Sha256,
    Sha512,
}

impl FingerprintAlgorithm {
    /// Algorithm implied by a fingerprint that carries no tag. Domains minted
    /// before tagging existed were always SHA-512.
    pub const LEGACY_UNTAGGED: FingerprintAlgorithm =
        FingerprintAlgorithm::Sha512;

    pub const ALL: [FingerprintAlgorithm; 2] =
        [FingerprintAlgorithm::Sha256, FingerprintAlgorithm::Sha512];

    pub fn tag(self) -> &'static str {
        match self {
            FingerprintAlgorithm::Sha256 => "sha256",
            FingerprintAlgorithm::Sha512 => "sha512",
        }
    }

    pub fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            FingerprintAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            FingerprintAlgorithm::Sha512 => Sha512::digest(bytes).to_vec(),
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FingerprintAlgorithm {
    type Err = DomainError;

    fn from_str(tag: &str) -> Result<Self> {
        FingerprintAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.tag() == tag)
            .ok_or_else(|| {
                DomainError::UnknownFingerprintAlgorithm(tag.to_string())
            })
    }
}

/// Computes the URL-safe, unpadded Base64 fingerprint of a signing
/// certificate.
pub fn compute_fingerprint(
    signing_key_bytes: &[u8],
    algorithm: FingerprintAlgorithm,
) -> String {
    URL_SAFE_NO_PAD.encode(algorithm.digest(signing_key_bytes))
}

/// The fingerprint carried in the user info of an Android authentication
/// domain, either `<base64>` (legacy) or `<algorithm>~<base64>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    algorithm: FingerprintAlgorithm,
    tagged: bool,
    /// Base64 text exactly as written in the domain.
    encoded: String,
    bytes: Vec<u8>,
}

impl Fingerprint {
    /// Fingerprint of `signing_key_bytes`, always tagged with its algorithm.
    pub fn compute(
        algorithm: FingerprintAlgorithm,
        signing_key_bytes: &[u8],
    ) -> Self {
        let bytes = algorithm.digest(signing_key_bytes);
        Self {
            algorithm,
            tagged: true,
            encoded: URL_SAFE_NO_PAD.encode(&bytes),
            bytes,
        }
    }

    /// Parses the user info component of an Android authentication domain.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DomainError::InvalidFingerprint(raw.to_string()));
        }

        let (algorithm, tagged, encoded) =
            match raw.split_once(FINGERPRINT_ALGO_SEPARATOR) {
                Some((tag, encoded)) => (tag.parse()?, true, encoded),
                None => (FingerprintAlgorithm::LEGACY_UNTAGGED, false, raw),
            };

        let bytes = decode_fingerprint(encoded)
            .ok_or_else(|| DomainError::InvalidFingerprint(raw.to_string()))?;

        Ok(Self {
            algorithm,
            tagged,
            encoded: encoded.to_string(),
            bytes,
        })
    }

    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    /// Whether the algorithm was written explicitly rather than implied.
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Checks a presented signing certificate against this fingerprint using
    /// the fingerprint's own algorithm.
    pub fn matches_certificate(&self, signing_key_bytes: &[u8]) -> bool {
        let digest = self.algorithm.digest(signing_key_bytes);
        digest.len() == self.bytes.len()
            && bool::from(digest.ct_eq(&self.bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tagged {
            write!(
                f,
                "{}{}{}",
                self.algorithm, FINGERPRINT_ALGO_SEPARATOR, self.encoded
            )
        } else {
            f.write_str(&self.encoded)
        }
    }
}

/// Base64 never needs more than two padding characters.
const MAX_PADDING: usize = 2;

/// Fingerprints are minted without padding. Up to two trailing `=` are
/// accepted on the way in, even after a complete quantum (`AAAA==`).
fn decode_fingerprint(encoded: &str) -> Option<Vec<u8>> {
    let unpadded = encoded.trim_end_matches('=');
    if unpadded.is_empty() || encoded.len() - unpadded.len() > MAX_PADDING {
        return None;
    }
    URL_SAFE_NO_PAD.decode(unpadded).ok()
}
