//! Protocol buffer form of an authentication domain.
//!
//! The message carries a single string field (tag 1) holding the canonical
//! domain URI. Anything decoded from the wire is validated again before it
//! becomes an [`AuthenticationDomain`].

use prost::Message;

use crate::auth_domain::AuthenticationDomain;
use crate::error::MalformedDataError;

/// Wire equivalent of `Protobufs.AuthenticationDomain`.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticationDomainProto {
    #[prost(string, tag = "1")]
    pub uri: String,
}

impl AuthenticationDomain {
    pub fn to_wire(&self) -> AuthenticationDomainProto {
        AuthenticationDomainProto {
            uri: self.as_str().to_string(),
        }
    }

    pub fn to_wire_bytes(&self) -> Vec<u8> {
        self.to_wire().encode_to_vec()
    }

    /// Validates the URI carried by a decoded message.
    pub fn from_wire(
        proto: AuthenticationDomainProto,
    ) -> Result<Self, MalformedDataError> {
        Ok(Self::try_from(proto.uri)?)
    }

    /// Decodes and validates an encoded message. Decode and validation
    /// failures are both reported as [`MalformedDataError`].
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, MalformedDataError> {
        let proto = AuthenticationDomainProto::decode(bytes)?;
        Self::from_wire(proto)
    }
}

impl From<&AuthenticationDomain> for AuthenticationDomainProto {
    fn from(domain: &AuthenticationDomain) -> Self {
        domain.to_wire()
    }
}

impl TryFrom<AuthenticationDomainProto> for AuthenticationDomain {
    type Error = MalformedDataError;

    fn try_from(proto: AuthenticationDomainProto) -> Result<Self, Self::Error> {
        Self::from_wire(proto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    #[test]
    fn test_wire_bytes_are_field_one_string() {
        let domain = AuthenticationDomain::parse("https://a.io").unwrap();
        let bytes = domain.to_wire_bytes();

        let mut expected = vec![0x0a, 12];
        expected.extend_from_slice(b"https://a.io");
        assert_eq!(bytes, expected);

        let decoded = AuthenticationDomain::from_wire_bytes(&bytes).unwrap();
        assert_eq!(decoded, domain);
    }

    #[test]
    fn test_invalid_uri_is_malformed_data() {
        let proto = AuthenticationDomainProto {
            uri: "ftp://example.com".to_string(),
        };
        let err = AuthenticationDomain::from_wire(proto).unwrap_err();
        assert!(matches!(
            err,
            MalformedDataError::InvalidDomain(DomainError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_empty_message_is_malformed_data() {
        // An empty buffer decodes to the default message, whose URI is empty.
        let err = AuthenticationDomain::from_wire_bytes(&[]).unwrap_err();
        assert!(matches!(
            err,
            MalformedDataError::InvalidDomain(DomainError::Empty)
        ));
    }

    #[test]
    fn test_truncated_bytes_are_malformed_data() {
        let err =
            AuthenticationDomain::from_wire_bytes(&[0x0a, 0x20, b'h'])
                .unwrap_err();
        assert!(matches!(err, MalformedDataError::Decode(_)));
    }

    #[test]
    fn test_invalid_utf8_is_malformed_data() {
        let err =
            AuthenticationDomain::from_wire_bytes(&[0x0a, 0x02, 0xff, 0xfe])
                .unwrap_err();
        assert!(matches!(err, MalformedDataError::Decode(_)));
    }
}
