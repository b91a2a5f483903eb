//! Authentication domains for installed applications.

use openyolo_model::{
    AuthenticationDomain, DomainError, FingerprintAlgorithm,
    validate_package_name,
};

use crate::error::ContractError;
use crate::platform::{PlatformIdentity, SigningCertificateSource};

/// Authentication domain of the installed application `package_name`.
///
/// Returns `Ok(None)` when the package is not installed, and also when it
/// does not have exactly one signing certificate: identity by signature is
/// undefined for unsigned or multi-signer packages, so no signer is ever
/// picked on the caller's behalf. A single certificate with no bytes is
/// treated like an unsigned package and also yields `Ok(None)`.
pub fn resolve_installed_package<S>(
    source: &S,
    package_name: &str,
    algorithm: FingerprintAlgorithm,
) -> Result<Option<AuthenticationDomain>, DomainError>
where
    S: SigningCertificateSource + ?Sized,
{
    validate_package_name(package_name)?;

    let Some(signatures) =
        source.lookup_installed_package_signatures(package_name)
    else {
        log::debug!("package {package_name} is not installed");
        return Ok(None);
    };

    let [certificate] = signatures.as_slice() else {
        log::warn!(
            "application ({package_name}) did not have exactly one \
             signature, found {}",
            signatures.len()
        );
        return Ok(None);
    };

    if certificate.as_bytes().is_empty() {
        log::warn!("application ({package_name}) reported an empty signature");
        return Ok(None);
    }

    AuthenticationDomain::for_android_package_with(
        package_name,
        algorithm,
        certificate.as_bytes(),
    )
    .map(Some)
}

/// Authentication domain of the calling application, fingerprinted with the
/// default algorithm.
///
/// An error here means the platform cannot describe the application it is
/// hosting; callers should treat it as fatal.
pub fn self_domain<P>(
    platform: &P,
) -> Result<AuthenticationDomain, ContractError>
where
    P: PlatformIdentity + SigningCertificateSource + ?Sized,
{
    let package_name = platform.current_package_name();
    let domain = resolve_installed_package(
        platform,
        &package_name,
        FingerprintAlgorithm::default(),
    )?;

    domain
        .ok_or_else(|| ContractError::SelfPackageUnresolved { package_name })
}
