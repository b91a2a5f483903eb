//! Package resolution against a mocked platform.

use mockall::mock;
use mockall::predicate::eq;
use openyolo_contracts::prelude::*;
use openyolo_contracts::ContractError;

mock! {
    Platform {}

    impl SigningCertificateSource for Platform {
        fn lookup_installed_package_signatures(
            &self,
            package_name: &str,
        ) -> Option<Vec<SigningCertificate>>;
    }

    impl PlatformIdentity for Platform {
        fn current_package_name(&self) -> String;
    }
}

const PACKAGE: &str = "com.example.app";

fn certs(certs: &[&[u8]]) -> Vec<SigningCertificate> {
    certs.iter().map(|c| SigningCertificate::new(*c)).collect()
}

#[test]
fn single_signer_produces_a_tagged_domain() {
    let mut platform = MockPlatform::new();
    platform
        .expect_lookup_installed_package_signatures()
        .with(eq(PACKAGE))
        .times(1)
        .returning(|_| Some(certs(&[b"release-key"])));

    let domain = resolve_installed_package(
        &platform,
        PACKAGE,
        FingerprintAlgorithm::Sha256,
    )
    .unwrap()
    .expect("single signer should resolve");

    assert!(domain.as_str().starts_with("android://sha256~"));
    assert!(domain.as_str().ends_with("@com.example.app"));
    assert!(
        domain
            .android_fingerprint()
            .unwrap()
            .matches_certificate(b"release-key")
    );
}

#[test]
fn not_installed_is_not_an_error() {
    let mut platform = MockPlatform::new();
    platform
        .expect_lookup_installed_package_signatures()
        .times(1)
        .returning(|_| None);

    assert_eq!(
        resolve_installed_package(
            &platform,
            PACKAGE,
            FingerprintAlgorithm::Sha256
        ),
        Ok(None)
    );
}

#[test]
fn unsigned_packages_are_never_trusted() {
    let mut platform = MockPlatform::new();
    platform
        .expect_lookup_installed_package_signatures()
        .returning(|_| Some(Vec::new()));

    assert_eq!(
        resolve_installed_package(
            &platform,
            PACKAGE,
            FingerprintAlgorithm::Sha512
        ),
        Ok(None)
    );
}

#[test]
fn a_single_empty_certificate_is_treated_as_unsigned() {
    let mut platform = MockPlatform::new();
    platform
        .expect_lookup_installed_package_signatures()
        .returning(|_| Some(certs(&[b""])));

    for algorithm in FingerprintAlgorithm::ALL {
        assert_eq!(
            resolve_installed_package(&platform, PACKAGE, algorithm),
            Ok(None),
            "{algorithm}"
        );
    }
}

#[test]
fn multi_signer_packages_are_never_trusted() {
    let mut platform = MockPlatform::new();
    platform
        .expect_lookup_installed_package_signatures()
        .returning(|_| Some(certs(&[b"signer-one", b"signer-two"])));

    for algorithm in FingerprintAlgorithm::ALL {
        assert_eq!(
            resolve_installed_package(&platform, PACKAGE, algorithm),
            Ok(None),
            "{algorithm}"
        );
    }
}

#[test]
fn invalid_package_names_are_rejected_before_lookup() {
    let mut platform = MockPlatform::new();
    platform.expect_lookup_installed_package_signatures().never();

    for package in ["", "com/example", "com..example", "com.example@evil"] {
        assert!(
            resolve_installed_package(
                &platform,
                package,
                FingerprintAlgorithm::default()
            )
            .is_err(),
            "{package:?}"
        );
    }
}

#[test]
fn self_domain_uses_the_default_algorithm() {
    let mut platform = MockPlatform::new();
    platform
        .expect_current_package_name()
        .times(1)
        .returning(|| PACKAGE.to_string());
    platform
        .expect_lookup_installed_package_signatures()
        .with(eq(PACKAGE))
        .returning(|_| Some(certs(&[b"self-key"])));

    let domain = self_domain(&platform).unwrap();
    assert_eq!(
        domain,
        AuthenticationDomain::for_android_package(PACKAGE, b"self-key").unwrap()
    );
}

#[test]
fn self_domain_fails_when_the_host_cannot_vouch_for_itself() {
    let mut platform = MockPlatform::new();
    platform
        .expect_current_package_name()
        .returning(|| PACKAGE.to_string());
    platform
        .expect_lookup_installed_package_signatures()
        .returning(|_| Some(certs(&[b"one", b"two"])));

    let err = self_domain(&platform).unwrap_err();
    assert!(matches!(
        err,
        ContractError::SelfPackageUnresolved { ref package_name }
            if package_name == PACKAGE
    ));
}
