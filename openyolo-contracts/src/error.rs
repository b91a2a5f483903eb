use openyolo_model::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    InvalidArgument(#[from] DomainError),

    /// The platform could not vouch for the application's own package. This
    /// points at a broken host environment and is not worth retrying.
    #[error(
        "no authentication domain for the current package '{package_name}'"
    )]
    SelfPackageUnresolved { package_name: String },
}
