//! Library half of `openyoloctl`: configuration loading, a filesystem
//! certificate store, and the command implementations behind the CLI.
#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod store;

pub use config::{ConfigLoadError, CtlConfig, CtlConfigSource};
pub use store::{FsCertificateStore, StoreError};
