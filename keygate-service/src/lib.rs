//! Credential administration for keygate.
//!
//! [`CredentialService`] exposes the administrative operations (create,
//! delete, pause, unpause, reset-hwid, extend, list, count) on top of a
//! [`DocumentStore`](keygate_store::DocumentStore). Every mutation is one
//! fetch-mutate-commit cycle against the whole document; if the commit loses
//! a race the cycle is repeated from a fresh read, up to the configured
//! number of attempts.
//!
//! Callers are checked by an [`Authorizer`] before the store is touched.

mod auth;
mod config;
mod error;
mod service;

pub use auth::{AdminAllowList, Authorizer, CallerId};
pub use config::{RetryPolicy, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use service::CredentialService;
