// SeaBlock client library: typed access to the seafood traceability backend

pub mod api;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod validation;

pub use api::{BackendClient, Collection, VerifierClient};
pub use config::ClientConfig;
pub use error::{SeaBlockError, SeaBlockResult};
pub use session::{Session, SessionStore};
