//! Typed Rust client for the Estonian e-Business Register (äriregister) SOAP
//! service.
//!
//! The crate has three layers: a domain layer of strong types, a crate-private
//! transport layer for the SOAP wire format, and a client layer that shapes
//! requests, retries transient failures and maps outcomes to [`Error`].
//! The [`validator`] module checks caller input before it reaches a request.
//!
//! ```rust,no_run
//! use ariregister::{AriregisterClient, Config, Params, validator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ariregister::Error> {
//!     let config = Config::new().with_credentials("username", "password")?;
//!     let client = AriregisterClient::builder(config).build()?;
//!
//!     let code = validator::validate_registry_code(Some("10060701"))?
//!         .expect("code is present");
//!     let response = client
//!         .call("lihtandmed_v2", Params::new().with("ariregistri_kood", code))
//!         .await?;
//!     println!("{:?}", response.find_text(&["keha", "ettevotjad", "item", "evnimi"]));
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod shared;
mod transport;
pub mod validator;

pub use client::{AriregisterClient, AriregisterClientBuilder, Config, Error, FailureKind};
pub use domain::{
    Environment, Language, OperationName, Params, Password, RawResponse, Username,
    ValidationError, Value, XmlElement,
};
