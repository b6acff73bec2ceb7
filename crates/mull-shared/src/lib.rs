//! Types, validation helpers and the domain error taxonomy shared by every
//! `mull` crate.

pub mod constants;
pub mod error;
pub mod types;
pub mod validate;

pub use error::RelayError;
pub use types::{Action, RelayRef};
pub use validate::{is_integer_literal, is_relay_identifier};
