//! # mull-store
//!
//! Local state for `mull`: the SQLite relay metadata store, the favorites
//! list kept in the conf file, and the cached hostnames of the last query.
//!
//! Everything here is synchronous. The [`Database`] handle wraps a
//! `rusqlite::Connection`; [`Favorites`] and [`ResultCache`] rewrite their
//! files wholesale on every change.

pub mod conf;
pub mod database;
pub mod favorites;
pub mod filter;
pub mod migrations;
pub mod models;
pub mod relays;
pub mod resolve;
pub mod results;

mod error;
mod persist;

pub use conf::ConfFile;
pub use database::Database;
pub use error::{Result, StoreError};
pub use favorites::Favorites;
pub use filter::{compile, CompiledFilter, QueryFilter};
pub use models::*;
pub use resolve::Resolver;
pub use results::ResultCache;
