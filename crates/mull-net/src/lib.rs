// Network edge of mull: the relay list download and the public connection
// check. Both are plain HTTPS GETs returning JSON.

pub mod check;
pub mod error;
pub mod fetch;
pub mod normalize;

pub use check::{connection_check, ConnectionCheck};
pub use error::NetError;
pub use fetch::{fetch_relays, parse_relays};
pub use normalize::strip_accents;
