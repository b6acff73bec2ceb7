//! Shape checks for relay identifiers and integer-like arguments.
//!
//! Two identifier shapes are accepted:
//! - single-hop `se-mma-wg-001` (letters may be upper or lower case)
//! - multi-hop `sto0001-nyc0002` (lower case only)

use std::sync::OnceLock;

use regex::Regex;

fn single_hop() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z]{2}-[a-zA-Z]{3}-[a-zA-Z]{2}-[0-9]{3}$").expect("static pattern")
    })
}

fn multi_hop() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]{4}[0-9]{3}-[a-z]{4}[0-9]{3}$").expect("static pattern"))
}

/// True iff `s` is a single-hop or multi-hop relay identifier. No
/// normalisation is applied.
pub fn is_relay_identifier(s: &str) -> bool {
    single_hop().is_match(s) || multi_hop().is_match(s)
}

/// True iff `s` is an optional leading `-` followed by one or more ASCII
/// digits.
pub fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
