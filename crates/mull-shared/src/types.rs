use std::fmt;

use crate::validate::is_integer_literal;

/// What the user pointed at when naming a relay on the command line.
///
/// Built once from the raw arguments so that business logic switches on the
/// tag instead of re-sniffing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayRef {
    /// A hostname, taken as typed.
    Literal(String),
    /// Position in the favorites list.
    FavoritesIndex(i64),
    /// Position in the last query's result list.
    ResultsIndex(i64),
    /// Nothing was given; the caller picks a fallback.
    Unspecified,
}

impl RelayRef {
    /// Classify a positional token plus the optional `--results` index.
    ///
    /// A results index always wins over the token.
    pub fn from_args(token: Option<&str>, results: Option<i64>) -> Self {
        if let Some(idx) = results {
            return RelayRef::ResultsIndex(idx);
        }
        match token {
            Some(t) if is_integer_literal(t) => t
                .parse::<i64>()
                .map(RelayRef::FavoritesIndex)
                .unwrap_or_else(|_| RelayRef::Literal(t.to_string())),
            Some(t) => RelayRef::Literal(t.to_string()),
            None => RelayRef::Unspecified,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, RelayRef::Unspecified)
    }
}

impl fmt::Display for RelayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayRef::Literal(s) => write!(f, "{s}"),
            RelayRef::FavoritesIndex(i) => write!(f, "favorite #{i}"),
            RelayRef::ResultsIndex(i) => write!(f, "result #{i}"),
            RelayRef::Unspecified => write!(f, "<none>"),
        }
    }
}

/// Direction of a relay lifecycle change, as understood by `wg-quick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
}

impl Action {
    /// Argument passed to the activation tool.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
        }
    }

    /// Word used in the success line.
    pub fn past_tense(self) -> &'static str {
        match self {
            Action::Up => "Activated",
            Action::Down => "Deactivated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
