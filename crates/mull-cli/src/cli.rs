use clap::{Args, Parser, Subcommand};
use mull_shared::{is_integer_literal, RelayRef};
use mull_store::QueryFilter;

#[derive(Debug, Parser)]
#[command(
    name = "mull",
    version,
    about = "Manage favourite WireGuard relays and bring them up or down"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// A relay named by hostname, favorites index or `--results` index.
#[derive(Debug, Args)]
pub struct Target {
    /// Relay hostname, or its index in the favorites list
    pub relay: Option<String>,

    /// Index into the results of the last `mull query` (wins over RELAY)
    #[arg(short, long, value_name = "IDX", allow_negative_numbers = true)]
    pub results: Option<i64>,
}

impl Target {
    pub fn relay_ref(&self) -> RelayRef {
        RelayRef::from_args(self.relay.as_deref(), self.results)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Activate a relay (defaults to the first favorite)
    #[command(allow_negative_numbers = true)]
    Up {
        #[command(flatten)]
        target: Target,

        /// Show wg-quick output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Deactivate a relay (defaults to every active one)
    #[command(allow_negative_numbers = true)]
    Down {
        #[command(flatten)]
        target: Target,

        /// Show wg-quick output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Add a relay to the favorites
    #[command(visible_alias = "a", allow_negative_numbers = true)]
    Add {
        #[command(flatten)]
        target: Target,

        /// Insert position (negative counts from the end); with --results
        /// the first positional is the position
        position: Option<i64>,
    },

    /// Remove a relay from the favorites, by hostname or index
    #[command(allow_negative_numbers = true)]
    Remove { relay: String },

    /// Swap two favorites
    Swap { index1: usize, index2: usize },

    /// Move a favorite to another position
    Move { from: usize, to: usize },

    /// List the favorites
    #[command(visible_alias = "d")]
    Defaults,

    /// Download the relay list into the local database
    Update,

    /// Show relay details from the local database
    #[command(visible_alias = "i", allow_negative_numbers = true)]
    Info {
        #[command(flatten)]
        target: Target,

        /// Show every column
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the results of the last query
    Results,

    /// Check the connection, or the status of one relay
    #[command(allow_negative_numbers = true)]
    Status {
        #[command(flatten)]
        target: Target,

        /// Include `wg show` output for the connected relay
        #[arg(short, long)]
        verbose: bool,
    },

    /// List active relay sessions
    Active {
        /// Print each session's status
        #[arg(short, long)]
        status: bool,
    },

    /// Search the local database
    #[command(visible_alias = "q")]
    Query(QueryArgs),
}

impl Commands {
    /// Split `add`'s positionals into the relay and the insert position.
    ///
    /// `mull add -r 2 1` puts result 2 at position 1: with `--results` set a
    /// lone numeric positional is the position, not a favorites index.
    pub fn add_parts(target: &Target, position: Option<i64>) -> (RelayRef, Option<i64>) {
        match (&target.relay, target.results, position) {
            (Some(token), Some(idx), None) if is_integer_literal(token) => {
                (RelayRef::ResultsIndex(idx), token.parse().ok())
            }
            _ => (target.relay_ref(), position),
        }
    }
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Country code (2 letters) or part of a country name
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// City code (3 letters) or part of a city name
    #[arg(short, long)]
    pub city: Option<String>,

    /// Part of the hosting provider's name
    #[arg(long)]
    pub provider: Option<String>,

    #[arg(long, value_parser = flag)]
    pub active: Option<bool>,

    #[arg(long, value_parser = flag)]
    pub owned: Option<bool>,

    #[arg(long, value_parser = flag)]
    pub daita: Option<bool>,
}

impl From<QueryArgs> for QueryFilter {
    fn from(args: QueryArgs) -> Self {
        QueryFilter {
            country: args.country,
            city: args.city,
            provider: args.provider,
            active: args.active,
            owned: args.owned,
            daita: args.daita,
        }
    }
}

/// `0`/`1` (or `false`/`true`) for boolean filters.
fn flag(value: &str) -> Result<bool, String> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(format!("expected 0 or 1, got `{other}`")),
    }
}
