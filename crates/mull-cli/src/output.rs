//! Terminal colouring and table layout.

use mull_store::{Column, RelayRecord};

const RESET: &str = "\x1b[0m";

pub fn green(text: &str) -> String {
    format!("\x1b[32m{text}{RESET}")
}

pub fn yellow(text: &str) -> String {
    format!("\x1b[33m{text}{RESET}")
}

pub fn orange(text: &str) -> String {
    format!("\x1b[38;5;208m{text}{RESET}")
}

/// Width of a summary column in relay tables.
fn width(column: Column) -> usize {
    match column {
        Column::Hostname => 16,
        Column::CountryName => 16,
        Column::CityName => 20,
        Column::Active | Column::Owned | Column::Daita => 7,
        _ => 0,
    }
}

/// Header line for a relay table, optionally led by an `IDX` column.
pub fn relay_header(with_index: bool) -> String {
    let mut line = String::new();
    if with_index {
        line.push_str(&format!("{:<5}", "IDX"));
    }
    for column in Column::SUMMARY {
        line.push_str(&format!("{:<w$}", column.name().to_uppercase(), w = width(column)));
    }
    yellow(line.trim_end())
}

/// One summary row for `relay`.
pub fn relay_row(index: Option<usize>, relay: &RelayRecord) -> String {
    let mut line = String::new();
    if let Some(i) = index {
        line.push_str(&format!("{i:<5}"));
    }
    for column in Column::SUMMARY {
        line.push_str(&format!(
            "{:<w$}",
            relay.display_value(column),
            w = width(column)
        ));
    }
    line.trim_end().to_string()
}

/// The columns left out of the summary, one `name value` line each.
pub fn relay_details(relay: &RelayRecord) -> Vec<String> {
    Column::ALL
        .into_iter()
        .filter(|c| !Column::SUMMARY.contains(c))
        .map(|c| format!("{} {}", yellow(&format!("{:<20}", c.name())), relay.display_value(c)))
        .collect()
}

/// `IDX HOSTNAME` listing used for favorites and cached results.
pub fn index_list<'a>(entries: impl IntoIterator<Item = (usize, &'a str)>) -> Vec<String> {
    let mut lines = vec![yellow(&format!("{:<5}{}", "IDX", "HOSTNAME"))];
    lines.extend(entries.into_iter().map(|(i, h)| format!("{i:<5}{h}")));
    lines
}
