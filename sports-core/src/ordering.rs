//! Display ordering for markets and sessions

use crate::market::Sequenced;
use crate::session::Session;
use std::cmp::Ordering;

/// Stable ascending sort on `sr_no` (missing counts as 0)
pub fn sort_by_sequence<T: Sequenced>(items: &mut [T]) {
    items.sort_by(|a, b| a.sequence().total_cmp(&b.sequence()));
}

/// Keep only `gtype == "session"` rows, ordered by sequence number,
/// then selection ID, then runner name
pub fn order_sessions(sessions: Vec<Session>) -> Vec<Session> {
    let mut sessions: Vec<Session> = sessions.into_iter().filter(Session::is_session).collect();
    sessions.sort_by(compare_sessions);
    sessions
}

fn compare_sessions(a: &Session, b: &Session) -> Ordering {
    a.sequence()
        .total_cmp(&b.sequence())
        .then_with(|| a.selection().total_cmp(&b.selection()))
        .then_with(|| locale_cmp(&a.name(), &b.name()))
}

/// Approximates a UI-locale string comparison. Characters compare
/// case-insensitively, with whitespace and punctuation before digits and
/// digits before letters; on a full tie lowercase sorts before uppercase.
/// Accents and multi-character collation elements are not handled.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| b.cmp(a))
}

fn collation_key(s: &str) -> Vec<(u8, char)> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            let class = if c.is_alphabetic() {
                2
            } else if c.is_numeric() {
                1
            } else {
                0
            };
            (class, c)
        })
        .collect()
}
