//! Plain-text rendering of roster snapshots.

use std::fmt::Write as _;

use roster_core::{Counter, RosterState};

pub fn roster(state: &RosterState) -> String {
    let mut out = String::new();
    let sync = state.sync();

    let status = if sync.is_loading_initial() {
        " (loading...)"
    } else if sync.is_refreshing() {
        " (refreshing...)"
    } else {
        ""
    };
    let _ = writeln!(out, "Students{status}");

    if state.students().is_empty() && !sync.is_loading_initial() {
        out.push_str("  (none)\n");
    }
    for student in state.students() {
        let marker = if sync.is_delete_pending(&student.id) {
            "  [deleting...]"
        } else {
            ""
        };
        let _ = writeln!(out, "  {:>6}  {}{marker}", student.id, student.name);
    }

    if sync.pending_create() {
        let _ = writeln!(out, "> {}  [adding...]", state.draft());
    }
    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

pub fn counter(counter: Counter) -> String {
    format!("{}\n", counter.count())
}
