//! Immutable roster snapshots and the transitions between them.
//!
//! # Design
//! `RosterState` is plain data. Every transition borrows the current snapshot
//! and returns the next one, so the synchronizer can swap snapshots under a
//! lock and readers always see a consistent list together with its flags.
//! Transitions never perform I/O and never fail; deciding *which* transition
//! applies is the synchronizer's job.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ApiError;
use crate::types::{Student, StudentId};

/// The user-facing action a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Add,
    Delete,
}

impl Action {
    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Load => "Failed to load students",
            Action::Add => "Failed to add student",
            Action::Delete => "Failed to delete student",
        }
    }
}

/// A visible failure notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub action: Action,
    pub error: ApiError,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action.failure_message(), self.error)
    }
}

/// Presentation flags for in-flight requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    is_loading_initial: bool,
    refreshes_in_flight: usize,
    pending_create: bool,
    // Counted so overlapping deletes of one id keep the row busy until the
    // last of them completes.
    pending_deletes: BTreeMap<StudentId, usize>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_loading_initial: true,
            refreshes_in_flight: 0,
            pending_create: false,
            pending_deletes: BTreeMap::new(),
        }
    }
}

impl SyncState {
    /// True until the first fetch-all completes, whatever its outcome.
    pub fn is_loading_initial(&self) -> bool {
        self.is_loading_initial
    }

    pub fn is_refreshing(&self) -> bool {
        !self.is_loading_initial && self.refreshes_in_flight > 0
    }

    pub fn pending_create(&self) -> bool {
        self.pending_create
    }

    pub fn is_delete_pending(&self, id: &StudentId) -> bool {
        self.pending_deletes.contains_key(id)
    }

    pub fn pending_delete_ids(&self) -> impl Iterator<Item = &StudentId> {
        self.pending_deletes.keys()
    }
}

/// One consistent view of the roster and everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterState {
    students: Vec<Student>,
    sync: SyncState,
    draft: String,
    notice: Option<Notice>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn sync(&self) -> &SyncState {
        &self.sync
    }

    /// Contents of the add-student input field.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn with_draft(&self, text: &str) -> Self {
        let mut next = self.clone();
        next.draft = text.to_string();
        next
    }

    pub fn with_notice(&self, notice: Notice) -> Self {
        let mut next = self.clone();
        next.notice = Some(notice);
        next
    }

    pub fn without_notice(&self) -> Self {
        let mut next = self.clone();
        next.notice = None;
        next
    }

    pub fn refresh_started(&self) -> Self {
        let mut next = self.clone();
        next.sync.refreshes_in_flight += 1;
        next
    }

    /// Full replace: the server's sequence becomes the list, even when empty.
    pub fn refresh_succeeded(&self, students: Vec<Student>) -> Self {
        let mut next = self.refresh_finished();
        next.students = students;
        next
    }

    pub fn refresh_failed(&self, error: ApiError) -> Self {
        let mut next = self.refresh_finished();
        next.notice = Some(Notice {
            action: Action::Load,
            error,
        });
        next
    }

    fn refresh_finished(&self) -> Self {
        let mut next = self.clone();
        next.sync.refreshes_in_flight = next.sync.refreshes_in_flight.saturating_sub(1);
        next.sync.is_loading_initial = false;
        next
    }

    pub fn create_started(&self) -> Self {
        let mut next = self.clone();
        next.sync.pending_create = true;
        next
    }

    /// Record the server-confirmed student and clear the input field.
    ///
    /// A refresh that finished while the create was in flight may already
    /// list the record; its row is replaced in place instead of appended.
    pub fn create_succeeded(&self, student: Student) -> Self {
        let mut next = self.clone();
        next.sync.pending_create = false;
        match next.students.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => *existing = student,
            None => next.students.push(student),
        }
        next.draft.clear();
        next
    }

    pub fn create_failed(&self, error: ApiError) -> Self {
        let mut next = self.clone();
        next.sync.pending_create = false;
        next.notice = Some(Notice {
            action: Action::Add,
            error,
        });
        next
    }

    pub fn delete_started(&self, id: &StudentId) -> Self {
        let mut next = self.clone();
        *next.sync.pending_deletes.entry(id.clone()).or_insert(0) += 1;
        next
    }

    /// Drop the entry with `id`, if any, keeping the others in order.
    pub fn delete_succeeded(&self, id: &StudentId) -> Self {
        let mut next = self.delete_finished(id);
        if let Some(pos) = next.students.iter().position(|s| &s.id == id) {
            next.students.remove(pos);
        }
        next
    }

    pub fn delete_failed(&self, id: &StudentId, error: ApiError) -> Self {
        let mut next = self.delete_finished(id);
        next.notice = Some(Notice {
            action: Action::Delete,
            error,
        });
        next
    }

    fn delete_finished(&self, id: &StudentId) -> Self {
        let mut next = self.clone();
        if let Some(count) = next.sync.pending_deletes.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                next.sync.pending_deletes.remove(id);
            }
        }
        next
    }
}
