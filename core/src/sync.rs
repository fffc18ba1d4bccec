//! Keeps a local roster in step with the remote student collection.
//!
//! # Design
//! The synchronizer owns the current `RosterState` snapshot behind a mutex and
//! a `Transport` that performs the HTTP round-trips. Operations take `&self`,
//! so a caller on one cooperative thread can have a create, several deletes
//! and a refresh in flight at once. The lock is only held to swap snapshots,
//! never across an `.await`.
//!
//! Local state changes only after a response has been received, checked and
//! decoded. Every failure is recorded as the snapshot's notice, logged, and
//! returned to the caller as a value.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::StudentClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::state::{Action, Notice, RosterState};
use crate::transport::Transport;
use crate::types::{CreateStudent, Student, StudentId};

pub struct ListSynchronizer<T> {
    client: StudentClient,
    transport: T,
    state: Mutex<RosterState>,
    torn_down: AtomicBool,
}

impl<T: Transport> ListSynchronizer<T> {
    pub fn new(client: StudentClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: Mutex::new(RosterState::new()),
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> RosterState {
        self.state.lock().clone()
    }

    /// Stop applying results. Requests already in flight still run to
    /// completion; their outcomes are returned but no longer stored.
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    pub fn set_draft(&self, text: &str) -> RosterState {
        self.apply(|s| s.with_draft(text))
    }

    pub fn dismiss_notice(&self) -> RosterState {
        self.apply(RosterState::without_notice)
    }

    /// Fetch the whole collection and replace the local list with it.
    pub async fn refresh(&self) -> Result<Vec<Student>, ApiError> {
        self.apply(RosterState::refresh_started);
        match self.fetch_all().await {
            Ok(students) => {
                info!(count = students.len(), "roster refreshed");
                self.apply(|s| s.refresh_succeeded(students.clone()));
                Ok(students)
            }
            Err(err) => Err(self.fail(Action::Load, err, RosterState::refresh_failed)),
        }
    }

    /// Create a student from `name` (trimmed) and append the server's record.
    pub async fn create(&self, name: &str) -> Result<Student, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            let err = ApiError::Validation("student name must not be empty".to_string());
            return Err(self.reject(Action::Add, err));
        }

        let started = {
            let mut guard = self.state.lock();
            if guard.sync().pending_create() {
                false
            } else {
                if !self.is_torn_down() {
                    *guard = guard.create_started();
                }
                true
            }
        };
        if !started {
            let err = ApiError::Validation("a student is already being added".to_string());
            return Err(self.reject(Action::Add, err));
        }

        let input = CreateStudent {
            name: name.to_string(),
        };
        let student = match self.post_student(&input).await {
            Ok(student) => student,
            Err(err) => return Err(self.fail(Action::Add, err, RosterState::create_failed)),
        };

        self.apply(|s| s.create_succeeded(student.clone()));
        info!(id = %student.id, name = %student.name, "student added");
        Ok(student)
    }

    /// `create` with whatever is currently in the input field.
    pub async fn submit_draft(&self) -> Result<Student, ApiError> {
        let draft = self.snapshot().draft().to_string();
        self.create(&draft).await
    }

    /// Delete the student with `id` and drop it from the local list.
    pub async fn remove(&self, id: &StudentId) -> Result<(), ApiError> {
        self.apply(|s| s.delete_started(id));
        match self.delete_student(id).await {
            Ok(()) => {
                info!(%id, "student deleted");
                self.apply(|s| s.delete_succeeded(id));
                Ok(())
            }
            Err(err) => Err(self.fail(Action::Delete, err, |s, e| s.delete_failed(id, e))),
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Student>, ApiError> {
        let response = self.round_trip(self.client.build_list_students()).await?;
        self.client.parse_list_students(response)
    }

    async fn post_student(&self, input: &CreateStudent) -> Result<Student, ApiError> {
        let request = self.client.build_create_student(input)?;
        let response = self.round_trip(request).await?;
        self.client.parse_create_student(response)
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), ApiError> {
        let response = self.round_trip(self.client.build_delete_student(id)).await?;
        self.client.parse_delete_student(response)
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "response received");
        Ok(response)
    }

    fn apply(&self, transition: impl FnOnce(&RosterState) -> RosterState) -> RosterState {
        let mut guard = self.state.lock();
        let next = transition(&*guard);
        if !self.is_torn_down() {
            *guard = next.clone();
        }
        next
    }

    /// Record a failed request and hand the error back.
    fn fail(
        &self,
        action: Action,
        err: ApiError,
        transition: impl FnOnce(&RosterState, ApiError) -> RosterState,
    ) -> ApiError {
        warn!(error = %err, kind = ?err.kind(), "{}", action.failure_message());
        self.apply(|s| transition(s, err.clone()));
        err
    }

    /// Record an error raised before any request was sent.
    fn reject(&self, action: Action, err: ApiError) -> ApiError {
        warn!(error = %err, "{}", action.failure_message());
        let notice = Notice {
            action,
            error: err.clone(),
        };
        self.apply(|s| s.with_notice(notice));
        err
    }
}
