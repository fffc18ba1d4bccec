//! Stateless HTTP request builder and response parser for the student API.
//!
//! # Design
//! `StudentClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateStudent, Student, StudentId};

/// Synchronous, stateless client for the student API.
#[derive(Debug, Clone)]
pub struct StudentClient {
    base_url: String,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_students(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/students/", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_student(&self, input: &CreateStudent) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/students/", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_student(&self, id: &StudentId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/students/{}", self.base_url, encode_segment(&id.to_string())),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Parse a fetch-all response. A listing that repeats an id or carries a
    /// blank name is rejected whole so nothing partial reaches the local list.
    pub fn parse_list_students(&self, response: HttpResponse) -> Result<Vec<Student>, ApiError> {
        check_status(&response)?;
        let students: Vec<Student> =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        let mut seen = HashSet::with_capacity(students.len());
        for student in &students {
            check_name(student)?;
            if !seen.insert(&student.id) {
                return Err(ApiError::DeserializationError(format!(
                    "duplicate student id {}",
                    student.id
                )));
            }
        }
        Ok(students)
    }

    pub fn parse_create_student(&self, response: HttpResponse) -> Result<Student, ApiError> {
        check_status(&response)?;
        let student: Student =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        check_name(&student)?;
        Ok(student)
    }

    pub fn parse_delete_student(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn check_name(student: &Student) -> Result<(), ApiError> {
    if student.name.trim().is_empty() {
        return Err(ApiError::DeserializationError(format!(
            "student {} has an empty name",
            student.id
        )));
    }
    Ok(())
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
