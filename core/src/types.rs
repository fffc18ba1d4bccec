//! Domain DTOs for the student API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The server decides what an id looks like, so `StudentId` accepts both JSON
//! integers and JSON strings and never interprets them beyond equality and
//! ordering. Integration tests catch any schema drift between the two crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque, server-assigned student identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => f.pad(&n.to_string()),
            StudentId::Text(s) => f.pad(s),
        }
    }
}

impl FromStr for StudentId {
    type Err = std::convert::Infallible;

    /// Integers become `Number`, anything else is kept verbatim as `Text`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => StudentId::Number(n),
            Err(_) => StudentId::Text(s.to_string()),
        })
    }
}

impl From<i64> for StudentId {
    fn from(n: i64) -> Self {
        StudentId::Number(n)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId::Text(s.to_string())
    }
}

/// A single student record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
}

/// Request payload for creating a new student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudent {
    pub name: String,
}
