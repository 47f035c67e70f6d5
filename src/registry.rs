//! Enrollment registry
//!
//! Accumulates finalized entries for the process lifetime. The registry
//! is an owned, injectable instance so tests can create isolated ones;
//! the roster lock serializes the non-atomic prepend on the
//! multi-threaded runtime.

use parking_lot::RwLock;
use tracing::info;

use crate::types::EnrolledStudent;

/// Ordered collection of finalized enrollments, most recent first.
#[derive(Debug, Default)]
pub struct EnrollmentRegistry {
    roster: RwLock<Vec<EnrolledStudent>>,
}

impl EnrollmentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a finalized entry (most recent first).
    ///
    /// No deduplication by id or email: resubmission with identical data
    /// is accepted as a distinct entry.
    pub fn add(&self, student: EnrolledStudent) {
        info!(
            id = %student.id,
            name = %student.full_name(),
            major = %student.major,
            "Student enrolled"
        );
        self.roster.write().insert(0, student);
    }

    /// Snapshot of the current roster in order, no filtering or
    /// pagination.
    pub fn list(&self) -> Vec<EnrolledStudent> {
        self.roster.read().clone()
    }

    /// Number of enrolled students
    pub fn len(&self) -> usize {
        self.roster.read().len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.roster.read().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
