//! Generator trait definitions
//!
//! Defines the BioGenerator trait implemented by the Gemini client and
//! by the mock used in tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Inputs for one bio generation call.
///
/// The form guarantees all three are non-empty before a request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioRequest {
    pub first_name: String,
    pub last_name: String,
    pub major: String,
}

impl BioRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        major: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            major: major.into(),
        }
    }

    /// The natural-language instruction sent to the generation service,
    /// embedding the three inputs verbatim.
    pub fn prompt(&self) -> String {
        format!(
            "Generate a short, optimistic, and engaging student bio (2-3 sentences) \
             for a student named {} {} who is majoring in {}. The bio should be \
             suitable for a university welcome page. Focus on their passion for \
             their field and future aspirations.",
            self.first_name, self.last_name, self.major
        )
    }
}

/// Core trait for bio generators
///
/// Object-safe so the form controller can hold any implementation behind
/// dynamic dispatch. Any failure is treated uniformly by the caller as
/// "could not generate bio" and is never retried automatically.
#[async_trait]
pub trait BioGenerator: Send + Sync {
    /// Get the generator name (e.g., "gemini", "mock")
    fn name(&self) -> &'static str;

    /// Generate a short student bio for the given request
    async fn generate(&self, request: &BioRequest) -> Result<String>;
}

/// Type alias for a shared generator reference
pub type SharedGenerator = Arc<dyn BioGenerator>;

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
