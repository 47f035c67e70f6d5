//! Mock generator for testing
//!
//! Provides a deterministic BioGenerator implementation with failure
//! injection and call counting.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;

use crate::error::{Error, Result};

use super::{BioGenerator, BioRequest};

/// Configuration for mock generator behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Simulated latency per call (ms)
    pub latency_ms: u64,

    /// Whether every call should fail
    pub fail: bool,

    /// Fixed response text (for deterministic testing)
    pub fixed_response: Option<String>,
}

/// Mock implementation of BioGenerator for testing
#[derive(Default)]
pub struct MockGenerator {
    config: MockConfig,
    calls: RwLock<u32>,
    last_request: RwLock<Option<BioRequest>>,
}

impl MockGenerator {
    /// Create a new mock generator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always returns the given text
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            config: MockConfig {
                fixed_response: Some(text.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self {
            config: MockConfig {
                fail: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create a mock with custom configuration
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Number of times generate() was invoked
    pub fn call_count(&self) -> u32 {
        *self.calls.read()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<BioRequest> {
        self.last_request.read().clone()
    }
}

#[async_trait]
impl BioGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, request: &BioRequest) -> Result<String> {
        *self.calls.write() += 1;
        *self.last_request.write() = Some(request.clone());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail {
            return Err(Error::generation_request_failed("mock failure"));
        }

        if let Some(ref fixed) = self.config.fixed_response {
            return Ok(fixed.clone());
        }

        Ok(format!(
            "{} {} is a dedicated {} student with bright prospects.",
            request.first_name, request.last_name, request.major
        ))
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let generator = MockGenerator::with_response("Text X");
        let request = BioRequest::new("Ada", "Lovelace", "Computer Science");
        assert_eq!(generator.generate(&request).await.unwrap(), "Text X");
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.last_request(), Some(request));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let generator = MockGenerator::failing();
        let request = BioRequest::new("Ada", "Lovelace", "Computer Science");
        let err = generator.generate(&request).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_default_response_embeds_inputs() {
        let generator = MockGenerator::new();
        let request = BioRequest::new("Grace", "Hopper", "Mathematics");
        let text = generator.generate(&request).await.unwrap();
        assert!(text.contains("Grace Hopper"));
        assert!(text.contains("Mathematics"));
    }
}
