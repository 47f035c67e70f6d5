//! Bio generation module
//!
//! Provides the BioGenerator abstraction used by the enrollment form
//! and implementations for the Gemini API and for tests.

mod gemini;
mod mock;
mod traits;

pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;
pub use traits::*;
