//! Student enrollment portal
//!
//! Collects student data through a form session, optionally drafts a
//! short biography via the Gemini API, and renders submitted entries as
//! a roster. All state is in-memory; nothing survives process restart.

pub mod config;
pub mod error;
pub mod form;
pub mod generator;
pub mod logging;
pub mod registry;
pub mod types;
pub mod version;
pub mod view;
