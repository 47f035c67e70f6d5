//! Domain types for the enrollment portal
//!
//! Defines the draft entry edited by the form, the finalized student
//! record held by the registry, and the field identifiers shared by
//! validation and the form controller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────

/// Identifies a single form field.
///
/// Only the first five variants are ever validated; `Bio` is free text
/// and the picture is handled through its own attach path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    DateOfBirth,
    Major,
    Bio,
}

impl Field {
    /// The fields that participate in validation, in rule order.
    pub fn validatable() -> &'static [Field] {
        &[
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::DateOfBirth,
            Field::Major,
        ]
    }

    /// Human-readable label for prompts and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Email => "Email address",
            Field::DateOfBirth => "Date of birth",
            Field::Major => "Major",
            Field::Bio => "Bio",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::FirstName => write!(f, "first_name"),
            Field::LastName => write!(f, "last_name"),
            Field::Email => write!(f, "email"),
            Field::DateOfBirth => write!(f, "date_of_birth"),
            Field::Major => write!(f, "major"),
            Field::Bio => write!(f, "bio"),
        }
    }
}

/// Per-field validation messages, keyed in stable field order.
pub type FieldErrors = BTreeMap<Field, String>;

// ─────────────────────────────────────────────────────────────────
// Pictures
// ─────────────────────────────────────────────────────────────────

/// Image formats accepted for profile pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// MIME type used when building a data URL.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// A raw picture attached to the draft, before or after preview
/// derivation.
#[derive(Debug, Clone)]
pub struct PictureData {
    /// Raw image bytes as supplied by the user.
    pub bytes: Vec<u8>,

    /// Format detected from the magic bytes.
    pub format: ImageFormat,
}

// ─────────────────────────────────────────────────────────────────
// Draft Entry
// ─────────────────────────────────────────────────────────────────

/// The in-progress, unsubmitted student entry.
///
/// Owned exclusively by the form controller while editing. A fresh
/// empty draft replaces it immediately after a successful submission.
#[derive(Debug, Clone, Default)]
pub struct DraftEntry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub major: String,
    pub bio: String,

    /// Attached picture, if any.
    pub picture: Option<PictureData>,

    /// Base64 data URL preview; absent until async derivation completes.
    pub picture_preview: Option<String>,

    /// Messages for fields currently failing validation.
    pub field_errors: FieldErrors,
}

impl DraftEntry {
    /// Get a field's current text value.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::DateOfBirth => &self.date_of_birth,
            Field::Major => &self.major,
            Field::Bio => &self.bio,
        }
    }

    /// Set a field's text value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
            Field::DateOfBirth => self.date_of_birth = value,
            Field::Major => self.major = value,
            Field::Bio => self.bio = value,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Enrolled Student
// ─────────────────────────────────────────────────────────────────

/// A finalized roster entry. Immutable once created; lives for the
/// process lifetime (no update or delete exists).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    /// Unique within the process lifetime, assigned at finalization.
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub major: String,
    pub bio: String,

    /// Preview data URL captured at submission time, if a picture was
    /// attached and its preview had been derived.
    pub profile_picture_url: Option<String>,
}

impl EnrolledStudent {
    /// Finalize a draft into a roster entry with a fresh id.
    pub fn from_draft(draft: &DraftEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            date_of_birth: draft.date_of_birth.clone(),
            major: draft.major.clone(),
            bio: draft.bio.clone(),
            profile_picture_url: draft.picture_preview.clone(),
        }
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
