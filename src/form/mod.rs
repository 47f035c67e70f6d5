//! Enrollment form controller
//!
//! Owns the draft entry for one form session: field edits, validation,
//! picture attachment, bio generation, and submission to the registry.
//!
//! The two suspending operations (bio generation, preview derivation)
//! are split into begin/apply pairs carrying a session token. `apply`
//! compares the token against the current session and silently discards
//! results that resolve after the form has reset, so an in-flight call
//! can never mutate a new, unrelated draft.

mod picture;
mod validate;

pub use picture::{check_picture, derive_preview, sniff_format};
pub use validate::validate;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::PictureSettings;
use crate::error::Result;
use crate::generator::{BioGenerator, BioRequest};
use crate::registry::EnrollmentRegistry;
use crate::types::{DraftEntry, EnrolledStudent, Field, FieldErrors, PictureData};

// ─────────────────────────────────────────────────────────────────
// Session Tokens & Tickets
// ─────────────────────────────────────────────────────────────────

/// Identifies one form session. Bumped on every reset, which invalidates
/// tickets issued before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// Ticket for an in-flight bio generation call.
#[derive(Debug, Clone)]
pub struct BioTicket {
    session: SessionToken,
    request: BioRequest,
}

impl BioTicket {
    /// The request to hand to a BioGenerator.
    pub fn request(&self) -> &BioRequest {
        &self.request
    }
}

/// Ticket for an in-flight preview derivation.
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    session: SessionToken,
    picture: PictureData,
}

impl PreviewTicket {
    /// The attached picture to derive a preview from.
    pub fn picture(&self) -> &PictureData {
        &self.picture
    }
}

// ─────────────────────────────────────────────────────────────────
// Notices
// ─────────────────────────────────────────────────────────────────

/// Standalone, non-fatal messages surfaced next to the form (distinct
/// from per-field validation errors). Identical in presentation,
/// distinct in cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    /// Bio generation requested with a required input still empty.
    BioPrerequisiteMissing,
    /// Bio generation failed (credential, network, or upstream).
    BioGenerationFailed,
    /// Attached picture violated the size/format contract.
    PictureRejected(String),
}

impl FormNotice {
    /// User-facing message text.
    pub fn message(&self) -> String {
        match self {
            FormNotice::BioPrerequisiteMissing => {
                "Please fill in First Name, Last Name, and Major to generate a bio.".to_string()
            }
            FormNotice::BioGenerationFailed => {
                "There was an error generating the bio. Please check your API key and network connection."
                    .to_string()
            }
            FormNotice::PictureRejected(reason) => {
                format!("Profile picture was not accepted: {}", reason)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Enrollment Form
// ─────────────────────────────────────────────────────────────────

/// State controller for one enrollment form.
#[derive(Debug)]
pub struct EnrollmentForm {
    picture_settings: PictureSettings,
    draft: DraftEntry,
    session: SessionToken,
    generating: bool,
    notice: Option<FormNotice>,
}

impl EnrollmentForm {
    /// Create a form with a fresh empty draft.
    pub fn new(picture_settings: PictureSettings) -> Self {
        Self {
            picture_settings,
            draft: DraftEntry::default(),
            session: SessionToken(0),
            generating: false,
            notice: None,
        }
    }

    /// The current draft.
    pub fn draft(&self) -> &DraftEntry {
        &self.draft
    }

    /// The current session token.
    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// Whether a bio generation call is pending. The UI should disable
    /// the trigger while this is set.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// The current standalone notice, if any.
    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    /// Clear the standalone notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Messages for fields currently failing validation.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.draft.field_errors
    }

    // ─────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────

    /// Set a field on the draft, clearing any existing error on it.
    ///
    /// Errors clear optimistically on edit; nothing is re-checked until
    /// the next validate or submit.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
        self.draft.field_errors.remove(&field);
    }

    /// Run validation and store the result as the form's current field
    /// errors. Returns the error map; empty iff all fields pass.
    pub fn validate(&mut self) -> FieldErrors {
        let errors = validate::validate(&self.draft);
        self.draft.field_errors = errors.clone();
        errors
    }

    // ─────────────────────────────────────────────────────────────
    // Picture
    // ─────────────────────────────────────────────────────────────

    /// Attach a picture byte stream, checking it against the configured
    /// contract. Returns a ticket for the async preview derivation, or
    /// records a rejection notice and returns None.
    pub fn begin_attach_picture(&mut self, bytes: Vec<u8>) -> Option<PreviewTicket> {
        match picture::check_picture(&bytes, self.picture_settings.max_bytes) {
            Ok(format) => {
                let picture = PictureData { bytes, format };
                self.draft.picture = Some(picture.clone());
                // Preview is absent until derivation completes.
                self.draft.picture_preview = None;
                Some(PreviewTicket {
                    session: self.session,
                    picture,
                })
            }
            Err(e) => {
                debug!(error = %e, "Picture rejected");
                self.notice = Some(FormNotice::PictureRejected(e.to_string()));
                None
            }
        }
    }

    /// Apply a derived preview. Discards it silently when the session
    /// has reset since the ticket was issued. Returns whether the
    /// preview was applied.
    pub fn apply_preview(&mut self, ticket: &PreviewTicket, preview: String) -> bool {
        if ticket.session != self.session {
            debug!("Discarding preview for a stale session");
            return false;
        }
        self.draft.picture_preview = Some(preview);
        true
    }

    /// Attach a picture and derive its preview inline.
    pub async fn attach_picture(&mut self, bytes: Vec<u8>) -> bool {
        let Some(ticket) = self.begin_attach_picture(bytes) else {
            return false;
        };
        match picture::derive_preview(ticket.picture.clone()).await {
            Ok(preview) => self.apply_preview(&ticket, preview),
            Err(e) => {
                warn!(error = %e, "Preview derivation failed");
                self.notice = Some(FormNotice::PictureRejected(e.to_string()));
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Bio Generation
    // ─────────────────────────────────────────────────────────────

    /// Start a bio generation call. First name, last name, and major
    /// must all be non-empty; otherwise a prerequisite notice is
    /// recorded and no call is made.
    pub fn begin_bio_generation(&mut self) -> Option<BioTicket> {
        self.notice = None;

        if self.draft.first_name.is_empty()
            || self.draft.last_name.is_empty()
            || self.draft.major.is_empty()
        {
            self.notice = Some(FormNotice::BioPrerequisiteMissing);
            return None;
        }

        self.generating = true;
        Some(BioTicket {
            session: self.session,
            request: BioRequest::new(
                self.draft.first_name.clone(),
                self.draft.last_name.clone(),
                self.draft.major.clone(),
            ),
        })
    }

    /// Apply the outcome of a bio generation call. On success the bio is
    /// overwritten with the returned text; on failure the bio is left
    /// unchanged and a failure notice is recorded. Results for a stale
    /// session are discarded silently. Returns whether the bio was set.
    pub fn apply_bio_result(&mut self, ticket: &BioTicket, result: Result<String>) -> bool {
        if ticket.session != self.session {
            debug!("Discarding bio result for a stale session");
            return false;
        }

        self.generating = false;
        match result {
            Ok(text) => {
                self.draft.bio = text;
                true
            }
            Err(e) => {
                warn!(error = %e.format_for_log(), "Bio generation failed");
                self.notice = Some(FormNotice::BioGenerationFailed);
                false
            }
        }
    }

    /// Run a bio generation call inline against the given generator.
    pub async fn generate_bio(&mut self, generator: &dyn BioGenerator) -> bool {
        let Some(ticket) = self.begin_bio_generation() else {
            return false;
        };
        let result = generator.generate(ticket.request()).await;
        self.apply_bio_result(&ticket, result)
    }

    // ─────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────

    /// Validate and, if clean, finalize the draft into the registry and
    /// reset to a fresh session. Returns the new student's id, or None
    /// when validation failed (with errors stored, nothing else
    /// touched).
    pub fn submit(&mut self, registry: &EnrollmentRegistry) -> Option<Uuid> {
        if !self.validate().is_empty() {
            return None;
        }

        let student = EnrolledStudent::from_draft(&self.draft);
        let id = student.id;
        registry.add(student);
        self.reset();
        Some(id)
    }

    /// Replace the draft with a fresh empty one and invalidate any
    /// in-flight tickets.
    pub fn reset(&mut self) {
        self.draft = DraftEntry::default();
        self.generating = false;
        self.notice = None;
        self.session = SessionToken(self.session.0 + 1);
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generator::MockGenerator;

    fn form() -> EnrollmentForm {
        EnrollmentForm::new(PictureSettings::default())
    }

    fn fill_valid(form: &mut EnrollmentForm) {
        form.update_field(Field::FirstName, "Ada");
        form.update_field(Field::LastName, "Lovelace");
        form.update_field(Field::Email, "ada@example.com");
        form.update_field(Field::DateOfBirth, "1815-12-10");
        form.update_field(Field::Major, "Computer Science");
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        bytes.extend_from_slice(&[0u8; 16]);
        bytes
    }

    #[test]
    fn test_update_field_clears_its_error() {
        let mut form = form();
        form.validate();
        assert!(form.field_errors().contains_key(&Field::FirstName));
        assert!(form.field_errors().contains_key(&Field::LastName));

        form.update_field(Field::FirstName, "Ada");
        assert!(!form.field_errors().contains_key(&Field::FirstName));
        // Other errors stay until the next validate
        assert!(form.field_errors().contains_key(&Field::LastName));
    }

    #[test]
    fn test_update_field_does_not_revalidate() {
        let mut form = form();
        form.validate();
        // Setting a still-invalid value clears the error anyway
        form.update_field(Field::Email, "not-an-email");
        assert!(!form.field_errors().contains_key(&Field::Email));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut form = form();
        form.update_field(Field::FirstName, "Ada");
        let first = form.validate();
        let second = form.validate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_submit_rejected_leaves_state_alone() {
        let mut form = form();
        let registry = EnrollmentRegistry::new();
        form.update_field(Field::FirstName, "Ada");
        let session_before = form.session();

        assert!(form.submit(&registry).is_none());
        assert!(registry.is_empty());
        // Draft not reset, errors stored
        assert_eq!(form.draft().first_name, "Ada");
        assert!(!form.field_errors().is_empty());
        assert_eq!(form.session(), session_before);
    }

    #[test]
    fn test_submit_success_enrolls_and_resets() {
        let mut form = form();
        let registry = EnrollmentRegistry::new();
        fill_valid(&mut form);

        let id = form.submit(&registry).expect("submission accepted");

        let roster = registry.list();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, id);
        assert_eq!(roster[0].first_name, "Ada");
        assert_eq!(roster[0].major, "Computer Science");

        // Draft reset to a fresh empty state
        assert!(form.draft().first_name.is_empty());
        assert!(form.draft().picture.is_none());
        assert!(form.draft().picture_preview.is_none());
        assert!(form.field_errors().is_empty());
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_submitted_ids_are_unique() {
        let mut form = form();
        let registry = EnrollmentRegistry::new();

        fill_valid(&mut form);
        let first = form.submit(&registry).unwrap();
        fill_valid(&mut form);
        let second = form.submit(&registry).unwrap();

        assert_ne!(first, second);
        // Most recent first
        assert_eq!(registry.list()[0].id, second);
    }

    #[tokio::test]
    async fn test_generate_bio_missing_prerequisites() {
        let mut form = form();
        let generator = MockGenerator::with_response("Text X");
        form.update_field(Field::FirstName, "Ada");
        // last name and major still empty

        assert!(!form.generate_bio(&generator).await);
        assert_eq!(generator.call_count(), 0);
        assert_eq!(form.notice(), Some(&FormNotice::BioPrerequisiteMissing));
        assert!(form.draft().bio.is_empty());
    }

    #[tokio::test]
    async fn test_generate_bio_success_overwrites_bio() {
        let mut form = form();
        let generator = MockGenerator::with_response("Text X");
        fill_valid(&mut form);
        form.update_field(Field::Bio, "hand-written draft");

        assert!(form.generate_bio(&generator).await);
        assert_eq!(form.draft().bio, "Text X");
        assert!(form.notice().is_none());
        assert!(!form.is_generating());
        assert_eq!(generator.call_count(), 1);
        assert_eq!(
            generator.last_request().unwrap(),
            BioRequest::new("Ada", "Lovelace", "Computer Science")
        );
    }

    #[tokio::test]
    async fn test_generate_bio_failure_leaves_bio_unchanged() {
        let mut form = form();
        let generator = MockGenerator::failing();
        fill_valid(&mut form);
        form.update_field(Field::Bio, "keep me");

        assert!(!form.generate_bio(&generator).await);
        assert_eq!(form.draft().bio, "keep me");
        assert_eq!(form.notice(), Some(&FormNotice::BioGenerationFailed));
        assert!(!form.is_generating());
    }

    #[test]
    fn test_begin_bio_sets_generating_state() {
        let mut form = form();
        fill_valid(&mut form);
        let ticket = form.begin_bio_generation().unwrap();
        assert!(form.is_generating());
        form.apply_bio_result(&ticket, Ok("done".into()));
        assert!(!form.is_generating());
    }

    #[test]
    fn test_stale_bio_result_is_discarded() {
        let mut form = form();
        let registry = EnrollmentRegistry::new();
        fill_valid(&mut form);

        let ticket = form.begin_bio_generation().unwrap();
        // Session resets while the call is in flight
        form.submit(&registry).unwrap();
        form.update_field(Field::FirstName, "Grace");

        assert!(!form.apply_bio_result(&ticket, Ok("Text X".into())));
        // The new draft is untouched
        assert!(form.draft().bio.is_empty());
        assert_eq!(form.draft().first_name, "Grace");
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_stale_failure_raises_no_notice() {
        let mut form = form();
        fill_valid(&mut form);
        let ticket = form.begin_bio_generation().unwrap();
        form.reset();

        let result = Err(Error::generation_request_failed("late failure"));
        assert!(!form.apply_bio_result(&ticket, result));
        assert!(form.notice().is_none());
    }

    #[tokio::test]
    async fn test_attach_picture_accepts_png() {
        let mut form = form();
        assert!(form.attach_picture(png_bytes()).await);
        assert!(form.draft().picture.is_some());
        let preview = form.draft().picture_preview.as_deref().unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_attach_picture_rejects_garbage() {
        let mut form = form();
        assert!(!form.attach_picture(b"definitely not an image".to_vec()).await);
        assert!(form.draft().picture.is_none());
        assert!(matches!(
            form.notice(),
            Some(FormNotice::PictureRejected(_))
        ));
    }

    #[test]
    fn test_attach_picture_rejects_oversized() {
        let mut form = EnrollmentForm::new(PictureSettings { max_bytes: 8 });
        assert!(form.begin_attach_picture(png_bytes()).is_none());
        assert!(matches!(
            form.notice(),
            Some(FormNotice::PictureRejected(_))
        ));
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut form = form();
        let ticket = form.begin_attach_picture(png_bytes()).unwrap();
        form.reset();

        assert!(!form.apply_preview(&ticket, "data:image/png;base64,AAAA".into()));
        assert!(form.draft().picture_preview.is_none());
    }

    #[test]
    fn test_preview_absent_until_derived() {
        let mut form = form();
        let ticket = form.begin_attach_picture(png_bytes()).unwrap();
        assert!(form.draft().picture_preview.is_none());
        assert!(form.apply_preview(&ticket, "data:image/png;base64,AAAA".into()));
        assert_eq!(
            form.draft().picture_preview.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }
}
