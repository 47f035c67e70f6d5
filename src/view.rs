//! Roster presentation
//!
//! Renders the registry contents as text cards. Stateless with respect
//! to the domain; also hosts the presentation-only list of selectable
//! majors (validation never consults it).

use chrono::NaiveDate;

use crate::types::EnrolledStudent;

/// Majors offered as selection choices during entry. A presentation
/// affordance only; any non-empty major passes validation.
pub const MAJORS: &[&str] = &[
    "Computer Science",
    "Mechanical Engineering",
    "Fine Arts",
    "Psychology",
    "Business Administration",
    "Biology",
    "English Literature",
    "History",
    "Physics",
];

/// Placeholder avatar URL keyed by the student id, used when no picture
/// was provided.
pub fn placeholder_picture_url(student: &EnrolledStudent) -> String {
    format!("https://i.pravatar.cc/150?u={}", student.id)
}

/// Text renderer for the enrollment roster.
#[derive(Debug, Default)]
pub struct RosterView;

impl RosterView {
    pub fn new() -> Self {
        Self
    }

    /// Render the full roster, or an empty-state message.
    pub fn render(&self, roster: &[EnrolledStudent]) -> String {
        if roster.is_empty() {
            return "No Students Enrolled\nFill out the form to add the first student.\n"
                .to_string();
        }

        let mut out = String::from("Enrolled Students\n");
        for student in roster {
            out.push('\n');
            out.push_str(&self.render_card(student));
        }
        out
    }

    /// Render one summary card.
    pub fn render_card(&self, student: &EnrolledStudent) -> String {
        let bio = if student.bio.is_empty() {
            "No bio provided."
        } else {
            &student.bio
        };

        let picture = student
            .profile_picture_url
            .clone()
            .unwrap_or_else(|| placeholder_picture_url(student));

        format!(
            "{name}\n  Major:         {major}\n  Bio:           \"{bio}\"\n  Email:         {email}\n  Date of Birth: {dob}\n  Picture:       {picture}\n",
            name = student.full_name(),
            major = student.major,
            bio = bio,
            email = student.email,
            dob = format_date_of_birth(&student.date_of_birth),
            picture = picture,
        )
    }
}

/// Format an ISO date of birth for display; unparseable values pass
/// through verbatim.
fn format_date_of_birth(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%-d %B %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DraftEntry;

    fn student() -> EnrolledStudent {
        let mut draft = DraftEntry::default();
        draft.first_name = "Ada".into();
        draft.last_name = "Lovelace".into();
        draft.email = "ada@example.com".into();
        draft.date_of_birth = "1815-12-10".into();
        draft.major = "Computer Science".into();
        EnrolledStudent::from_draft(&draft)
    }

    #[test]
    fn test_empty_roster_message() {
        let view = RosterView::new();
        let rendered = view.render(&[]);
        assert!(rendered.contains("No Students Enrolled"));
        assert!(rendered.contains("first student"));
    }

    #[test]
    fn test_card_contains_all_fields() {
        let view = RosterView::new();
        let rendered = view.render_card(&student());
        assert!(rendered.contains("Ada Lovelace"));
        assert!(rendered.contains("Computer Science"));
        assert!(rendered.contains("ada@example.com"));
        assert!(rendered.contains("10 December 1815"));
    }

    #[test]
    fn test_unparseable_dob_passes_through() {
        let mut s = student();
        s.date_of_birth = "sometime in 1815".into();
        let rendered = RosterView::new().render_card(&s);
        assert!(rendered.contains("sometime in 1815"));
    }

    #[test]
    fn test_empty_bio_gets_placeholder() {
        let s = student();
        let rendered = RosterView::new().render_card(&s);
        assert!(rendered.contains("No bio provided."));
    }

    #[test]
    fn test_missing_picture_gets_placeholder_keyed_by_id() {
        let s = student();
        let rendered = RosterView::new().render_card(&s);
        assert!(rendered.contains(&format!("https://i.pravatar.cc/150?u={}", s.id)));
    }

    #[test]
    fn test_attached_picture_url_is_used() {
        let mut s = student();
        s.profile_picture_url = Some("data:image/png;base64,AAAA".into());
        let rendered = RosterView::new().render_card(&s);
        assert!(rendered.contains("data:image/png;base64,AAAA"));
        assert!(!rendered.contains("pravatar"));
    }

    #[test]
    fn test_render_lists_in_roster_order() {
        let view = RosterView::new();
        let mut first = student();
        first.first_name = "First".into();
        let mut second = student();
        second.first_name = "Second".into();

        let rendered = view.render(&[second.clone(), first.clone()]);
        let second_pos = rendered.find("Second Lovelace").unwrap();
        let first_pos = rendered.find("First Lovelace").unwrap();
        assert!(second_pos < first_pos);
    }

    #[test]
    fn test_majors_list_is_presentation_only() {
        assert_eq!(MAJORS.len(), 9);
        assert!(MAJORS.contains(&"Computer Science"));
    }
}
