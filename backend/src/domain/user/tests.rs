//! Tests for the domain user model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};

#[fixture]
fn valid_draft() -> UserDraft {
    UserDraft {
        first_name: Some("  Ada ".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        email: Some("ada@example.com".to_owned()),
        nationality: Some("GB".to_owned()),
        total_score: Some(87.5),
    }
}

#[rstest]
fn valid_draft_produces_submission(valid_draft: UserDraft) {
    let submission = valid_draft.validate().expect("draft is valid");
    assert!(!submission.has_blank_field());
    assert_eq!(submission.raw_email(), "ada@example.com");
}

#[rstest]
fn submission_trims_strings(valid_draft: UserDraft) {
    let profile = valid_draft.validate().expect("draft is valid").into_profile();
    assert_eq!(profile.first_name, "Ada");
    assert_eq!(profile.last_name, "Lovelace");
    assert_eq!(profile.nationality.as_str(), "GB");
    assert!((profile.total_score - 87.5).abs() < f64::EPSILON);
}

#[rstest]
fn empty_draft_reports_every_field() {
    let errors = UserDraft::default().validate().expect_err("empty draft fails");
    let reported: Vec<&str> = errors.fields().iter().map(|v| v.field).collect();
    assert_eq!(
        reported,
        vec!["firstName", "lastName", "email", "nationality", "totalScore"]
    );
}

#[rstest]
fn negative_score_is_rejected(mut valid_draft: UserDraft) {
    valid_draft.total_score = Some(-1.0);
    let errors = valid_draft.validate().expect_err("negative score fails");
    assert_eq!(
        errors.messages_for("totalScore"),
        Some(&["Total score must be a positive number"][..])
    );
    assert_eq!(errors.fields().len(), 1);
}

#[rstest]
fn whitespace_first_name_is_rejected(mut valid_draft: UserDraft) {
    valid_draft.first_name = Some(" ".to_owned());
    let errors = valid_draft.validate().expect_err("blank name fails");
    assert_eq!(
        errors.messages_for("firstName"),
        Some(&["First name is required"][..])
    );
}

#[rstest]
fn unknown_nationality_is_rejected(mut valid_draft: UserDraft) {
    valid_draft.nationality = Some("ZZ".to_owned());
    let errors = valid_draft.validate().expect_err("unknown code fails");
    assert!(errors.messages_for("nationality").is_some());
}

#[rstest]
fn replace_profile_keeps_identity(valid_draft: UserDraft) {
    let created_at = Utc
        .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp");
    let profile = valid_draft.validate().expect("draft is valid").into_profile();
    let mut user = User::new(UserId::new(7), profile.clone(), created_at);

    let mut replacement = profile;
    replacement.email = "ada@lovelace.dev".to_owned();
    user.replace_profile(replacement);

    assert_eq!(user.id(), UserId::new(7));
    assert_eq!(user.created_at(), created_at);
    assert_eq!(user.profile().email, "ada@lovelace.dev");
}
