//! Tests for the users service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;
use crate::domain::{Nationality, UserProfile};
use crate::test_support::{InMemoryUserRepository, fixture_clock, fixture_timestamp};
use rstest::{fixture, rstest};

fn make_service(repo: MockUserRepository) -> UsersService<MockUserRepository> {
    UsersService::new(Arc::new(repo), fixture_clock())
}

#[fixture]
fn draft() -> UserDraft {
    UserDraft {
        first_name: Some(" Grace ".to_owned()),
        last_name: Some("Hopper".to_owned()),
        email: Some("grace@example.com".to_owned()),
        nationality: Some("US".to_owned()),
        total_score: Some(12.5),
    }
}

fn stored_user(id: i32, email: &str) -> User {
    let nationality = Nationality::from_code("US").expect("known code");
    User::new(
        UserId::new(id),
        UserProfile {
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            email: email.to_owned(),
            nationality,
            total_score: 12.5,
        },
        fixture_timestamp(),
    )
}

#[rstest]
#[tokio::test]
async fn create_persists_trimmed_profile_stamped_by_clock(draft: UserDraft) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email, excluding| email == "grace@example.com" && excluding.is_none())
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .withf(|new_user| {
            new_user.profile.first_name == "Grace" && new_user.created_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|new_user| {
            Ok(User::new(
                UserId::new(1),
                new_user.profile.clone(),
                new_user.created_at,
            ))
        });

    let user = make_service(repo)
        .create_user(draft)
        .await
        .expect("create succeeds");

    assert_eq!(user.id(), UserId::new(1));
    assert_eq!(user.profile().first_name, "Grace");
    assert_eq!(user.created_at(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_reports_field_errors_without_touching_storage() {
    let service = make_service(MockUserRepository::new());
    let draft = UserDraft {
        first_name: Some("R2D2".to_owned()),
        ..UserDraft::default()
    };

    let error = service.create_user(draft).await.expect_err("invalid draft");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), VALIDATION_FAILED_MESSAGE);
    let details = error.details().expect("details present");
    assert_eq!(
        details["errors"]["firstName"][0],
        "First name can only contain letters and spaces"
    );
    assert_eq!(details["errors"]["totalScore"][0], "Total score is required");
}

#[rstest]
#[tokio::test]
async fn create_rejects_taken_email(draft: UserDraft) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|email, _| Ok(Some(stored_user(4, email))));

    let error = make_service(repo)
        .create_user(draft)
        .await
        .expect_err("email taken");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn create_maps_unique_index_rejection_to_conflict(draft: UserDraft) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_email("grace@example.com")));

    let error = make_service(repo)
        .create_user(draft)
        .await
        .expect_err("unique index rejects");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn list_maps_persistence_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_list().times(1).return_once(move || Err(failure));

    let error = make_service(repo)
        .list_users()
        .await
        .expect_err("list fails");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = make_service(repo)
        .get_user(UserId::new(9))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_user_skips_email_check(draft: UserDraft) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_find_by_email().never();

    let error = make_service(repo)
        .update_user(UserId::new(3), draft)
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_excludes_own_row_from_email_check(draft: UserDraft) {
    let id = UserId::new(3);
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user(3, "old@example.com"))));
    repo.expect_find_by_email()
        .withf(move |_, excluding| *excluding == Some(id))
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_update()
        .withf(|user| user.profile().email == "grace@example.com")
        .times(1)
        .return_once(|_| Ok(()));

    make_service(repo)
        .update_user(id, draft)
        .await
        .expect("update succeeds");
}

#[rstest]
#[case(false, ErrorCode::NotFound)]
#[case(true, ErrorCode::InternalError)]
#[tokio::test]
async fn update_conflict_is_resolved_by_existence(
    draft: UserDraft,
    #[case] still_exists: bool,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(stored_user(5, "grace@example.com"))));
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_update()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::concurrency_conflict(5)));
    repo.expect_exists()
        .times(1)
        .return_once(move |_| Ok(still_exists));

    let error = make_service(repo)
        .update_user(UserId::new(5), draft)
        .await
        .expect_err("conflict surfaces");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn delete_of_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_delete().never();

    let error = make_service(repo)
        .delete_user(UserId::new(2))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_racing_another_delete_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(stored_user(2, "grace@example.com"))));
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let error = make_service(repo)
        .delete_user(UserId::new(2))
        .await
        .expect_err("row vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn padded_duplicate_email_is_caught_by_storage(draft: UserDraft) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = UsersService::new(Arc::clone(&repo), fixture_clock());
    service
        .create_user(draft.clone())
        .await
        .expect("first create succeeds");

    let mut padded = draft;
    padded.email = Some("  grace@example.com ".to_owned());
    let error = service
        .create_user(padded)
        .await
        .expect_err("trimmed email collides");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(repo.len(), 1);
}

#[rstest]
#[tokio::test]
async fn update_of_concurrently_deleted_user_is_not_found(draft: UserDraft) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = UsersService::new(Arc::clone(&repo), fixture_clock());
    let user = service
        .create_user(draft.clone())
        .await
        .expect("create succeeds");
    repo.remove_row(user.id());

    let error = service
        .update_user(user.id(), draft)
        .await
        .expect_err("row gone");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
