//! Tests for the social service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockSocialRepository, MockUserDirectory};
use crate::domain::test_fixtures::{contact, fixture_clock, fixture_now};
use crate::domain::{ErrorCode, MAX_COMMENT_CHARS};

fn service(
    social: MockSocialRepository,
    users: MockUserDirectory,
) -> SocialService<MockSocialRepository, MockUserDirectory> {
    SocialService::new(Arc::new(social), Arc::new(users), fixture_clock())
}

fn known_user(users: &mut MockUserDirectory, user_id: &UserId) {
    let found = contact(user_id, "Paolo");
    users
        .expect_find_contact()
        .with(eq(user_id.clone()))
        .return_once(move |_| Ok(Some(found)));
}

#[tokio::test]
async fn follow_records_edge() {
    let follower = UserId::random();
    let target = UserId::random();
    let mut users = MockUserDirectory::new();
    known_user(&mut users, &target);
    let mut social = MockSocialRepository::new();
    social
        .expect_insert_follow()
        .with(eq(follower.clone()), eq(target.clone()), eq(fixture_now()))
        .times(1)
        .return_once(|_, _, _| Ok(()));

    service(social, users)
        .follow(&follower, &target)
        .await
        .expect("followed");
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let user = UserId::random();
    let mut social = MockSocialRepository::new();
    social.expect_insert_follow().times(0);

    let error = service(social, MockUserDirectory::new())
        .follow(&user, &user)
        .await
        .expect_err("self follow");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "You cannot follow yourself.");
}

#[tokio::test]
async fn following_unknown_user_is_not_found() {
    let mut users = MockUserDirectory::new();
    users.expect_find_contact().return_once(|_| Ok(None));
    let mut social = MockSocialRepository::new();
    social.expect_insert_follow().times(0);

    let error = service(social, users)
        .follow(&UserId::random(), &UserId::random())
        .await
        .expect_err("unknown target");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found.");
}

#[tokio::test]
async fn duplicate_follow_conflicts() {
    let target = UserId::random();
    let mut users = MockUserDirectory::new();
    known_user(&mut users, &target);
    let mut social = MockSocialRepository::new();
    social
        .expect_insert_follow()
        .return_once(|_, _, _| Err(SocialRepositoryError::duplicate()));

    let error = service(social, users)
        .follow(&UserId::random(), &target)
        .await
        .expect_err("duplicate follow");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Already following this user.");
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn unfollow_paths(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
    let mut social = MockSocialRepository::new();
    social
        .expect_delete_follow()
        .return_once(move |_, _| Ok(existed));

    let result = service(social, MockUserDirectory::new())
        .unfollow(&UserId::random(), &UserId::random())
        .await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[tokio::test]
async fn duplicate_reaction_conflicts() {
    let activity_id = Uuid::new_v4();
    let mut social = MockSocialRepository::new();
    social
        .expect_insert_reaction()
        .withf(move |reaction| {
            reaction.activity_id == activity_id && reaction.kind == ReactionKind::Fire
        })
        .return_once(|_| Err(SocialRepositoryError::duplicate()));

    let error = service(social, MockUserDirectory::new())
        .react(&UserId::random(), &activity_id, ReactionKind::Fire)
        .await
        .expect_err("duplicate reaction");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn unreact_paths(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
    let mut social = MockSocialRepository::new();
    social
        .expect_delete_reaction()
        .return_once(move |_, _| Ok(existed));

    let result = service(social, MockUserDirectory::new())
        .unreact(&UserId::random(), &Uuid::new_v4())
        .await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[tokio::test]
async fn add_comment_trims_and_stores() {
    let activity_id = Uuid::new_v4();
    let mut social = MockSocialRepository::new();
    social
        .expect_insert_comment()
        .withf(|comment| comment.body == "Ang ganda ng view!")
        .times(1)
        .return_once(|_| Ok(()));

    let payload = service(social, MockUserDirectory::new())
        .add_comment(&UserId::random(), &activity_id, "  Ang ganda ng view!  ".to_owned())
        .await
        .expect("comment added");

    assert_eq!(payload.activity_id, activity_id);
    assert_eq!(payload.created_at, fixture_now());
}

#[rstest]
#[case::blank("   ".to_owned())]
#[case::too_long("a".repeat(MAX_COMMENT_CHARS + 1))]
#[tokio::test]
async fn invalid_comments_are_rejected(#[case] body: String) {
    let mut social = MockSocialRepository::new();
    social.expect_insert_comment().times(0);

    let error = service(social, MockUserDirectory::new())
        .add_comment(&UserId::random(), &Uuid::new_v4(), body)
        .await
        .expect_err("invalid comment");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::own(true, true, None)]
#[case::someone_else(true, false, Some(ErrorCode::Forbidden))]
#[case::missing(false, true, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_comment_paths(
    #[case] exists: bool,
    #[case] own: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let author = UserId::random();
    let comment = Comment::new(Uuid::new_v4(), author.clone(), "Nice pace!", fixture_now())
        .expect("valid comment");
    let comment_id = comment.id;
    let mut social = MockSocialRepository::new();
    social
        .expect_find_comment()
        .return_once(move |_| Ok(exists.then_some(comment)));
    social
        .expect_delete_comment()
        .with(eq(comment_id))
        .times(usize::from(expected.is_none()))
        .returning(|_| Ok(true));

    let caller = if own { author } else { UserId::random() };
    let result = service(social, MockUserDirectory::new())
        .delete_comment(&caller, &comment_id)
        .await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[tokio::test]
async fn list_comments_preserves_order() {
    let activity_id = Uuid::new_v4();
    let first = Comment::new(activity_id, UserId::random(), "First!", fixture_now())
        .expect("valid comment");
    let second = Comment::new(activity_id, UserId::random(), "Second", fixture_now())
        .expect("valid comment");
    let expected = vec![first.id, second.id];
    let mut social = MockSocialRepository::new();
    social
        .expect_list_comments()
        .with(eq(activity_id))
        .return_once(move |_| Ok(vec![first, second]));

    let comments = service(social, MockUserDirectory::new())
        .list_comments(&activity_id)
        .await
        .expect("comments listed");

    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), expected);
}
