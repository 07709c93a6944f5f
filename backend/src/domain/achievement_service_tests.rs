//! Tests for the achievement service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockAchievementRepository, MockMailer, MockUserDirectory};
use crate::domain::test_fixtures::{contact, fixture_clock, fixture_now};
use crate::domain::{
    BadgeKey, BorderStats, BorderTier, CheckinStats, EarnedBadge, EarnedBorder, ErrorCode,
    EventType,
};

#[fixture]
fn badge_catalogue() -> Vec<Badge> {
    BadgeKey::ALL
        .iter()
        .map(|key| Badge {
            id: Uuid::new_v4(),
            title: key.as_str().to_owned(),
            description: None,
            image_url: None,
            criteria_key: Some(key.as_str().to_owned()),
        })
        .collect()
}

fn hiking_border(min_events: u32) -> AvatarBorder {
    AvatarBorder {
        id: Uuid::new_v4(),
        slug: "trail-hound".to_owned(),
        name: "Trail Hound".to_owned(),
        description: None,
        tier: BorderTier::Rare,
        criteria_type: "event_type_count".to_owned(),
        criteria_value: json!({ "event_type": "hiking", "min_events": min_events }),
        sort_order: 1,
    }
}

fn hiking_stats(count: usize) -> CheckinStats {
    CheckinStats::from_event_types(std::iter::repeat_n(EventType::Hiking, count), None)
}

fn service(
    achievements: MockAchievementRepository,
    users: MockUserDirectory,
    mailer: MockMailer,
) -> AchievementService<MockAchievementRepository, MockUserDirectory> {
    AchievementService::new(
        Arc::new(achievements),
        Arc::new(users),
        Notifier::new(Arc::new(mailer), "https://eventtara.test"),
        fixture_clock(),
    )
}

fn expect_no_borders(achievements: &mut MockAchievementRepository) {
    achievements
        .expect_load_border_stats()
        .returning(|_| Ok(BorderStats::default()));
    achievements.expect_list_borders().returning(|| Ok(Vec::new()));
    achievements
        .expect_list_user_borders()
        .returning(|_| Ok(Vec::new()));
}

#[rstest]
#[tokio::test]
async fn first_hike_awards_badge_and_emails(badge_catalogue: Vec<Badge>) {
    let user_id = UserId::random();
    let first_hike = badge_catalogue
        .iter()
        .find(|badge| badge.key() == Some(BadgeKey::FirstHike))
        .cloned()
        .expect("catalogue has first_hike");
    let expected_id = first_hike.id;

    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Ok(hiking_stats(1)));
    achievements
        .expect_list_badges()
        .return_once(move || Ok(badge_catalogue));
    achievements
        .expect_list_user_badges()
        .return_once(|_| Ok(Vec::new()));
    achievements
        .expect_award_badges()
        .withf(move |_, ids, at| ids == [expected_id] && *at == fixture_now())
        .times(1)
        .return_once(|_, _, _| Ok(()));
    expect_no_borders(&mut achievements);
    let mut users = MockUserDirectory::new();
    let recipient = contact(&user_id, "Mika");
    users
        .expect_find_contact()
        .return_once(move |_| Ok(Some(recipient)));
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|message| message.subject.starts_with("New badge unlocked"))
        .times(1)
        .return_once(|_| Ok(()));

    let awarded = service(achievements, users, mailer)
        .evaluate(&user_id)
        .await;

    assert_eq!(awarded.badges, vec![first_hike]);
    assert!(awarded.borders.is_empty());
}

#[rstest]
#[tokio::test]
async fn held_badges_are_not_awarded_again(badge_catalogue: Vec<Badge>) {
    let user_id = UserId::random();
    let first_hike = badge_catalogue
        .iter()
        .find(|badge| badge.key() == Some(BadgeKey::FirstHike))
        .cloned()
        .expect("catalogue has first_hike");

    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Ok(hiking_stats(1)));
    achievements
        .expect_list_badges()
        .return_once(move || Ok(badge_catalogue));
    achievements.expect_list_user_badges().return_once(move |_| {
        Ok(vec![EarnedBadge {
            badge: first_hike,
            awarded_at: fixture_now(),
        }])
    });
    achievements.expect_award_badges().times(0);
    expect_no_borders(&mut achievements);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let awarded = service(achievements, MockUserDirectory::new(), mailer)
        .evaluate(&user_id)
        .await;

    assert!(awarded.is_empty());
}

#[tokio::test]
async fn zero_checkins_skip_badge_lookup() {
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Ok(CheckinStats::default()));
    achievements.expect_list_badges().times(0);
    expect_no_borders(&mut achievements);

    let awarded = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .evaluate(&UserId::random())
        .await;

    assert!(awarded.is_empty());
}

#[rstest]
#[case::reached(3, true)]
#[case::short(2, false)]
#[tokio::test]
async fn event_type_count_border(#[case] hikes: usize, #[case] awarded: bool) {
    let border = hiking_border(3);
    let border_id = border.id;
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Ok(CheckinStats::default()));
    achievements.expect_load_border_stats().return_once(move |_| {
        Ok(BorderStats {
            checkins: hiking_stats(hikes),
            ..BorderStats::default()
        })
    });
    achievements
        .expect_list_borders()
        .return_once(move || Ok(vec![border]));
    achievements
        .expect_list_user_borders()
        .return_once(|_| Ok(Vec::new()));
    achievements
        .expect_award_borders()
        .withf(move |_, ids, _| ids == [border_id])
        .times(usize::from(awarded))
        .returning(|_, _, _| Ok(()));

    let result = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .evaluate(&UserId::random())
        .await;

    assert_eq!(
        result.borders.iter().map(|b| b.id).collect::<Vec<_>>(),
        if awarded { vec![border_id] } else { Vec::new() }
    );
}

#[tokio::test]
async fn badge_failure_does_not_block_borders() {
    let border = hiking_border(1);
    let border_id = border.id;
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Err(AchievementRepositoryError::connection("refused")));
    achievements.expect_load_border_stats().return_once(|_| {
        Ok(BorderStats {
            checkins: hiking_stats(1),
            ..BorderStats::default()
        })
    });
    achievements
        .expect_list_borders()
        .return_once(move || Ok(vec![border]));
    achievements
        .expect_list_user_borders()
        .return_once(|_| Ok(Vec::new()));
    achievements
        .expect_award_borders()
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let result = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .evaluate(&UserId::random())
        .await;

    assert!(result.badges.is_empty());
    assert_eq!(
        result.borders.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![border_id]
    );
}

#[tokio::test]
async fn award_failure_returns_empty() {
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_load_checkin_stats()
        .return_once(|_| Ok(CheckinStats::default()));
    achievements
        .expect_load_border_stats()
        .return_once(|_| Ok(BorderStats::default()));
    achievements
        .expect_list_borders()
        .return_once(|| Ok(vec![hiking_border(0)]));
    achievements
        .expect_list_user_borders()
        .return_once(|_| Ok(Vec::new()));
    achievements
        .expect_award_borders()
        .return_once(|_, _, _| Err(AchievementRepositoryError::query("deadlock")));

    let result = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .evaluate(&UserId::random())
        .await;

    assert!(result.is_empty());
}

#[tokio::test]
async fn list_borders_marks_earned_rows() {
    let earned = hiking_border(1);
    let locked = hiking_border(10);
    let earned_id = earned.id;
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_list_borders()
        .return_once(move || Ok(vec![earned, locked]));
    achievements.expect_list_user_borders().return_once(move |_| {
        Ok(vec![EarnedBorder {
            border_id: earned_id,
            awarded_at: fixture_now(),
        }])
    });

    let borders = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .list_borders(&UserId::random())
        .await
        .expect("borders listed");

    assert_eq!(
        borders
            .iter()
            .map(|border| (border.earned, border.awarded_at))
            .collect::<Vec<_>>(),
        vec![(true, Some(fixture_now())), (false, None)]
    );
}

#[tokio::test]
async fn list_badges_maps_repository_errors() {
    let user_id = UserId::random();
    let mut achievements = MockAchievementRepository::new();
    achievements
        .expect_list_user_badges()
        .with(eq(user_id.clone()))
        .return_once(|_| Err(AchievementRepositoryError::connection("refused")));

    let error = service(achievements, MockUserDirectory::new(), MockMailer::new())
        .list_badges(&user_id)
        .await
        .expect_err("repository down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
