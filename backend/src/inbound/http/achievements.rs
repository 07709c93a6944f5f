//! Badge and avatar-border HTTP handlers.
//!
//! ```text
//! GET /api/v1/users/{user_id}/badges
//! GET /api/v1/users/{user_id}/borders
//! POST /api/v1/achievements/refresh
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{BorderPayload, EarnedBadgePayload};
use crate::domain::{AvatarBorder, AwardedAchievements, Badge, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

#[derive(Debug, Deserialize)]
pub(crate) struct UserPath {
    user_id: String,
}

pub(crate) fn parse_path_user_id(path: UserPath) -> Result<UserId, Error> {
    parse_user_id(path.user_id, FieldName::new("userId"))
}

/// Badge definition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<Badge> for BadgeBody {
    fn from(value: Badge) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            image_url: value.image_url,
        }
    }
}

/// Badge held by a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgeBody {
    pub badge: BadgeBody,
    #[schema(format = "date-time")]
    pub awarded_at: String,
}

impl From<EarnedBadgePayload> for EarnedBadgeBody {
    fn from(value: EarnedBadgePayload) -> Self {
        Self {
            badge: BadgeBody::from(value.badge),
            awarded_at: value.awarded_at.to_rfc3339(),
        }
    }
}

/// Badges earned by a user, most recent first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBadgesResponseBody {
    pub badges: Vec<EarnedBadgeBody>,
}

/// Avatar border with the user's award state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorderBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "rare")]
    pub tier: String,
    pub sort_order: i32,
    pub earned: bool,
    #[schema(format = "date-time")]
    pub awarded_at: Option<String>,
}

impl From<BorderPayload> for BorderBody {
    fn from(value: BorderPayload) -> Self {
        Self {
            id: value.id.to_string(),
            slug: value.slug,
            name: value.name,
            description: value.description,
            tier: value.tier.as_str().to_owned(),
            sort_order: value.sort_order,
            earned: value.earned,
            awarded_at: value.awarded_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// Every border in display order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBordersResponseBody {
    pub borders: Vec<BorderBody>,
}

/// Border granted by an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBorderBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub slug: String,
    pub name: String,
    pub tier: String,
}

impl From<AvatarBorder> for AwardedBorderBody {
    fn from(value: AvatarBorder) -> Self {
        Self {
            id: value.id.to_string(),
            slug: value.slug,
            name: value.name,
            tier: value.tier.as_str().to_owned(),
        }
    }
}

/// Achievements newly granted by a refresh.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshAchievementsResponseBody {
    pub badges: Vec<BadgeBody>,
    pub borders: Vec<AwardedBorderBody>,
}

impl From<AwardedAchievements> for RefreshAchievementsResponseBody {
    fn from(value: AwardedAchievements) -> Self {
        Self {
            badges: value.badges.into_iter().map(BadgeBody::from).collect(),
            borders: value.borders.into_iter().map(AwardedBorderBody::from).collect(),
        }
    }
}

/// List a user's earned badges.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/badges",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Earned badges", body = ListBadgesResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["achievements"],
    operation_id = "listUserBadges",
    security([])
)]
#[get("/users/{user_id}/badges")]
pub async fn list_badges(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<ListBadgesResponseBody>> {
    let user_id = parse_path_user_id(path.into_inner())?;
    let badges = state.achievements.list_badges(&user_id).await?;
    Ok(web::Json(ListBadgesResponseBody {
        badges: badges.into_iter().map(EarnedBadgeBody::from).collect(),
    }))
}

/// List every avatar border with the user's earned flag.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/borders",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Borders", body = ListBordersResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["achievements"],
    operation_id = "listUserBorders",
    security([])
)]
#[get("/users/{user_id}/borders")]
pub async fn list_borders(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<ListBordersResponseBody>> {
    let user_id = parse_path_user_id(path.into_inner())?;
    let borders = state.achievements.list_borders(&user_id).await?;
    Ok(web::Json(ListBordersResponseBody {
        borders: borders.into_iter().map(BorderBody::from).collect(),
    }))
}

/// Re-run the badge and border evaluators for the caller.
///
/// Evaluation failures are logged server-side and yield an empty result.
#[utoipa::path(
    post,
    path = "/api/v1/achievements/refresh",
    responses(
        (status = 200, description = "Newly granted achievements", body = RefreshAchievementsResponseBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["achievements"],
    operation_id = "refreshAchievements",
    security(("SessionCookie" = []))
)]
#[post("/achievements/refresh")]
pub async fn refresh_achievements(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RefreshAchievementsResponseBody>> {
    let user_id = session.require_user_id()?;
    let awarded = state.evaluator.evaluate(&user_id).await;
    Ok(web::Json(RefreshAchievementsResponseBody::from(awarded)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::domain::test_fixtures::fixture_now;
    use crate::domain::{BorderProgress, BorderTier, EarnedBadge};
    use crate::inbound::http::auth::create_session;
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_session_middleware};

    fn test_app(
        ports: MockPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(create_session)
                    .service(list_badges)
                    .service(list_borders)
                    .service(refresh_achievements),
            )
    }

    fn badge(title: &str) -> Badge {
        Badge {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: None,
            image_url: Some("https://cdn.eventtara.test/badges/first-hike.png".to_owned()),
            criteria_key: Some("first_hike".to_owned()),
        }
    }

    fn border(slug: &str) -> AvatarBorder {
        AvatarBorder {
            id: Uuid::new_v4(),
            slug: slug.to_owned(),
            name: "Summit Seeker".to_owned(),
            description: None,
            tier: BorderTier::Rare,
            criteria_type: "event_type_count".to_owned(),
            criteria_value: json!({"event_type": "hiking", "min_events": 3}),
            sort_order: 2,
        }
    }

    #[actix_web::test]
    async fn badges_are_public_per_user() {
        let user_id = UserId::random();
        let earned = EarnedBadgePayload::from(EarnedBadge {
            badge: badge("First Hike"),
            awarded_at: fixture_now(),
        });
        let mut ports = MockPorts::default();
        ports
            .achievements
            .expect_list_badges()
            .with(eq(user_id.clone()))
            .return_once(move |_| Ok(vec![earned]));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{user_id}/badges"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["badges"][0]["badge"]["title"], "First Hike");
        assert!(body["badges"][0]["badge"].get("criteriaKey").is_none());
    }

    #[actix_web::test]
    async fn borders_report_earned_flag() {
        let user_id = UserId::random();
        let progress = vec![
            BorderPayload::from(BorderProgress {
                border: border("summit-seeker"),
                awarded_at: Some(fixture_now()),
            }),
            BorderPayload::from(BorderProgress {
                border: border("trail-blazer"),
                awarded_at: None,
            }),
        ];
        let mut ports = MockPorts::default();
        ports
            .achievements
            .expect_list_borders()
            .return_once(move |_| Ok(progress));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{user_id}/borders"))
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["borders"][0]["earned"], true);
        assert_eq!(body["borders"][0]["tier"], "rare");
        assert_eq!(body["borders"][1]["earned"], false);
        assert_eq!(body["borders"][1]["awardedAt"], Value::Null);
    }

    #[actix_web::test]
    async fn malformed_user_id_is_bad_request() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/juan/badges")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn refresh_runs_evaluator_for_session_user() {
        let user_id = UserId::random();
        let mut ports = MockPorts::default().signed_in_as(&user_id);
        let awarded = AwardedAchievements {
            badges: vec![badge("First Hike")],
            borders: vec![border("summit-seeker")],
        };
        ports
            .evaluator
            .expect_evaluate()
            .with(eq(user_id.clone()))
            .times(1)
            .return_once(move |_| awarded);
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/achievements/refresh")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["badges"][0]["title"], "First Hike");
        assert_eq!(body["borders"][0]["slug"], "summit-seeker");
    }

    #[actix_web::test]
    async fn refresh_requires_session() {
        let mut ports = MockPorts::default();
        ports.evaluator.expect_evaluate().times(0);
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/achievements/refresh")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
