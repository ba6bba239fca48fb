//! HTTP-level tests for profile completion and the interest vocabulary.
//!
//! Postgres is real; the media host and geolocation service are in-process
//! stand-ins (see `common::spawn_remotes`).

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, completion_body, get, post_json, signup, spawn_remotes, PNG_MAGIC};
use matcha_db::repositories::{PictureRepo, UserInterestRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

const COMPLETE: &str = "/api/v1/profile/complete";

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_requires_a_token(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool, &remotes).await;

    let response = post_json(app, COMPLETE, None, &completion_body()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    assert_eq!(remotes.upload_count(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_rejects_a_forged_token(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool, &remotes).await;

    let response = post_json(app, COMPLETE, Some("not.a.jwt"), &completion_body()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn json_completion_persists_everything(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "ana").await;

    let response = post_json(app, COMPLETE, Some(&token), &completion_body()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Profile completed successfully");
    assert_eq!(remotes.upload_count(), 5);

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert!(user.profile_completed);
    assert_eq!(user.biography.as_deref(), Some("Collector of vinyl and houseplants."));
    assert_eq!(user.sexual_preferences.as_deref(), Some("BOTH"));
    assert_eq!(user.profile_picture.as_deref(), Some("https://media.test/1.png"));
    assert_eq!(user.city.as_deref(), Some("Porto"));
    assert_eq!(user.latitude, Some(41.15));

    let pictures: Vec<_> = PictureRepo::list_for_user(&pool, user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.picture_url)
        .collect();
    assert_eq!(
        pictures,
        [
            "https://media.test/2.png",
            "https://media.test/3.png",
            "https://media.test/4.png",
            "https://media.test/5.png"
        ]
    );

    let interests = UserInterestRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(interests, ["art", "cooking", "hiking", "music", "travel"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_coordinates_default_from_forwarded_ip(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "bruno").await;

    let mut body = completion_body();
    let fields = body.as_object_mut().unwrap();
    fields.remove("latitude");
    fields.remove("longitude");

    let request = Request::builder()
        .method(Method::POST)
        .uri(COMPLETE)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header("x-forwarded-for", "198.51.100.4, 10.0.0.1")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.latitude, Some(38.72));
    assert_eq!(user.longitude, Some(-9.14));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn multipart_completion_is_accepted(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "carla").await;

    let boundary = "matcha-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    let text = |body: &mut Vec<u8>, name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    text(&mut body, "biography", "Collector of vinyl and houseplants.");
    text(&mut body, "preferences", "FEMALE");
    text(&mut body, "city", "Porto");
    text(&mut body, "country", "Portugal");
    for tag in ["hiking", "music", "travel", "cooking", "art"] {
        text(&mut body, "interests[]", tag);
    }
    let file = |body: &mut Vec<u8>, name: &str| {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(PNG_MAGIC);
        body.extend_from_slice(b"\r\n");
    };
    file(&mut body, "profile_picture");
    for _ in 0..4 {
        file(&mut body, "pictures");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(COMPLETE)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(remotes.upload_count(), 5);

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert!(user.profile_completed);
    assert_eq!(user.sexual_preferences.as_deref(), Some("FEMALE"));
    assert_eq!(user.latitude, None);
    assert_eq!(PictureRepo::list_for_user(&pool, user_id).await.unwrap().len(), 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn resubmission_appends_pictures_and_keeps_interests_unique(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "dario").await;

    for _ in 0..2 {
        let response = post_json(app.clone(), COMPLETE, Some(&token), &completion_body()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(PictureRepo::list_for_user(&pool, user_id).await.unwrap().len(), 8);
    assert_eq!(UserInterestRepo::list_for_user(&pool, user_id).await.unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_field_returns_400_without_side_effects(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "eva").await;

    let mut body = completion_body();
    body.as_object_mut().unwrap().remove("country");
    let response = post_json(app, COMPLETE, Some(&token), &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "All fields are required");
    assert_eq!(remotes.upload_count(), 0);

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert!(!user.profile_completed);
    assert!(user.biography.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_interests_are_listed(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "filipe").await;

    let mut body = completion_body();
    body["interests"] = json!(["hiking", "bogus1", "bogus2", "music", "travel"]);
    let response = post_json(app, COMPLETE, Some(&token), &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid interests");
    assert_eq!(json["invalidInterests"], json!(["bogus1", "bogus2"]));
    assert_eq!(remotes.upload_count(), 0);
    assert!(UserInterestRepo::list_for_user(&pool, user_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn too_few_pictures_returns_400(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (_, token) = signup(&pool, "gil").await;

    let mut body = completion_body();
    body["pictures"] = json!(vec![common::png_data_url(); 3]);
    let response = post_json(app, COMPLETE, Some(&token), &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "At least 4 pictures are required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_returns_400(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (_, token) = signup(&pool, "helena").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(COMPLETE)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{\"biography\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Server errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn token_for_deleted_user_returns_generic_500(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool.clone(), &remotes).await;
    let (user_id, token) = signup(&pool, "ines").await;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(app, COMPLETE, Some(&token), &completion_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "COMPLETION_FAILED");
    assert_eq!(json["message"], "An error occurred while completing the profile");
    // Uploads happened before the transaction and are left orphaned.
    assert_eq!(remotes.upload_count(), 5);
    assert!(PictureRepo::list_for_user(&pool, user_id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn interests_are_listed_alphabetically(pool: PgPool) {
    let remotes = spawn_remotes().await;
    let app = common::build_test_app(pool, &remotes).await;

    let response = get(app, "/api/v1/interests").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tags: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tag"].as_str().unwrap())
        .collect();
    assert!(tags.contains(&"hiking"));
    let mut sorted = tags.clone();
    sorted.sort_unstable();
    assert_eq!(tags, sorted);
}
