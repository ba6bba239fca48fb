#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::{get as get_route, post as post_route};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use matcha_api::auth::jwt::{generate_access_token, JwtConfig};
use matcha_api::completion::CompletionService;
use matcha_api::config::ServerConfig;
use matcha_api::routes;
use matcha_api::state::AppState;
use matcha_core::interests::InterestVocabulary;
use matcha_core::types::UserId;
use matcha_db::models::user::CreateUser;
use matcha_db::repositories::{InterestTagRepo, UserRepo};
use matcha_db::PgCompletionStore;
use matcha_remote::{CloudinaryConfig, CloudinaryUploader, IpGeoClient};

pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

// ---------------------------------------------------------------------------
// Stand-in remote services
// ---------------------------------------------------------------------------

/// In-process media host and geolocation service.
pub struct Remotes {
    pub base_url: String,
    /// Number of uploads the media host accepted.
    pub uploads: Arc<AtomicUsize>,
}

impl Remotes {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

/// Serve a media host that accepts every upload and a geolocation service
/// that places every address in Lisbon.
pub async fn spawn_remotes() -> Remotes {
    let uploads: Arc<AtomicUsize> = Arc::default();
    let counter = Arc::clone(&uploads);

    let app = Router::new()
        .route(
            "/v1_1/{cloud}/image/upload",
            post_route(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({
                        "secure_url": format!("https://media.test/{n}.png"),
                        "public_id": n.to_string(),
                    }))
                }
            }),
        )
        .route(
            "/geo/{ip}",
            get_route(|| async {
                Json(json!({ "status": "success", "lat": 38.72, "lon": -9.14 }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Remotes {
        base_url: format!("http://{addr}"),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointing remote services at `remotes_url`.
pub fn test_config(remotes_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key-123".into(),
            api_secret: "shh".into(),
            base_url: remotes_url.to_string(),
            folder: None,
            timeout: Duration::from_secs(5),
        },
        geolocation_url: format!("{remotes_url}/geo"),
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs`, with the vocabulary read
/// from the migrated database.
pub async fn build_test_app(pool: PgPool, remotes: &Remotes) -> Router {
    let config = test_config(&remotes.base_url);

    let tags = InterestTagRepo::list_names(&pool).await.unwrap();
    let completion = CompletionService::new(
        CloudinaryUploader::new(config.cloudinary.clone()).unwrap(),
        PgCompletionStore::new(pool.clone()),
        IpGeoClient::new(config.geolocation_url.clone()).unwrap(),
        Arc::new(InterestVocabulary::new(tags)),
    );

    let state = AppState {
        pool,
        config: Arc::new(config),
        completion: Arc::new(completion),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a freshly signed-up user and return its id with a bearer token.
pub async fn signup(pool: &PgPool, username: &str) -> (UserId, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".into(),
            last_name: "User".into(),
        },
    )
    .await
    .unwrap();

    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    };
    let token = generate_access_token(user.id, &config).unwrap();
    (user.id, token)
}

pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC))
}

/// A valid JSON completion body with four pictures and five interests.
pub fn completion_body() -> Value {
    json!({
        "biography": "Collector of vinyl and houseplants.",
        "preferences": "BOTH",
        "city": "Porto",
        "country": "Portugal",
        "profile_picture": png_data_url(),
        "pictures": vec![png_data_url(); 4],
        "latitude": 41.15,
        "longitude": -8.61,
        "interests": ["hiking", "music", "travel", "cooking", "art"],
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body, with a bearer token when one is given.
pub async fn post_json(app: Router, uri: &str, token: Option<&str>, body: &Value) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
