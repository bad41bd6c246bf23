use axum::http::HeaderValue;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{auth::AuthenticatedUser, state::AppState};

pub mod admin;
pub mod applications;
pub mod auth;
pub mod certifications;
pub mod compliance;
pub mod dashboard;
pub mod health;
pub mod jobs;
pub mod profile;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| {
                    trimmed
                        .parse::<HeaderValue>()
                        .expect("invalid CORS allowed origin")
                })
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let profile_routes = Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/resume", post(profile::upload_resume));

    let jobs_routes = Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/:id", get(jobs::get_job).patch(jobs::update_job))
        .route("/:id/apply", post(applications::apply))
        .route("/:id/applications", get(applications::list_job_applications))
        .route("/:id/compliance", get(compliance::job_compliance));

    let applications_routes = Router::new()
        .route("/", get(applications::list_my_applications))
        .route("/:id/status", patch(applications::update_status));

    let compliance_routes = Router::new()
        .route(
            "/requirements/:id/submission",
            post(compliance::submit_document),
        )
        .route(
            "/submissions/:id/review",
            post(compliance::review_submission),
        );

    let certifications_routes = Router::new().route(
        "/",
        get(certifications::list_documents).post(certifications::upload_document),
    );

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/verifications", get(admin::list_verifications))
        .route("/verifications/:id/verify", post(admin::verify_document))
        .route("/verifications/:id/reject", post(admin::reject_document));

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .nest("/api/profile", profile_routes)
        .nest("/api/jobs", jobs_routes)
        .nest("/api/applications", applications_routes)
        .nest("/api/compliance", compliance_routes)
        .nest("/api/certifications", certifications_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/dashboard", get(dashboard::dashboard))
        .layer(middleware::from_extractor_with_state::<AuthenticatedUser, _>(protected_state));

    Router::new()
        .merge(protected_routes)
        .nest("/api/auth", auth_routes)
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 32))
}
