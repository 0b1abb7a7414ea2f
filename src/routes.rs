use crate::{
    routes::send_recording::{method_not_allowed, options_preflight, post_send_recording},
    state::NotifierState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    routing::post,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub mod send_recording;

/// Enforced by the body extractors, so an oversized submission still gets a JSON error.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub const ALLOWED_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const ALLOWED_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

pub fn router(state: NotifierState) -> Router {
    let send_recording = post(post_send_recording)
        .options(options_preflight)
        .fallback(method_not_allowed);

    // the cors headers go on last so they wrap every response, including the ones the other
    // layers produce themselves
    Router::new()
        .route("/", send_recording.clone())
        .route("/api/send-recording", send_recording)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .with_state(state)
}
