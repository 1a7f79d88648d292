//! HTTP front end: the HTML form and the JSON API share `/`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Form, Json, Router, async_trait,
    extract::{FromRequest, Request, State, rejection::JsonRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use weather_lookup_core::{LookupError, WeatherLookup};

use crate::render::{self, JsonError, JsonWeather};

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn WeatherLookup>,
}

pub async fn serve(addr: SocketAddr, lookup: Arc<dyn WeatherLookup>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router(lookup)).await.context("HTTP server failed")?;
    Ok(())
}

pub fn router(lookup: Arc<dyn WeatherLookup>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(form_page).post(submit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { lookup })
}

#[derive(Debug, Default, Deserialize)]
pub struct CityInput {
    #[serde(default)]
    pub city: Option<String>,
}

/// A city submitted either as a JSON body or as an HTML form.
#[derive(Debug)]
pub enum Submission {
    Json(CityInput),
    Form(CityInput),
}

impl Submission {
    fn city(&self) -> &str {
        let (Submission::Json(input) | Submission::Form(input)) = self;
        input.city.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        if is_json {
            let Json(input) = Json::<CityInput>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            Ok(Submission::Json(input))
        } else {
            let Form(input) = Form::<CityInput>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Submission::Form(input))
        }
    }
}

/// `application/json` and any `application/*+json` subtype, parameters ignored.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// JSON clients always read `error` from the body, so extractor failures answer in JSON too.
fn json_rejection(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejected JSON body");
    let error = format!("Invalid JSON body: {}", rejection.body_text());
    (StatusCode::BAD_REQUEST, Json(JsonError { error })).into_response()
}

async fn form_page() -> Html<String> {
    Html(render::html_page(None))
}

async fn submit(State(state): State<AppState>, submission: Submission) -> Response {
    let city = submission.city();
    let result = state.lookup.lookup(city).await;

    if let Err(err) = &result {
        tracing::warn!(city, error = %err, "lookup failed");
    }

    match (submission, result) {
        (Submission::Json(_), Ok(record)) => Json(JsonWeather::from(&record)).into_response(),
        (Submission::Json(_), Err(err)) => {
            (status_for(&err), Json(JsonError { error: err.user_message() })).into_response()
        }
        (Submission::Form(_), result) => {
            let status = result.as_ref().err().map_or(StatusCode::OK, status_for);
            (status, Html(render::html_page(Some(&result)))).into_response()
        }
    }
}

fn status_for(err: &LookupError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
