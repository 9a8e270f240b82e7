use std::net::TcpListener;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::routing::get;
use axum::serve::Serve;
use axum::{http::header, http::StatusCode, Json, response::IntoResponse, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use error::{ApiError, PersonError};
use repository::PersonRepository;
use structs::api;

pub mod configuration;
pub mod error;
pub mod merge;
pub mod repository;
pub mod schema;
pub mod search;
pub mod structs;
pub mod telemetry;
pub mod validation;

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[instrument(skip(repository))]
async fn get_person(
    State(repository): State<PersonRepository>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match repository.get_by_id(&id).await {
        Ok(Some(person)) => Ok(Json(api::PersonBody::from(person))),
        Ok(None) | Err(PersonError::InvalidIdentifier(_)) => Err(ApiError::NotFound),
        Err(error) => Err(ApiError::Internal(error)),
    }
}

#[instrument(skip(repository, body))]
async fn create_person(
    State(repository): State<PersonRepository>,
    body: Result<Json<api::PersonPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let draft = validation::validate_for_create(body).map_err(ApiError::Unprocessable)?;

    let person = repository.create(&draft).await.map_err(|error| {
        if error.is_client_error() {
            ApiError::Unprocessable(error)
        } else {
            ApiError::BadRequest(error)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/pessoas/{}", person.id))],
        Json(api::PersonBody::from(person)),
    ))
}

#[instrument(skip(repository))]
async fn search_persons(
    State(repository): State<PersonRepository>,
    Query(query): Query<api::SearchPersonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let predicate = search::build_search_predicate(query.search_term.as_deref())
        .map_err(ApiError::BadRequest)?;

    let found = repository
        .search(&predicate)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(
        found
            .into_iter()
            .map(api::PersonBody::from)
            .collect::<Vec<api::PersonBody>>(),
    ))
}

#[instrument(skip(repository, body))]
async fn update_person(
    State(repository): State<PersonRepository>,
    Path(id): Path<String>,
    body: Result<Json<api::PersonPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let patch = validation::validate_for_update(body).map_err(ApiError::Unprocessable)?;

    match repository.update(&id, patch).await {
        Ok(Some(person)) => Ok(Json(api::PersonBody::from(person))),
        Ok(None) => Err(ApiError::NotFound),
        Err(error) if error.is_client_error() => Err(ApiError::Unprocessable(error)),
        Err(error) => Err(ApiError::Internal(error)),
    }
}

#[instrument(skip(repository))]
async fn count_persons(
    State(repository): State<PersonRepository>,
) -> Result<impl IntoResponse, ApiError> {
    let count = repository.count().await.map_err(ApiError::Internal)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, String::from("text/plain"))],
        format!("{}", count),
    ))
}

pub fn run(
    listener: TcpListener,
    pool: sqlx::PgPool,
) -> Result<Serve<Router, Router>, std::io::Error> {
    listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(listener)?;
    Ok(axum::serve(listener, app(pool)))
}

pub fn app(pool: sqlx::PgPool) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/pessoas/:id", get(get_person).put(update_person))
        .route("/pessoas", get(search_persons).post(create_person))
        .route("/contagem-pessoas", get(count_persons))
        .layer(
            ServiceBuilder::new()
                .layer(SetSensitiveRequestHeadersLayer::new([
                    header::AUTHORIZATION,
                    header::COOKIE,
                ]))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(PersonRepository::new(pool))
}
