use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use recs_domain::Page;
use recs_service::{
	Error as ServiceError, IndexArticleRequest, IndexArticleResponse, IndexTagRequest,
	IndexTagResponse, PopularTagsResponse, RecommendedArticle, TagPreferencesRequest,
	TagPreferencesResponse, TextRecommendRequest, TextRecommendResponse, TrendingRequest,
	TrendingResponse, UserRecommendRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/recommendations/text", post(recommend_by_text))
		.route("/v1/users/{user_id}/recommendations", get(recommend_for_user))
		.route("/v1/users/{user_id}/tag_preferences", put(set_tag_preferences))
		.route("/v1/articles/index", post(index_article))
		.route("/v1/articles/{article_id}/vector", delete(remove_article))
		.route("/v1/articles/trending", get(trending))
		.route("/v1/tags/index", post(index_tag))
		.route("/v1/tags/popular", get(popular_tags))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
	page: Option<u32>,
	limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TagNamesBody {
	names: Vec<String>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend_by_text(
	State(state): State<AppState>,
	Json(payload): Json<TextRecommendRequest>,
) -> Result<Json<TextRecommendResponse>, ApiError> {
	let response = state.service.recommend_by_text(payload).await?;

	Ok(Json(response))
}

async fn recommend_for_user(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<Json<Page<RecommendedArticle>>, ApiError> {
	let response = state
		.service
		.recommend_for_user(UserRecommendRequest { user_id, page: query.page, limit: query.limit })
		.await?;

	Ok(Json(response))
}

async fn set_tag_preferences(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
	Json(payload): Json<TagNamesBody>,
) -> Result<Json<TagPreferencesResponse>, ApiError> {
	let response = state
		.service
		.set_tag_preferences(TagPreferencesRequest { user_id, names: payload.names })
		.await?;

	Ok(Json(response))
}

async fn index_article(
	State(state): State<AppState>,
	Json(payload): Json<IndexArticleRequest>,
) -> Result<Json<IndexArticleResponse>, ApiError> {
	let response = state.service.index_article(payload).await?;

	Ok(Json(response))
}

async fn remove_article(
	State(state): State<AppState>,
	Path(article_id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.remove_article(&article_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn trending(
	State(state): State<AppState>,
	Query(query): Query<TrendingRequest>,
) -> Result<Json<TrendingResponse>, ApiError> {
	let response = state.service.trending(query).await?;

	Ok(Json(response))
}

async fn index_tag(
	State(state): State<AppState>,
	Json(payload): Json<IndexTagRequest>,
) -> Result<Json<IndexTagResponse>, ApiError> {
	let response = state.service.index_tag(payload).await?;

	Ok(Json(response))
}

async fn popular_tags(
	State(state): State<AppState>,
) -> Result<Json<PopularTagsResponse>, ApiError> {
	let response = state.service.popular_tags().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: &'static str,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidInput { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::ServiceUnavailable { message } => {
				tracing::error!(error = %message, "Upstream dependency unavailable.");

				Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
			},
			ServiceError::Internal { message } => {
				tracing::error!(error = %message, "Request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
