use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use premise_service::{
	AddPremiseRequest, AddPremiseResponse, Error, RetrievalOutput, RetrievalRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let mut router = Router::new()
		.route("/health", get(health))
		.route("/indexed-premises", get(indexed_premises))
		.route("/retrieve", post(retrieve));

	if state.service.cfg.admin.enable_add_premise {
		router = router.route("/add-premise", post(add_premise));
	}

	router.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn indexed_premises(State(state): State<AppState>) -> Json<Vec<String>> {
	Json(state.service.indexed_premises())
}

async fn retrieve(
	State(state): State<AppState>,
	payload: Result<Json<RetrievalRequest>, JsonRejection>,
) -> Result<Json<RetrievalOutput>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.retrieve(payload).await?;

	Ok(Json(response))
}

async fn add_premise(
	State(state): State<AppState>,
	payload: Result<Json<AddPremiseRequest>, JsonRejection>,
) -> Result<Json<AddPremiseResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.add_premise(payload).await?;

	Ok(Json(response))
}

#[derive(Serialize)]
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
	pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidArgument { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_argument", message),
			Error::TooManyCandidates { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "too_many_candidates", message),
			Error::Overloaded { .. } =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, "overloaded", message),
			Error::Backend { .. } => {
				tracing::error!(error = %message, "Embedding backend failed.");

				Self::new(StatusCode::BAD_GATEWAY, "backend_error", message)
			},
			Error::Storage { .. } => {
				tracing::error!(error = %message, "Premise index failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_argument", rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
