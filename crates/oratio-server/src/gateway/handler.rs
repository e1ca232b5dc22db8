use std::path::{Component, Path, PathBuf};

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info};

use oratio::{ScoreResult, ZON_CONTENT_TYPE, ZonEncoder};

use super::error::GatewayError;
use super::state::HandlerState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub text: String,

    /// Relative to the server's rubric directory.
    #[serde(default)]
    pub rubric_path: Option<PathBuf>,

    #[serde(default)]
    pub feedback: bool,

    #[serde(default = "default_use_fuzzy")]
    pub use_fuzzy: bool,
}

fn default_use_fuzzy() -> bool {
    true
}

/// Response encodings selectable through the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Zon,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_zon = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|v| v.split(';').next().unwrap_or_default().trim())
            .any(|media| {
                media.eq_ignore_ascii_case(ZON_CONTENT_TYPE)
                    || media.eq_ignore_ascii_case("text/zon")
            });

        if wants_zon { Self::Zon } else { Self::Json }
    }
}

/// Joins a request rubric path onto `rubric_dir`, refusing absolute paths and `..`.
pub fn resolve_rubric_path(rubric_dir: &Path, requested: &Path) -> Result<PathBuf, GatewayError> {
    let escapes = requested
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || requested.as_os_str().is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "rubric_path must be relative to the rubric directory: {}",
            requested.display()
        )));
    }
    Ok(rubric_dir.join(requested))
}

pub fn make_response(result: &ScoreResult, format: ResponseFormat) -> Result<Response, GatewayError> {
    match format {
        ResponseFormat::Json => Ok((StatusCode::OK, Json(result)).into_response()),
        ResponseFormat::Zon => {
            let body = ZonEncoder::encode_serializable(result)?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, HeaderValue::from_static(ZON_CONTENT_TYPE))],
                body,
            )
                .into_response())
        }
    }
}

#[tracing::instrument(skip(state, headers, body))]
pub async fn score_handler(
    State(state): State<HandlerState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ScoreRequest = serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
    let format = ResponseFormat::from_headers(&headers);

    if request.text.trim().is_empty() {
        debug!("Empty transcript, returning zero score");
        return make_response(&ScoreResult::empty_transcript(), format);
    }

    let rubric_path = request
        .rubric_path
        .as_deref()
        .map(|p| resolve_rubric_path(&state.rubric_dir, p))
        .transpose()?;

    let engine = state.engine.clone();
    let text = request.text;
    let use_fuzzy = request.use_fuzzy;
    let mut result = tokio::task::spawn_blocking(move || {
        engine.score(&text, rubric_path.as_deref(), use_fuzzy)
    })
    .await
    .map_err(|e| GatewayError::InternalError(e.to_string()))??;

    if request.feedback {
        result = result.with_feedback();
    }

    info!(
        overall_score = result.overall_score,
        word_count = result.word_count,
        criteria = result.criteria.len(),
        ?format,
        "Transcript scored"
    );

    make_response(&result, format)
}
