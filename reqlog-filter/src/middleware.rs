use crate::pipeline::RequestLogPipeline;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reqlog_core::ReqlogError;
use std::sync::Arc;

/// Axum middleware that runs every request through the pipeline.
///
/// ```ignore
/// let pipeline = Arc::new(RequestLogPipeline::new(config));
/// let app = Router::new()
///     .route("/api/users/{id}", post(update_user))
///     .layer(axum::middleware::from_fn_with_state(pipeline, log_requests));
/// ```
pub async fn log_requests(
    State(pipeline): State<Arc<RequestLogPipeline>>,
    request: Request,
    next: Next,
) -> Response {
    pipeline
        .process(request, |request| async move {
            Ok::<_, ErrorResponse>(next.run(request).await)
        })
        .await
        .unwrap_or_else(|e| e.into_response())
}

/// JSON error reply for failures raised by the pipeline itself.
#[derive(Debug)]
pub struct ErrorResponse(pub ReqlogError);

impl From<ReqlogError> for ErrorResponse {
    fn from(err: ReqlogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            self.0.to_json_body(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_maps_to_413() {
        let resp = ErrorResponse(ReqlogError::BodyTooLarge { limit: 4 }).into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn read_failure_maps_to_400() {
        let err = ReqlogError::BodyRead(std::io::Error::other("reset"));
        let resp = ErrorResponse::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
