use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hyper::ext::ReasonPhrase;
use serde::{Deserialize, Serialize};

/// Body is `{}` or `{"message": ...}`. The human-readable detail for errors
/// travels in the HTTP/1 reason phrase.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct JsonResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn respond(status: StatusCode, status_text: &str, message: Option<&str>) -> Response {
    let mut response = (
        status,
        Json(JsonResponse {
            message: message.map(|m| m.to_string()),
        }),
    )
        .into_response();

    // reason phrases reject control characters; fall back to the canonical one
    if let Ok(reason) = ReasonPhrase::try_from(status_text.to_string()) {
        response.extensions_mut().insert(reason);
    }
    response
}

impl JsonResponse {
    pub fn success(msg: &str) -> impl IntoResponse {
        respond(StatusCode::OK, "Success", Some(msg))
    }

    pub fn unauthorized(status_text: &str) -> impl IntoResponse {
        respond(StatusCode::UNAUTHORIZED, status_text, None)
    }

    pub fn not_found(status_text: &str) -> impl IntoResponse {
        respond(StatusCode::NOT_FOUND, status_text, None)
    }

    pub fn too_many_requests(status_text: &str) -> impl IntoResponse {
        respond(StatusCode::TOO_MANY_REQUESTS, status_text, None)
    }

    pub fn server_error(status_text: &str) -> impl IntoResponse {
        respond(StatusCode::INTERNAL_SERVER_ERROR, status_text, None)
    }

    /// 500 that repeats the status text in the body.
    pub fn server_error_with_message(msg: &str) -> impl IntoResponse {
        respond(StatusCode::INTERNAL_SERVER_ERROR, msg, Some(msg))
    }
}

#[cfg(test)]
pub(crate) fn reason_phrase(resp: &Response) -> Option<String> {
    resp.extensions()
        .get::<ReasonPhrase>()
        .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::reason_phrase;
    use crate::responses::JsonResponse;

    #[tokio::test]
    async fn test_success_response() {
        let resp = JsonResponse::success("success").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        assert_eq!(reason_phrase(&resp).as_deref(), Some("Success"));

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"success"}"#);
    }

    #[tokio::test]
    async fn test_error_response_has_empty_body() {
        let resp = JsonResponse::unauthorized("Unauthorized!").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(reason_phrase(&resp).as_deref(), Some("Unauthorized!"));

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn test_server_error_with_message() {
        let resp = JsonResponse::server_error_with_message("Something went wrong!").into_response();
        assert_eq!(
            resp.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: JsonResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.message.as_deref(), Some("Something went wrong!"));
    }

    #[test]
    fn test_invalid_reason_phrase_is_dropped() {
        let resp = JsonResponse::unauthorized("bad\nphrase").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert!(reason_phrase(&resp).is_none());
    }
}
