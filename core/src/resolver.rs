//! Response resolution and error classification.
//!
//! # Design
//! Content negotiation picks JSON or text decoding, then the status band is
//! checked. The status check runs after the decode attempt and wins over any
//! decode failure, so a failing status always surfaces as `Network` even
//! when the body is garbage.

use crate::error::FetchError;
use crate::http::{HttpResponse, ResolvedResponse, ResponseBody, MIMETYPE_JSON};

const NO_CONTENT: u16 = 204;

/// `true` for statuses in `[200, 400)`. Redirects pass, 1xx fails.
pub fn is_success_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// `true` when the response declares a JSON content type.
pub fn declares_json(response: &HttpResponse) -> bool {
    response
        .content_type()
        .is_some_and(|value| value.to_ascii_lowercase().contains(MIMETYPE_JSON))
}

/// Classify and decode a raw response.
///
/// `None` stands for "no response at all" and yields a `Transport` error.
/// `force_json` decodes as JSON regardless of the declared content type.
pub fn resolve(response: Option<HttpResponse>, force_json: bool) -> Result<ResolvedResponse, FetchError> {
    let Some(response) = response else {
        return Err(FetchError::Transport {
            reason: "no response".to_string(),
        });
    };

    if response.status == NO_CONTENT {
        return Ok(ResolvedResponse {
            status: NO_CONTENT,
            body: ResponseBody::Empty,
            raw: response,
        });
    }

    let as_json = force_json || declares_json(&response);
    let status = response.status;

    match decode(&response, as_json) {
        Ok(body) => {
            check_status(status, &body)?;
            Ok(ResolvedResponse { status, body, raw: response })
        }
        Err(_) if !is_success_status(status) => Err(FetchError::Network {
            status,
            body: ResponseBody::Text(response.text_lossy()),
        }),
        Err(DecodeFailure::Json) => Err(FetchError::JsonParse {
            status,
            raw_body: Some(response.text_lossy()),
        }),
        Err(DecodeFailure::Text(err)) => Err(FetchError::Decode(err)),
    }
}

enum DecodeFailure {
    Json,
    Text(std::string::FromUtf8Error),
}

fn decode(response: &HttpResponse, as_json: bool) -> Result<ResponseBody, DecodeFailure> {
    if as_json {
        serde_json::from_slice(&response.body)
            .map(ResponseBody::Json)
            .map_err(|_| DecodeFailure::Json)
    } else {
        String::from_utf8(response.body.clone())
            .map(ResponseBody::Text)
            .map_err(DecodeFailure::Text)
    }
}

fn check_status(status: u16, body: &ResponseBody) -> Result<(), FetchError> {
    if is_success_status(status) {
        return Ok(());
    }
    Err(FetchError::Network {
        status,
        body: body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(
            status,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        )
    }

    fn text_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(
            status,
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            body,
        )
    }

    #[test]
    fn missing_response_is_transport_failure() {
        let err = resolve(None, false).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn success_band_resolves_json() {
        for status in [200, 201, 250, 301, 304, 399] {
            let resolved = resolve(Some(json_response(status, r#"{"id":1}"#)), false).unwrap();
            assert_eq!(resolved.status, status);
            assert_eq!(resolved.body, ResponseBody::Json(json!({"id": 1})));
        }
    }

    #[test]
    fn statuses_outside_band_are_network_errors() {
        for status in [100, 101, 199, 400, 404, 418, 500, 503] {
            let err = resolve(Some(json_response(status, r#"{"error":"x"}"#)), false).unwrap_err();
            match err {
                FetchError::Network { status: s, body } => {
                    assert_eq!(s, status);
                    assert_eq!(body, ResponseBody::Json(json!({"error": "x"})));
                }
                other => panic!("expected Network for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn no_content_ignores_body_and_content_type() {
        let resolved = resolve(Some(json_response(204, "{not json")), true).unwrap();
        assert_eq!(resolved.status, 204);
        assert!(resolved.body.is_empty());
    }

    #[test]
    fn malformed_json_on_success_is_parse_error() {
        let err = resolve(Some(json_response(200, "{not json")), false).unwrap_err();
        match err {
            FetchError::JsonParse { status, raw_body } => {
                assert_eq!(status, 200);
                assert_eq!(raw_body.as_deref(), Some("{not json"));
            }
            other => panic!("expected JsonParse, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_on_failing_status_is_network_error() {
        let err = resolve(Some(json_response(500, "<html>boom</html>")), false).unwrap_err();
        match err {
            FetchError::Network { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, ResponseBody::Text("<html>boom</html>".to_string()));
            }
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[test]
    fn text_body_is_returned_verbatim() {
        let resolved = resolve(Some(text_response(200, "hello")), false).unwrap();
        assert_eq!(resolved.body, ResponseBody::Text("hello".to_string()));
    }

    #[test]
    fn empty_text_body_resolves() {
        let resolved = resolve(Some(text_response(200, "")), false).unwrap();
        assert_eq!(resolved.body, ResponseBody::Text(String::new()));
    }

    #[test]
    fn force_json_overrides_content_type() {
        let resolved = resolve(Some(text_response(200, "[1,2]")), true).unwrap();
        assert_eq!(resolved.body, ResponseBody::Json(json!([1, 2])));

        let err = resolve(Some(text_response(200, "plain")), true).unwrap_err();
        assert!(matches!(err, FetchError::JsonParse { status: 200, .. }));
    }

    #[test]
    fn json_detection_matches_substring() {
        let response = HttpResponse::new(
            200,
            vec![("content-type".to_string(), "application/json; charset=utf-8".to_string())],
            "true",
        );
        assert!(declares_json(&response));
        let resolved = resolve(Some(response), false).unwrap();
        assert_eq!(resolved.body, ResponseBody::Json(json!(true)));
    }

    #[test]
    fn invalid_utf8_text_is_decode_error() {
        let response = HttpResponse::new(200, Vec::new(), vec![0xff, 0xfe]);
        let err = resolve(Some(response), false).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn invalid_utf8_on_failing_status_is_network_error() {
        let response = HttpResponse::new(502, Vec::new(), vec![0xff]);
        let err = resolve(Some(response), false).unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[test]
    fn raw_response_is_kept() {
        let response = json_response(201, r#"{"ok":true}"#);
        let resolved = resolve(Some(response.clone()), false).unwrap();
        assert_eq!(resolved.raw, response);
    }
}
