//! Request descriptor assembly.
//!
//! Turns caller-supplied parts into a normalized `HttpRequest`: the URL is
//! stringified, structured bodies are serialized or spread into a multipart
//! form, and exactly one `Content-Type` decision is applied.

use serde_json::Value;

use crate::error::FetchError;
use crate::http::{
    remove_header, set_header, FormData, FormValue, Headers, HttpMethod, HttpRequest, Payload, RequestBody,
    TransportOptions, UrlLike, CONTENT_TYPE, MIMETYPE_FORMDATA, MIMETYPE_JSON,
};

/// Per-call flags that influence how the descriptor is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Send the body as a multipart form instead of JSON.
    pub formdata: bool,
}

/// Build a request descriptor for `method`.
///
/// Caller headers are merged in first; the `Content-Type` rule then
/// overwrites any header of the same name. A form payload is always labelled
/// multipart, whether it came from `formdata` spreading or was passed as a form.
pub fn build(
    method: HttpMethod,
    url: &UrlLike,
    body: RequestBody,
    headers: Headers,
    options: &BuildOptions,
) -> Result<HttpRequest, FetchError> {
    let url = url.resolve();
    let body = if options.formdata {
        Some(Payload::Form(into_form(body)))
    } else {
        serialize_body(body)?
    };

    let is_form = matches!(body, Some(Payload::Form(_)));
    let mut headers = headers;
    if method == HttpMethod::Get {
        remove_header(&mut headers, CONTENT_TYPE);
    } else if is_form {
        set_header(&mut headers, CONTENT_TYPE, MIMETYPE_FORMDATA);
    } else {
        set_header(&mut headers, CONTENT_TYPE, MIMETYPE_JSON);
    }

    Ok(HttpRequest {
        method,
        url,
        body,
        headers,
        options: TransportOptions::default(),
    })
}

fn serialize_body(body: RequestBody) -> Result<Option<Payload>, FetchError> {
    Ok(match body {
        RequestBody::None => None,
        RequestBody::Raw(text) => Some(Payload::Text(text)),
        RequestBody::Structured(map) => Some(Payload::Text(serde_json::to_string(&map)?)),
        RequestBody::Form(form) => Some(Payload::Form(form)),
    })
}

/// Spread a body into form fields. Only structured bodies contribute fields;
/// a raw string yields an empty form.
fn into_form(body: RequestBody) -> FormData {
    match body {
        RequestBody::Form(form) => form,
        RequestBody::Structured(map) => {
            let mut form = FormData::new();
            for (key, value) in map {
                form.append(key, FormValue::Text(form_text(value)));
            }
            form
        }
        RequestBody::None | RequestBody::Raw(_) => FormData::new(),
    }
}

fn form_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
