//! Transport invoker: the seam between descriptor and network.
//!
//! `Transport` is the only piece that performs I/O. `ReqwestTransport` is the
//! default; tests plug in in-memory or blocking implementations.

use async_trait::async_trait;
use reqwest::multipart;

use crate::error::TransportError;
use crate::http::{
    remove_header, Credentials, FormData, FormValue, HttpMethod, HttpRequest, HttpResponse, Payload,
    AUTHORIZATION, CONTENT_TYPE,
};

/// Executes a built request and returns the raw response.
///
/// Implementations must return `Ok` for any HTTP status; `Err` is reserved
/// for the case where no response exists.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            body,
            headers,
            options,
        } = apply_credentials(request);

        let mut builder = self.client.request(to_reqwest_method(method), &url);
        let is_form = matches!(body, Some(Payload::Form(_)));
        for (name, value) in &headers {
            // reqwest writes the multipart content type with its boundary.
            if is_form && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Some(Payload::Text(text)) => builder.body(text),
            Some(Payload::Form(form)) => builder.multipart(to_multipart(form)?),
            None => builder,
        };
        tracing::debug!(method = %method, url = %url, credentials = ?options.credentials, "sending request");

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, headers, body })
    }
}

/// Strip credential-bearing headers when the request opts out of them.
pub fn apply_credentials(mut request: HttpRequest) -> HttpRequest {
    if request.options.credentials == Credentials::Omit {
        remove_header(&mut request.headers, AUTHORIZATION);
        remove_header(&mut request.headers, "Cookie");
    }
    request
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
    }
}

fn to_multipart(form: FormData) -> Result<multipart::Form, TransportError> {
    let mut out = multipart::Form::new();
    for (name, value) in form.fields() {
        out = match value {
            FormValue::Text(text) => out.text(name.clone(), text.clone()),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut part = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = content_type {
                    part = part
                        .mime_str(mime)
                        .map_err(|e| TransportError(format!("invalid MIME type '{mime}': {e}")))?;
                }
                out.part(name.clone(), part)
            }
        };
    }
    Ok(out)
}
