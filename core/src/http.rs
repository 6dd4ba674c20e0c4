//! Plain-data HTTP types shared by the builder, resolver and transports.
//!
//! # Design
//! Requests and responses are described as owned data. The builder produces
//! an `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and the
//! resolver classifies that response. None of these types touch the network
//! themselves, which keeps the builder and resolver deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const MIMETYPE_JSON: &str = "application/json";
pub const MIMETYPE_FORMDATA: &str = "multipart/form-data";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request header mapping. Lookups that matter for the content-type rules
/// go through the case-insensitive helpers below.
pub type Headers = BTreeMap<String, String>;

/// Remove every header named `name`, ignoring ASCII case.
pub fn remove_header(headers: &mut Headers, name: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
}

/// Replace every header named `name` (any casing) with a single entry.
pub fn set_header(headers: &mut Headers, name: &str, value: impl Into<String>) {
    remove_header(headers, name);
    headers.insert(name.to_string(), value.into());
}

pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// A request target: either a plain string or any value that renders to a
/// URL through `Display` (an `ApiUrl`, a `url::Url`, ...).
#[derive(Clone)]
pub enum UrlLike {
    Plain(String),
    Stringifiable(Arc<dyn fmt::Display + Send + Sync>),
}

impl UrlLike {
    pub fn resolve(&self) -> String {
        match self {
            UrlLike::Plain(url) => url.clone(),
            UrlLike::Stringifiable(url) => url.to_string(),
        }
    }
}

impl fmt::Debug for UrlLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlLike::Plain(url) => f.debug_tuple("Plain").field(url).finish(),
            UrlLike::Stringifiable(url) => f.debug_tuple("Stringifiable").field(&url.to_string()).finish(),
        }
    }
}

impl From<&str> for UrlLike {
    fn from(url: &str) -> Self {
        UrlLike::Plain(url.to_string())
    }
}

impl From<String> for UrlLike {
    fn from(url: String) -> Self {
        UrlLike::Plain(url)
    }
}

impl From<&String> for UrlLike {
    fn from(url: &String) -> Self {
        UrlLike::Plain(url.clone())
    }
}

impl From<url::Url> for UrlLike {
    fn from(url: url::Url) -> Self {
        UrlLike::Stringifiable(Arc::new(url))
    }
}

/// A single multipart field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Ordered multipart form fields. Duplicate names are allowed, as with a
/// browser `FormData`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: FormValue) {
        self.fields.push((name.into(), value));
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, FormValue::Text(value.into()));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.append(
            name,
            FormValue::File {
                file_name: file_name.into(),
                content_type,
                bytes,
            },
        );
        self
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Body as supplied by the caller, before building.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    Raw(String),
    Structured(Map<String, Value>),
    Form(FormData),
}

impl RequestBody {
    /// Wrap a JSON value. Objects become `Structured`, strings become `Raw`,
    /// `null` becomes `None`; any other value is sent as its JSON text.
    pub fn json(value: Value) -> Self {
        match value {
            Value::Null => RequestBody::None,
            Value::Object(map) => RequestBody::Structured(map),
            Value::String(text) => RequestBody::Raw(text),
            other => RequestBody::Raw(other.to_string()),
        }
    }

    /// Body rendered as a JSON value for log output.
    pub fn to_log_value(&self) -> Value {
        match self {
            RequestBody::None => Value::Null,
            RequestBody::Raw(text) => Value::String(text.clone()),
            RequestBody::Structured(map) => Value::Object(map.clone()),
            RequestBody::Form(form) => Value::String(format!("<form data: {} fields>", form.len())),
        }
    }
}

impl From<Map<String, Value>> for RequestBody {
    fn from(map: Map<String, Value>) -> Self {
        RequestBody::Structured(map)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Raw(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Raw(text.to_string())
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Form(form)
    }
}

/// Body of a built request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Form(FormData),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Form(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Payload::Text(_) => None,
            Payload::Form(form) => Some(form),
        }
    }
}

/// Credentials mode, mirroring the fetch `credentials` option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Never send `Authorization` or `Cookie` headers.
    Omit,
    #[default]
    SameOrigin,
    Include,
}

/// Extra options handed to the transport alongside the request. Mutation
/// hooks adjust these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    pub credentials: Credentials,
}

/// The normalized request descriptor.
///
/// Built by `builder::build`, optionally rewritten once by a request hook,
/// then consumed by a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Payload>,
    pub headers: Headers,
    pub options: TransportOptions,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// A raw HTTP response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Synthetic `application/json` response carrying `value`.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(
            status,
            vec![(CONTENT_TYPE.to_string(), MIMETYPE_JSON.to_string())],
            value.to_string(),
        )
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// The fetch `ok` flag: status in `[200, 300)`.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Only produced for `204 No Content`.
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Body rendered as a JSON value for log output.
    pub fn to_log_value(&self) -> Value {
        match self {
            ResponseBody::Empty => Value::Null,
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => Value::String(text.clone()),
        }
    }
}

/// A successfully resolved response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse {
    pub status: u16,
    pub body: ResponseBody,
    pub raw: HttpResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_header_replaces_any_casing() {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        headers.insert("CONTENT-TYPE".to_string(), "text/html".to_string());
        set_header(&mut headers, CONTENT_TYPE, MIMETYPE_JSON);
        assert_eq!(headers.len(), 1);
        assert_eq!(header_value(&headers, "content-type"), Some(MIMETYPE_JSON));
    }

    #[test]
    fn url_like_resolves_display_values() {
        let url = url::Url::parse("https://api.example.com/items?page=2").unwrap();
        assert_eq!(UrlLike::from(url).resolve(), "https://api.example.com/items?page=2");
        assert_eq!(UrlLike::from("https://x.test/a").resolve(), "https://x.test/a");
    }

    #[test]
    fn request_body_from_json_value() {
        assert_eq!(RequestBody::json(Value::Null), RequestBody::None);
        assert_eq!(RequestBody::json(json!("raw")), RequestBody::Raw("raw".to_string()));
        assert_eq!(RequestBody::json(json!([1, 2])), RequestBody::Raw("[1,2]".to_string()));
        assert!(matches!(RequestBody::json(json!({"a": 1})), RequestBody::Structured(_)));
    }

    #[test]
    fn response_ok_flag_covers_2xx_only() {
        assert!(HttpResponse::new(200, Vec::new(), "").is_ok());
        assert!(HttpResponse::new(299, Vec::new(), "").is_ok());
        assert!(!HttpResponse::new(302, Vec::new(), "").is_ok());
        assert!(!HttpResponse::new(199, Vec::new(), "").is_ok());
    }

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let response = HttpResponse::new(
            200,
            vec![("content-type".to_string(), "application/json; charset=utf-8".to_string())],
            "{}",
        );
        assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
    }
}
