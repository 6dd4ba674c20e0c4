//! Client-side fetch helpers: request building, response resolution and a
//! logging network façade.
//!
//! # Overview
//! A `RequestFactory` turns `(url, body, headers, options)` into a request
//! descriptor, sends it through a `Transport` and resolves the response into
//! a decoded body or a typed `FetchError`. `Network` wraps factories with a
//! base URL, demo routing to a mock resolver, and request/response logging.
//!
//! # Design
//! - The builder and resolver are pure functions over plain data, so the
//!   status and content-type rules are testable without a network.
//! - `Transport` is the only I/O seam; `ReqwestTransport` is the default.
//! - Factories and façades hold immutable configuration only. Every call
//!   gets its own descriptor, timer and request id.

pub mod api_url;
pub mod builder;
pub mod config;
pub mod error;
pub mod facade;
pub mod factory;
pub mod http;
pub mod logging;
pub mod resolver;
pub mod token;
pub mod transport;

pub use api_url::ApiUrl;
pub use builder::{build, BuildOptions};
pub use config::NetworkConfig;
pub use error::{ConfigError, FetchError, TransportError};
pub use facade::{FacadeRequest, MockResolver, Network};
pub use factory::{CallOptions, FactoryOptions, RequestFactory, RequestHook, ResponseCallback};
pub use http::{
    Credentials, FormData, FormValue, Headers, HttpMethod, HttpRequest, HttpResponse, Payload, RequestBody,
    ResolvedResponse, ResponseBody, TransportOptions, UrlLike,
};
pub use logging::{Level, LogSink, NullSink, TracingSink};
pub use resolver::{is_success_status, resolve};
pub use token::{StateSource, StateToken, TokenProvider};
pub use transport::{ReqwestTransport, Transport};
