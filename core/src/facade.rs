//! Network façade: base URL, demo routing and request logging.
//!
//! # Design
//! `Network` closes over an immutable `NetworkConfig` plus the collaborators
//! it needs (transport, log sink, optional mock resolver). Each call through a
//! `FacadeRequest` picks a route, then logs before dispatch and again after
//! settlement. Errors are logged and returned unchanged.
//!
//! Demo routing: when `enable_demo` is set and the target URL starts with
//! `demo_url`, the call never reaches the transport. The mock resolver is
//! asked for the endpoint's data, which is wrapped as a `200` JSON response
//! and resolved like any real response.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::api_url::ApiUrl;
use crate::error::{ConfigError, FetchError};
use crate::factory::{CallOptions, FactoryOptions, RequestFactory};
use crate::http::{Headers, HttpMethod, HttpResponse, RequestBody, ResolvedResponse, ResponseBody, UrlLike};
use crate::logging::{Level, LogSink, TracingSink};
use crate::resolver;
use crate::transport::{ReqwestTransport, Transport};
use crate::config::NetworkConfig;

/// Supplies demo data for an endpoint such as `/items`.
pub type MockResolver = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

const DEMO_STATUS: u16 = 200;

/// The configured entry point handing out per-method request callables.
#[derive(Clone)]
pub struct Network {
    config: Arc<NetworkConfig>,
    api: ApiUrl,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn LogSink>,
    resolver: Option<MockResolver>,
}

impl Network {
    /// The mock resolver is fixed here: every `FacadeRequest` handed out by
    /// this `Network` serves demo calls from it.
    pub fn new(
        config: NetworkConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn LogSink>,
        resolver: Option<MockResolver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let api = ApiUrl::new(config.host()?);
        if config.enable_logging && config.logging_host_info {
            sink.log(Level::Info, &format!("API: {}", config.host_url), None);
        }
        Ok(Self {
            config: Arc::new(config),
            api,
            transport,
            sink,
            resolver,
        })
    }

    /// Façade over `reqwest` that logs through `tracing`.
    pub fn from_config(config: NetworkConfig, resolver: Option<MockResolver>) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(ReqwestTransport::new()), Arc::new(TracingSink), resolver)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// URL builder bound to `host_url`.
    pub fn api(&self) -> ApiUrl {
        self.api.clone()
    }

    pub fn request_factory(&self, method: HttpMethod, options: FactoryOptions) -> FacadeRequest {
        FacadeRequest {
            network: self.clone(),
            factory: RequestFactory::with_options(method, Arc::clone(&self.transport), options),
        }
    }

    /// `true` when a call to `url` would be served by the mock resolver.
    pub fn is_demo_url(&self, url: &str) -> bool {
        self.config.enable_demo
            && self
                .config
                .demo_url
                .as_deref()
                .is_some_and(|demo| url.starts_with(demo))
    }

    /// `url` with the demo prefix (for demo calls) or host prefix removed.
    pub fn endpoint(&self, url: &str) -> String {
        let demo_prefix = self.config.demo_url.as_deref().filter(|_| self.is_demo_url(url));
        demo_prefix
            .and_then(|prefix| url.strip_prefix(prefix))
            .or_else(|| url.strip_prefix(self.config.host_url.as_str()))
            .unwrap_or(url)
            .to_string()
    }

    fn mock_response(&self, endpoint: &str) -> Result<ResolvedResponse, FetchError> {
        let data = self
            .resolver
            .as_ref()
            .and_then(|resolver| resolver(endpoint))
            .unwrap_or(Value::Null);
        resolver::resolve(Some(HttpResponse::json(DEMO_STATUS, &data)), false)
    }

    fn log(&self, level: Level, message: &str, details: &Value) {
        if self.config.enable_logging {
            self.sink.log(level, message, Some(details));
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("config", &self.config)
            .field("mock_resolver", &self.resolver.is_some())
            .finish()
    }
}

/// A request callable bound to one method, with demo routing and logging.
#[derive(Clone, Debug)]
pub struct FacadeRequest {
    network: Network,
    factory: RequestFactory,
}

impl FacadeRequest {
    pub fn method(&self) -> HttpMethod {
        self.factory.method()
    }

    pub async fn call(
        &self,
        url: impl Into<UrlLike>,
        body: RequestBody,
        headers: Headers,
        options: CallOptions,
    ) -> Result<ResponseBody, FetchError> {
        let network = &self.network;
        let config = network.config();
        let method = self.factory.method();
        let url = url.into().resolve();
        let demo = network.is_demo_url(&url);
        let endpoint = network.endpoint(&url);
        let request_id = Uuid::new_v4();
        let request_log = config.logging_request.then(|| body.to_log_value());

        let mut started = Map::new();
        started.insert("request_id".to_string(), json!(request_id));
        if let Some(request) = &request_log {
            started.insert("request".to_string(), request.clone());
        }
        network.log(Level::Info, &format!("--> {method} {endpoint}"), &Value::Object(started));

        let start = Instant::now();
        let outcome = if demo {
            network.mock_response(&endpoint)
        } else {
            match self.factory.prepare(&UrlLike::Plain(url), body, headers, &options) {
                Ok(request) => self.factory.dispatch(request, options.force_json()).await,
                Err(err) => Err(err),
            }
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let mut details = Map::new();
        details.insert("request_id".to_string(), json!(request_id));
        details.insert("method".to_string(), json!(method.as_str()));
        details.insert("endpoint".to_string(), json!(endpoint));
        details.insert("elapsed_ms".to_string(), json!(elapsed_ms));
        details.insert("demo".to_string(), json!(demo));
        if let Some(request) = request_log {
            details.insert("request".to_string(), request);
        }
        let marker = if demo { " [demo]" } else { "" };

        match &outcome {
            Ok(resolved) => {
                if config.logging_response {
                    details.insert("response".to_string(), resolved.body.to_log_value());
                }
                details.insert("status".to_string(), json!(resolved.status));
                network.log(
                    Level::Info,
                    &format!("<-- [{}] {method} {endpoint} ({elapsed_ms}ms){marker}", resolved.status),
                    &Value::Object(details),
                );
                if let Some(callback) = &options.on_response {
                    callback(Some(resolved.status), &resolved.body, Some(&resolved.raw));
                }
            }
            Err(err) => {
                let status = err.status().map_or_else(|| "!!!".to_string(), |s| s.to_string());
                if config.logging_response {
                    let response = err.body().map_or(Value::Null, ResponseBody::to_log_value);
                    details.insert("response".to_string(), response);
                }
                details.insert("status".to_string(), json!(err.status()));
                details.insert("error".to_string(), json!(err.to_string()));
                network.log(
                    Level::Error,
                    &format!("<-- [{status}] {method} {endpoint} ({elapsed_ms}ms){marker}"),
                    &Value::Object(details),
                );
                if let Some(callback) = &options.on_response {
                    callback(err.status(), err.body().unwrap_or(&ResponseBody::Empty), err.raw());
                }
            }
        }

        outcome.map(|resolved| resolved.body)
    }

    pub async fn fetch(&self, url: impl Into<UrlLike>) -> Result<ResponseBody, FetchError> {
        self.call(url, RequestBody::None, Headers::new(), CallOptions::default())
            .await
    }
}
