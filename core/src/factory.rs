//! Request factory: one callable per HTTP method.
//!
//! # Design
//! A `RequestFactory` composes the builder, a `Transport` and the resolver.
//! It holds only immutable configuration, so it is cheap to clone and safe to
//! share between tasks. Success and failure are told apart by the `Result`,
//! never by inspecting a status field on a successful value.

use std::fmt;
use std::sync::Arc;

use crate::builder::{self, BuildOptions};
use crate::error::FetchError;
use crate::http::{
    set_header, Headers, HttpMethod, HttpRequest, HttpResponse, RequestBody, ResolvedResponse, ResponseBody,
    UrlLike, AUTHORIZATION,
};
use crate::resolver;
use crate::token::TokenProvider;
use crate::transport::Transport;

/// Rewrites a built descriptor before it reaches the transport.
pub type RequestHook = Arc<dyn Fn(HttpRequest) -> HttpRequest + Send + Sync>;

/// Called by the façade after every call with the status (absent when no
/// response existed), the body and the raw response when one is available.
pub type ResponseCallback = Arc<dyn Fn(Option<u16>, &ResponseBody, Option<&HttpResponse>) + Send + Sync>;

/// Per-call options.
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Force JSON decoding of the response regardless of its content type.
    pub json: Option<bool>,
    /// Send the body as `multipart/form-data`.
    pub formdata: bool,
    /// Settlement callback, honoured by the network façade.
    pub on_response: Option<ResponseCallback>,
}

impl CallOptions {
    pub fn json() -> Self {
        Self {
            json: Some(true),
            ..Self::default()
        }
    }

    pub fn formdata() -> Self {
        Self {
            formdata: true,
            ..Self::default()
        }
    }

    pub fn on_response(
        mut self,
        callback: impl Fn(Option<u16>, &ResponseBody, Option<&HttpResponse>) + Send + Sync + 'static,
    ) -> Self {
        self.on_response = Some(Arc::new(callback));
        self
    }

    pub fn force_json(&self) -> bool {
        self.json.unwrap_or(false)
    }

    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            formdata: self.formdata,
        }
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("json", &self.json)
            .field("formdata", &self.formdata)
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

/// Hooks applied to every request a factory builds.
#[derive(Clone, Default)]
pub struct FactoryOptions {
    pub hook: Option<RequestHook>,
    pub token: Option<Arc<dyn TokenProvider>>,
}

impl FactoryOptions {
    pub fn hook(mut self, hook: impl Fn(HttpRequest) -> HttpRequest + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn token(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token = Some(Arc::new(provider));
        self
    }
}

/// Builds, sends and resolves requests for a single HTTP method.
#[derive(Clone)]
pub struct RequestFactory {
    method: HttpMethod,
    transport: Arc<dyn Transport>,
    options: FactoryOptions,
}

impl RequestFactory {
    pub fn new(method: HttpMethod, transport: Arc<dyn Transport>) -> Self {
        Self::with_options(method, transport, FactoryOptions::default())
    }

    pub fn with_options(method: HttpMethod, transport: Arc<dyn Transport>, options: FactoryOptions) -> Self {
        Self {
            method,
            transport,
            options,
        }
    }

    pub fn with_hook(mut self, hook: impl Fn(HttpRequest) -> HttpRequest + Send + Sync + 'static) -> Self {
        self.options = self.options.hook(hook);
        self
    }

    pub fn with_token(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.options = self.options.token(provider);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Build the final descriptor: builder, then token, then the caller hook.
    pub fn prepare(
        &self,
        url: &UrlLike,
        body: RequestBody,
        headers: Headers,
        options: &CallOptions,
    ) -> Result<HttpRequest, FetchError> {
        let mut request = builder::build(self.method, url, body, headers, &options.build_options())?;
        if let Some(token) = self.options.token.as_ref().and_then(|provider| provider.token()) {
            set_header(&mut request.headers, AUTHORIZATION, token);
        }
        Ok(match &self.options.hook {
            Some(hook) => hook(request),
            None => request,
        })
    }

    /// Send a prepared request and resolve the response. A response that
    /// resolves but is not `2xx` comes back as `FetchError::NotOk`.
    pub async fn dispatch(&self, request: HttpRequest, force_json: bool) -> Result<ResolvedResponse, FetchError> {
        let raw = self.transport.send(request).await?;
        let resolved = resolver::resolve(Some(raw), force_json)?;
        if !resolved.raw.is_ok() {
            let ResolvedResponse { status, body, raw } = resolved;
            return Err(FetchError::NotOk { status, body, raw });
        }
        Ok(resolved)
    }

    pub async fn call(
        &self,
        url: impl Into<UrlLike>,
        body: RequestBody,
        headers: Headers,
        options: CallOptions,
    ) -> Result<ResponseBody, FetchError> {
        let request = self.prepare(&url.into(), body, headers, &options)?;
        let resolved = self.dispatch(request, options.force_json()).await?;
        Ok(resolved.body)
    }

    /// `call` with no body, no extra headers and default options.
    pub async fn fetch(&self, url: impl Into<UrlLike>) -> Result<ResponseBody, FetchError> {
        self.call(url, RequestBody::None, Headers::new(), CallOptions::default())
            .await
    }
}

impl fmt::Debug for RequestFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFactory")
            .field("method", &self.method)
            .field("hook", &self.options.hook.is_some())
            .field("token", &self.options.token.is_some())
            .finish()
    }
}
