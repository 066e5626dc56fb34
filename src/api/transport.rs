//! HTTP 传输层
//!
//! 将"构造请求 -> 发送 -> 拿到状态码与响应体"抽象为 `HttpTransport`，
//! 生产环境由 `FetchTransport`（gloo-net + 超时竞争）实现，
//! 测试中用内存 Mock 替换。

use async_trait::async_trait;
use std::fmt;

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 已经过拦截器处理、可直接发送的请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// 按名称查找请求头（大小写敏感，约定统一写法）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// 传输层响应：状态码 + 原始响应体
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// 传输层错误
#[derive(Debug, Clone)]
pub enum TransportError {
    /// 请求构建失败
    BuildFailed(String),
    /// 网络请求失败（无响应）
    Network(String),
    /// 超过配置的超时时间
    Timeout(u32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::BuildFailed(msg) => write!(f, "request build failed: {}", msg),
            TransportError::Network(msg) => write!(f, "network error: {}", msg),
            TransportError::Timeout(ms) => write!(f, "request timed out after {}ms", ms),
        }
    }
}

impl std::error::Error for TransportError {}

/// 传输层适配器接口
///
/// 实现者需 Send + Sync 以便放进响应式上下文；返回的 Future 始终
/// 在单线程事件循环上运行，无需 Send。
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// FetchTransport - 基于 gloo-net 的生产实现
// =========================================================

/// 基于浏览器 fetch 的传输实现
///
/// 每次发送与 `TimeoutFuture` 竞争，超时视为传输失败。
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        use futures::future::{Either, select};
        use gloo_net::http::{Method, RequestBuilder};
        use gloo_timers::future::TimeoutFuture;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let prepared = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError::BuildFailed(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| TransportError::BuildFailed(e.to_string()))?,
        };

        let send = prepared.send();
        let timeout = TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(send);
        futures::pin_mut!(timeout);

        match select(send, timeout).await {
            Either::Left((result, _)) => {
                let response = result.map_err(|e| TransportError::Network(e.to_string()))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| TransportError::Network(e.to_string()))?;
                Ok(HttpResponse { status, body })
            }
            Either::Right(_) => Err(TransportError::Timeout(self.timeout_ms)),
        }
    }
}

/// 毫秒时间戳，GET 请求的防缓存参数使用
pub(crate) fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
