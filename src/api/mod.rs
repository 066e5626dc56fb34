//! API 客户端
//!
//! 对 HTTP 传输层的业务封装：基础地址与默认请求头、请求拦截
//! （令牌注入、请求 ID、GET 防缓存时间戳）、响应拦截（信封解包、
//! 状态码决策表）。每个失败恰好发出一次用户通知；401 额外触发
//! 一次会话失效钩子。

mod error;
mod session;
mod transport;

pub mod account;
pub mod identity;
pub mod policy;

pub use error::{ApiError, ApiResult};
pub use session::{BrowserSession, SessionHooks};
pub use transport::{
    FetchTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError,
};

use leptos::logging::log;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::form_urlencoded;
use uuid::Uuid;

use crate::notify::NotifyLevel;
use idhub_shared::{
    Envelope, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, HEADER_REQUEST_ID,
    HEADER_REQUESTED_WITH,
};

/// 后端基础地址，部署时由反向代理转发
pub const DEFAULT_BASE_URL: &str = "/api";
/// 请求超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// 防缓存时间戳参数名
const CACHE_BUST_PARAM: &str = "_t";

/// 各业务域 API 的汇总，经 Context 提供给页面组件
#[derive(Clone)]
pub struct Apis {
    pub client: Arc<ApiClient>,
    pub identity: identity::IdentityApi,
    pub account: account::AccountApi,
    pub policy: policy::PolicyApi,
}

impl Apis {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            identity: identity::IdentityApi::new(client.clone()),
            account: account::AccountApi::new(client.clone()),
            policy: policy::PolicyApi::new(client.clone()),
            client,
        }
    }
}

pub fn use_api() -> Apis {
    leptos::prelude::use_context::<Apis>().expect("Apis should be provided")
}

pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionHooks>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        session: Arc<dyn SessionHooks>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    // =========================================================
    // 便捷方法 (HTTP verbs)
    // =========================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(HttpMethod::Get, path, &[], Option::<&()>::None)
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.request(HttpMethod::Get, path, query, Option::<&()>::None)
            .await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(HttpMethod::Post, path, &[], Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(HttpMethod::Post, path, &[], Option::<&()>::None)
            .await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(HttpMethod::Put, path, &[], Some(body)).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(HttpMethod::Put, path, &[], Option::<&()>::None)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(HttpMethod::Delete, path, &[], Option::<&()>::None)
            .await
    }

    // =========================================================
    // 请求管线
    // =========================================================

    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<T> {
        let result = self.dispatch(method, path, query, body).await;

        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.session.session_expired();
            }
            self.session.notify(NotifyLevel::Error, &err.user_message());
        }
        result
    }

    async fn dispatch<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = self.url(method, path, query);
        let body = match body {
            Some(body) => Some(
                serde_json::to_string(body).map_err(|e| ApiError::RequestBuild(e.to_string()))?,
            ),
            None => None,
        };

        let mut headers = vec![
            (
                HEADER_CONTENT_TYPE.to_string(),
                "application/json".to_string(),
            ),
            (
                HEADER_REQUESTED_WITH.to_string(),
                "XMLHttpRequest".to_string(),
            ),
            (HEADER_REQUEST_ID.to_string(), Uuid::new_v4().to_string()),
        ];
        if let Some(token) = self.session.access_token() {
            headers.push((HEADER_AUTHORIZATION.to_string(), format!("Bearer {}", token)));
        }

        log!("[api] {} {}", method.as_str(), url);

        let response = self
            .transport
            .execute(HttpRequest {
                url,
                method,
                headers,
                body,
            })
            .await?;

        self.complete(response)
    }

    /// 拼接基础地址、查询参数与 GET 防缓存时间戳
    fn url(&self, method: HttpMethod, path: &str, query: &[(&str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            serializer.append_pair(key, value);
        }
        if method == HttpMethod::Get {
            serializer.append_pair(CACHE_BUST_PARAM, &transport::now_ms().to_string());
        }
        let qs = serializer.finish();
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    /// 响应拦截：2xx 走信封解包，其余走状态码决策表
    fn complete<T: DeserializeOwned>(&self, response: HttpResponse) -> ApiResult<T> {
        if (200..300).contains(&response.status) {
            return unwrap_envelope(&response.body);
        }

        let status = response.status;
        let message = match status {
            // 固定文案由 user_message 给出，这里保留原始说明供日志排查
            401 | 403 | 404 | 429 | 500 => {
                body_message(&response.body).unwrap_or_else(|| format!("http {}", status))
            }
            _ => body_message(&response.body)
                .unwrap_or_else(|| format!("Request failed ({})", status)),
        };
        Err(ApiError::Http { status, message })
    }
}

/// 信封解包
///
/// 带数字 `code` 字段的对象按信封处理：成功取 `data`（缺省按 JSON
/// null 反序列化，`()`/`Option` 载荷因此可用），失败携带 `message`
/// 拒绝。其余响应整体按目标类型解析。
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?
    };

    let is_envelope = value.get("code").is_some_and(Value::is_number);
    if !is_envelope {
        return serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()));
    }

    let envelope: Envelope<Value> =
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
    if envelope.is_success() {
        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    } else {
        let message = envelope
            .message
            .unwrap_or_else(|| "Request failed".to_string());
        Err(ApiError::Business {
            code: envelope.code,
            message,
        })
    }
}

/// 从响应体中提取信封 message（若有）
fn body_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use idhub_shared::User;

    // =========================================================
    // Mock adapters
    // =========================================================

    struct MockTransport {
        requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
            }
        }

        fn respond(status: u16, body: &str) -> Self {
            let transport = Self::new();
            transport.push_response(status, body);
            transport
        }

        fn push_response(&self, status: u16, body: &str) {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
        }

        fn push_failure(&self, err: TransportError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        fn request(&self, index: usize) -> HttpRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for MockTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(HttpResponse {
                        status: 200,
                        body: r#"{"code":200}"#.to_string(),
                    })
                })
        }
    }

    struct MockSession {
        token: Option<String>,
        notifications: Mutex<Vec<(NotifyLevel, String)>>,
        expirations: Mutex<u32>,
    }

    impl MockSession {
        fn anonymous() -> Self {
            Self {
                token: None,
                notifications: Mutex::new(Vec::new()),
                expirations: Mutex::new(0),
            }
        }

        fn with_token(token: &str) -> Self {
            Self {
                token: Some(token.to_string()),
                ..Self::anonymous()
            }
        }

        fn notification_count(&self) -> usize {
            self.notifications.lock().unwrap().len()
        }

        fn last_notification(&self) -> Option<(NotifyLevel, String)> {
            self.notifications.lock().unwrap().last().cloned()
        }
    }

    impl SessionHooks for MockSession {
        fn access_token(&self) -> Option<String> {
            self.token.clone()
        }

        fn notify(&self, level: NotifyLevel, message: &str) {
            self.notifications
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }

        fn session_expired(&self) {
            *self.expirations.lock().unwrap() += 1;
        }
    }

    fn client(
        transport: MockTransport,
        session: MockSession,
    ) -> (ApiClient, Arc<MockTransport>, Arc<MockSession>) {
        let transport = Arc::new(transport);
        let session = Arc::new(session);
        let client = ApiClient::new(DEFAULT_BASE_URL, transport.clone(), session.clone());
        (client, transport, session)
    }

    fn sample_user_json() -> &'static str {
        r#"{
            "id": "u-1",
            "username": "alice",
            "email": "alice@example.com",
            "roles": ["admin"],
            "permissions": [],
            "isActive": true,
            "createdAt": "2026-01-01T00:00:00Z"
        }"#
    }

    // =========================================================
    // 请求拦截
    // =========================================================

    #[tokio::test]
    async fn base_url_and_default_headers_apply_to_every_request() {
        let (client, transport, _) = client(MockTransport::new(), MockSession::anonymous());

        let _: () = client.post_empty("/auth/logout").await.unwrap();

        let request = transport.request(0);
        assert_eq!(request.url, "/api/auth/logout");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("X-Requested-With"), Some("XMLHttpRequest"));
        assert!(request.header("X-Request-ID").is_some());
    }

    #[tokio::test]
    async fn paths_without_leading_slash_are_joined() {
        let (client, transport, _) = client(MockTransport::new(), MockSession::anonymous());

        let _: () = client.post_empty("auth/logout").await.unwrap();

        assert_eq!(transport.request(0).url, "/api/auth/logout");
    }

    #[tokio::test]
    async fn missing_token_means_no_authorization_header() {
        let (client, transport, _) = client(MockTransport::new(), MockSession::anonymous());

        let _: () = client.post_empty("/auth/login").await.unwrap();

        assert_eq!(transport.request(0).header("Authorization"), None);
    }

    #[tokio::test]
    async fn stored_token_is_attached_as_bearer() {
        let (client, transport, _) =
            client(MockTransport::new(), MockSession::with_token("tok-123"));

        let _: () = client.post_empty("/identity").await.unwrap();

        assert_eq!(
            transport.request(0).header("Authorization"),
            Some("Bearer tok-123")
        );
    }

    #[tokio::test]
    async fn request_ids_are_fresh_per_request() {
        let (client, transport, _) = client(MockTransport::new(), MockSession::anonymous());

        let _: () = client.post_empty("/a").await.unwrap();
        let _: () = client.post_empty("/b").await.unwrap();

        let first = transport.request(0).header("X-Request-ID").unwrap().to_string();
        let second = transport.request(1).header("X-Request-ID").unwrap().to_string();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn get_requests_carry_a_cache_bust_timestamp() {
        let transport = MockTransport::new();
        transport.push_response(200, r#"{"code":200,"data":[]}"#);
        let (client, transport, _) = client(transport, MockSession::anonymous());

        let _: Vec<User> = client.get("/account/linked").await.unwrap();
        let _: () = client.post_empty("/account/batch-sync").await.unwrap();

        assert!(transport.request(0).url.contains("_t="));
        assert!(!transport.request(1).url.contains("_t="));
    }

    #[tokio::test]
    async fn query_parameters_are_encoded_before_the_timestamp() {
        let (client, transport, _) = client(
            MockTransport::respond(200, r#"{"code":200,"data":null}"#),
            MockSession::anonymous(),
        );

        let _: Option<String> = client
            .get_with(
                "/account/auth-url",
                &[("redirectUri", "https://app/cb?x=1".to_string())],
            )
            .await
            .unwrap();

        let url = transport.request(0).url;
        assert!(url.starts_with("/api/account/auth-url?redirectUri=https"));
        assert!(url.contains("redirectUri=https%3A%2F%2Fapp%2Fcb%3Fx%3D1"));
        assert!(url.contains("&_t="));
    }

    // =========================================================
    // 响应拦截：信封
    // =========================================================

    #[tokio::test]
    async fn success_envelope_resolves_to_data() {
        let body = format!(r#"{{"code":200,"data":{}}}"#, sample_user_json());
        let (client, _, session) =
            client(MockTransport::respond(200, &body), MockSession::anonymous());

        let user: User = client.get("/auth/me").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(session.notification_count(), 0);
    }

    #[tokio::test]
    async fn success_envelope_without_data_yields_unit() {
        let (client, _, _) = client(
            MockTransport::respond(200, r#"{"code":200,"message":"ok"}"#),
            MockSession::anonymous(),
        );

        let result: ApiResult<()> = client.post_empty("/account/verify").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn plain_body_without_code_parses_as_whole_value() {
        let (client, _, _) = client(
            MockTransport::respond(200, sample_user_json()),
            MockSession::anonymous(),
        );

        let user: User = client.get("/auth/me").await.unwrap();
        assert_eq!(user.id, "u-1");
    }

    #[tokio::test]
    async fn business_error_rejects_with_envelope_message() {
        let (client, _, session) = client(
            MockTransport::respond(200, r#"{"code":4001,"message":"identity is frozen"}"#),
            MockSession::anonymous(),
        );

        let result: ApiResult<User> = client.get("/auth/me").await;

        match result {
            Err(ApiError::Business { code, message }) => {
                assert_eq!(code, 4001);
                assert_eq!(message, "identity is frozen");
            }
            other => panic!("expected business error, got {:?}", other.err()),
        }
        assert_eq!(session.notification_count(), 1);
        assert_eq!(
            session.last_notification(),
            Some((NotifyLevel::Error, "identity is frozen".to_string()))
        );
    }

    #[tokio::test]
    async fn business_error_without_message_uses_fallback() {
        let (client, _, session) = client(
            MockTransport::respond(200, r#"{"code":4000}"#),
            MockSession::anonymous(),
        );

        let result: ApiResult<()> = client.post_empty("/policy").await;
        assert!(matches!(result, Err(ApiError::Business { .. })));
        assert_eq!(
            session.last_notification(),
            Some((NotifyLevel::Error, "Request failed".to_string()))
        );
    }

    // =========================================================
    // 响应拦截：状态码决策表
    // =========================================================

    #[tokio::test]
    async fn unauthorized_expires_session_exactly_once() {
        let (client, _, session) = client(
            MockTransport::respond(401, r#"{"message":"token expired"}"#),
            MockSession::with_token("stale"),
        );

        let result: ApiResult<User> = client.get("/auth/me").await;

        assert!(matches!(result, Err(ApiError::Http { status: 401, .. })));
        assert_eq!(*session.expirations.lock().unwrap(), 1);
        assert_eq!(session.notification_count(), 1);
        assert_eq!(
            session.last_notification(),
            Some((
                NotifyLevel::Error,
                "Session expired, please sign in again".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn known_statuses_use_fixed_messages() {
        let cases = [
            (403, "You do not have permission to access this resource"),
            (404, "The requested resource does not exist"),
            (429, "Too many requests, please try again later"),
            (500, "Internal server error"),
        ];

        for (status, expected) in cases {
            let (client, _, session) = client(
                MockTransport::respond(status, ""),
                MockSession::anonymous(),
            );

            let result: ApiResult<()> = client.post_empty("/policy").await;
            assert!(matches!(result, Err(ApiError::Http { .. })));
            assert_eq!(*session.expirations.lock().unwrap(), 0);
            assert_eq!(
                session.last_notification(),
                Some((NotifyLevel::Error, expected.to_string()))
            );
        }
    }

    #[tokio::test]
    async fn unknown_status_prefers_body_message() {
        let (client, _, session) = client(
            MockTransport::respond(418, r#"{"message":"teapot refuses"}"#),
            MockSession::anonymous(),
        );

        let result: ApiResult<()> = client.post_empty("/policy").await;
        assert!(matches!(result, Err(ApiError::Http { status: 418, .. })));
        assert_eq!(
            session.last_notification(),
            Some((NotifyLevel::Error, "teapot refuses".to_string()))
        );
    }

    #[tokio::test]
    async fn unknown_status_without_message_uses_template() {
        let (client, _, session) = client(
            MockTransport::respond(418, ""),
            MockSession::anonymous(),
        );

        let result: ApiResult<()> = client.post_empty("/policy").await;
        assert!(result.is_err());
        assert_eq!(
            session.last_notification(),
            Some((NotifyLevel::Error, "Request failed (418)".to_string()))
        );
    }

    // =========================================================
    // 传输错误
    // =========================================================

    #[tokio::test]
    async fn network_failure_surfaces_network_message() {
        let transport = MockTransport::new();
        transport.push_failure(TransportError::Network("connection refused".to_string()));
        let (client, _, session) = client(transport, MockSession::anonymous());

        let result: ApiResult<User> = client.get("/auth/me").await;

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(session.notification_count(), 1);
        assert_eq!(
            session.last_notification(),
            Some((
                NotifyLevel::Error,
                "Network connection failed, please check your network".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn timeout_is_reported_as_network_failure() {
        let transport = MockTransport::new();
        transport.push_failure(TransportError::Timeout(10_000));
        let (client, _, session) = client(transport, MockSession::anonymous());

        let result: ApiResult<User> = client.get("/auth/me").await;

        assert!(matches!(result, Err(ApiError::Timeout(_))));
        assert_eq!(
            session.last_notification(),
            Some((
                NotifyLevel::Error,
                "Network connection failed, please check your network".to_string()
            ))
        );
    }
}
