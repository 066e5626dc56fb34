//! API 错误类型
//!
//! 按来源分为三类：业务错误（信封 code != 200）、HTTP 错误（状态码
//! 分支）、传输错误（无响应/构建失败）。`user_message` 给出对应的
//! 用户提示文案，通知由请求管线统一发出一次。

use std::fmt;

use super::transport::TransportError;

#[derive(Debug, Clone)]
pub enum ApiError {
    /// 信封 code != 200，message 为后端给出的业务说明
    Business { code: i64, message: String },
    /// 非 2xx 状态码，message 为响应体中的说明或兜底模板
    Http { status: u16, message: String },
    /// 网络失败，无响应
    Network(String),
    /// 超时，按网络失败对待
    Timeout(u32),
    /// 请求构建/序列化失败
    RequestBuild(String),
    /// 响应体解析失败
    Decode(String),
}

impl ApiError {
    /// 面向用户的通知文案（固定决策表）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Business { message, .. } => message.clone(),
            ApiError::Http { status, message } => match status {
                401 => "Session expired, please sign in again".to_string(),
                403 => "You do not have permission to access this resource".to_string(),
                404 => "The requested resource does not exist".to_string(),
                429 => "Too many requests, please try again later".to_string(),
                500 => "Internal server error".to_string(),
                _ => message.clone(),
            },
            ApiError::Network(_) | ApiError::Timeout(_) => {
                "Network connection failed, please check your network".to_string()
            }
            ApiError::RequestBuild(_) => "Request configuration error".to_string(),
            ApiError::Decode(_) => "Failed to parse server response".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Business { code, message } => {
                write!(f, "business error {}: {}", code, message)
            }
            ApiError::Http { status, message } => write!(f, "http {}: {}", status, message),
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Timeout(ms) => write!(f, "timed out after {}ms", ms),
            ApiError::RequestBuild(msg) => write!(f, "request build error: {}", msg),
            ApiError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::BuildFailed(msg) => ApiError::RequestBuild(msg),
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Timeout(ms) => ApiError::Timeout(ms),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages_for_known_statuses() {
        let cases = [
            (403, "You do not have permission to access this resource"),
            (404, "The requested resource does not exist"),
            (429, "Too many requests, please try again later"),
            (500, "Internal server error"),
        ];
        for (status, expected) in cases {
            let err = ApiError::Http {
                status,
                message: "ignored".to_string(),
            };
            assert_eq!(err.user_message(), expected);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_carried_message() {
        let err = ApiError::Http {
            status: 418,
            message: "Request failed (418)".to_string(),
        };
        assert_eq!(err.user_message(), "Request failed (418)");
    }

    #[test]
    fn transport_failures_map_to_network_message() {
        let network: ApiError = TransportError::Network("dns".to_string()).into();
        let timeout: ApiError = TransportError::Timeout(10_000).into();
        let expected = "Network connection failed, please check your network";
        assert_eq!(network.user_message(), expected);
        assert_eq!(timeout.user_message(), expected);
    }
}
