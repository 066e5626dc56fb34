//! IdHub 共享协议模型
//!
//! 前端与后端之间的数据契约：响应信封、认证模型与各业务域的
//! 请求/响应结构。所有字段按后端的 camelCase 约定序列化。

pub mod account;
pub mod identity;
pub mod policy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 业务信封中的成功码
pub const SUCCESS_CODE: i64 = 200;

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_REQUEST_ID: &str = "X-Request-ID";
pub const HEADER_REQUESTED_WITH: &str = "X-Requested-With";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 后端统一响应格式 `{code, data, message}`
///
/// `code == SUCCESS_CODE` 时 `data` 为载荷；否则 `message` 携带
/// 面向用户的错误说明。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

// =========================================================
// 认证模型 (Auth Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn can(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// 优先显示昵称，缺省回退到用户名
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// 有效期（秒）
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// 登录/注册的成功载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_without_data_or_message() {
        let env: Envelope<String> = serde_json::from_str(r#"{"code":200}"#).unwrap();
        assert!(env.is_success());
        assert!(env.data.is_none());
        assert!(env.message.is_none());
    }

    #[test]
    fn envelope_business_error_carries_message() {
        let env: Envelope<String> =
            serde_json::from_str(r#"{"code":4001,"message":"invalid credentials"}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("invalid credentials"));
    }

    #[test]
    fn user_roles_and_permissions() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "u-1",
                "username": "alice",
                "email": "alice@example.com",
                "roles": ["admin"],
                "permissions": ["policy:write"],
                "isActive": true,
                "createdAt": "2026-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert!(user.has_role("admin"));
        assert!(!user.has_role("auditor"));
        assert!(user.can("policy:write"));
        assert!(!user.can("policy:delete"));
        assert_eq!(user.display_label(), "alice");
    }

    #[test]
    fn tokens_use_camel_case_on_the_wire() {
        let tokens = AuthTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 3600,
        };
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["expiresIn"], 3600);
    }
}
