//! 核心身份域模型 (Core Identity)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityStatus {
    Active,
    Frozen,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreIdentity {
    pub identity_id: String,
    pub public_key: String,
    pub encrypted_private_key: String,
    pub status: IdentityStatus,
    pub security_level: i32,
    pub biometric_template_hash: String,
    pub device_fingerprint: String,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CoreIdentity {
    pub fn is_frozen(&self) -> bool {
        self.status == IdentityStatus::Frozen
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdentityRequest {
    pub biometric_template_hash: String,
    pub device_fingerprint: String,
    pub recovery_contacts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdentityResponse {
    pub identity_id: String,
    pub public_key: String,
    /// 恢复密钥分片，仅在创建时返回一次
    pub recovery_key_fragments: Vec<String>,
    pub is_setup_complete: bool,
    pub created_at: DateTime<Utc>,
    pub security_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceFingerprintRequest {
    pub new_device_fingerprint: String,
}

/// 冻结/恢复等操作的通用请求体 `{reason}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityLevelValidation {
    pub is_valid: bool,
    pub current_level: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&IdentityStatus::Frozen).unwrap(),
            "\"FROZEN\""
        );
        let parsed: IdentityStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(parsed, IdentityStatus::Active);
    }

    #[test]
    fn reason_request_omits_empty_reason() {
        let body = serde_json::to_string(&ReasonRequest::default()).unwrap();
        assert_eq!(body, "{}");
    }
}
