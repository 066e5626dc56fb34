//! 关联账户域模型 (Linked Accounts)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Pending,
    Syncing,
    Synced,
    Failed,
}

/// 与核心身份关联的第三方平台账户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub account_id: String,
    pub core_identity_id: String,
    pub platform: String,
    pub platform_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub last_sync_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccountRequest {
    pub platform: String,
    pub authorization_code: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccount {
    pub platform: String,
    pub account_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountVerificationRequest {
    pub account_id: String,
    pub verification_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAccountRequest {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_sync: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatistics {
    pub total_linked: u32,
    pub verified: u32,
    pub active: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_request_omits_force_flag_when_unset() {
        let req = SyncAccountRequest {
            account_id: "acc-1".into(),
            force_sync: None,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"accountId":"acc-1"}"#
        );
    }

    #[test]
    fn linked_account_round_trips_sync_status() {
        let json = r#"{
            "accountId": "acc-1",
            "coreIdentityId": "id-1",
            "platform": "github",
            "platformAccountId": "99",
            "isVerified": true,
            "isActive": true,
            "lastSyncAt": "2026-02-01T08:00:00Z",
            "createdAt": "2026-01-01T00:00:00Z",
            "syncStatus": "SYNCED"
        }"#;
        let account: LinkedAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.sync_status, SyncStatus::Synced);
        assert!(account.sync_error.is_none());
    }
}
