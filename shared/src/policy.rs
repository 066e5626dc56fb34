//! 共享策略域模型 (Share Policies)
//!
//! 策略描述：哪些身份属性、以何种访问级别、在什么约束下
//! 暴露给请求方。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Expired,
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "READ",
            AccessLevel::Write => "WRITE",
            AccessLevel::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareConfig {
    pub shared_attributes: Vec<String>,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub allowed_operations: Vec<String>,
    /// 数据保留期（秒）
    pub data_retention_period: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionCycle {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRestriction {
    #[serde(rename = "type")]
    pub cycle: RestrictionCycle,
    pub allowed_times: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRestriction {
    pub device_types: Vec<DeviceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_devices: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_restrictions: Option<Vec<TimeRestriction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_restrictions: Option<Vec<DeviceRestriction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_requests: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePolicy {
    pub policy_id: String,
    pub core_identity_id: String,
    pub requester_identifier: String,
    pub share_config: ShareConfig,
    /// 授权时长（秒）
    pub duration: i64,
    #[serde(default)]
    pub constraints: ShareConstraints,
    pub status: PolicyStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SharePolicy {
    /// 策略是否已失效（状态或时间任一条件满足）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == PolicyStatus::Expired || self.expires_at <= now
    }

    pub fn is_revocable(&self) -> bool {
        self.status == PolicyStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSharePolicyRequest {
    pub requester_identifier: String,
    pub shared_attributes: Vec<String>,
    pub access_level: AccessLevel,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ShareConstraints>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSharePolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ShareConstraints>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePolicyValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub estimated_risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUsage {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_request_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessResult {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    pub timestamp: DateTime<Utc>,
    pub requester: String,
    pub operation: String,
    pub result: AccessResult,
    pub ip_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogPage {
    pub items: Vec<AccessLogEntry>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_policy(status: PolicyStatus, expires_at: DateTime<Utc>) -> SharePolicy {
        SharePolicy {
            policy_id: "pol-1".into(),
            core_identity_id: "id-1".into(),
            requester_identifier: "partner.example.com".into(),
            share_config: ShareConfig {
                shared_attributes: vec!["email".into()],
                access_level: AccessLevel::Read,
                allowed_operations: vec!["read".into()],
                data_retention_period: 86_400,
            },
            duration: 3_600,
            constraints: ShareConstraints::default(),
            status,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            expires_at,
        }
    }

    #[test]
    fn expiry_considers_status_and_deadline() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        assert!(!sample_policy(PolicyStatus::Active, future).is_expired(now));
        assert!(sample_policy(PolicyStatus::Active, past).is_expired(now));
        assert!(sample_policy(PolicyStatus::Expired, future).is_expired(now));
    }

    #[test]
    fn only_active_policies_are_revocable() {
        let future = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
        assert!(sample_policy(PolicyStatus::Active, future).is_revocable());
        assert!(!sample_policy(PolicyStatus::Revoked, future).is_revocable());
    }

    #[test]
    fn time_restriction_serializes_cycle_as_type() {
        let restriction = TimeRestriction {
            cycle: RestrictionCycle::Daily,
            allowed_times: vec!["09:00-18:00".into()],
        };
        let json = serde_json::to_value(&restriction).unwrap();
        assert_eq!(json["type"], "DAILY");
        assert_eq!(json["allowedTimes"][0], "09:00-18:00");
    }

    #[test]
    fn empty_constraints_serialize_to_empty_object() {
        assert_eq!(
            serde_json::to_string(&ShareConstraints::default()).unwrap(),
            "{}"
        );
    }
}
