//! 身份管理 API 模块

use std::sync::Arc;

use super::{ApiClient, ApiResult};
use idhub_shared::identity::{
    CoreIdentity, CreateIdentityRequest, CreateIdentityResponse, ReasonRequest,
    SecurityLevelValidation, UpdateDeviceFingerprintRequest,
};

#[derive(Clone)]
pub struct IdentityApi {
    client: Arc<ApiClient>,
}

impl IdentityApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 创建核心身份
    pub async fn create(&self, req: &CreateIdentityRequest) -> ApiResult<CreateIdentityResponse> {
        self.client.post("/identity", req).await
    }

    /// 获取身份信息
    pub async fn get(&self, identity_id: &str) -> ApiResult<CoreIdentity> {
        self.client.get(&format!("/identity/{}", identity_id)).await
    }

    /// 更新设备指纹
    pub async fn update_device_fingerprint(
        &self,
        identity_id: &str,
        req: &UpdateDeviceFingerprintRequest,
    ) -> ApiResult<()> {
        self.client
            .put(&format!("/identity/{}/device-fingerprint", identity_id), req)
            .await
    }

    /// 冻结身份
    pub async fn freeze(&self, identity_id: &str, reason: Option<String>) -> ApiResult<()> {
        self.client
            .post(
                &format!("/identity/{}/freeze", identity_id),
                &ReasonRequest { reason },
            )
            .await
    }

    /// 恢复身份
    pub async fn recover(&self, identity_id: &str, reason: Option<String>) -> ApiResult<()> {
        self.client
            .post(
                &format!("/identity/{}/recover", identity_id),
                &ReasonRequest { reason },
            )
            .await
    }

    /// 刷新最后活跃时间
    pub async fn update_last_active(&self, identity_id: &str) -> ApiResult<()> {
        self.client
            .put_empty(&format!("/identity/{}/last-active", identity_id))
            .await
    }

    /// 校验安全级别
    pub async fn validate_security_level(
        &self,
        identity_id: &str,
        level: i32,
    ) -> ApiResult<SecurityLevelValidation> {
        self.client
            .get_with(
                &format!("/identity/{}/validate-security-level", identity_id),
                &[("level", level.to_string())],
            )
            .await
    }
}
