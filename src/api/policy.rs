//! 共享策略 API 模块

use std::sync::Arc;

use super::{ApiClient, ApiResult};
use idhub_shared::identity::ReasonRequest;
use idhub_shared::policy::{
    AccessLogPage, CreateSharePolicyRequest, PolicyUsage, SharePolicy, SharePolicyValidation,
    UpdateSharePolicyRequest,
};

#[derive(Clone)]
pub struct PolicyApi {
    client: Arc<ApiClient>,
}

impl PolicyApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取策略列表
    pub async fn list(&self) -> ApiResult<Vec<SharePolicy>> {
        self.client.get("/policy").await
    }

    /// 获取单个策略
    pub async fn get(&self, policy_id: &str) -> ApiResult<SharePolicy> {
        self.client.get(&format!("/policy/{}", policy_id)).await
    }

    /// 创建共享策略
    pub async fn create(&self, req: &CreateSharePolicyRequest) -> ApiResult<SharePolicy> {
        self.client.post("/policy", req).await
    }

    /// 更新共享策略
    pub async fn update(
        &self,
        policy_id: &str,
        req: &UpdateSharePolicyRequest,
    ) -> ApiResult<SharePolicy> {
        self.client.put(&format!("/policy/{}", policy_id), req).await
    }

    /// 删除共享策略
    pub async fn delete(&self, policy_id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/policy/{}", policy_id)).await
    }

    /// 撤销共享策略
    pub async fn revoke(&self, policy_id: &str, reason: Option<String>) -> ApiResult<()> {
        self.client
            .post(
                &format!("/policy/{}/revoke", policy_id),
                &ReasonRequest { reason },
            )
            .await
    }

    /// 预校验策略配置
    pub async fn validate(
        &self,
        req: &CreateSharePolicyRequest,
    ) -> ApiResult<SharePolicyValidation> {
        self.client.post("/policy/validate", req).await
    }

    /// 策略使用统计
    pub async fn usage(&self, policy_id: &str) -> ApiResult<PolicyUsage> {
        self.client
            .get(&format!("/policy/{}/usage", policy_id))
            .await
    }

    /// 共享访问记录（分页）
    pub async fn access_log(
        &self,
        policy_id: &str,
        page: u32,
        size: u32,
    ) -> ApiResult<AccessLogPage> {
        self.client
            .get_with(
                &format!("/policy/{}/access-log", policy_id),
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await
    }
}
