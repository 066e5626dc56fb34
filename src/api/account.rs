//! 账户关联 API 模块

use std::sync::Arc;

use super::{ApiClient, ApiResult};
use idhub_shared::account::{
    AccountStatistics, AccountVerificationRequest, AuthUrlResponse, LinkAccountRequest,
    LinkedAccount, PlatformAccount, SyncAccountRequest, UpdateAccountStatusRequest,
};

#[derive(Clone)]
pub struct AccountApi {
    client: Arc<ApiClient>,
}

impl AccountApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取关联账户列表
    pub async fn list(&self) -> ApiResult<Vec<LinkedAccount>> {
        self.client.get("/account/linked").await
    }

    /// 获取单个关联账户
    pub async fn get(&self, account_id: &str) -> ApiResult<LinkedAccount> {
        self.client
            .get(&format!("/account/linked/{}", account_id))
            .await
    }

    /// 关联第三方账户
    pub async fn link(&self, req: &LinkAccountRequest) -> ApiResult<LinkedAccount> {
        self.client.post("/account/link", req).await
    }

    /// 验证关联账户
    pub async fn verify(&self, req: &AccountVerificationRequest) -> ApiResult<()> {
        self.client.post("/account/verify", req).await
    }

    /// 解除关联
    pub async fn unlink(&self, account_id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("/account/linked/{}", account_id))
            .await
    }

    /// 同步账户数据
    pub async fn sync(&self, req: &SyncAccountRequest) -> ApiResult<()> {
        self.client.post("/account/sync", req).await
    }

    /// 获取支持的平台列表
    pub async fn supported_platforms(&self) -> ApiResult<Vec<PlatformAccount>> {
        self.client.get("/account/supported-platforms").await
    }

    /// 获取平台授权地址
    pub async fn auth_url(&self, platform: &str, redirect_uri: &str) -> ApiResult<AuthUrlResponse> {
        self.client
            .get_with(
                "/account/auth-url",
                &[
                    ("platform", platform.to_string()),
                    ("redirectUri", redirect_uri.to_string()),
                ],
            )
            .await
    }

    /// 启用/停用关联账户
    pub async fn update_status(&self, account_id: &str, is_active: bool) -> ApiResult<()> {
        self.client
            .put(
                &format!("/account/linked/{}/status", account_id),
                &UpdateAccountStatusRequest { is_active },
            )
            .await
    }

    /// 批量同步
    pub async fn batch_sync(&self) -> ApiResult<()> {
        self.client.post_empty("/account/batch-sync").await
    }

    /// 账户统计
    pub async fn statistics(&self) -> ApiResult<AccountStatistics> {
        self.client.get("/account/statistics").await
    }
}
