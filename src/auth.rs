//! 认证模块
//!
//! 管理用户与令牌状态，与路由系统解耦：路由守卫只消费注入的
//! 认证信号。令牌持久化在两个 LocalStorage 键中，页面刷新后由
//! `init_auth` 恢复并拉取用户信息。

use leptos::logging::{error, log};
use leptos::prelude::*;

use crate::api::{ApiClient, ApiResult};
use crate::notify::Notifier;
use crate::web::LocalStorage;
use idhub_shared::{
    AuthResponse, AuthTokens, ChangePasswordRequest, LoginRequest, RefreshRequest,
    RegisterRequest, UpdateProfileRequest, User,
};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// 是否正在加载（初始恢复或请求进行中）
    pub is_loading: bool,
}

impl AuthState {
    /// 完整登录态：令牌与用户信息都在场
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_role(role))
    }

    pub fn can(&self, permission: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.can(permission))
    }
}

/// 认证上下文，经 Context 在组件间共享
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 路由守卫用的认证信号
    ///
    /// 以令牌在场为判据：恢复会话时用户信息尚未返回，仍应放行受
    /// 保护页面；令牌失效由 401 流程清除后信号自然翻转。
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().access_token.is_some())
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复令牌；有访问令牌则拉取 `/auth/me`。
pub async fn init_auth(ctx: &AuthContext, client: &ApiClient) {
    let access_token = LocalStorage::get(ACCESS_TOKEN_KEY);
    let refresh_token = LocalStorage::get(REFRESH_TOKEN_KEY);
    let has_token = access_token.is_some();

    ctx.set_state.update(|state| {
        state.access_token = access_token;
        state.refresh_token = refresh_token;
        state.is_loading = has_token;
    });

    if has_token {
        let mut loaded = fetch_user(ctx, client).await;
        // 访问令牌可能已过期：用刷新令牌换新后重试一次
        if !loaded && refresh(ctx, client).await {
            loaded = fetch_user(ctx, client).await;
        }
        if !loaded {
            force_logout(ctx);
        }
        ctx.set_state.update(|state| state.is_loading = false);
    }
}

/// 登录并保存会话
pub async fn login(
    ctx: &AuthContext,
    client: &ApiClient,
    notifier: Notifier,
    username: String,
    password: String,
) -> bool {
    ctx.set_state.update(|state| state.is_loading = true);

    let result: ApiResult<AuthResponse> = client
        .post("/auth/login", &LoginRequest { username, password })
        .await;

    let ok = match result {
        Ok(session) => {
            apply_session(ctx, session);
            notifier.success("Signed in");
            true
        }
        Err(err) => {
            error!("[auth] login failed: {}", err);
            false
        }
    };

    ctx.set_state.update(|state| state.is_loading = false);
    ok
}

/// 注册并直接进入登录态
pub async fn register(
    ctx: &AuthContext,
    client: &ApiClient,
    notifier: Notifier,
    req: RegisterRequest,
) -> bool {
    ctx.set_state.update(|state| state.is_loading = true);

    let result: ApiResult<AuthResponse> = client.post("/auth/register", &req).await;

    let ok = match result {
        Ok(session) => {
            apply_session(ctx, session);
            notifier.success("Account created");
            true
        }
        Err(err) => {
            error!("[auth] register failed: {}", err);
            false
        }
    };

    ctx.set_state.update(|state| state.is_loading = false);
    ok
}

/// 用刷新令牌换新的访问令牌，失败则登出
pub async fn refresh(ctx: &AuthContext, client: &ApiClient) -> bool {
    let Some(refresh_token) = ctx.state.with_untracked(|s| s.refresh_token.clone()) else {
        return false;
    };

    let result: ApiResult<AuthTokens> = client
        .post("/auth/refresh", &RefreshRequest { refresh_token })
        .await;

    match result {
        Ok(tokens) => {
            LocalStorage::set(ACCESS_TOKEN_KEY, &tokens.access_token);
            ctx.set_state
                .update(|state| state.access_token = Some(tokens.access_token));
            true
        }
        Err(err) => {
            error!("[auth] token refresh failed: {}", err);
            force_logout(ctx);
            false
        }
    }
}

/// 登出：尽力通知后端，然后清除本地状态
///
/// 导航由路由服务监听认证信号自动完成。
pub async fn logout(ctx: &AuthContext, client: &ApiClient, notifier: Notifier) {
    if ctx.state.with_untracked(|s| s.access_token.is_some()) {
        if let Err(err) = client.post_empty::<()>("/auth/logout").await {
            log!("[auth] logout call failed: {}", err);
        }
    }
    force_logout(ctx);
    notifier.info("Signed out");
}

/// 同步清除认证状态（登出与 401 钩子共用）
pub fn force_logout(ctx: &AuthContext) {
    LocalStorage::delete(ACCESS_TOKEN_KEY);
    LocalStorage::delete(REFRESH_TOKEN_KEY);
    ctx.set_state.update(|state| {
        state.user = None;
        state.access_token = None;
        state.refresh_token = None;
    });
}

/// 拉取当前用户信息；是否登出由调用方决定
pub async fn fetch_user(ctx: &AuthContext, client: &ApiClient) -> bool {
    if ctx.state.with_untracked(|s| s.access_token.is_none()) {
        return false;
    }

    match client.get::<User>("/auth/me").await {
        Ok(user) => {
            ctx.set_state.update(|state| state.user = Some(user));
            true
        }
        Err(err) => {
            error!("[auth] fetch user failed: {}", err);
            false
        }
    }
}

/// 更新个人资料
pub async fn update_profile(
    ctx: &AuthContext,
    client: &ApiClient,
    notifier: Notifier,
    req: UpdateProfileRequest,
) -> bool {
    let result: ApiResult<User> = client.put("/auth/profile", &req).await;

    match result {
        Ok(user) => {
            ctx.set_state.update(|state| state.user = Some(user));
            notifier.success("Profile updated");
            true
        }
        Err(err) => {
            error!("[auth] profile update failed: {}", err);
            false
        }
    }
}

/// 修改密码
pub async fn change_password(
    client: &ApiClient,
    notifier: Notifier,
    req: ChangePasswordRequest,
) -> bool {
    match client.put::<_, ()>("/auth/password", &req).await {
        Ok(()) => {
            notifier.success("Password changed");
            true
        }
        Err(err) => {
            error!("[auth] password change failed: {}", err);
            false
        }
    }
}

fn apply_session(ctx: &AuthContext, session: AuthResponse) {
    LocalStorage::set(ACCESS_TOKEN_KEY, &session.tokens.access_token);
    LocalStorage::set(REFRESH_TOKEN_KEY, &session.tokens.refresh_token);

    ctx.set_state.update(|state| {
        state.user = Some(session.user);
        state.access_token = Some(session.tokens.access_token);
        state.refresh_token = Some(session.tokens.refresh_token);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            display_name: None,
            avatar: None,
            roles: vec!["admin".into()],
            permissions: vec!["policy:write".into()],
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn authenticated_requires_token_and_user() {
        let mut state = AuthState::default();
        assert!(!state.is_authenticated());

        state.access_token = Some("tok".into());
        assert!(!state.is_authenticated());

        state.user = Some(sample_user());
        assert!(state.is_authenticated());
    }

    #[test]
    fn role_and_permission_checks_delegate_to_user() {
        let state = AuthState {
            user: Some(sample_user()),
            ..Default::default()
        };
        assert!(state.has_role("admin"));
        assert!(!state.has_role("auditor"));
        assert!(state.can("policy:write"));
        assert!(!state.can("identity:freeze"));
    }
}
