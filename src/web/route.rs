//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由、路径解析与守卫元数据。

use std::fmt::Display;

use url::form_urlencoded;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// 控制台首页（默认路由）
    Dashboard,
    /// 核心身份管理
    Identity,
    /// 第三方账户关联
    Account,
    /// 共享策略
    Policy,
    /// 个人资料
    Profile,
    /// 系统设置
    Settings,
    /// 登录页，`redirect` 为登录成功后要回到的路径
    Login { redirect: Option<String> },
    /// 注册页
    Register,
    /// 身份初始化设置
    Setup,
    /// 页面未找到
    NotFound,
}

impl Default for AppRoute {
    fn default() -> Self {
        AppRoute::Dashboard
    }
}

impl AppRoute {
    /// 将 URL（path + query）解析为路由枚举
    pub fn from_path(full_path: &str) -> Self {
        let (path, query) = match full_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (full_path, None),
        };

        match path {
            "/" | "/dashboard" => Self::Dashboard,
            "/identity" => Self::Identity,
            "/account" => Self::Account,
            "/policy" => Self::Policy,
            "/profile" => Self::Profile,
            "/settings" => Self::Settings,
            "/auth/login" => Self::Login {
                redirect: query.and_then(redirect_param),
            },
            "/auth/register" => Self::Register,
            "/auth/setup" => Self::Setup,
            _ => Self::NotFound,
        }
    }

    /// 路由对应的 URL
    pub fn to_path(&self) -> String {
        match self {
            Self::Dashboard => "/dashboard".to_string(),
            Self::Identity => "/identity".to_string(),
            Self::Account => "/account".to_string(),
            Self::Policy => "/policy".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::Login { redirect: None } => "/auth/login".to_string(),
            Self::Login {
                redirect: Some(target),
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("redirect", target)
                    .finish();
                format!("/auth/login?{}", query)
            }
            Self::Register => "/auth/register".to_string(),
            Self::Setup => "/auth/setup".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Identity
                | Self::Account
                | Self::Policy
                | Self::Profile
                | Self::Settings
        )
    }

    /// 已认证用户是否应离开此路由（登录/注册/设置页）
    pub fn hide_for_auth(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Register | Self::Setup)
    }

    /// 认证失败的重定向目标：登录页，携带被拦截的路径
    pub fn auth_failure_redirect(attempted: &AppRoute) -> Self {
        Self::Login {
            redirect: Some(attempted.to_path()),
        }
    }

    /// 认证成功后的默认落点
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 页面标题（document.title 的前缀）
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Identity => "Identity",
            Self::Account => "Linked Accounts",
            Self::Policy => "Share Policies",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
            Self::Login { .. } => "Sign In",
            Self::Register => "Sign Up",
            Self::Setup => "Identity Setup",
            Self::NotFound => "Page Not Found",
        }
    }

    /// 路由名，用于日志与页面状态
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Identity => "Identity",
            Self::Account => "Account",
            Self::Policy => "Policy",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
            Self::Login { .. } => "Login",
            Self::Register => "Register",
            Self::Setup => "Setup",
            Self::NotFound => "NotFound",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn redirect_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "redirect")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_parse_to_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/identity"), AppRoute::Identity);
        assert_eq!(AppRoute::from_path("/account"), AppRoute::Account);
        assert_eq!(AppRoute::from_path("/policy"), AppRoute::Policy);
        assert_eq!(AppRoute::from_path("/auth/register"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/auth/setup"), AppRoute::Setup);
        assert_eq!(AppRoute::from_path("/does-not-exist"), AppRoute::NotFound);
    }

    #[test]
    fn login_redirect_parameter_round_trips() {
        let login = AppRoute::auth_failure_redirect(&AppRoute::Policy);
        assert_eq!(login.to_path(), "/auth/login?redirect=%2Fpolicy");
        assert_eq!(AppRoute::from_path(&login.to_path()), login);
    }

    #[test]
    fn login_without_redirect_has_plain_path() {
        assert_eq!(
            AppRoute::from_path("/auth/login"),
            AppRoute::Login { redirect: None }
        );
        assert_eq!(
            AppRoute::Login { redirect: None }.to_path(),
            "/auth/login"
        );
    }

    #[test]
    fn console_pages_require_auth() {
        for route in [
            AppRoute::Dashboard,
            AppRoute::Identity,
            AppRoute::Account,
            AppRoute::Policy,
            AppRoute::Profile,
            AppRoute::Settings,
        ] {
            assert!(route.requires_auth(), "{} should require auth", route);
            assert!(!route.hide_for_auth());
        }
    }

    #[test]
    fn auth_pages_are_hidden_once_signed_in() {
        for route in [
            AppRoute::Login { redirect: None },
            AppRoute::Register,
            AppRoute::Setup,
        ] {
            assert!(route.hide_for_auth(), "{} should hide for auth", route);
            assert!(!route.requires_auth());
        }
    }

    #[test]
    fn redirect_target_keeps_the_attempted_path() {
        let attempted = AppRoute::Settings;
        match AppRoute::auth_failure_redirect(&attempted) {
            AppRoute::Login {
                redirect: Some(path),
            } => assert_eq!(path, "/settings"),
            other => panic!("expected login with redirect, got {:?}", other),
        }
    }
}
