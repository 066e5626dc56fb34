//! 会话钩子
//!
//! 请求管线对外的两个依赖：读取当前令牌、上报用户通知、以及
//! 401 时同步清除认证状态。通过 trait 注入，认证系统与 HTTP
//! 层互不直接依赖，测试中用记录型 Mock 验证调用次数。

use leptos::prelude::*;

use crate::auth::{self, AuthContext};
use crate::notify::{Notifier, NotifyLevel};

pub trait SessionHooks: Send + Sync {
    /// 当前访问令牌；无令牌时请求不带 Authorization 头
    fn access_token(&self) -> Option<String>;

    /// 面向用户的通知
    fn notify(&self, level: NotifyLevel, message: &str);

    /// 401 触发：同步清除认证状态。
    /// 导航由路由服务监听认证信号自动完成，不在此处跳转。
    fn session_expired(&self);
}

/// 生产实现：桥接认证上下文与通知服务
pub struct BrowserSession {
    auth: AuthContext,
    notifier: Notifier,
}

impl BrowserSession {
    pub fn new(auth: AuthContext, notifier: Notifier) -> Self {
        Self { auth, notifier }
    }
}

impl SessionHooks for BrowserSession {
    fn access_token(&self) -> Option<String> {
        self.auth
            .state
            .with_untracked(|state| state.access_token.clone())
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        self.notifier.push(level, message);
    }

    fn session_expired(&self) {
        auth::force_logout(&self.auth);
    }
}
