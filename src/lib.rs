//! IdHub 控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与守卫（领域模型 + 核心引擎）
//! - `auth` / `app`: 认证与应用级状态
//! - `api`: 请求管线与各业务域 API
//! - `components`: UI 组件层

pub mod api;
pub mod app;
pub mod auth;
pub mod notify;

// 浏览器原生 API 封装模块
pub(crate) mod web;

mod components {
    pub mod account;
    pub mod dashboard;
    mod icons;
    pub mod identity;
    pub mod layout;
    pub mod login;
    pub mod policy;
    pub mod profile;
    pub mod register;
    pub mod settings;
    pub mod setup;
}

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{
    ApiClient, Apis, BrowserSession, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, FetchTransport,
};
use crate::app::{AppContext, PageInfo};
use crate::auth::AuthContext;
use crate::components::account::AccountPage;
use crate::components::dashboard::DashboardPage;
use crate::components::identity::IdentityPage;
use crate::components::layout::AppShell;
use crate::components::login::LoginPage;
use crate::components::policy::PolicyPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::settings::SettingsPage;
use crate::components::setup::SetupPage;
use crate::notify::{NotificationHost, Notifier};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 控制台页面套共享布局，认证页独立全屏。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <AppShell><DashboardPage /></AppShell> }.into_any(),
        AppRoute::Identity => view! { <AppShell><IdentityPage /></AppShell> }.into_any(),
        AppRoute::Account => view! { <AppShell><AccountPage /></AppShell> }.into_any(),
        AppRoute::Policy => view! { <AppShell><PolicyPage /></AppShell> }.into_any(),
        AppRoute::Profile => view! { <AppShell><ProfilePage /></AppShell> }.into_any(),
        AppRoute::Settings => view! { <AppShell><SettingsPage /></AppShell> }.into_any(),
        AppRoute::Login { .. } => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Setup => view! { <SetupPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 导航完成后同步页面信息到应用状态
#[component]
fn PageSync() -> impl IntoView {
    let router = use_router();
    let app_ctx = app::use_app();

    Effect::new(move |_| {
        let route = router.current_route().get();
        app_ctx.set_current_page(PageInfo {
            name: route.name().to_string(),
            path: route.to_path(),
            title: route.title().to_string(),
        });
        app_ctx.set_loading(false);
    });
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 全局上下文
    let notifier = Notifier::new();
    provide_context(notifier);

    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    let app_ctx = AppContext::new();
    provide_context(app_ctx);
    app::init_app(&app_ctx);

    // 2. API 客户端：传输实现与会话钩子注入
    let session = Arc::new(BrowserSession::new(auth_ctx, notifier));
    let transport = Arc::new(FetchTransport::new(DEFAULT_TIMEOUT_MS));
    let client = Arc::new(ApiClient::new(DEFAULT_BASE_URL, transport, session));
    provide_context(Apis::new(client.clone()));

    // 3. 恢复上次会话（令牌 + 用户信息）
    spawn_local(async move {
        auth::init_auth(&auth_ctx, &client).await;
    });

    // 4. 路由器组件：注入认证信号实现守卫
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <NotificationHost />
            <PageSync />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
