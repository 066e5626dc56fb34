//! 路由服务
//!
//! History API 的唯一出入口：window.history 的读写都收拢在这里。
//! 守卫决策（`guard_target`）是纯函数，导航、popstate 与认证信号
//! 三条路径共用同一份决策，认证状态以注入信号参与。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

const TITLE_SUFFIX: &str = "IdHub Console";

/// 守卫决策：给定目标路由与认证状态，返回实际加载的路由
///
/// 未认证访问受保护页 -> 登录页（携带被拦截路径）；
/// 已认证停留认证页 -> 控制台首页；其余原样放行。
fn guard_target(target: AppRoute, is_auth: bool) -> AppRoute {
    if target.requires_auth() && !is_auth {
        return AppRoute::auth_failure_redirect(&target);
    }
    if target.hide_for_auth() && is_auth {
        return AppRoute::auth_success_redirect();
    }
    target
}

/// 浏览器当前地址（path + query）
fn browser_path() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// 写入 History：push 走 pushState，重定向场景用 replaceState
fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

fn write_document_title(page_title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!("{} - {}", page_title, TITLE_SUFFIX));
    }
}

/// 路由器服务，经 Context 注入各组件
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let (current_route, set_route) = signal(AppRoute::from_path(&browser_path()));
        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 守卫后导航到目标路由
    pub fn navigate(&self, target: AppRoute) {
        let effective = guard_target(target.clone(), self.is_authenticated.get_untracked());
        if effective != target {
            web_sys::console::log_1(
                &format!("[Router] {} redirected to {}", target, effective).into(),
            );
        }
        self.load(effective, true);
    }

    /// 按路径导航（redirect 参数等字符串来源）
    pub fn navigate_path(&self, path: &str) {
        self.navigate(AppRoute::from_path(path));
    }

    /// 写 History、刷新标题并切换当前路由信号
    fn load(&self, route: AppRoute, push: bool) {
        write_history(&route.to_path(), push);
        write_document_title(route.title());
        self.set_route.set(route);
    }

    /// 后退/前进按钮：解析浏览器地址后重新过守卫
    fn listen_popstate(&self) {
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&browser_path());
            let effective = guard_target(target.clone(), service.is_authenticated.get_untracked());
            if effective == target {
                // 地址本身已是 History 栈里的条目，只需刷新标题与信号
                write_document_title(effective.title());
                service.set_route.set(effective);
            } else {
                service.load(effective, false);
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同生命周期，闭包直接泄漏
        closure.forget();
    }

    /// 认证信号翻转时的自动跳转
    ///
    /// 登录成功：离开认证页，优先回到 redirect 参数指向的页面。
    /// 登出/会话失效：离开受保护页，登录页携带当前路径。
    fn watch_auth(&self) {
        let service = *self;

        Effect::new(move |_| {
            let is_auth = service.is_authenticated.get();
            let route = service.current_route.get_untracked();

            if is_auth {
                match &route {
                    AppRoute::Login { redirect } => {
                        let target = redirect
                            .as_deref()
                            .map(AppRoute::from_path)
                            .unwrap_or_else(AppRoute::auth_success_redirect);
                        web_sys::console::log_1(
                            &"[Router] Signed in, leaving the auth page.".into(),
                        );
                        service.load(guard_target(target, true), true);
                    }
                    _ if route.hide_for_auth() => {
                        service.load(AppRoute::auth_success_redirect(), true);
                    }
                    _ => {}
                }
            } else if route.requires_auth() {
                web_sys::console::log_1(&"[Router] Signed out, redirecting to login.".into());
                service.load(AppRoute::auth_failure_redirect(&route), true);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.listen_popstate();
    router.watch_auth();

    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

pub fn use_navigate() -> impl Fn(AppRoute) + Clone {
    let router = use_router();
    move |to: AppRoute| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，提供路由上下文，应在 App 根部使用
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口：当前路由经匹配函数渲染为视图
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_route().get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_access_is_sent_to_login_with_redirect() {
        let effective = guard_target(AppRoute::Policy, false);
        assert_eq!(
            effective,
            AppRoute::Login {
                redirect: Some("/policy".to_string()),
            }
        );
    }

    #[test]
    fn authenticated_users_skip_auth_pages() {
        assert_eq!(
            guard_target(AppRoute::Login { redirect: None }, true),
            AppRoute::Dashboard
        );
        assert_eq!(guard_target(AppRoute::Register, true), AppRoute::Dashboard);
    }

    #[test]
    fn permitted_targets_pass_through_unchanged() {
        assert_eq!(guard_target(AppRoute::Dashboard, true), AppRoute::Dashboard);
        assert_eq!(
            guard_target(AppRoute::Login { redirect: None }, false),
            AppRoute::Login { redirect: None }
        );
        assert_eq!(guard_target(AppRoute::NotFound, false), AppRoute::NotFound);
    }
}
