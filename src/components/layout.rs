//! 已认证页面的共享布局：顶栏导航、主题切换、用户菜单

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::app::use_app;
use crate::auth::{self, use_auth};
use crate::components::icons::*;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

fn nav_items() -> [(AppRoute, &'static str); 4] {
    [
        (AppRoute::Dashboard, "Dashboard"),
        (AppRoute::Identity, "Identity"),
        (AppRoute::Account, "Accounts"),
        (AppRoute::Policy, "Policies"),
    ]
}

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth_ctx = use_auth();
    let app_ctx = use_app();
    let api = use_api();
    let notifier = use_notifier();
    let router = use_router();

    let is_dark = app_ctx.is_dark_signal();
    let current_name = move || router.current_route().get().name();

    let display_name = move || {
        auth_ctx
            .state
            .with(|s| s.user.as_ref().map(|u| u.display_label().to_string()))
            .unwrap_or_else(|| "...".to_string())
    };

    let on_logout = move |_| {
        let client = api.client.clone();
        spawn_local(async move {
            auth::logout(&auth_ctx, &client, notifier).await;
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-lg px-4">
                <div class="flex-1 gap-2">
                    <div class="p-2 bg-primary/10 rounded-xl text-primary">
                        <ShieldCheck attr:class="h-6 w-6" />
                    </div>
                    <a class="btn btn-ghost text-xl">"IdHub Console"</a>
                    <div class="hidden md:flex gap-1 ml-4">
                        {nav_items()
                            .into_iter()
                            .map(|(route, label)| {
                                let name = route.name();
                                view! {
                                    <button
                                        class=move || {
                                            if current_name() == name {
                                                "btn btn-sm btn-primary"
                                            } else {
                                                "btn btn-sm btn-ghost"
                                            }
                                        }
                                        on:click=move |_| router.navigate(route.clone())
                                    >
                                        {label}
                                    </button>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </div>
                </div>
                <div class="flex-none gap-2">
                    <button
                        class="btn btn-ghost btn-circle"
                        on:click=move |_| app_ctx.toggle_theme()
                    >
                        <Show
                            when=move || is_dark.get()
                            fallback=|| view! { <Moon attr:class="h-5 w-5" /> }
                        >
                            <Sun attr:class="h-5 w-5" />
                        </Show>
                    </button>
                    <div class="dropdown dropdown-end">
                        <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                            <UserCircle attr:class="h-5 w-5" />
                            <span class="hidden md:inline">{display_name}</span>
                        </div>
                        <ul
                            tabindex="0"
                            class="dropdown-content z-[1] menu p-2 shadow bg-base-100 rounded-box w-52"
                        >
                            <li>
                                <a on:click=move |_| router.navigate(AppRoute::Profile)>
                                    <UserCircle attr:class="h-4 w-4" />
                                    "Profile"
                                </a>
                            </li>
                            <li>
                                <a on:click=move |_| router.navigate(AppRoute::Settings)>
                                    <Cog attr:class="h-4 w-4" />
                                    "Settings"
                                </a>
                            </li>
                            <li>
                                <a on:click=on_logout class="text-error hover:bg-error/10">
                                    <LogOut attr:class="h-4 w-4" />
                                    "Sign out"
                                </a>
                            </li>
                        </ul>
                    </div>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">{children()}</main>
        </div>
    }
}
