//! 登录页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::components::icons::ShieldCheck;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_navigate;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let notifier = use_notifier();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 登录成功后的跳转（含 redirect 参数）由路由服务的认证监听处理
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let client = api.client.clone();
        spawn_local(async move {
            let ok = auth::login(
                &auth_ctx,
                &client,
                notifier,
                username.get_untracked(),
                password.get_untracked(),
            )
            .await;
            if !ok {
                set_error_msg.set(Some(
                    "Sign in failed. Check your username and password.".to_string(),
                ));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"IdHub Console"</h1>
                        <p class="text-base-content/70">
                            "Sign in to manage your unified identity"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="your username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Sign in".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm mt-2 space-x-2">
                            <a
                                class="link link-primary"
                                on:click={
                                    let navigate = navigate.clone();
                                    move |_| navigate(AppRoute::Register)
                                }
                            >
                                "Create an account"
                            </a>
                            <span class="text-base-content/40">"·"</span>
                            <a
                                class="link"
                                on:click={
                                    let navigate = navigate.clone();
                                    move |_| navigate(AppRoute::Setup)
                                }
                            >
                                "Identity setup"
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
