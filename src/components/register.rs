//! 注册页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::components::icons::ShieldCheck;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_navigate;
use idhub_shared::RegisterRequest;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let notifier = use_notifier();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (display_name, set_display_name) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all required fields".to_string()));
            return;
        }
        if password.get() != confirm.get() {
            set_error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let req = RegisterRequest {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            display_name: Some(display_name.get_untracked()).filter(|n| !n.is_empty()),
        };

        let client = api.client.clone();
        spawn_local(async move {
            let ok = auth::register(&auth_ctx, &client, notifier, req).await;
            if !ok {
                set_error_msg.set(Some("Registration failed. Please try again.".to_string()));
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
                        <h1 class="text-3xl font-bold">"Create your identity"</h1>
                        <p class="text-base-content/70">
                            "One account for every linked platform"
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
                            <label class="label" for="reg-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="reg-username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="reg-email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-display-name">
                                <span class="label-text">"Display name (optional)"</span>
                            </label>
                            <input
                                id="reg-display-name"
                                type="text"
                                on:input=move |ev| set_display_name.set(event_target_value(&ev))
                                prop:value=display_name
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="reg-password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-confirm">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="reg-confirm"
                                type="password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
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
                                            "Creating account..."
                                        }
                                            .into_any()
                                    } else {
                                        "Create account".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm mt-2">
                            <a
                                class="link link-primary"
                                on:click={
                                    let navigate = navigate.clone();
                                    move |_| navigate(AppRoute::Login { redirect: None })
                                }
                            >
                                "Already have an account? Sign in"
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
