//! 个人资料页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::notify::use_notifier;
use idhub_shared::{ChangePasswordRequest, UpdateProfileRequest};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let notifier = use_notifier();

    let (display_name, set_display_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (avatar, set_avatar) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let (current_password, set_current_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (changing, set_changing) = signal(false);

    let user = Memo::new(move |_| auth_ctx.state.with(|s| s.user.clone()));

    // 用户信息到位后预填表单
    Effect::new(move |_| {
        if let Some(current) = user.get() {
            set_display_name.set(current.display_name.unwrap_or_default());
            set_email.set(current.email);
            set_avatar.set(current.avatar.unwrap_or_default());
        }
    });

    let on_save_profile = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_saving.set(true);

            let req = UpdateProfileRequest {
                display_name: Some(display_name.get_untracked()).filter(|v| !v.is_empty()),
                email: Some(email.get_untracked()).filter(|v| !v.is_empty()),
                avatar: Some(avatar.get_untracked()).filter(|v| !v.is_empty()),
            };

            let client = api.client.clone();
            spawn_local(async move {
                auth::update_profile(&auth_ctx, &client, notifier, req).await;
                set_saving.set(false);
            });
        }
    };

    let on_change_password = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if new_password.get_untracked() != confirm_password.get_untracked() {
                notifier.error("New passwords do not match");
                return;
            }
            set_changing.set(true);

            let req = ChangePasswordRequest {
                current_password: current_password.get_untracked(),
                new_password: new_password.get_untracked(),
            };

            let client = api.client.clone();
            spawn_local(async move {
                if auth::change_password(&client, notifier, req).await {
                    set_current_password.set(String::new());
                    set_new_password.set(String::new());
                    set_confirm_password.set(String::new());
                }
                set_changing.set(false);
            });
        }
    };

    view! {
        <div>
            <h2 class="text-2xl font-bold">"Profile"</h2>
            <p class="text-base-content/70 text-sm">"Your account details and credentials."</p>
        </div>

        <Show when=move || user.get().is_some()>
            {move || {
                let current = user.get().unwrap();
                let initial = current
                    .username
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().to_string())
                    .unwrap_or_default();
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body flex-row items-center gap-6">
                            <div class="avatar placeholder">
                                <div class="bg-primary/10 text-primary rounded-full w-16">
                                    <span class="text-2xl">{initial}</span>
                                </div>
                            </div>
                            <div class="space-y-1">
                                <h3 class="text-lg font-bold">{current.display_label().to_string()}</h3>
                                <p class="text-sm opacity-70 font-mono">{current.email.clone()}</p>
                                <div class="flex gap-1 flex-wrap">
                                    {current
                                        .roles
                                        .iter()
                                        .map(|role| {
                                            view! {
                                                <div class="badge badge-outline badge-sm">
                                                    {role.clone()}
                                                </div>
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                </div>
                            </div>
                            <div class="ml-auto text-right text-sm opacity-60 space-y-1">
                                <p>
                                    "Member since "
                                    {current.created_at.format("%Y-%m-%d").to_string()}
                                </p>
                                <Show when={
                                    let has_last_login = current.last_login_at.is_some();
                                    move || has_last_login
                                }>
                                    <p>
                                        "Last sign-in "
                                        {current
                                            .last_login_at
                                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                            .unwrap_or_default()}
                                    </p>
                                </Show>
                            </div>
                        </div>
                    </div>
                }
            }}
        </Show>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_save_profile>
                    <h3 class="card-title text-base">"Edit profile"</h3>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Display name"</span>
                        </label>
                        <input
                            type="text"
                            class="input input-bordered"
                            on:input=move |ev| set_display_name.set(event_target_value(&ev))
                            prop:value=display_name
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input
                            type="email"
                            class="input input-bordered"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Avatar URL"</span>
                        </label>
                        <input
                            type="text"
                            class="input input-bordered font-mono text-sm"
                            on:input=move |ev| set_avatar.set(event_target_value(&ev))
                            prop:value=avatar
                        />
                    </div>
                    <div class="card-actions justify-end mt-2">
                        <button class="btn btn-primary btn-sm" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Save changes" }}
                        </button>
                    </div>
                </form>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_change_password>
                    <h3 class="card-title text-base">"Change password"</h3>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Current password"</span>
                        </label>
                        <input
                            type="password"
                            class="input input-bordered"
                            on:input=move |ev| set_current_password.set(event_target_value(&ev))
                            prop:value=current_password
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"New password"</span>
                        </label>
                        <input
                            type="password"
                            class="input input-bordered"
                            on:input=move |ev| set_new_password.set(event_target_value(&ev))
                            prop:value=new_password
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Confirm new password"</span>
                        </label>
                        <input
                            type="password"
                            class="input input-bordered"
                            on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                            prop:value=confirm_password
                            required
                        />
                    </div>
                    <div class="card-actions justify-end mt-2">
                        <button class="btn btn-primary btn-sm" disabled=move || changing.get()>
                            {move || if changing.get() { "Updating..." } else { "Update password" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
