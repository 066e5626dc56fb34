//! 核心身份管理页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::{Fingerprint, RefreshCw};
use crate::notify::use_notifier;
use idhub_shared::identity::{
    CoreIdentity, IdentityStatus, SecurityLevelValidation, UpdateDeviceFingerprintRequest,
};

fn status_badge(status: IdentityStatus) -> &'static str {
    match status {
        IdentityStatus::Active => "badge badge-success",
        IdentityStatus::Frozen => "badge badge-warning",
        IdentityStatus::Deleted => "badge badge-error",
    }
}

/// 长哈希/密钥的展示截断
fn shorten(value: &str) -> String {
    if value.len() > 24 {
        format!("{}…{}", &value[..12], &value[value.len() - 8..])
    } else {
        value.to_string()
    }
}

#[component]
pub fn IdentityPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let notifier = use_notifier();

    let (identity, set_identity) = signal(Option::<CoreIdentity>::None);
    let (loading, set_loading) = signal(false);
    let (reason, set_reason) = signal(String::new());
    let (new_fingerprint, set_new_fingerprint) = signal(String::new());
    let (level_input, set_level_input) = signal("2".to_string());
    let (level_check, set_level_check) = signal(Option::<SecurityLevelValidation>::None);

    // 控制台视角下，核心身份标识即当前用户标识
    let user_id = Memo::new(move |_| {
        auth_ctx
            .state
            .with(|s| s.user.as_ref().map(|u| u.id.clone()))
    });

    let load = {
        let api = api.clone();
        move |id: String| {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(found) = api.identity.get(&id).await {
                    set_identity.set(Some(found));
                }
                // 顺带刷新最后活跃时间，结果不影响界面
                let _ = api.identity.update_last_active(&id).await;
                set_loading.set(false);
            });
        }
    };

    Effect::new({
        let load = load.clone();
        move |_| {
            if let Some(id) = user_id.get() {
                load(id);
            }
        }
    });

    let on_refresh = {
        let load = load.clone();
        move |_| {
            if let Some(id) = user_id.get_untracked() {
                load(id);
            }
        }
    };

    let on_freeze = {
        let api = api.clone();
        let load = load.clone();
        move |_| {
            let Some(id) = user_id.get_untracked() else {
                return;
            };
            let api = api.clone();
            let load = load.clone();
            let freeze_reason = Some(reason.get_untracked()).filter(|r| !r.is_empty());
            spawn_local(async move {
                if api.identity.freeze(&id, freeze_reason).await.is_ok() {
                    notifier.success("Identity frozen");
                    set_reason.set(String::new());
                    load(id);
                }
            });
        }
    };

    let on_recover = {
        let api = api.clone();
        let load = load.clone();
        move |_| {
            let Some(id) = user_id.get_untracked() else {
                return;
            };
            let api = api.clone();
            let load = load.clone();
            let recover_reason = Some(reason.get_untracked()).filter(|r| !r.is_empty());
            spawn_local(async move {
                if api.identity.recover(&id, recover_reason).await.is_ok() {
                    notifier.success("Identity recovered");
                    set_reason.set(String::new());
                    load(id);
                }
            });
        }
    };

    let on_update_fingerprint = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(id) = user_id.get_untracked() else {
                return;
            };
            let fingerprint = new_fingerprint.get_untracked();
            if fingerprint.is_empty() {
                return;
            }
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let req = UpdateDeviceFingerprintRequest {
                    new_device_fingerprint: fingerprint,
                };
                if api.identity.update_device_fingerprint(&id, &req).await.is_ok() {
                    notifier.success("Device fingerprint updated");
                    set_new_fingerprint.set(String::new());
                    load(id);
                }
            });
        }
    };

    let on_validate_level = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(id) = user_id.get_untracked() else {
                return;
            };
            let Ok(level) = level_input.get_untracked().trim().parse::<i32>() else {
                notifier.error("Enter a numeric security level");
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                if let Ok(check) = api.identity.validate_security_level(&id, level).await {
                    set_level_check.set(Some(check));
                }
            });
        }
    };

    let is_frozen = move || {
        identity.with(|i| i.as_ref().is_some_and(|i| i.is_frozen()))
    };

    view! {
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Core identity"</h2>
                <p class="text-base-content/70 text-sm">
                    "Cryptographic root of every linked account and policy."
                </p>
            </div>
            <button
                class="btn btn-ghost btn-circle"
                on:click=on_refresh
                disabled=move || loading.get()
            >
                <RefreshCw attr:class=move || {
                    if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                } />
            </button>
        </div>

        <Show
            when=move || identity.get().is_some()
            fallback=move || {
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body items-center text-center text-base-content/60">
                            <Fingerprint attr:class="h-10 w-10" />
                            <p>
                                {move || {
                                    if loading.get() {
                                        "Loading identity..."
                                    } else {
                                        "No core identity found for this account."
                                    }
                                }}
                            </p>
                        </div>
                    </div>
                }
            }
        >
            {move || {
                let current = identity.get().unwrap();
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex items-center justify-between">
                                <h3 class="card-title">"Identity record"</h3>
                                <div class=status_badge(current.status)>
                                    {format!("{:?}", current.status)}
                                </div>
                            </div>
                            <div class="grid grid-cols-1 md:grid-cols-2 gap-x-8 gap-y-2 text-sm mt-2">
                                <p>
                                    <span class="opacity-60">"Identity ID: "</span>
                                    <span class="font-mono">{current.identity_id.clone()}</span>
                                </p>
                                <p>
                                    <span class="opacity-60">"Security level: "</span>
                                    {current.security_level}
                                </p>
                                <p>
                                    <span class="opacity-60">"Public key: "</span>
                                    <span class="font-mono">{shorten(&current.public_key)}</span>
                                </p>
                                <p>
                                    <span class="opacity-60">"Device fingerprint: "</span>
                                    <span class="font-mono">
                                        {shorten(&current.device_fingerprint)}
                                    </span>
                                </p>
                                <p>
                                    <span class="opacity-60">"Biometric template: "</span>
                                    <span class="font-mono">
                                        {shorten(&current.biometric_template_hash)}
                                    </span>
                                </p>
                                <p>
                                    <span class="opacity-60">"Last active: "</span>
                                    {current.last_active_at.format("%Y-%m-%d %H:%M").to_string()}
                                </p>
                                <p>
                                    <span class="opacity-60">"Created: "</span>
                                    {current.created_at.format("%Y-%m-%d").to_string()}
                                </p>
                            </div>
                        </div>
                    </div>
                }
            }}
        </Show>

        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">
                        {move || if is_frozen() { "Recover identity" } else { "Freeze identity" }}
                    </h3>
                    <p class="text-sm text-base-content/70">
                        "A frozen identity rejects all sharing and sync operations."
                    </p>
                    <input
                        type="text"
                        placeholder="Reason (optional)"
                        on:input=move |ev| set_reason.set(event_target_value(&ev))
                        prop:value=reason
                        class="input input-bordered input-sm"
                    />
                    <div class="card-actions justify-end mt-2">
                        <Show
                            when=is_frozen
                            fallback=move || {
                                let on_freeze = on_freeze.clone();
                                view! {
                                    <button class="btn btn-warning btn-sm" on:click=on_freeze>
                                        "Freeze"
                                    </button>
                                }
                            }
                        >
                            {
                                let on_recover = on_recover.clone();
                                view! {
                                    <button class="btn btn-success btn-sm" on:click=on_recover>
                                        "Recover"
                                    </button>
                                }
                            }
                        </Show>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_update_fingerprint>
                    <h3 class="card-title text-base">"Rotate device fingerprint"</h3>
                    <p class="text-sm text-base-content/70">
                        "Replace the fingerprint after moving to a new device."
                    </p>
                    <input
                        type="text"
                        placeholder="new fingerprint"
                        on:input=move |ev| set_new_fingerprint.set(event_target_value(&ev))
                        prop:value=new_fingerprint
                        class="input input-bordered input-sm font-mono"
                        required
                    />
                    <div class="card-actions justify-end mt-2">
                        <button class="btn btn-primary btn-sm">"Update"</button>
                    </div>
                </form>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_validate_level>
                    <h3 class="card-title text-base">"Check security level"</h3>
                    <p class="text-sm text-base-content/70">
                        "Verify the identity meets a required assurance level."
                    </p>
                    <input
                        type="number"
                        min="1"
                        max="5"
                        on:input=move |ev| set_level_input.set(event_target_value(&ev))
                        prop:value=level_input
                        class="input input-bordered input-sm"
                        required
                    />
                    <Show when=move || level_check.get().is_some()>
                        {move || {
                            let check = level_check.get().unwrap();
                            view! {
                                <div class=if check.is_valid {
                                    "badge badge-success gap-1"
                                } else {
                                    "badge badge-error gap-1"
                                }>
                                    {if check.is_valid { "Sufficient" } else { "Insufficient" }}
                                    " (current: "
                                    {check.current_level}
                                    ")"
                                </div>
                            }
                        }}
                    </Show>
                    <div class="card-actions justify-end mt-2">
                        <button class="btn btn-primary btn-sm">"Validate"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
