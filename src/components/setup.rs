//! 身份初始化设置页
//!
//! 创建核心身份：提交生物特征模板哈希与设备指纹，返回的恢复
//! 密钥分片仅展示一次。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::{AlertTriangle, Fingerprint};
use crate::web::route::AppRoute;
use crate::web::router::use_navigate;
use idhub_shared::identity::{CreateIdentityRequest, CreateIdentityResponse};

#[component]
pub fn SetupPage() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();

    let (biometric_hash, set_biometric_hash) = signal(String::new());
    let (device_fingerprint, set_device_fingerprint) = signal(String::new());
    let (recovery_contacts, set_recovery_contacts) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (result, set_result) = signal(Option::<CreateIdentityResponse>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if biometric_hash.get().is_empty() || device_fingerprint.get().is_empty() {
            return;
        }

        set_is_submitting.set(true);

        let req = CreateIdentityRequest {
            biometric_template_hash: biometric_hash.get_untracked(),
            device_fingerprint: device_fingerprint.get_untracked(),
            recovery_contacts: recovery_contacts
                .get_untracked()
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
        };

        let api = api.clone();
        spawn_local(async move {
            if let Ok(created) = api.identity.create(&req).await {
                set_result.set(Some(created));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Fingerprint attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Identity setup"</h1>
                        <p class="text-base-content/70">
                            "Provision a new core identity for this device"
                        </p>
                    </div>
                </div>

                <Show
                    when=move || result.get().is_none()
                    fallback=move || {
                        let created = result.get().unwrap();
                        let fragments = created.recovery_key_fragments.clone();
                        let navigate = navigate.clone();
                        view! {
                            <div class="card w-full shadow-2xl bg-base-100">
                                <div class="card-body space-y-4">
                                    <h2 class="card-title">"Identity created"</h2>
                                    <div class="text-sm space-y-1">
                                        <p>
                                            <span class="opacity-60">"Identity ID: "</span>
                                            <span class="font-mono">{created.identity_id.clone()}</span>
                                        </p>
                                        <p>
                                            <span class="opacity-60">"Security level: "</span>
                                            {created.security_level}
                                        </p>
                                    </div>
                                    <div role="alert" class="alert alert-warning text-sm">
                                        <AlertTriangle attr:class="h-5 w-5" />
                                        <span>
                                            "Store these recovery fragments now. They are shown only once."
                                        </span>
                                    </div>
                                    <ul class="font-mono text-xs bg-base-200 rounded-box p-4 space-y-1">
                                        {fragments
                                            .into_iter()
                                            .map(|fragment| view! { <li>{fragment}</li> })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                    <button
                                        class="btn btn-primary"
                                        on:click=move |_| navigate(AppRoute::Login { redirect: None })
                                    >
                                        "Continue to sign in"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                >
                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit.clone()>
                            <div class="form-control">
                                <label class="label" for="biometric-hash">
                                    <span class="label-text">"Biometric template hash"</span>
                                </label>
                                <input
                                    id="biometric-hash"
                                    type="text"
                                    placeholder="sha256:…"
                                    on:input=move |ev| set_biometric_hash.set(event_target_value(&ev))
                                    prop:value=biometric_hash
                                    class="input input-bordered font-mono"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="device-fingerprint">
                                    <span class="label-text">"Device fingerprint"</span>
                                </label>
                                <input
                                    id="device-fingerprint"
                                    type="text"
                                    on:input=move |ev| {
                                        set_device_fingerprint.set(event_target_value(&ev))
                                    }
                                    prop:value=device_fingerprint
                                    class="input input-bordered font-mono"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="recovery-contacts">
                                    <span class="label-text">"Recovery contacts (one per line)"</span>
                                </label>
                                <textarea
                                    id="recovery-contacts"
                                    rows="3"
                                    on:input=move |ev| {
                                        set_recovery_contacts.set(event_target_value(&ev))
                                    }
                                    prop:value=recovery_contacts
                                    class="textarea textarea-bordered"
                                ></textarea>
                            </div>
                            <div class="form-control mt-6">
                                <button
                                    class="btn btn-primary"
                                    disabled=move || is_submitting.get()
                                >
                                    {move || {
                                        if is_submitting.get() {
                                            view! {
                                                <span class="loading loading-spinner"></span>
                                                "Provisioning..."
                                            }
                                                .into_any()
                                        } else {
                                            "Create identity".into_any()
                                        }
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </Show>
            </div>
        </div>
    }
}
