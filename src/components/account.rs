//! 账户关联管理页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::{Link2, MoreHorizontal, Plus, RefreshCw, Trash2};
use crate::notify::use_notifier;
use idhub_shared::account::{
    AccountStatistics, AccountVerificationRequest, LinkAccountRequest, LinkedAccount,
    PlatformAccount, SyncAccountRequest, SyncStatus,
};

fn sync_badge(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Pending => "badge badge-ghost",
        SyncStatus::Syncing => "badge badge-info",
        SyncStatus::Synced => "badge badge-success",
        SyncStatus::Failed => "badge badge-error",
    }
}

#[component]
pub fn AccountPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let (accounts, set_accounts) = signal(Vec::<LinkedAccount>::new());
    let (stats, set_stats) = signal(Option::<AccountStatistics>::None);
    let (platforms, set_platforms) = signal(Vec::<PlatformAccount>::new());
    let (loading, set_loading) = signal(true);

    // 关联对话框状态
    let (show_link, set_show_link) = signal(false);
    let (link_platform, set_link_platform) = signal(String::new());
    let (link_code, set_link_code) = signal(String::new());
    let (link_redirect, set_link_redirect) = signal("https://console.idhub.local/callback".to_string());
    let (auth_url, set_auth_url) = signal(Option::<String>::None);

    // 验证对话框状态：待验证的账户 ID
    let (verify_target, set_verify_target) = signal(Option::<String>::None);
    let (verify_code, set_verify_code) = signal(String::new());

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(list) = api.account.list().await {
                    set_accounts.set(list);
                }
                if let Ok(found) = api.account.statistics().await {
                    set_stats.set(Some(found));
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let open_link_dialog = {
        let api = api.clone();
        move |_| {
            set_show_link.set(true);
            set_auth_url.set(None);
            if platforms.with_untracked(|p| p.is_empty()) {
                let api = api.clone();
                spawn_local(async move {
                    if let Ok(list) = api.account.supported_platforms().await {
                        if let Some(first) = list.first() {
                            set_link_platform.set(first.platform.clone());
                        }
                        set_platforms.set(list);
                    }
                });
            }
        }
    };

    let on_fetch_auth_url = {
        let api = api.clone();
        move |_| {
            let platform = link_platform.get_untracked();
            if platform.is_empty() {
                notifier.error("Choose a platform first");
                return;
            }
            let api = api.clone();
            let redirect = link_redirect.get_untracked();
            spawn_local(async move {
                if let Ok(found) = api.account.auth_url(&platform, &redirect).await {
                    set_auth_url.set(Some(found.auth_url));
                }
            });
        }
    };

    let on_link = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let req = LinkAccountRequest {
                platform: link_platform.get_untracked(),
                authorization_code: link_code.get_untracked(),
                redirect_uri: link_redirect.get_untracked(),
            };
            if req.platform.is_empty() || req.authorization_code.is_empty() {
                notifier.error("Platform and authorization code are required");
                return;
            }
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                if api.account.link(&req).await.is_ok() {
                    notifier.success("Account linked");
                    set_show_link.set(false);
                    set_link_code.set(String::new());
                    load();
                }
            });
        }
    };

    let on_verify = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(account_id) = verify_target.get_untracked() else {
                return;
            };
            let code = verify_code.get_untracked();
            if code.is_empty() {
                return;
            }
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let req = AccountVerificationRequest {
                    account_id,
                    verification_code: code,
                };
                if api.account.verify(&req).await.is_ok() {
                    notifier.success("Account verified");
                    set_verify_target.set(None);
                    set_verify_code.set(String::new());
                    load();
                }
            });
        }
    };

    let on_unlink = {
        let api = api.clone();
        move |account_id: String| {
            let api = api.clone();
            spawn_local(async move {
                if api.account.unlink(&account_id).await.is_ok() {
                    notifier.success("Account unlinked");
                    set_accounts.update(|list| list.retain(|a| a.account_id != account_id));
                }
            });
        }
    };

    let on_sync = {
        let api = api.clone();
        let load = load.clone();
        move |account_id: String| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                let req = SyncAccountRequest {
                    account_id,
                    force_sync: None,
                };
                if api.account.sync(&req).await.is_ok() {
                    notifier.info("Sync started");
                    load();
                }
            });
        }
    };

    let on_toggle = {
        let api = api.clone();
        let load = load.clone();
        move |account_id: String, is_active: bool| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                if api.account.update_status(&account_id, !is_active).await.is_ok() {
                    notifier.success(if is_active {
                        "Account deactivated"
                    } else {
                        "Account activated"
                    });
                    load();
                }
            });
        }
    };

    let on_batch_sync = {
        let api = api.clone();
        let load = load.clone();
        move |_| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                if api.account.batch_sync().await.is_ok() {
                    notifier.info("Batch sync started");
                    load();
                }
            });
        }
    };

    view! {
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Linked accounts"</h2>
                <p class="text-base-content/70 text-sm">
                    "Third-party platform accounts attached to your identity."
                </p>
            </div>
            <div class="flex gap-2">
                <button class="btn btn-outline btn-sm gap-2" on:click=on_batch_sync>
                    <RefreshCw attr:class="h-4 w-4" />
                    "Sync all"
                </button>
                <button class="btn btn-primary btn-sm gap-2" on:click=open_link_dialog>
                    <Plus attr:class="h-4 w-4" />
                    "Link account"
                </button>
            </div>
        </div>

        <Show when=move || stats.get().is_some()>
            {move || {
                let current = stats.get().unwrap();
                view! {
                    <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                        <div class="stat py-3">
                            <div class="stat-title">"Linked"</div>
                            <div class="stat-value text-2xl">{current.total_linked}</div>
                        </div>
                        <div class="stat py-3">
                            <div class="stat-title">"Verified"</div>
                            <div class="stat-value text-2xl text-success">{current.verified}</div>
                        </div>
                        <div class="stat py-3">
                            <div class="stat-title">"Active"</div>
                            <div class="stat-value text-2xl text-primary">{current.active}</div>
                        </div>
                        <div class="stat py-3">
                            <div class="stat-title">"Failed syncs"</div>
                            <div class="stat-value text-2xl text-error">{current.failed}</div>
                        </div>
                    </div>
                }
            }}
        </Show>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Platform"</th>
                                <th>"Account"</th>
                                <th class="hidden md:table-cell">"Status"</th>
                                <th class="hidden md:table-cell">"Sync"</th>
                                <th class="hidden md:table-cell">"Last sync"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || accounts.with(|a| a.is_empty()) && !loading.get()>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">
                                        "No linked accounts. Link one to get started."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || loading.get() && accounts.with(|a| a.is_empty())>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span>
                                        " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || accounts.get()
                                key=|account| account.account_id.clone()
                                children={
                                    let on_unlink = on_unlink.clone();
                                    let on_sync = on_sync.clone();
                                    let on_toggle = on_toggle.clone();
                                    move |account| {
                                        let id = account.account_id.clone();
                                        let on_unlink = on_unlink.clone();
                                        let on_sync = on_sync.clone();
                                        let on_toggle = on_toggle.clone();
                                        let sync_id = id.clone();
                                        let unlink_id = id.clone();
                                        let toggle_id = id.clone();
                                        let verify_id = id.clone();
                                        let is_active = account.is_active;
                                        let is_verified = account.is_verified;
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="flex items-center gap-2 font-semibold">
                                                        <Link2 attr:class="h-4 w-4 opacity-50" />
                                                        {account.platform.clone()}
                                                    </div>
                                                </td>
                                                <td class="font-mono text-sm opacity-70">
                                                    {account
                                                        .platform_username
                                                        .clone()
                                                        .unwrap_or_else(|| {
                                                            account.platform_account_id.clone()
                                                        })}
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class="flex gap-1">
                                                        <Show when=move || is_verified>
                                                            <div class="badge badge-success badge-outline">
                                                                "verified"
                                                            </div>
                                                        </Show>
                                                        <div class=if is_active {
                                                            "badge badge-primary badge-outline"
                                                        } else {
                                                            "badge badge-ghost"
                                                        }>
                                                            {if is_active { "active" } else { "inactive" }}
                                                        </div>
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class=sync_badge(account.sync_status)>
                                                        {format!("{:?}", account.sync_status)}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell text-sm opacity-60">
                                                    {account.last_sync_at.format("%Y-%m-%d %H:%M").to_string()}
                                                </td>
                                                <td>
                                                    <div class="dropdown dropdown-end">
                                                        <div
                                                            tabindex="0"
                                                            role="button"
                                                            class="btn btn-ghost btn-sm btn-square"
                                                        >
                                                            <MoreHorizontal attr:class="h-4 w-4" />
                                                        </div>
                                                        <ul
                                                            tabindex="0"
                                                            class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52"
                                                        >
                                                            <li>
                                                                <a on:click=move |_| {
                                                                    set_verify_target.set(Some(verify_id.clone()))
                                                                }>"Verify"</a>
                                                            </li>
                                                            <li>
                                                                <a on:click=move |_| on_sync(sync_id.clone())>
                                                                    "Sync now"
                                                                </a>
                                                            </li>
                                                            <li>
                                                                <a on:click=move |_| {
                                                                    on_toggle(toggle_id.clone(), is_active)
                                                                }>
                                                                    {if is_active { "Deactivate" } else { "Activate" }}
                                                                </a>
                                                            </li>
                                                            <li>
                                                                <a
                                                                    on:click=move |_| on_unlink(unlink_id.clone())
                                                                    class="text-error hover:bg-error/10"
                                                                >
                                                                    <Trash2 attr:class="mr-2 h-4 w-4" />
                                                                    "Unlink"
                                                                </a>
                                                            </li>
                                                        </ul>
                                                    </div>
                                                </td>
                                            </tr>
                                        }
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>

        // 关联账户对话框
        <Show when=move || show_link.get()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"Link a third-party account"</h3>
                    <form class="space-y-3 mt-4" on:submit=on_link.clone()>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Platform"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| set_link_platform.set(event_target_value(&ev))
                                prop:value=link_platform
                            >
                                <For
                                    each=move || platforms.get()
                                    key=|p| p.platform.clone()
                                    children=move |p| {
                                        view! { <option value=p.platform.clone()>{p.platform.clone()}</option> }
                                    }
                                />
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Redirect URI"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered font-mono text-sm"
                                on:input=move |ev| set_link_redirect.set(event_target_value(&ev))
                                prop:value=link_redirect
                            />
                        </div>
                        <div class="flex items-end gap-2">
                            <button
                                type="button"
                                class="btn btn-outline btn-sm"
                                on:click=on_fetch_auth_url.clone()
                            >
                                "Get authorization URL"
                            </button>
                            <Show when=move || auth_url.get().is_some()>
                                <a
                                    class="link link-primary text-sm truncate max-w-xs"
                                    href=move || auth_url.get().unwrap_or_default()
                                    target="_blank"
                                >
                                    "Open provider consent page"
                                </a>
                            </Show>
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Authorization code"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered font-mono"
                                placeholder="paste the code returned by the platform"
                                on:input=move |ev| set_link_code.set(event_target_value(&ev))
                                prop:value=link_code
                                required
                            />
                        </div>
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                on:click=move |_| set_show_link.set(false)
                            >
                                "Cancel"
                            </button>
                            <button type="submit" class="btn btn-primary">"Link"</button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>

        // 验证账户对话框
        <Show when=move || verify_target.get().is_some()>
            <div class="modal modal-open">
                <div class="modal-box max-w-sm">
                    <h3 class="font-bold text-lg">"Verify account"</h3>
                    <p class="text-sm text-base-content/70 mt-1">
                        "Enter the verification code sent by the platform."
                    </p>
                    <form class="space-y-3 mt-4" on:submit=on_verify.clone()>
                        <input
                            type="text"
                            class="input input-bordered w-full font-mono"
                            on:input=move |ev| set_verify_code.set(event_target_value(&ev))
                            prop:value=verify_code
                            required
                        />
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                on:click=move |_| set_verify_target.set(None)
                            >
                                "Cancel"
                            </button>
                            <button type="submit" class="btn btn-primary">"Verify"</button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
