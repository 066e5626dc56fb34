//! 控制台首页：统计卡片与最近关联账户

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_navigate;
use idhub_shared::account::{AccountStatistics, LinkedAccount};
use idhub_shared::policy::{PolicyStatus, SharePolicy};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let navigate = use_navigate();

    let (stats, set_stats) = signal(Option::<AccountStatistics>::None);
    let (policies, set_policies) = signal(Vec::<SharePolicy>::new());
    let (accounts, set_accounts) = signal(Vec::<LinkedAccount>::new());
    let (loading, set_loading) = signal(true);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(found) = api.account.statistics().await {
                    set_stats.set(Some(found));
                }
                if let Ok(list) = api.policy.list().await {
                    set_policies.set(list);
                }
                if let Ok(list) = api.account.list().await {
                    set_accounts.set(list);
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let greeting = move || {
        auth_ctx
            .state
            .with(|s| s.user.as_ref().map(|u| u.display_label().to_string()))
            .map(|name| format!("Welcome back, {}", name))
            .unwrap_or_else(|| "Welcome back".to_string())
    };

    let total_linked = move || stats.with(|s| s.as_ref().map(|s| s.total_linked).unwrap_or(0));
    let verified = move || stats.with(|s| s.as_ref().map(|s| s.verified).unwrap_or(0));
    let active_policies = move || {
        policies.with(|list| {
            list.iter()
                .filter(|p| p.status == PolicyStatus::Active)
                .count()
        })
    };
    let recent_accounts = move || {
        accounts.with(|list| list.iter().take(5).cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">{greeting}</h2>
                <p class="text-base-content/70 text-sm">
                    "Your unified identity at a glance"
                </p>
            </div>
            <button
                class="btn btn-ghost btn-circle"
                on:click={
                    let load = load.clone();
                    move |_| load()
                }
                disabled=move || loading.get()
            >
                <RefreshCw attr:class=move || {
                    if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                } />
            </button>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary">
                    <Link2 attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Linked accounts"</div>
                <div class="stat-value text-primary">{total_linked}</div>
                <div class="stat-desc">{move || format!("{} verified", verified())}</div>
            </div>

            <div class="stat">
                <div class="stat-figure text-success">
                    <ShieldCheck attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Active policies"</div>
                <div class="stat-value text-success">{active_policies}</div>
                <div class="stat-desc">
                    {move || format!("{} total", policies.with(|p| p.len()))}
                </div>
            </div>

            <div class="stat">
                <div class="stat-figure text-secondary">
                    <Fingerprint attr:class="h-8 w-8" />
                </div>
                <div class="stat-title">"Identity status"</div>
                <div class="stat-value text-secondary text-2xl">
                    {move || {
                        auth_ctx
                            .state
                            .with(|s| {
                                if s.user.as_ref().is_some_and(|u| u.is_active) {
                                    "Active"
                                } else {
                                    "Unknown"
                                }
                            })
                    }}
                </div>
                <div class="stat-desc">"Managed on the Identity page"</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Recently linked"</h3>
                        <p class="text-base-content/70 text-sm">
                            "The latest third-party accounts tied to this identity."
                        </p>
                    </div>
                    <button
                        class="btn btn-ghost btn-sm"
                        on:click={
                            let navigate = navigate.clone();
                            move |_| navigate(AppRoute::Account)
                        }
                    >
                        "Manage all"
                    </button>
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Platform"</th>
                                <th>"Account"</th>
                                <th class="hidden md:table-cell">"Sync"</th>
                                <th class="hidden md:table-cell">"Linked at"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || {
                                recent_accounts().is_empty() && !loading.get()
                            }>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        "No linked accounts yet."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || loading.get() && recent_accounts().is_empty()>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span>
                                        " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=recent_accounts
                                key=|account| account.account_id.clone()
                                children=move |account| {
                                    view! {
                                        <tr>
                                            <td class="font-semibold">{account.platform.clone()}</td>
                                            <td class="font-mono text-sm opacity-70">
                                                {account
                                                    .platform_username
                                                    .clone()
                                                    .unwrap_or_else(|| account.platform_account_id.clone())}
                                            </td>
                                            <td class="hidden md:table-cell">
                                                <div class="badge badge-outline">
                                                    {format!("{:?}", account.sync_status)}
                                                </div>
                                            </td>
                                            <td class="hidden md:table-cell text-sm opacity-60">
                                                {account.created_at.format("%Y-%m-%d").to_string()}
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
