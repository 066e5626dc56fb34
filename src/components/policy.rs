//! 共享策略管理页

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::{MoreHorizontal, Plus, ShieldCheck, Trash2};
use crate::notify::use_notifier;
use idhub_shared::policy::{
    AccessLevel, AccessLogPage, CreateSharePolicyRequest, PolicyStatus, PolicyUsage,
    RiskLevel, ShareConstraints, SharePolicy, SharePolicyValidation,
};

fn status_badge(status: PolicyStatus) -> &'static str {
    match status {
        PolicyStatus::Active => "badge badge-success",
        PolicyStatus::Expired => "badge badge-ghost",
        PolicyStatus::Revoked => "badge badge-error",
    }
}

fn risk_badge(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "badge badge-success",
        RiskLevel::Medium => "badge badge-warning",
        RiskLevel::High => "badge badge-error",
        RiskLevel::Critical => "badge badge-error badge-outline",
    }
}

fn parse_access_level(value: &str) -> AccessLevel {
    match value {
        "WRITE" => AccessLevel::Write,
        "ADMIN" => AccessLevel::Admin,
        _ => AccessLevel::Read,
    }
}

#[component]
pub fn PolicyPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let (policies, set_policies) = signal(Vec::<SharePolicy>::new());
    let (loading, set_loading) = signal(true);

    // 创建对话框状态
    let (show_create, set_show_create) = signal(false);
    let (requester, set_requester) = signal(String::new());
    let (attributes, set_attributes) = signal(String::new());
    let (access_level, set_access_level) = signal("READ".to_string());
    let (duration, set_duration) = signal("86400".to_string());
    let (max_requests, set_max_requests) = signal(String::new());
    let (validation, set_validation) = signal(Option::<SharePolicyValidation>::None);

    // 使用统计模态框：策略 ID + 加载结果
    let (usage_for, set_usage_for) = signal(Option::<String>::None);
    let (usage, set_usage) = signal(Option::<PolicyUsage>::None);
    let (access_log, set_access_log) = signal(Option::<AccessLogPage>::None);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(list) = api.policy.list().await {
                    set_policies.set(list);
                }
                set_loading.set(false);
            });
        }
    };
    load();

    // 表单合法则构造创建请求，否则给出提示
    let build_request = move || -> Option<CreateSharePolicyRequest> {
        let requester = requester.get_untracked().trim().to_string();
        if requester.is_empty() {
            notifier.error("Requester identifier is required");
            return None;
        }
        let shared_attributes: Vec<String> = attributes
            .get_untracked()
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if shared_attributes.is_empty() {
            notifier.error("List at least one shared attribute");
            return None;
        }
        let Ok(duration) = duration.get_untracked().trim().parse::<i64>() else {
            notifier.error("Duration must be a number of seconds");
            return None;
        };
        let constraints = max_requests
            .get_untracked()
            .trim()
            .parse::<u32>()
            .ok()
            .map(|n| ShareConstraints {
                maximum_requests: Some(n),
                ..Default::default()
            });

        Some(CreateSharePolicyRequest {
            requester_identifier: requester,
            shared_attributes,
            access_level: parse_access_level(&access_level.get_untracked()),
            duration,
            constraints,
        })
    };

    let on_validate = {
        let api = api.clone();
        move |_| {
            let Some(req) = build_request() else { return };
            let api = api.clone();
            spawn_local(async move {
                if let Ok(result) = api.policy.validate(&req).await {
                    set_validation.set(Some(result));
                }
            });
        }
    };

    let on_create = {
        let api = api.clone();
        let load = load.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(req) = build_request() else { return };
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                if api.policy.create(&req).await.is_ok() {
                    notifier.success("Policy created");
                    set_show_create.set(false);
                    set_validation.set(None);
                    set_requester.set(String::new());
                    set_attributes.set(String::new());
                    load();
                }
            });
        }
    };

    let on_revoke = {
        let api = api.clone();
        let load = load.clone();
        move |policy_id: String| {
            let api = api.clone();
            let load = load.clone();
            spawn_local(async move {
                if api.policy.revoke(&policy_id, None).await.is_ok() {
                    notifier.success("Policy revoked");
                    load();
                }
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        move |policy_id: String| {
            let api = api.clone();
            spawn_local(async move {
                if api.policy.delete(&policy_id).await.is_ok() {
                    notifier.success("Policy deleted");
                    set_policies.update(|list| list.retain(|p| p.policy_id != policy_id));
                }
            });
        }
    };

    let on_show_usage = {
        let api = api.clone();
        move |policy_id: String| {
            set_usage.set(None);
            set_access_log.set(None);
            set_usage_for.set(Some(policy_id.clone()));
            let api = api.clone();
            spawn_local(async move {
                if let Ok(found) = api.policy.usage(&policy_id).await {
                    set_usage.set(Some(found));
                }
                if let Ok(page) = api.policy.access_log(&policy_id, 1, 10).await {
                    set_access_log.set(Some(page));
                }
            });
        }
    };

    view! {
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Share policies"</h2>
                <p class="text-base-content/70 text-sm">
                    "Rules governing which identity attributes are exposed, to whom, and how."
                </p>
            </div>
            <button
                class="btn btn-primary btn-sm gap-2"
                on:click=move |_| {
                    set_validation.set(None);
                    set_show_create.set(true);
                }
            >
                <Plus attr:class="h-4 w-4" />
                "New policy"
            </button>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Requester"</th>
                                <th>"Attributes"</th>
                                <th class="hidden md:table-cell">"Access"</th>
                                <th class="hidden md:table-cell">"Expires"</th>
                                <th>"Status"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || policies.with(|p| p.is_empty()) && !loading.get()>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">
                                        "No share policies defined."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || loading.get() && policies.with(|p| p.is_empty())>
                                <tr>
                                    <td colspan="6" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span>
                                        " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || policies.get()
                                key=|policy| policy.policy_id.clone()
                                children={
                                    let on_revoke = on_revoke.clone();
                                    let on_delete = on_delete.clone();
                                    let on_show_usage = on_show_usage.clone();
                                    move |policy| {
                                        let on_revoke = on_revoke.clone();
                                        let on_delete = on_delete.clone();
                                        let on_show_usage = on_show_usage.clone();
                                        let revoke_id = policy.policy_id.clone();
                                        let delete_id = policy.policy_id.clone();
                                        let usage_id = policy.policy_id.clone();
                                        let revocable = policy.is_revocable();
                                        let attributes_label =
                                            policy.share_config.shared_attributes.join(", ");
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm font-bold">
                                                    {policy.requester_identifier.clone()}
                                                </td>
                                                <td class="text-sm opacity-70 max-w-48 truncate">
                                                    {attributes_label}
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class="badge badge-accent badge-outline">
                                                        {policy.share_config.access_level.as_str()}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell text-sm opacity-60">
                                                    {policy.expires_at.format("%Y-%m-%d %H:%M").to_string()}
                                                </td>
                                                <td>
                                                    <div class=status_badge(policy.status)>
                                                        {format!("{:?}", policy.status)}
                                                    </div>
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
                                                                <a on:click=move |_| on_show_usage(usage_id.clone())>
                                                                    "Usage"
                                                                </a>
                                                            </li>
                                                            <Show when=move || revocable>
                                                                <li>
                                                                    <a on:click={
                                                                        let on_revoke = on_revoke.clone();
                                                                        let revoke_id = revoke_id.clone();
                                                                        move |_| on_revoke(revoke_id.clone())
                                                                    }>"Revoke"</a>
                                                                </li>
                                                            </Show>
                                                            <li>
                                                                <a
                                                                    on:click=move |_| on_delete(delete_id.clone())
                                                                    class="text-error hover:bg-error/10"
                                                                >
                                                                    <Trash2 attr:class="mr-2 h-4 w-4" />
                                                                    "Delete"
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

        // 创建策略对话框
        <Show when=move || show_create.get()>
            <div class="modal modal-open">
                <div class="modal-box max-w-lg">
                    <h3 class="font-bold text-lg flex items-center gap-2">
                        <ShieldCheck attr:class="h-5 w-5 text-primary" />
                        "New share policy"
                    </h3>
                    <form class="space-y-3 mt-4" on:submit=on_create.clone()>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Requester identifier"</span>
                            </label>
                            <input
                                type="text"
                                placeholder="partner.example.com"
                                class="input input-bordered font-mono"
                                on:input=move |ev| set_requester.set(event_target_value(&ev))
                                prop:value=requester
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Shared attributes (comma separated)"</span>
                            </label>
                            <input
                                type="text"
                                placeholder="email, displayName"
                                class="input input-bordered"
                                on:input=move |ev| set_attributes.set(event_target_value(&ev))
                                prop:value=attributes
                                required
                            />
                        </div>
                        <div class="grid grid-cols-3 gap-3">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Access"</span>
                                </label>
                                <select
                                    class="select select-bordered select-sm"
                                    on:change=move |ev| set_access_level.set(event_target_value(&ev))
                                    prop:value=access_level
                                >
                                    <option value="READ">"READ"</option>
                                    <option value="WRITE">"WRITE"</option>
                                    <option value="ADMIN">"ADMIN"</option>
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Duration (s)"</span>
                                </label>
                                <input
                                    type="number"
                                    min="60"
                                    class="input input-bordered input-sm"
                                    on:input=move |ev| set_duration.set(event_target_value(&ev))
                                    prop:value=duration
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Max requests"</span>
                                </label>
                                <input
                                    type="number"
                                    min="1"
                                    placeholder="unlimited"
                                    class="input input-bordered input-sm"
                                    on:input=move |ev| set_max_requests.set(event_target_value(&ev))
                                    prop:value=max_requests
                                />
                            </div>
                        </div>

                        <Show when=move || validation.get().is_some()>
                            {move || {
                                let result = validation.get().unwrap();
                                view! {
                                    <div class="bg-base-200 rounded-box p-3 text-sm space-y-2">
                                        <div class="flex items-center gap-2">
                                            <span class="opacity-60">"Estimated risk:"</span>
                                            <div class=risk_badge(result.estimated_risk_level)>
                                                {format!("{:?}", result.estimated_risk_level)}
                                            </div>
                                        </div>
                                        {result
                                            .errors
                                            .iter()
                                            .map(|e| {
                                                view! { <p class="text-error">{e.clone()}</p> }
                                            })
                                            .collect::<Vec<_>>()}
                                        {result
                                            .warnings
                                            .iter()
                                            .map(|w| {
                                                view! { <p class="text-warning">{w.clone()}</p> }
                                            })
                                            .collect::<Vec<_>>()}
                                    </div>
                                }
                            }}
                        </Show>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                on:click=move |_| set_show_create.set(false)
                            >
                                "Cancel"
                            </button>
                            <button
                                type="button"
                                class="btn btn-outline"
                                on:click=on_validate.clone()
                            >
                                "Validate"
                            </button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || {
                                    validation.get().is_some_and(|v| !v.is_valid)
                                }
                            >
                                "Create"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>

        // 使用统计模态框
        <Show when=move || usage_for.get().is_some()>
            <div class="modal modal-open">
                <div class="modal-box max-w-lg">
                    <h3 class="font-bold text-lg">"Policy usage"</h3>
                    <Show
                        when=move || usage.get().is_some()
                        fallback=|| {
                            view! {
                                <div class="py-6 text-center">
                                    <span class="loading loading-spinner loading-md"></span>
                                </div>
                            }
                        }
                    >
                        {move || {
                            let current = usage.get().unwrap();
                            view! {
                                <div class="stats shadow w-full mt-4">
                                    <div class="stat py-3">
                                        <div class="stat-title">"Requests"</div>
                                        <div class="stat-value text-2xl">{current.total_requests}</div>
                                    </div>
                                    <div class="stat py-3">
                                        <div class="stat-title">"Succeeded"</div>
                                        <div class="stat-value text-2xl text-success">
                                            {current.successful_requests}
                                        </div>
                                    </div>
                                    <div class="stat py-3">
                                        <div class="stat-title">"Failed"</div>
                                        <div class="stat-value text-2xl text-error">
                                            {current.failed_requests}
                                        </div>
                                    </div>
                                    <div class="stat py-3">
                                        <div class="stat-title">"Avg ms"</div>
                                        <div class="stat-value text-2xl">
                                            {format!("{:.0}", current.average_response_time)}
                                        </div>
                                    </div>
                                </div>
                            }
                        }}
                    </Show>

                    <Show when=move || access_log.get().is_some()>
                        {move || {
                            let page = access_log.get().unwrap();
                            view! {
                                <div class="mt-4">
                                    <p class="text-sm opacity-60 mb-2">
                                        {format!("Recent access ({} total)", page.total)}
                                    </p>
                                    <table class="table table-xs">
                                        <thead>
                                            <tr>
                                                <th>"Time"</th>
                                                <th>"Requester"</th>
                                                <th>"Operation"</th>
                                                <th>"Result"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {page
                                                .items
                                                .iter()
                                                .map(|entry| {
                                                    view! {
                                                        <tr>
                                                            <td>
                                                                {entry
                                                                    .timestamp
                                                                    .format("%m-%d %H:%M")
                                                                    .to_string()}
                                                            </td>
                                                            <td class="font-mono">
                                                                {entry.requester.clone()}
                                                            </td>
                                                            <td>{entry.operation.clone()}</td>
                                                            <td>{format!("{:?}", entry.result)}</td>
                                                        </tr>
                                                    }
                                                })
                                                .collect::<Vec<_>>()}
                                        </tbody>
                                    </table>
                                </div>
                            }
                        }}
                    </Show>

                    <div class="modal-action">
                        <button class="btn btn-ghost" on:click=move |_| set_usage_for.set(None)>
                            "Close"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
