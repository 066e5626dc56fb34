//! 系统设置页：主题与语言偏好

use leptos::prelude::*;

use crate::app::{Locale, Theme, use_app};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let app_ctx = use_app();

    let theme = move || app_ctx.state.with(|s| s.theme);
    let locale = move || app_ctx.state.with(|s| s.locale);
    let current_page = move || app_ctx.state.with(|s| s.current_page.clone());

    view! {
        <div>
            <h2 class="text-2xl font-bold">"Settings"</h2>
            <p class="text-base-content/70 text-sm">
                "Preferences are stored locally in this browser."
            </p>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">"Appearance"</h3>
                    <div class="form-control">
                        <label class="label cursor-pointer justify-start gap-4">
                            <input
                                type="checkbox"
                                class="toggle toggle-primary"
                                prop:checked=move || theme() == Theme::Dark
                                on:change=move |_| app_ctx.toggle_theme()
                            />
                            <span class="label-text">
                                {move || {
                                    match theme() {
                                        Theme::Dark => "Dark theme",
                                        Theme::Light => "Light theme",
                                    }
                                }}
                            </span>
                        </label>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">"Language"</h3>
                    <select
                        class="select select-bordered w-full max-w-xs"
                        on:change=move |ev| {
                            if let Some(parsed) = Locale::parse(&event_target_value(&ev)) {
                                app_ctx.set_locale(parsed);
                            }
                        }
                        prop:value=move || locale().as_str().to_string()
                    >
                        {[Locale::ZhCn, Locale::EnUs]
                            .into_iter()
                            .map(|option| {
                                view! {
                                    <option value=option.as_str()>{option.label()}</option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title text-base">"About"</h3>
                <div class="text-sm space-y-1 opacity-70">
                    <p>"IdHub Console " {env!("CARGO_PKG_VERSION")}</p>
                    <p>
                        "Current page: "
                        <span class="font-mono">{move || current_page().path}</span>
                    </p>
                </div>
            </div>
        </div>
    }
}
