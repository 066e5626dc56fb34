//! 通知服务
//!
//! 全局 toast 队列：请求管线与各页面通过 `Notifier` 推送提示，
//! `NotificationHost` 在根组件渲染通知栈，3 秒后自动消失。

use leptos::prelude::*;
use std::time::Duration;

/// 通知在队列中停留的时长
const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
    Info,
}

impl NotifyLevel {
    fn alert_class(&self) -> &'static str {
        match self {
            NotifyLevel::Success => "alert-success",
            NotifyLevel::Error => "alert-error",
            NotifyLevel::Info => "alert-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: NotifyLevel,
    pub message: String,
}

/// 通知上下文，经 Context 在组件与请求管线间共享
#[derive(Clone, Copy)]
pub struct Notifier {
    items: ReadSignal<Vec<Notification>>,
    set_items: WriteSignal<Vec<Notification>>,
    next_id: StoredValue<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        let (items, set_items) = signal(Vec::new());
        Self {
            items,
            set_items,
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, level: NotifyLevel, message: &str) {
        let mut id = 0;
        self.next_id.update_value(|n| {
            *n += 1;
            id = *n;
        });

        let notification = Notification {
            id,
            level,
            message: message.to_string(),
        };
        self.set_items.update(|items| items.push(notification));

        // 到期自动出队
        let set_items = self.set_items;
        set_timeout(
            move || set_items.update(|items| items.retain(|n| n.id != id)),
            DISMISS_AFTER,
        );
    }

    pub fn success(&self, message: &str) {
        self.push(NotifyLevel::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.push(NotifyLevel::Error, message);
    }

    pub fn info(&self, message: &str) {
        self.push(NotifyLevel::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.set_items.update(|items| items.retain(|n| n.id != id));
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

/// 通知栈渲染组件，挂在 App 根部
#[component]
pub fn NotificationHost() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || notifier.items.get()
                key=|n| n.id
                children=move |n| {
                    let notifier = notifier;
                    let id = n.id;
                    view! {
                        <div
                            class=format!("alert {} shadow-lg cursor-pointer", n.level.alert_class())
                            on:click=move |_| notifier.dismiss(id)
                        >
                            <span>{n.message.clone()}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
