//! 应用级状态
//!
//! UI 层的全局状态：加载标志、主题、语言与当前页面信息。
//! 主题与语言持久化到 LocalStorage，启动时由 `init_app` 恢复。

use leptos::prelude::*;

use crate::web::LocalStorage;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhCn,
    EnUs,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zh-CN" => Some(Locale::ZhCn),
            "en-US" => Some(Locale::EnUs),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Locale::ZhCn => "简体中文",
            Locale::EnUs => "English",
        }
    }
}

/// 当前页面信息，导航完成后由路由同步
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInfo {
    pub name: String,
    pub path: String,
    pub title: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub is_loading: bool,
    pub theme: Theme,
    pub locale: Locale,
    pub current_page: PageInfo,
}

/// 应用状态上下文
#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: ReadSignal<AppState>,
    pub set_state: WriteSignal<AppState>,
}

impl AppContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AppState::default());
        Self { state, set_state }
    }

    pub fn set_loading(&self, loading: bool) {
        self.set_state.update(|state| state.is_loading = loading);
    }

    pub fn toggle_theme(&self) {
        let next = self.state.with_untracked(|s| s.theme.toggled());
        self.set_state.update(|state| state.theme = next);
        LocalStorage::set(THEME_KEY, next.as_str());
        apply_body_theme(next);
    }

    pub fn set_locale(&self, locale: Locale) {
        self.set_state.update(|state| state.locale = locale);
        LocalStorage::set(LANGUAGE_KEY, locale.as_str());
    }

    pub fn set_current_page(&self, page: PageInfo) {
        self.set_state.update(|state| state.current_page = page);
    }

    pub fn is_dark_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().theme == Theme::Dark)
    }
}

pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

/// 从 LocalStorage 恢复主题与语言设置
pub fn init_app(ctx: &AppContext) {
    let theme = LocalStorage::get(THEME_KEY)
        .and_then(|v| Theme::parse(&v))
        .unwrap_or_default();
    let locale = LocalStorage::get(LANGUAGE_KEY)
        .and_then(|v| Locale::parse(&v))
        .unwrap_or_default();

    ctx.set_state.update(|state| {
        state.theme = theme;
        state.locale = locale;
    });
    apply_body_theme(theme);
}

/// 同步 body 的主题类与 daisyUI 的 data-theme 属性
fn apply_body_theme(theme: Theme) {
    if let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    {
        body.set_class_name(theme.as_str());
        let _ = body.set_attribute("data-theme", theme.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_round_trips_through_storage_format() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("solarized"), None);
    }

    #[test]
    fn theme_toggle_alternates() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn locale_round_trips_through_storage_format() {
        for locale in [Locale::ZhCn, Locale::EnUs] {
            assert_eq!(Locale::parse(locale.as_str()), Some(locale));
        }
        assert_eq!(Locale::parse("fr-FR"), None);
    }
}
