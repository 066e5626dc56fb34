//! LocalStorage 封装
//!
//! 对 `gloo-storage` 的薄封装：值按字符串存取，失败（隐私模式、
//! 容量等）一律视为"键不存在"。

use gloo_storage::{LocalStorage as Backend, Storage as _};

pub struct LocalStorage;

impl LocalStorage {
    pub fn get(key: &str) -> Option<String> {
        Backend::get(key).ok()
    }

    pub fn set(key: &str, value: &str) -> bool {
        Backend::set(key, value).is_ok()
    }

    pub fn delete(key: &str) {
        Backend::delete(key);
    }
}
