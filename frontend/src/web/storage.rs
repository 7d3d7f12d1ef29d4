//! 浏览器存储
//!
//! - Token 保存在 Cookie 中（`access_token` / `refresh_token`）
//! - 当前用户以 JSON 形式缓存在 LocalStorage 的 `user` 键下

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use lectern_shared::client::TokenStore;
use lectern_shared::session::{CacheError, UserCache};
use lectern_shared::{COOKIE_ACCESS_TOKEN, COOKIE_REFRESH_TOKEN, STORAGE_USER_KEY, TokenPair, User};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

// =========================================================
// Cookie
// =========================================================

const COOKIE_ATTRIBUTES: &str = "path=/; SameSite=Lax";

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// 从 `document.cookie` 字符串中读取指定 Cookie；空值视为不存在
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn get_cookie(name: &str) -> Option<String> {
    let cookies = html_document()?.cookie().ok()?;
    read_cookie(&cookies, name)
}

fn write_cookie(cookie: &str) {
    let written = html_document().map(|doc| doc.set_cookie(cookie));
    if !matches!(written, Some(Ok(()))) {
        tracing::warn!("failed to write cookie");
    }
}

fn set_cookie(name: &str, value: &str) {
    write_cookie(&format!("{}={}; {}", name, value, COOKIE_ATTRIBUTES));
}

fn remove_cookie(name: &str) {
    write_cookie(&format!("{}=; max-age=0; {}", name, COOKIE_ATTRIBUTES));
}

/// 基于 Cookie 的 Token 存储
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieTokens;

impl TokenStore for CookieTokens {
    fn access_token(&self) -> Option<String> {
        get_cookie(COOKIE_ACCESS_TOKEN)
    }

    fn refresh_token(&self) -> Option<String> {
        get_cookie(COOKIE_REFRESH_TOKEN)
    }

    fn store_tokens(&self, tokens: &TokenPair) {
        set_cookie(COOKIE_ACCESS_TOKEN, &tokens.access);
        set_cookie(COOKIE_REFRESH_TOKEN, &tokens.refresh);
    }

    fn store_access_token(&self, access: &str) {
        set_cookie(COOKIE_ACCESS_TOKEN, access);
    }

    fn clear_tokens(&self) {
        remove_cookie(COOKIE_ACCESS_TOKEN);
        remove_cookie(COOKIE_REFRESH_TOKEN);
    }
}

// =========================================================
// LocalStorage
// =========================================================

/// 基于 LocalStorage 的用户缓存
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserUserCache;

impl UserCache for BrowserUserCache {
    fn load_user(&self) -> Result<Option<User>, CacheError> {
        match LocalStorage::get::<User>(STORAGE_USER_KEY) {
            Ok(user) => Ok(Some(user)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(CacheError(e.to_string())),
        }
    }

    fn store_user(&self, user: &User) {
        if let Err(e) = LocalStorage::set(STORAGE_USER_KEY, user) {
            tracing::warn!(error = %e, "failed to cache user");
        }
    }

    fn clear_user(&self) {
        LocalStorage::delete(STORAGE_USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie_finds_named_value() {
        let cookies = "theme=dark; access_token=abc.def.ghi; refresh_token=r1";
        assert_eq!(read_cookie(cookies, "access_token").as_deref(), Some("abc.def.ghi"));
        assert_eq!(read_cookie(cookies, "refresh_token").as_deref(), Some("r1"));
    }

    #[test]
    fn test_read_cookie_requires_exact_name() {
        let cookies = "my_access_token=x; access_token_old=y";
        assert_eq!(read_cookie(cookies, "access_token"), None);
    }

    #[test]
    fn test_read_cookie_treats_empty_as_missing() {
        assert_eq!(read_cookie("access_token=; other=1", "access_token"), None);
        assert_eq!(read_cookie("", "access_token"), None);
    }
}
