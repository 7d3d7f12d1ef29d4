//! 会话生命周期：恢复、登录、注册、注销
//!
//! Token 由 [`TokenStore`] 保存，用户记录由 [`UserCache`] 缓存，
//! 前端的认证上下文只负责把结果写入信号。

use thiserror::Error;

use crate::User;
use crate::client::{ApiClient, HttpTransport, LoginRedirect, TokenStore};
use crate::error::{ApiError, ApiResult};
use crate::protocol::{AuthResponse, LoginRequest, RegisterRequest};

/// 缓存的用户记录无法解析
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cached user is unreadable: {0}")]
pub struct CacheError(pub String);

/// 持久化的当前用户记录
pub trait UserCache {
    fn load_user(&self) -> Result<Option<User>, CacheError>;
    fn store_user(&self, user: &User);
    fn clear_user(&self);
}

/// 启动时恢复会话：只有存在 Access Token 时才信任缓存的用户
pub fn restore<S: TokenStore, C: UserCache>(tokens: &S, cache: &C) -> Option<User> {
    if tokens.access_token().is_none() {
        cache.clear_user();
        return None;
    }

    match cache.load_user() {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "dropping unreadable cached user");
            cache.clear_user();
            None
        }
    }
}

pub async fn login<T, S, R, C>(
    client: &ApiClient<T, S, R>,
    cache: &C,
    email: &str,
    password: &str,
) -> ApiResult<User>
where
    T: HttpTransport + Clone + 'static,
    S: TokenStore + Clone + 'static,
    R: LoginRedirect,
    C: UserCache,
{
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let response = client
        .send(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    Ok(establish(client.tokens(), cache, response))
}

pub async fn register<T, S, R, C>(
    client: &ApiClient<T, S, R>,
    cache: &C,
    request: &RegisterRequest,
) -> ApiResult<User>
where
    T: HttpTransport + Clone + 'static,
    S: TokenStore + Clone + 'static,
    R: LoginRedirect,
    C: UserCache,
{
    let response = client.send(request).await?;
    Ok(establish(client.tokens(), cache, response))
}

/// 清除 Token 与缓存用户；不访问网络
pub fn logout<S: TokenStore, C: UserCache>(tokens: &S, cache: &C) {
    tokens.clear_tokens();
    cache.clear_user();
    tracing::info!("logged out");
}

fn establish<S: TokenStore, C: UserCache>(tokens: &S, cache: &C, response: AuthResponse) -> User {
    tokens.store_tokens(&response.tokens());
    cache.store_user(&response.user);
    tracing::info!(user = response.user.id, role = response.user.role.as_str(), "signed in");
    response.user
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::Role;
    use crate::client::tests::{
        MemoryTokenStore, MockRedirect, MockTransport, create_client, user_json,
    };

    /// 以 JSON 字符串保存用户，模拟浏览器存储
    #[derive(Clone, Default)]
    struct MemoryUserCache {
        raw: Rc<RefCell<Option<String>>>,
    }

    impl MemoryUserCache {
        fn with_raw(raw: &str) -> Self {
            let cache = Self::default();
            *cache.raw.borrow_mut() = Some(raw.to_string());
            cache
        }

        fn raw(&self) -> Option<String> {
            self.raw.borrow().clone()
        }
    }

    impl UserCache for MemoryUserCache {
        fn load_user(&self) -> Result<Option<User>, CacheError> {
            match self.raw.borrow().as_deref() {
                None => Ok(None),
                Some(raw) => serde_json::from_str(raw)
                    .map(Some)
                    .map_err(|e| CacheError(e.to_string())),
            }
        }

        fn store_user(&self, user: &User) {
            *self.raw.borrow_mut() = serde_json::to_string(user).ok();
        }

        fn clear_user(&self) {
            *self.raw.borrow_mut() = None;
        }
    }

    fn auth_body(role: &str) -> String {
        format!(
            r#"{{"user": {}, "access": "acc", "refresh": "ref"}}"#,
            user_json(4, role)
        )
    }

    // =========================================================
    // restore 测试
    // =========================================================

    #[test]
    fn test_restore_uses_cached_user_when_token_present() {
        let tokens = MemoryTokenStore::with(Some("acc"), Some("ref"));
        let cache = MemoryUserCache::with_raw(&user_json(4, "instructor"));

        let user = restore(&tokens, &cache).unwrap();
        assert_eq!(user.id, 4);
        assert_eq!(user.role, Role::Instructor);
    }

    #[test]
    fn test_restore_without_token_drops_stale_user() {
        let tokens = MemoryTokenStore::default();
        let cache = MemoryUserCache::with_raw(&user_json(4, "student"));

        assert_eq!(restore(&tokens, &cache), None);
        assert_eq!(cache.raw(), None);
    }

    #[test]
    fn test_restore_removes_corrupt_cache() {
        let tokens = MemoryTokenStore::with(Some("acc"), None);
        let cache = MemoryUserCache::with_raw("{not json");

        assert_eq!(restore(&tokens, &cache), None);
        assert_eq!(cache.raw(), None);
    }

    #[test]
    fn test_restore_with_token_but_no_cache() {
        let tokens = MemoryTokenStore::with(Some("acc"), None);
        assert_eq!(restore(&tokens, &MemoryUserCache::default()), None);
    }

    // =========================================================
    // login / register / logout 测试
    // =========================================================

    #[tokio::test]
    async fn test_login_stores_tokens_and_user() {
        let transport = MockTransport::new();
        transport.respond(200, &auth_body("student"));
        let tokens = MemoryTokenStore::default();
        let cache = MemoryUserCache::default();
        let client = create_client(&transport, &tokens, &MockRedirect::default());

        let user = login(&client, &cache, " s@example.com ", "pw").await.unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(tokens.access_token().as_deref(), Some("acc"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("ref"));
        assert_eq!(cache.load_user().unwrap(), Some(user));

        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"email": "s@example.com", "password": "pw"}));
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_makes_no_request() {
        let transport = MockTransport::new();
        let client = create_client(&transport, &MemoryTokenStore::default(), &MockRedirect::default());
        let cache = MemoryUserCache::default();

        let err = login(&client, &cache, "  ", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        let err = login(&client, &cache, "a@b.c", "").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_login_invalid_credentials_leaves_state_untouched() {
        let transport = MockTransport::new();
        transport.respond(401, r#"{"error": "Invalid credentials"}"#);
        let tokens = MemoryTokenStore::default();
        let cache = MemoryUserCache::default();
        let redirect = MockRedirect::default();
        let client = create_client(&transport, &tokens, &redirect);

        let err = login(&client, &cache, "a@b.c", "bad").await.unwrap_err();
        assert!(matches!(err, ApiError::Authentication { .. }));
        assert_eq!(tokens.access_token(), None);
        assert_eq!(cache.raw(), None);
        assert_eq!(redirect.count(), 0);
    }

    #[tokio::test]
    async fn test_register_surfaces_field_errors() {
        let transport = MockTransport::new();
        transport.respond(400, r#"{"username": ["A user with that username already exists."]}"#);
        let cache = MemoryUserCache::default();
        let client = create_client(&transport, &MemoryTokenStore::default(), &MockRedirect::default());

        let req = RegisterRequest {
            email: "n@example.com".to_string(),
            username: "taken".to_string(),
            password: "pw12345678".to_string(),
            password2: "pw12345678".to_string(),
            role: Role::Student,
        };
        let err = register(&client, &cache, &req).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields["username"],
            vec!["A user with that username already exists."]
        );
        assert_eq!(cache.raw(), None);
    }

    #[tokio::test]
    async fn test_register_then_logout() {
        let transport = MockTransport::new();
        transport.respond(201, &auth_body("instructor"));
        let tokens = MemoryTokenStore::default();
        let cache = MemoryUserCache::default();
        let client = create_client(&transport, &tokens, &MockRedirect::default());

        let req = RegisterRequest {
            email: "i@example.com".to_string(),
            username: "inst".to_string(),
            password: "pw".to_string(),
            password2: "pw".to_string(),
            role: Role::Instructor,
        };
        let user = register(&client, &cache, &req).await.unwrap();
        assert_eq!(user.role, Role::Instructor);
        assert_eq!(restore(&tokens, &cache), Some(user));

        logout(&tokens, &cache);
        assert_eq!(tokens.access_token(), None);
        assert_eq!(tokens.refresh_token(), None);
        assert_eq!(cache.raw(), None);
        assert_eq!(restore(&tokens, &cache), None);
    }
}
