//! 认证模块
//!
//! 管理当前用户状态，与路由系统解耦：路由服务只读取注入的角色信号。
//! 会话的持久化规则在 `lectern_shared::session` 中。

use lectern_shared::protocol::RegisterRequest;
use lectern_shared::session;
use lectern_shared::{ApiResult, Role, User};
use leptos::prelude::*;

use crate::api::Api;
use crate::web::{BrowserUserCache, CookieTokens};

/// 认证上下文
///
/// 通过 Context 在组件间共享，任何修改对所有读取者立即可见。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前用户（未登录为 `None`）
    pub user: RwSignal<Option<User>>,
    /// 是否正在恢复会话
    pub is_loading: RwSignal<bool>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            is_loading: RwSignal::new(true),
        }
    }

    /// 当前角色信号（用于路由服务注入）
    pub fn role_signal(&self) -> Signal<Option<Role>> {
        let user = self.user;
        Signal::derive(move || user.with(|u| u.as_ref().map(|u| u.role)))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态：存在 Access Token 时恢复缓存的用户，不访问网络
pub fn init_auth(ctx: &AuthContext) {
    let user = session::restore(&CookieTokens, &BrowserUserCache);
    tracing::debug!(restored = user.is_some(), "auth initialized");
    ctx.user.set(user);
    ctx.is_loading.set(false);
}

pub async fn login(ctx: AuthContext, api: &Api, email: &str, password: &str) -> ApiResult<User> {
    let user = session::login(api, &BrowserUserCache, email, password).await?;
    ctx.user.set(Some(user.clone()));
    Ok(user)
}

pub async fn register(ctx: AuthContext, api: &Api, request: &RegisterRequest) -> ApiResult<User> {
    let user = session::register(api, &BrowserUserCache, request).await?;
    ctx.user.set(Some(user.clone()));
    Ok(user)
}

/// 注销并清除状态
///
/// 导航由路由服务监听角色变化自动处理。
pub fn logout(ctx: &AuthContext) {
    session::logout(&CookieTokens, &BrowserUserCache);
    ctx.user.set(None);
}
