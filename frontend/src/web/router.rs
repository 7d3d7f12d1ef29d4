//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程。

use lectern_shared::Role;
use lectern_shared::client::LoginRedirect;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Token 刷新失败后整页跳转到登录页，丢弃所有页面状态
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationRedirect;

impl LoginRedirect for LocationRedirect {
    fn redirect_to_login(&self) {
        let target = AppRoute::Login.to_path();
        if let Some(window) = web_sys::window() {
            if window.location().set_href(&target).is_err() {
                tracing::error!("failed to redirect to {}", target);
            }
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；当前用户角色由外部注入，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    role: Signal<Option<Role>>,
}

impl RouterService {
    fn new(role: Signal<Option<Role>>) -> Self {
        let path = current_path();
        let requested = AppRoute::from_path(&path);
        let route = requested.resolve(role.get_untracked());
        if route != requested {
            tracing::info!(from = %requested, to = %route, "initial route redirected");
            replace_history_state(&route.to_path());
        }

        Self {
            current_route: RwSignal::new(route),
            role,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        let route = target.resolve(self.role.get_untracked());
        if route != target {
            tracing::info!(from = %target, to = %route, "access denied, redirecting");
        }
        push_history_state(&route.to_path());
        self.current_route.set(route);
    }

    /// 浏览器后退/前进时同样执行守卫
    fn init_popstate_listener(&self) {
        let current_route = self.current_route;
        let role = self.role;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_path(&current_path());
            let route = requested.resolve(role.get_untracked());
            if route != requested {
                replace_history_state(&route.to_path());
            }
            current_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 登录、注销后按新角色重新守卫当前页面
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let role = self.role;

        Effect::new(move |_| {
            let role = role.get();
            let current = current_route.get_untracked();
            let route = current.resolve(role);
            if route != current {
                tracing::info!(from = %current, to = %route, "session changed, redirecting");
                push_history_state(&route.to_path());
                current_route.set(route);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(role: Signal<Option<Role>>) -> RouterService {
    let router = RouterService::new(role);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 当前用户角色（未登录为 `None`）
    role: Signal<Option<Role>>,
    children: Children,
) -> impl IntoView {
    provide_router(role);

    children()
}

/// 路由出口组件：根据当前路由状态渲染对应的页面
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：普通点击走路由服务，带修饰键的点击交给浏览器
#[component]
pub fn Link(#[prop(into)] to: String, children: Children) -> impl IntoView {
    let router = use_router();

    let href = to.clone();
    let on_click = move |ev: MouseEvent| {
        if ev.button() != 0 || ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.alt_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}
