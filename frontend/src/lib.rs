//! Lectern 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `api`: 装配浏览器适配器的 API 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod state;
mod components {
    pub mod chapter_form;
    pub mod content_editor;
    pub mod content_view;
    mod icons;
    pub mod instructor;
    pub mod layout;
    pub mod login;
    pub mod register;
    pub mod student;
    pub mod toast;
}

use crate::api::create_api;
use crate::auth::{AuthContext, init_auth};
use crate::components::instructor::{
    CourseFormPage, CreateChapterPage, EditChapterPage, InstructorCoursePage, InstructorCoursesPage,
};
use crate::components::layout::LoadingView;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::student::{
    EnrolledPage, StudentChapterPage, StudentCoursePage, StudentCoursesPage,
};
use crate::components::toast::{ToastHost, Toaster};
use crate::config::AppConfig;

use leptos::prelude::*;

// 浏览器 API 适配层：fetch、Cookie、LocalStorage、History
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchTransport;
    pub use storage::{BrowserUserCache, CookieTokens};
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，守卫已在路由服务中完成。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        // 首页总会被守卫重定向，这里只是过渡状态
        AppRoute::Home => view! { <LoadingView /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::InstructorCourses => view! { <InstructorCoursesPage /> }.into_any(),
        AppRoute::CreateCourse => view! { <CourseFormPage course=None /> }.into_any(),
        AppRoute::InstructorCourse(id) => view! { <InstructorCoursePage id=id /> }.into_any(),
        AppRoute::EditCourse(id) => view! { <CourseFormPage course=Some(id) /> }.into_any(),
        AppRoute::CreateChapter(course) => {
            view! { <CreateChapterPage course=course /> }.into_any()
        }
        AppRoute::EditChapter(id) => view! { <EditChapterPage id=id /> }.into_any(),
        AppRoute::StudentCourses => view! { <StudentCoursesPage /> }.into_any(),
        AppRoute::StudentCourse(id) => view! { <StudentCoursePage id=id /> }.into_any(),
        AppRoute::Enrolled => view! { <EnrolledPage /> }.into_any(),
        AppRoute::StudentChapter(id) => view! { <StudentChapterPage id=id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/">
                        <span class="btn btn-primary btn-sm">"Go home"</span>
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 从 Cookie 与 LocalStorage 恢复会话（不访问网络）
    init_auth(&auth_ctx);

    // 3. API 客户端与全局通知
    let config = AppConfig::from_env();
    tracing::info!(api_url = %config.api_url, "starting lectern frontend");
    provide_context(create_api(&config));
    provide_context(Toaster::new());

    // 4. 角色信号注入路由服务，实现守卫
    let role = auth_ctx.role_signal();
    let is_loading = auth_ctx.is_loading;

    view! {
        <Router role=role>
            <ToastHost />
            <Show when=move || !is_loading.get() fallback=|| view! { <LoadingView /> }>
                <RouterOutlet matcher=route_matcher />
            </Show>
        </Router>
    }
}
