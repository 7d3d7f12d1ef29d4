//! 页面框架：导航栏与通用的状态展示

use leptos::prelude::*;
use lectern_shared::Role;

use crate::auth::{logout, use_auth};
use crate::components::icons::{AlertCircle, ArrowLeft, BookOpen, LogOut};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();

    let nav_links = move || {
        auth.user.get().map(|user| {
            let links: &[(&'static str, AppRoute)] = match user.role {
                Role::Instructor => &[
                    ("My Courses", AppRoute::InstructorCourses),
                    ("Create Course", AppRoute::CreateCourse),
                ],
                Role::Student => &[
                    ("Browse Courses", AppRoute::StudentCourses),
                    ("My Enrolled Courses", AppRoute::Enrolled),
                ],
            };
            links
                .iter()
                .map(|(label, route)| {
                    view! {
                        <li>
                            <Link to=route.to_path()>{*label}</Link>
                        </li>
                    }
                })
                .collect_view()
        })
    };

    let account = move || {
        auth.user.get().map(|user| {
            view! {
                <span class="text-sm text-base-content/70 hidden md:inline">
                    {user.username} " (" {user.role.as_str()} ")"
                </span>
                <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| logout(&auth)>
                    <LogOut attr:class="h-4 w-4" /> "Logout"
                </button>
            }
        })
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1 gap-2">
                    <Link to="/">
                        <span class="btn btn-ghost text-xl gap-2">
                            <BookOpen attr:class="h-6 w-6 text-primary" /> "Lectern"
                        </span>
                    </Link>
                    <ul class="menu menu-horizontal px-1">{nav_links}</ul>
                </div>
                <div class="flex-none gap-2">{account}</div>
            </div>
            <main class="max-w-7xl mx-auto px-4 py-6">{children()}</main>
        </div>
    }
}

#[component]
pub fn LoadingView() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 页面级消息（加载失败、资源不存在）
#[component]
pub fn PageMessage(
    #[prop(into)] message: String,
    /// 返回链接（可选）
    #[prop(optional)]
    back: Option<(AppRoute, &'static str)>,
) -> impl IntoView {
    view! {
        <div class="text-center py-12 space-y-4">
            <p class="text-error">{message}</p>
            {back.map(|(route, label)| view! { <BackLink to=route label=label /> })}
        </div>
    }
}

/// 表单级错误横幅
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|message| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <AlertCircle attr:class="h-5 w-5" />
                    <span>{message}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn BackLink(to: AppRoute, label: &'static str) -> impl IntoView {
    view! {
        <Link to=to.to_path()>
            <span class="link link-primary inline-flex items-center gap-1 mb-4">
                <ArrowLeft attr:class="h-4 w-4" /> {label}
            </span>
        </Link>
    }
}

/// 空列表提示
#[component]
pub fn EmptyState(
    #[prop(into)] message: String,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body items-center text-center">
                <p class="text-base-content/60">{message}</p>
                {children.map(|c| c())}
            </div>
        </div>
    }
}

/// 按页面状态渲染：就绪时交给 `ready`，其余状态显示统一的提示
pub fn page_view<T>(
    state: PageState<T>,
    not_found: &'static str,
    ready: impl FnOnce(T) -> AnyView,
) -> AnyView {
    match state {
        PageState::Loading => view! { <LoadingView /> }.into_any(),
        PageState::NotFound => view! { <PageMessage message=not_found /> }.into_any(),
        PageState::Failed(message) => view! { <PageMessage message=message /> }.into_any(),
        PageState::Ready(value) => ready(value),
    }
}
