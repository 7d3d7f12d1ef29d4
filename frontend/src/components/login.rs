use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::icons::BookOpen;
use crate::components::layout::ErrorAlert;
use crate::state::FormStatus;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 登录与注册页共用的居中卡片
#[component]
pub fn AuthCard(title: &'static str, subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <BookOpen attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{title}</h1>
                        <p class="text-base-content/70">{subtitle}</p>
                    </div>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">{children()}</div>
            </div>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let status = RwSignal::new(FormStatus::Idle);

    let error = Signal::derive(move || status.with(|s| s.error().map(str::to_string)));
    let submitting = move || status.with(FormStatus::is_submitting);

    // 登录成功后由路由服务根据新角色跳转
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if !status.try_update(FormStatus::begin).unwrap_or(false) {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            let result = login(auth, &api, &email.get_untracked(), &password.get_untracked()).await;
            match result {
                Ok(_) => status.update(FormStatus::finish),
                Err(e) => status.update(|s| s.fail(&e, "Login failed")),
            }
        });
    };

    view! {
        <AuthCard title="Lectern" subtitle="Sign in to continue">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert message=error />

                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="you@example.com"
                        class="input input-bordered"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        class="input input-bordered"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        required
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=submitting>
                        {move || {
                            if submitting() {
                                view! { <span class="loading loading-spinner"></span> "Signing in..." }
                                    .into_any()
                            } else {
                                "Sign in".into_any()
                            }
                        }}
                    </button>
                </div>
                <p class="text-center text-sm mt-2">
                    "Don't have an account? "
                    <Link to=AppRoute::Register.to_path()>
                        <span class="link link-primary">"Register"</span>
                    </Link>
                </p>
            </form>
        </AuthCard>
    }
}
