use std::collections::BTreeMap;

use lectern_shared::Role;
use lectern_shared::protocol::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::{register, use_auth};
use crate::components::layout::ErrorAlert;
use crate::components::login::AuthCard;
use crate::state::FormStatus;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 表单输入框，附带后端返回的字段错误
#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<BTreeMap<String, Vec<String>>>,
) -> impl IntoView {
    let field_error = move || {
        errors.with(|errors| {
            errors.get(id).map(|messages| {
                view! {
                    <label class="label">
                        <span class="label-text-alt text-error">{messages.join(" ")}</span>
                    </label>
                }
            })
        })
    };

    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                class="input input-bordered"
                class:input-error=move || errors.with(|e| e.contains_key(id))
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                required
            />
            {field_error}
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let password2 = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Student);
    let status = RwSignal::new(FormStatus::Idle);
    let field_errors = RwSignal::new(BTreeMap::<String, Vec<String>>::new());

    let error = Signal::derive(move || status.with(|s| s.error().map(str::to_string)));
    let submitting = move || status.with(FormStatus::is_submitting);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if password.with_untracked(|p| password2.with_untracked(|p2| p != p2)) {
            status.update(|s| s.fail_with("Passwords do not match"));
            return;
        }
        if !status.try_update(FormStatus::begin).unwrap_or(false) {
            return;
        }
        field_errors.set(BTreeMap::new());

        let request = RegisterRequest {
            email: email.get_untracked().trim().to_string(),
            username: username.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            password2: password2.get_untracked(),
            role: role.get_untracked(),
        };
        let api = api.clone();
        spawn_local(async move {
            match register(auth, &api, &request).await {
                Ok(_) => status.update(FormStatus::finish),
                Err(e) => {
                    if let Some(fields) = e.field_errors() {
                        field_errors.set(fields.clone());
                    }
                    status.update(|s| s.fail(&e, "Registration failed"));
                }
            }
        });
    };

    view! {
        <AuthCard title="Create an account" subtitle="Join Lectern as a student or instructor">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert message=error />

                <Field id="email" label="Email" input_type="email" value=email errors=field_errors />
                <Field id="username" label="Username" value=username errors=field_errors />
                <Field id="password" label="Password" input_type="password" value=password errors=field_errors />
                <Field id="password2" label="Confirm password" input_type="password" value=password2 errors=field_errors />

                <div class="form-control">
                    <label class="label" for="role">
                        <span class="label-text">"I am a"</span>
                    </label>
                    <select
                        id="role"
                        class="select select-bordered"
                        on:change=move |ev| {
                            let next = match event_target_value(&ev).as_str() {
                                "instructor" => Role::Instructor,
                                _ => Role::Student,
                            };
                            role.set(next);
                        }
                    >
                        <option value="student" selected=move || role.get() == Role::Student>
                            "Student"
                        </option>
                        <option value="instructor" selected=move || role.get() == Role::Instructor>
                            "Instructor"
                        </option>
                    </select>
                </div>

                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=submitting>
                        {move || {
                            if submitting() {
                                view! { <span class="loading loading-spinner"></span> "Creating account..." }
                                    .into_any()
                            } else {
                                "Register".into_any()
                            }
                        }}
                    </button>
                </div>
                <p class="text-center text-sm mt-2">
                    "Already have an account? "
                    <Link to=AppRoute::Login.to_path()>
                        <span class="link link-primary">"Sign in"</span>
                    </Link>
                </p>
            </form>
        </AuthCard>
    }
}
