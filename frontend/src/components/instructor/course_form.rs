//! 创建与编辑课程（编辑为整条记录替换）

use lectern_shared::CourseId;
use lectern_shared::protocol::{CreateCourseRequest, GetCourseRequest, UpdateCourseRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::layout::{BackLink, ErrorAlert, Layout, page_view};
use crate::components::toast::use_toaster;
use crate::state::{FormStatus, PageState};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// `course` 为 `None` 时创建新课程
#[component]
pub fn CourseFormPage(course: Option<CourseId>) -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let toaster = use_toaster();

    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let status = RwSignal::new(FormStatus::Idle);
    let page = RwSignal::new(match course {
        Some(_) => PageState::Loading,
        None => PageState::Ready(()),
    });

    if let Some(id) = course {
        let api = api.clone();
        spawn_local(async move {
            let result = api.send(&GetCourseRequest { id }).await.map(|loaded| {
                title.set(loaded.title);
                description.set(loaded.description);
            });
            page.set(PageState::from_result(result, "Failed to load course"));
        });
    }

    let error = Signal::derive(move || status.with(|s| s.error().map(str::to_string)));
    let submitting = move || status.with(FormStatus::is_submitting);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let title_value = title.get_untracked().trim().to_string();
        if title_value.is_empty() {
            status.update(|s| s.fail_with("Title is required"));
            return;
        }
        if !status.try_update(FormStatus::begin).unwrap_or(false) {
            return;
        }

        let description_value = description.get_untracked();
        let api = api.clone();
        spawn_local(async move {
            let result = match course {
                Some(id) => {
                    api.send(&UpdateCourseRequest {
                        id,
                        title: title_value,
                        description: description_value,
                    })
                    .await
                }
                None => {
                    api.send(&CreateCourseRequest {
                        title: title_value,
                        description: description_value,
                    })
                    .await
                }
            };
            match result {
                Ok(saved) => {
                    status.update(FormStatus::finish);
                    toaster.success(if course.is_some() { "Course updated" } else { "Course created" });
                    router.navigate_to(AppRoute::InstructorCourse(saved.id));
                }
                Err(e) => {
                    let fallback = if course.is_some() {
                        "Failed to update course"
                    } else {
                        "Failed to create course"
                    };
                    status.update(|s| s.fail(&e, fallback));
                }
            }
        });
    };

    let (heading, submit_label) = match course {
        Some(_) => ("Edit Course", "Save Changes"),
        None => ("Create New Course", "Create Course"),
    };
    let back = match course {
        Some(id) => (AppRoute::InstructorCourse(id), "Back to Course"),
        None => (AppRoute::InstructorCourses, "Back to My Courses"),
    };

    let form = move || {
        view! {
            <form class="card bg-base-100 shadow" on:submit=on_submit.clone()>
                <div class="card-body gap-4">
                    <ErrorAlert message=error />
                    <div class="form-control">
                        <label class="label" for="course-title">
                            <span class="label-text">"Course Title"</span>
                        </label>
                        <input
                            id="course-title"
                            type="text"
                            class="input input-bordered"
                            prop:value=move || title.get()
                            on:input=move |ev| title.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="course-description">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="course-description"
                            rows="4"
                            class="textarea textarea-bordered"
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    <div class="card-actions justify-end">
                        <button type="submit" class="btn btn-primary" disabled=submitting>
                            {move || {
                                if submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }
                                        .into_any()
                                } else {
                                    submit_label.into_any()
                                }
                            }}
                        </button>
                    </div>
                </div>
            </form>
        }
        .into_any()
    };

    view! {
        <Layout>
            <div class="max-w-2xl mx-auto">
                <BackLink to=back.0 label=back.1 />
                <h1 class="text-3xl font-bold mb-6">{heading}</h1>
                {move || page_view(page.get(), "Course not found", |()| form())}
            </div>
        </Layout>
    }
}
