use lectern_shared::protocol::{
    JoinCourseRequest, JoinCourseResponse, ListCoursesRequest, ListResponse,
};
use lectern_shared::{ApiResult, Course, CourseId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{Api, use_api};
use crate::components::layout::{EmptyState, Layout, page_view};
use crate::components::toast::{Toaster, use_toaster};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

const JOINED_MESSAGE: &str = "Successfully joined the course!";

fn load_courses(api: Api, state: RwSignal<PageState<Vec<Course>>>) {
    spawn_local(async move {
        let result = api.send(&ListCoursesRequest).await.map(ListResponse::into_vec);
        state.set(PageState::from_result(result, "Failed to load courses"));
    });
}

/// 加入课程请求的结果，决定提示文案以及是否刷新列表
#[derive(Debug, Clone, PartialEq, Eq)]
enum JoinOutcome {
    Joined(String),
    Failed(String),
}

impl JoinOutcome {
    fn from_result(result: &ApiResult<Option<JoinCourseResponse>>) -> Self {
        match result {
            Ok(response) => JoinOutcome::Joined(
                response
                    .as_ref()
                    .and_then(|r| r.message.clone())
                    .unwrap_or_else(|| JOINED_MESSAGE.to_string()),
            ),
            Err(e) => JoinOutcome::Failed(e.user_message("Failed to join course")),
        }
    }

    fn reloads_list(&self) -> bool {
        matches!(self, JoinOutcome::Joined(_))
    }
}

/// 加入课程；重复加入时后端同样返回成功，并在消息中说明。成功后重新拉取课程列表
fn join_course(
    api: Api,
    toaster: Toaster,
    state: RwSignal<PageState<Vec<Course>>>,
    joining: RwSignal<Option<CourseId>>,
    id: CourseId,
) {
    joining.set(Some(id));
    spawn_local(async move {
        let result = api.send(&JoinCourseRequest { id }).await;
        if let Err(e) = &result {
            tracing::warn!(course = id, error = %e, "join failed");
        }
        let outcome = JoinOutcome::from_result(&result);
        if outcome.reloads_list() {
            tracing::info!(course = id, "joined course");
            load_courses(api, state);
        }
        match outcome {
            JoinOutcome::Joined(message) => toaster.success(message),
            JoinOutcome::Failed(message) => toaster.error(message),
        }
        joining.set(None);
    });
}

#[component]
pub fn StudentCoursesPage() -> impl IntoView {
    let api = use_api();
    let toaster = use_toaster();
    let state = RwSignal::new(PageState::<Vec<Course>>::Loading);
    let joining = RwSignal::new(None::<CourseId>);

    load_courses(api.clone(), state);

    let course_card = move |course: Course| {
        let api = api.clone();
        let id = course.id;
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h3 class="card-title">{course.title}</h3>
                    <p class="text-sm text-base-content/70">{course.description}</p>
                    <p class="text-xs text-base-content/50">
                        "Instructor: " {course.instructor.email}
                    </p>
                    <div class="card-actions justify-between items-center mt-2">
                        <Link to=AppRoute::StudentCourse(id).to_path()>
                            <span class="link link-primary text-sm">"View Course"</span>
                        </Link>
                        <button
                            class="btn btn-success btn-sm"
                            disabled=move || joining.get().is_some()
                            on:click=move |_| join_course(api.clone(), toaster, state, joining, id)
                        >
                            {move || {
                                if joining.get() == Some(id) { "Joining..." } else { "Join Course" }
                            }}
                        </button>
                    </div>
                </div>
            </div>
        }
    };

    view! {
        <Layout>
            <h1 class="text-3xl font-bold mb-6">"Available Courses"</h1>
            {move || {
                let course_card = course_card.clone();
                page_view(state.get(), "Courses not found", move |courses| {
                    if courses.is_empty() {
                        return view! {
                            <EmptyState message="No courses available at the moment." />
                        }
                        .into_any();
                    }
                    view! {
                        <div class="grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            {courses.into_iter().map(course_card).collect_view()}
                        </div>
                    }
                    .into_any()
                })
            }}
        </Layout>
    }
}

#[cfg(test)]
mod tests {
    use lectern_shared::ApiError;

    use super::*;

    #[test]
    fn test_join_success_uses_backend_message_and_reloads() {
        let result = Ok(Some(JoinCourseResponse {
            message: Some("Already enrolled".to_string()),
        }));
        let outcome = JoinOutcome::from_result(&result);
        assert_eq!(outcome, JoinOutcome::Joined("Already enrolled".to_string()));
        assert!(outcome.reloads_list());
    }

    #[test]
    fn test_join_success_without_body_uses_default_message() {
        let outcome = JoinOutcome::from_result(&Ok(None));
        assert_eq!(outcome, JoinOutcome::Joined(JOINED_MESSAGE.to_string()));
        assert!(outcome.reloads_list());
    }

    #[test]
    fn test_join_failure_keeps_list() {
        let result = Err(ApiError::Network("offline".to_string()));
        let outcome = JoinOutcome::from_result(&result);
        assert_eq!(outcome, JoinOutcome::Failed("Failed to join course".to_string()));
        assert!(!outcome.reloads_list());
    }
}
