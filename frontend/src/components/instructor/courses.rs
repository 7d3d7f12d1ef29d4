use lectern_shared::Course;
use lectern_shared::protocol::{ListCoursesRequest, ListResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::Plus;
use crate::components::layout::{EmptyState, Layout, page_view};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn InstructorCoursesPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PageState::<Vec<Course>>::Loading);

    // 后端只返回当前教师自己的课程
    spawn_local(async move {
        let result = api.send(&ListCoursesRequest).await.map(ListResponse::into_vec);
        state.set(PageState::from_result(result, "Failed to load courses"));
    });

    let create_path = AppRoute::CreateCourse.to_path();
    let header_path = create_path.clone();

    view! {
        <Layout>
            <div class="flex justify-between items-center mb-6">
                <h1 class="text-3xl font-bold">"My Courses"</h1>
                <Link to=header_path>
                    <span class="btn btn-primary btn-sm gap-2">
                        <Plus attr:class="h-4 w-4" /> "Create New Course"
                    </span>
                </Link>
            </div>
            {move || {
                let create_path = create_path.clone();
                page_view(state.get(), "Courses not found", move |courses| {
                    if courses.is_empty() {
                        return view! {
                            <EmptyState message="No courses yet. Create your first course!">
                                <Link to=create_path>
                                    <span class="btn btn-primary btn-sm">"Create Course"</span>
                                </Link>
                            </EmptyState>
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

fn course_card(course: Course) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">{course.title}</h3>
                <p class="text-sm text-base-content/60 line-clamp-2">{course.description}</p>
                <div class="card-actions">
                    <Link to=AppRoute::InstructorCourse(course.id).to_path()>
                        <span class="btn btn-primary btn-sm">"View Course"</span>
                    </Link>
                </div>
            </div>
        </div>
    }
}
