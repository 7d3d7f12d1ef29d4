use lectern_shared::Enrollment;
use lectern_shared::protocol::{ListEnrollmentsRequest, ListResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::layout::{EmptyState, Layout, page_view};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn EnrolledPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PageState::<Vec<Enrollment>>::Loading);

    spawn_local(async move {
        let result = api
            .send(&ListEnrollmentsRequest)
            .await
            .map(ListResponse::into_vec);
        state.set(PageState::from_result(result, "Failed to load enrollments"));
    });

    view! {
        <Layout>
            <h1 class="text-3xl font-bold mb-6">"My Enrolled Courses"</h1>
            {move || {
                page_view(state.get(), "Enrollments not found", |enrollments| {
                    if enrollments.is_empty() {
                        return view! {
                            <EmptyState message="You haven't enrolled in any courses yet.">
                                <Link to=AppRoute::StudentCourses.to_path()>
                                    <span class="btn btn-primary btn-sm">"Browse Courses"</span>
                                </Link>
                            </EmptyState>
                        }
                        .into_any();
                    }
                    view! {
                        <div class="grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            {enrollments.into_iter().map(enrollment_card).collect_view()}
                        </div>
                    }
                    .into_any()
                })
            }}
        </Layout>
    }
}

fn enrollment_card(enrollment: Enrollment) -> impl IntoView {
    let enrolled_on = enrollment.enrolled_on();
    let course = enrollment.course;
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">{course.title}</h3>
                <p class="text-sm text-base-content/70">{course.description}</p>
                <p class="text-xs text-base-content/50">"Enrolled: " {enrolled_on}</p>
                <div class="card-actions mt-2">
                    <Link to=AppRoute::StudentCourse(course.id).to_path()>
                        <span class="btn btn-primary btn-sm">"View Course"</span>
                    </Link>
                </div>
            </div>
        </div>
    }
}
