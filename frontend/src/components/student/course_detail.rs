use lectern_shared::{Chapter, Course, CourseId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{load_course_with_chapters, use_api};
use crate::components::layout::{BackLink, EmptyState, Layout, page_view};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn StudentCoursePage(id: CourseId) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PageState::<(Course, Vec<Chapter>)>::Loading);

    // 后端只返回学生可见的章节
    spawn_local(async move {
        let result = load_course_with_chapters(&api, id).await;
        state.set(PageState::from_result(result, "Failed to load course"));
    });

    view! {
        <Layout>
            <BackLink to=AppRoute::Enrolled label="Back to My Courses" />
            {move || {
                page_view(state.get(), "Course not found", |(course, chapters)| {
                    let chapter_list = if chapters.is_empty() {
                        view! {
                            <EmptyState message="No public chapters available in this course." />
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="space-y-4">
                                {chapters.into_iter().map(chapter_link).collect_view()}
                            </div>
                        }
                        .into_any()
                    };
                    view! {
                        <div class="mb-6">
                            <h1 class="text-3xl font-bold">{course.title}</h1>
                            <p class="text-base-content/70 mt-2">{course.description}</p>
                        </div>
                        <h2 class="text-2xl font-semibold mb-4">"Chapters"</h2>
                        {chapter_list}
                    }
                    .into_any()
                })
            }}
        </Layout>
    }
}

fn chapter_link(chapter: Chapter) -> impl IntoView {
    view! {
        <Link to=AppRoute::StudentChapter(chapter.id).to_path()>
            <div class="card bg-base-100 shadow hover:shadow-md transition-shadow">
                <div class="card-body p-5">
                    <h3 class="text-lg font-medium">{chapter.title}</h3>
                    <p class="text-sm text-base-content/60">{chapter.visibility.label()}</p>
                </div>
            </div>
        </Link>
    }
}
