use lectern_shared::{Chapter, Course, CourseId, Visibility};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{load_course_with_chapters, use_api};
use crate::components::icons::{Pencil, Plus};
use crate::components::layout::{BackLink, EmptyState, Layout, page_view};
use crate::state::PageState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

pub fn visibility_badge(visibility: Visibility) -> impl IntoView {
    let class = match visibility {
        Visibility::Public => "badge badge-success badge-outline",
        Visibility::Private => "badge badge-ghost",
    };
    view! { <span class=class>{visibility.as_str()}</span> }
}

#[component]
pub fn InstructorCoursePage(id: CourseId) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PageState::<(Course, Vec<Chapter>)>::Loading);

    spawn_local(async move {
        let result = load_course_with_chapters(&api, id).await;
        state.set(PageState::from_result(result, "Failed to load course"));
    });

    view! {
        <Layout>
            <BackLink to=AppRoute::InstructorCourses label="Back to My Courses" />
            {move || {
                page_view(state.get(), "Course not found", |(course, chapters)| {
                    view! { <CourseOverview course=course chapters=chapters /> }.into_any()
                })
            }}
        </Layout>
    }
}

#[component]
fn CourseOverview(course: Course, chapters: Vec<Chapter>) -> impl IntoView {
    let add_path = AppRoute::CreateChapter(course.id).to_path();
    let empty_add_path = add_path.clone();

    let chapter_list = if chapters.is_empty() {
        view! {
            <EmptyState message="No chapters yet. Add your first chapter!">
                <Link to=empty_add_path.clone()>
                    <span class="btn btn-primary btn-sm">"Add Chapter"</span>
                </Link>
            </EmptyState>
        }
        .into_any()
    } else {
        view! {
            <div class="space-y-4">{chapters.into_iter().map(chapter_row).collect_view()}</div>
        }
        .into_any()
    };

    view! {
        <div class="mb-6">
            <div class="flex items-start justify-between gap-4">
                <h1 class="text-3xl font-bold">{course.title}</h1>
                <Link to=AppRoute::EditCourse(course.id).to_path()>
                    <span class="btn btn-ghost btn-sm gap-2">
                        <Pencil attr:class="h-4 w-4" /> "Edit Course"
                    </span>
                </Link>
            </div>
            <p class="text-base-content/70 mt-2">{course.description}</p>
        </div>

        <div class="flex justify-between items-center mb-6">
            <h2 class="text-2xl font-semibold">"Chapters"</h2>
            <Link to=add_path>
                <span class="btn btn-primary btn-sm gap-2">
                    <Plus attr:class="h-4 w-4" /> "Add Chapter"
                </span>
            </Link>
        </div>
        {chapter_list}
    }
}

fn chapter_row(chapter: Chapter) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body flex-row items-start justify-between p-5">
                <div class="flex-1">
                    <h3 class="text-lg font-medium">{chapter.title}</h3>
                    <div class="mt-2 flex items-center gap-4 text-sm text-base-content/60">
                        {visibility_badge(chapter.visibility)}
                        <span>"Order: " {chapter.order}</span>
                    </div>
                </div>
                <Link to=AppRoute::EditChapter(chapter.id).to_path()>
                    <span class="btn btn-primary btn-sm">"Edit"</span>
                </Link>
            </div>
        </div>
    }
}
