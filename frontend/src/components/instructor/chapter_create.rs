use lectern_shared::CourseId;
use lectern_shared::protocol::CreateChapterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::chapter_form::{ChapterForm, ChapterFormState};
use crate::components::layout::{BackLink, Layout};
use crate::components::toast::use_toaster;
use crate::state::FormStatus;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn CreateChapterPage(course: CourseId) -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let toaster = use_toaster();

    let state = ChapterFormState::new();
    let status = RwSignal::new(FormStatus::Idle);

    let on_submit = move |()| {
        if !status.try_update(FormStatus::begin).unwrap_or(false) {
            return;
        }
        let request = CreateChapterRequest {
            fields: state.to_fields(course),
        };
        let api = api.clone();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(chapter) => {
                    tracing::info!(chapter = chapter.id, course, "chapter created");
                    status.update(FormStatus::finish);
                    toaster.success("Chapter created");
                    router.navigate_to(AppRoute::InstructorCourse(course));
                }
                Err(e) => status.update(|s| s.fail(&e, "Failed to create chapter")),
            }
        });
    };

    view! {
        <Layout>
            <div class="max-w-4xl mx-auto">
                <BackLink to=AppRoute::InstructorCourse(course) label="Back to Course" />
                <h1 class="text-3xl font-bold mb-6">"Create New Chapter"</h1>
                <ChapterForm
                    state=state
                    status=status
                    submit_label="Create Chapter"
                    on_submit=on_submit
                />
            </div>
        </Layout>
    }
}
