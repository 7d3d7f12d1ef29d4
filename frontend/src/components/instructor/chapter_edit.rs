use lectern_shared::protocol::{DeleteChapterRequest, GetChapterRequest, UpdateChapterRequest};
use lectern_shared::{ChapterId, CourseId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::chapter_form::{ChapterForm, ChapterFormState};
use crate::components::icons::Trash;
use crate::components::layout::{BackLink, Layout, page_view};
use crate::components::toast::use_toaster;
use crate::state::{FormStatus, PageState};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const DELETE_PROMPT: &str = "Are you sure you want to delete this chapter?";

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn EditChapterPage(id: ChapterId) -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let toaster = use_toaster();

    let state = ChapterFormState::new();
    let status = RwSignal::new(FormStatus::Idle);
    // 载入成功后保存所属课程，保存与删除后都回到课程页
    let page = RwSignal::new(PageState::<CourseId>::Loading);

    {
        let api = api.clone();
        spawn_local(async move {
            let result = api.send(&GetChapterRequest { id }).await.map(|chapter| {
                state.load(&chapter);
                chapter.course
            });
            page.set(PageState::from_result(result, "Failed to load chapter"));
        });
    }

    let save = {
        let api = api.clone();
        move |course: CourseId| {
            if !status.try_update(FormStatus::begin).unwrap_or(false) {
                return;
            }
            let request = UpdateChapterRequest {
                id,
                fields: state.to_fields(course),
            };
            let api = api.clone();
            spawn_local(async move {
                match api.send(&request).await {
                    Ok(_) => {
                        status.update(FormStatus::finish);
                        toaster.success("Chapter saved");
                        router.navigate_to(AppRoute::InstructorCourse(course));
                    }
                    Err(e) => status.update(|s| s.fail(&e, "Failed to update chapter")),
                }
            });
        }
    };

    let delete = move |course: CourseId| {
        if status.with_untracked(FormStatus::is_submitting) || !confirm(DELETE_PROMPT) {
            return;
        }
        status.update(|s| {
            s.begin();
        });
        let api = api.clone();
        spawn_local(async move {
            match api.send(&DeleteChapterRequest { id }).await {
                Ok(()) => {
                    tracing::info!(chapter = id, "chapter deleted");
                    status.update(FormStatus::finish);
                    toaster.success("Chapter deleted");
                    router.navigate_to(AppRoute::InstructorCourse(course));
                }
                Err(e) => status.update(|s| s.fail(&e, "Failed to delete chapter")),
            }
        });
    };

    let form = move |course: CourseId| {
        let save = save.clone();
        let delete = delete.clone();
        view! {
            <BackLink to=AppRoute::InstructorCourse(course) label="Back to Course" />
            <h1 class="text-3xl font-bold mb-6">"Edit Chapter"</h1>
            <ChapterForm
                state=state
                status=status
                submit_label="Save Changes"
                on_submit=move |()| save(course)
            >
                <button
                    type="button"
                    class="btn btn-error btn-outline gap-2"
                    disabled=move || status.with(FormStatus::is_submitting)
                    on:click=move |_| delete(course)
                >
                    <Trash attr:class="h-4 w-4" />
                    "Delete"
                </button>
            </ChapterForm>
        }
        .into_any()
    };

    view! {
        <Layout>
            <div class="max-w-4xl mx-auto">
                {move || page_view(page.get(), "Chapter not found", form.clone())}
            </div>
        </Layout>
    }
}
