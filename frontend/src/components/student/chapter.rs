use lectern_shared::protocol::GetChapterRequest;
use lectern_shared::{Chapter, ChapterId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::content_view::ContentView;
use crate::components::layout::{BackLink, Layout, LoadingView, PageMessage};
use crate::state::PageState;
use crate::web::route::AppRoute;

const BACK_TO_ENROLLED: (AppRoute, &str) = (AppRoute::Enrolled, "Back to My Courses");

#[component]
pub fn StudentChapterPage(id: ChapterId) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(PageState::<Chapter>::Loading);

    spawn_local(async move {
        let result = api.send(&GetChapterRequest { id }).await;
        state.set(PageState::from_result(result, "Failed to load chapter"));
    });

    let body = move || match state.get() {
        PageState::Loading => view! { <LoadingView /> }.into_any(),
        PageState::NotFound => {
            view! { <PageMessage message="Chapter not found" back=BACK_TO_ENROLLED /> }.into_any()
        }
        PageState::Failed(message) => {
            view! { <PageMessage message=message back=BACK_TO_ENROLLED /> }.into_any()
        }
        PageState::Ready(chapter) => view! {
            <div class="max-w-4xl mx-auto">
                <BackLink to=AppRoute::StudentCourse(chapter.course) label="Back to Course" />
                {chapter.course_title.map(|title| {
                    view! { <p class="text-sm text-base-content/60">{title}</p> }
                })}
                <h1 class="text-3xl font-bold mb-6">{chapter.title}</h1>
                <div class="card bg-base-100 shadow">
                    <div class="card-body p-8">
                        <ContentView content=chapter.content />
                    </div>
                </div>
            </div>
        }
        .into_any(),
    };

    view! { <Layout>{body}</Layout> }
}
