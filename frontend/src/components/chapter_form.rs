//! 章节表单：创建与编辑页面共用

mod form_state;
mod settings_section;

pub use form_state::ChapterFormState;

use leptos::prelude::*;

use crate::components::content_editor::ContentEditor;
use crate::components::layout::ErrorAlert;
use crate::state::FormStatus;
use settings_section::SettingsSection;

#[component]
pub fn ChapterForm(
    state: ChapterFormState,
    status: RwSignal<FormStatus>,
    submit_label: &'static str,
    #[prop(into)] on_submit: Callback<()>,
    /// 额外的操作按钮（如删除）
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let error = Signal::derive(move || status.with(|s| s.error().map(str::to_string)));
    let submitting = move || status.with(FormStatus::is_submitting);

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if state.title_missing() {
            status.update(|s| s.fail_with("Title is required"));
            return;
        }
        on_submit.run(());
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=handle_submit>
            <div class="card-body gap-4">
                <ErrorAlert message=error />

                <div class="form-control">
                    <label class="label" for="chapter-title">
                        <span class="label-text">"Title"</span>
                    </label>
                    <input
                        id="chapter-title"
                        type="text"
                        class="input input-bordered"
                        prop:value=move || state.title.get()
                        on:input=move |ev| state.title.set(event_target_value(&ev))
                        required
                    />
                </div>

                <div class="form-control">
                    <label class="label">
                        <span class="label-text">"Content"</span>
                    </label>
                    <ContentEditor document=state.document />
                </div>

                <SettingsSection state=state />

                <div class="card-actions justify-end">
                    {children.map(|c| c())}
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
}
