//! 章节可见性与顺序

use lectern_shared::Visibility;
use leptos::prelude::*;

use super::form_state::ChapterFormState;

#[component]
pub fn SettingsSection(state: ChapterFormState) -> impl IntoView {
    let options = [Visibility::Public, Visibility::Private]
        .into_iter()
        .map(|visibility| {
            view! {
                <option
                    value=visibility.as_str()
                    selected=move || state.visibility.get() == visibility
                >
                    {visibility.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label" for="chapter-visibility">
                    <span class="label-text">"Visibility"</span>
                </label>
                <select
                    id="chapter-visibility"
                    class="select select-bordered"
                    on:change=move |ev| {
                        if let Some(visibility) = Visibility::parse(&event_target_value(&ev)) {
                            state.visibility.set(visibility);
                        }
                    }
                >
                    {options}
                </select>
            </div>
            <div class="form-control">
                <label class="label" for="chapter-order">
                    <span class="label-text">"Order"</span>
                </label>
                <input
                    id="chapter-order"
                    type="number"
                    class="input input-bordered"
                    prop:value=move || state.order.get().to_string()
                    on:input=move |ev| {
                        if let Ok(order) = event_target_value(&ev).parse::<i32>() {
                            state.order.set(order);
                        }
                    }
                />
            </div>
        </div>
    }
}
