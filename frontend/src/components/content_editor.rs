//! 结构化富文本编辑器
//!
//! 界面按 [`BlockOutline`] 构建，只有结构变化（增删块、改类型）才会重建；
//! 输入框的文本通过 `prop:value` 单独绑定到文档。

use lectern_shared::document::{BlockKind, BlockOutline, Document, EditError, Mark, SpanPath};
use leptos::prelude::*;

use crate::components::icons::{Plus, Trash};

/// 对文档执行一次编辑；被拒绝的编辑只记录日志
fn edit(document: RwSignal<Document>, f: impl FnOnce(&mut Document) -> Result<(), EditError>) {
    document.update(|doc| {
        if let Err(e) = f(doc) {
            tracing::warn!(error = %e, "document edit rejected");
        }
    });
}

fn kind_options(selected: Option<BlockKind>) -> impl IntoView {
    BlockKind::ALL
        .into_iter()
        .map(|kind| {
            view! {
                <option value=kind.tag() selected={selected == Some(kind)}>
                    {kind.label()}
                </option>
            }
        })
        .collect_view()
}

#[component]
pub fn ContentEditor(document: RwSignal<Document>) -> impl IntoView {
    let outline = Memo::new(move |_| document.with(|doc| doc.outline()));
    let new_kind = RwSignal::new(BlockKind::Paragraph);

    let blocks = move || {
        let outline = outline.get();
        let count = outline.len();
        outline
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                view! { <BlockEditor document=document index=index is_last={index + 1 == count} block=block /> }
            })
            .collect_view()
    };

    let add_block = move |_| {
        let kind = new_kind.get_untracked();
        edit(document, |doc| {
            let last = doc.len().checked_sub(1);
            doc.insert_block(last, kind);
            Ok(())
        });
    };

    view! {
        <div class="space-y-3">
            {blocks}
            <div class="flex items-center gap-2">
                <select
                    class="select select-bordered select-sm"
                    on:change=move |ev| {
                        if let Some(kind) = BlockKind::from_tag(&event_target_value(&ev)) {
                            new_kind.set(kind);
                        }
                    }
                >
                    {kind_options(Some(BlockKind::Paragraph))}
                </select>
                <button type="button" class="btn btn-sm btn-outline gap-1" on:click=add_block>
                    <Plus attr:class="h-4 w-4" />
                    "Add block"
                </button>
            </div>
        </div>
    }
}

#[component]
fn BlockEditor(
    document: RwSignal<Document>,
    index: usize,
    is_last: bool,
    block: BlockOutline,
) -> impl IntoView {
    let body = match block.kind {
        None => view! {
            <div class="text-sm text-base-content/60 italic px-2 py-3 border border-dashed rounded">
                "Unsupported block \"" {block.tag.clone()} "\" is kept unchanged"
            </div>
        }
        .into_any(),
        Some(BlockKind::CodeBlock) => view! {
            <textarea
                class="textarea textarea-bordered w-full font-mono text-sm"
                rows="4"
                prop:value=move || document.with(|doc| doc.code_text(index).unwrap_or_default())
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    edit(document, |doc| doc.set_code_text(index, &text));
                }
            ></textarea>
        }
        .into_any(),
        Some(kind) if kind.is_list() => {
            let items = block
                .lines
                .iter()
                .enumerate()
                .map(|(item, spans)| {
                    view! {
                        <li class="flex items-start gap-2">
                            <SpanLine document=document block=index item=Some(item) spans=*spans />
                            <button
                                type="button"
                                class="btn btn-ghost btn-xs"
                                title="Remove item"
                                on:click=move |_| edit(document, |doc| doc.remove_list_item(index, item))
                            >
                                <Trash attr:class="h-3 w-3" />
                            </button>
                        </li>
                    }
                })
                .collect_view();
            view! {
                <div>
                    <ul class="space-y-2">{items}</ul>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs mt-1"
                        on:click=move |_| edit(document, |doc| doc.push_list_item(index).map(|_| ()))
                    >
                        "+ Item"
                    </button>
                </div>
            }
            .into_any()
        }
        Some(_) => {
            let spans = block.lines.first().copied().unwrap_or(0);
            view! { <SpanLine document=document block=index item=None spans=spans /> }.into_any()
        }
    };

    let toolbar_kind = block.kind.map(|kind| {
        view! {
            <select
                class="select select-bordered select-xs"
                on:change=move |ev| {
                    if let Some(next) = BlockKind::from_tag(&event_target_value(&ev)) {
                        edit(document, |doc| doc.set_block_kind(index, next));
                    }
                }
            >
                {kind_options(Some(kind))}
            </select>
        }
    });

    view! {
        <div class="card bg-base-100 border border-base-300">
            <div class="card-body p-3 gap-2">
                <div class="flex items-center gap-1">
                    {toolbar_kind}
                    <div class="flex-1"></div>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs"
                        title="Move up"
                        disabled={index == 0}
                        on:click=move |_| edit(document, |doc| doc.move_block(index, true))
                    >
                        "↑"
                    </button>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs"
                        title="Move down"
                        disabled=is_last
                        on:click=move |_| edit(document, |doc| doc.move_block(index, false))
                    >
                        "↓"
                    </button>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs"
                        title="Insert paragraph below"
                        on:click=move |_| {
                            edit(document, |doc| {
                                doc.insert_block(Some(index), BlockKind::Paragraph);
                                Ok(())
                            })
                        }
                    >
                        <Plus attr:class="h-3 w-3" />
                    </button>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs text-error"
                        title="Remove block"
                        on:click=move |_| edit(document, |doc| doc.remove_block(index))
                    >
                        <Trash attr:class="h-3 w-3" />
                    </button>
                </div>
                {body}
            </div>
        </div>
    }
}

/// 一行文本：普通块的全部 span，或列表中的一项
#[component]
fn SpanLine(
    document: RwSignal<Document>,
    block: usize,
    item: Option<usize>,
    spans: usize,
) -> impl IntoView {
    let inputs = (0..spans)
        .map(|span| {
            let path = SpanPath { item, span };
            view! { <SpanInput document=document block=block path=path /> }
        })
        .collect_view();

    view! {
        <div class="flex flex-col gap-1 flex-1">
            {inputs}
            <button
                type="button"
                class="btn btn-ghost btn-xs self-start"
                on:click=move |_| edit(document, |doc| doc.push_span(block, item).map(|_| ()))
            >
                "+ Span"
            </button>
        </div>
    }
}

#[component]
fn SpanInput(document: RwSignal<Document>, block: usize, path: SpanPath) -> impl IntoView {
    // 链接等非叶子的行内节点只显示，不可编辑
    let editable = document.with_untracked(|doc| doc.span(block, path).is_some());
    if !editable {
        return view! {
            <span class="badge badge-ghost badge-sm">"inline element"</span>
        }
        .into_any();
    }

    let marks = Mark::ALL
        .into_iter()
        .map(|mark| {
            let active = move || {
                document.with(|doc| doc.span(block, path).is_some_and(|t| t.has(mark)))
            };
            view! {
                <button
                    type="button"
                    class="btn btn-xs btn-ghost font-mono"
                    class:btn-active=active
                    on:click=move |_| edit(document, |doc| doc.toggle_mark(block, path, mark))
                >
                    {mark.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="flex items-center gap-1">
            <input
                type="text"
                class="input input-bordered input-sm flex-1"
                prop:value=move || {
                    document.with(|doc| doc.span_text(block, path).unwrap_or_default())
                }
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    edit(document, |doc| doc.set_span_text(block, path, text));
                }
            />
            {marks}
            <button
                type="button"
                class="btn btn-ghost btn-xs"
                title="Remove span"
                on:click=move |_| edit(document, |doc| doc.remove_span(block, path))
            >
                "×"
            </button>
        </div>
    }
    .into_any()
}
