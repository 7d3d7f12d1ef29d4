//! 章节内容的只读展示

use lectern_shared::Content;
use lectern_shared::document::{HeadingLevel, Rendered, RenderedBlock, Span, render};
use leptos::prelude::*;

#[component]
pub fn ContentView(content: Content) -> impl IntoView {
    match render(&content) {
        Rendered::Fallback(message) => view! {
            <p class="text-base-content/60 italic">{message}</p>
        }
        .into_any(),
        Rendered::Blocks(blocks) => view! {
            <div class="space-y-4 leading-relaxed">
                {blocks.map(block_view).collect_view()}
            </div>
        }
        .into_any(),
    }
}

fn block_view(block: RenderedBlock<'_>) -> AnyView {
    match block {
        RenderedBlock::Paragraph(spans) => view! { <p>{spans_view(spans)}</p> }.into_any(),
        RenderedBlock::Heading { level, spans } => match level {
            HeadingLevel::H1 => {
                view! { <h1 class="text-3xl font-bold">{spans_view(spans)}</h1> }.into_any()
            }
            HeadingLevel::H2 => {
                view! { <h2 class="text-2xl font-bold">{spans_view(spans)}</h2> }.into_any()
            }
            HeadingLevel::H3 => {
                view! { <h3 class="text-xl font-semibold">{spans_view(spans)}</h3> }.into_any()
            }
        },
        RenderedBlock::Blockquote(spans) => view! {
            <blockquote class="border-l-4 border-base-300 pl-4 italic text-base-content/80">
                {spans_view(spans)}
            </blockquote>
        }
        .into_any(),
        RenderedBlock::List { ordered, items } => {
            let items = items
                .into_iter()
                .map(|spans| view! { <li>{spans_view(spans)}</li> })
                .collect_view();
            if ordered {
                view! { <ol class="list-decimal pl-6 space-y-1">{items}</ol> }.into_any()
            } else {
                view! { <ul class="list-disc pl-6 space-y-1">{items}</ul> }.into_any()
            }
        }
        RenderedBlock::CodeBlock(lines) => view! {
            <pre class="bg-base-300 rounded-lg p-4 overflow-x-auto text-sm">
                <code>{lines.join("\n")}</code>
            </pre>
        }
        .into_any(),
    }
}

fn spans_view(spans: Vec<Span<'_>>) -> Vec<AnyView> {
    spans.into_iter().map(span_view).collect()
}

/// 样式由内向外依次包裹：删除线、下划线、斜体、粗体、行内代码
fn span_view(span: Span<'_>) -> AnyView {
    let marks = span.marks;
    let mut view = span.text.to_string().into_any();
    if marks.strikethrough {
        view = view! { <s>{view}</s> }.into_any();
    }
    if marks.underline {
        view = view! { <u>{view}</u> }.into_any();
    }
    if marks.italic {
        view = view! { <em>{view}</em> }.into_any();
    }
    if marks.bold {
        view = view! { <strong>{view}</strong> }.into_any();
    }
    if marks.code {
        view = view! { <code class="bg-base-200 rounded px-1 font-mono text-sm">{view}</code> }
            .into_any();
    }
    view
}
