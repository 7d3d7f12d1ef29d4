//! 只读渲染：把文档映射为惰性的块序列
//!
//! 渲染结果与具体 UI 框架无关，前端再把 [`RenderedBlock`] 转成视图。

use std::slice;

use super::{Content, Element, ElementKind, HeadingLevel, Node};

/// 内容缺失或不是数组时显示的固定文案
pub const FALLBACK_MESSAGE: &str = "No content available.";

/// 一段文本上生效的样式，可以任意组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock<'a> {
    Paragraph(Vec<Span<'a>>),
    Heading {
        level: HeadingLevel,
        spans: Vec<Span<'a>>,
    },
    Blockquote(Vec<Span<'a>>),
    List {
        ordered: bool,
        items: Vec<Vec<Span<'a>>>,
    },
    CodeBlock(Vec<String>),
}

impl RenderedBlock<'_> {
    pub fn plain_text(&self) -> String {
        fn join(spans: &[Span<'_>]) -> String {
            spans.iter().map(|s| s.text).collect()
        }
        match self {
            RenderedBlock::Paragraph(spans)
            | RenderedBlock::Heading { spans, .. }
            | RenderedBlock::Blockquote(spans) => join(spans),
            RenderedBlock::List { items, .. } => {
                items.iter().map(|i| join(i)).collect::<Vec<_>>().join("\n")
            }
            RenderedBlock::CodeBlock(lines) => lines.join("\n"),
        }
    }
}

/// 渲染结果：要么是块序列，要么是固定的占位文案
pub enum Rendered<'a> {
    Fallback(&'static str),
    Blocks(RenderedBlocks<'a>),
}

/// 惰性块序列：每个可识别的顶层节点产出一个块，未知节点被跳过
pub struct RenderedBlocks<'a> {
    nodes: slice::Iter<'a, Node>,
}

impl<'a> Iterator for RenderedBlocks<'a> {
    type Item = RenderedBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.nodes.next()?;
            if let Some(block) = render_node(node) {
                return Some(block);
            }
        }
    }
}

pub fn render(content: &Content) -> Rendered<'_> {
    match content {
        Content::Document(doc) => Rendered::Blocks(RenderedBlocks {
            nodes: doc.nodes().iter(),
        }),
        Content::Malformed(_) => Rendered::Fallback(FALLBACK_MESSAGE),
    }
}

fn render_node(node: &Node) -> Option<RenderedBlock<'_>> {
    let Node::Element(element) = node else {
        tracing::debug!("skipping non-element top-level node");
        return None;
    };

    let block = match &element.kind {
        ElementKind::Paragraph => RenderedBlock::Paragraph(spans_of(element)),
        ElementKind::Heading(level) => RenderedBlock::Heading {
            level: *level,
            spans: spans_of(element),
        },
        ElementKind::Blockquote => RenderedBlock::Blockquote(spans_of(element)),
        ElementKind::BulletedList | ElementKind::NumberedList => RenderedBlock::List {
            ordered: element.kind == ElementKind::NumberedList,
            items: element
                .children()
                .iter()
                .filter_map(Node::as_element)
                .filter(|item| item.kind == ElementKind::ListItem)
                .map(spans_of)
                .collect(),
        },
        ElementKind::CodeBlock => RenderedBlock::CodeBlock(
            element
                .children()
                .iter()
                .map(Node::plain_text)
                .collect(),
        ),
        ElementKind::ListItem
        | ElementKind::ListItemContent
        | ElementKind::CodeLine
        | ElementKind::Unknown(_) => {
            tracing::debug!(tag = element.kind.tag(), "skipping unsupported block");
            return None;
        }
    };
    Some(block)
}

/// 收集元素下所有叶子（嵌套的行内元素如 `lic`、链接会被展开）
fn spans_of(element: &Element) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    collect_spans(element.children(), &mut spans);
    spans
}

fn collect_spans<'a>(nodes: &'a [Node], out: &mut Vec<Span<'a>>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push(Span {
                text: &text.text,
                marks: text.marks(),
            }),
            Node::Element(inner) => collect_spans(inner.children(), out),
            Node::Other(_) => {}
        }
    }
}
