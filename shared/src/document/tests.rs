use serde_json::{Value, json};

use super::*;

fn content(value: Value) -> Content {
    serde_json::from_value(value).unwrap()
}

fn doc(value: Value) -> Document {
    match content(value) {
        Content::Document(doc) => doc,
        Content::Malformed(v) => panic!("expected a document, got {v}"),
    }
}

fn blocks(content: &Content) -> Vec<RenderedBlock<'_>> {
    match render(content) {
        Rendered::Blocks(blocks) => blocks.collect(),
        Rendered::Fallback(msg) => panic!("unexpected fallback: {msg}"),
    }
}

// =========================================================
// 序列化
// =========================================================

#[test]
fn test_unmodified_document_round_trips() {
    let source = json!([
        {"type": "h2", "id": "abc", "children": [{"text": "Title", "bold": true}]},
        {"type": "p", "children": [
            {"text": "plain "},
            {"text": "off", "italic": false},
            {"text": "colored", "color": "#ff0000"},
            {"type": "a", "url": "https://example.com", "children": [{"text": "link"}]}
        ]},
        {"type": "callout", "icon": "!", "children": [{"text": "unknown block"}]},
        {"type": "ul", "children": [
            {"type": "li", "children": [{"type": "lic", "children": [{"text": "one"}]}]}
        ]},
        {"type": "hr"},
        42,
        "stray"
    ]);
    let parsed = content(source.clone());
    assert!(parsed.document().is_some());
    assert_eq!(serde_json::to_value(&parsed).unwrap(), source);
}

#[test]
fn test_explicit_nulls_survive_round_trip() {
    let source = json!([
        {"type": "p", "children": null},
        {"type": "p", "children": [{"text": "a", "bold": null, "italic": true}]}
    ]);
    let parsed = doc(source.clone());
    assert!(parsed.nodes()[0].as_element().unwrap().children().is_empty());
    let leaf = parsed.nodes()[1].as_element().unwrap().children()[0].as_text().unwrap();
    assert!(!leaf.has(Mark::Bold));
    assert!(leaf.has(Mark::Italic));
    assert_eq!(serde_json::to_value(&parsed).unwrap(), source);
}

#[test]
fn test_chapter_without_content_renders_fallback() {
    let chapter: crate::Chapter = serde_json::from_value(json!({
        "id": 3,
        "course": 1,
        "title": "No body",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(chapter.content, Content::Malformed(Value::Null));
    assert!(matches!(render(&chapter.content), Rendered::Fallback(FALLBACK_MESSAGE)));
    assert_eq!(chapter.content.to_editable(), Document::empty());
}

#[test]
fn test_non_array_content_is_malformed_and_preserved() {
    for value in [json!({}), json!(null), json!("text"), json!({"blocks": []})] {
        let parsed = content(value.clone());
        assert!(matches!(parsed, Content::Malformed(_)));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
    }
}

#[test]
fn test_empty_document_shape() {
    assert_eq!(
        Document::empty().to_value(),
        json!([{"type": "p", "children": [{"text": ""}]}])
    );
    assert_eq!(Content::default(), Content::Document(Document::empty()));
}

#[test]
fn test_to_editable_replaces_malformed_and_empty() {
    assert_eq!(content(json!({})).to_editable(), Document::empty());
    assert_eq!(content(json!([])).to_editable(), Document::empty());

    let d = doc(json!([{"type": "h1", "children": [{"text": "Hi"}]}]));
    assert_eq!(Content::Document(d.clone()).to_editable(), d);
}

#[test]
fn test_element_layout() {
    let d = doc(json!([
        {"type": "p", "children": [{"text": "a"}]},
        {"type": "ul", "children": [{"type": "li", "children": [{"text": "a"}]}]},
        {"type": "p", "children": [{"text": "a"}, {"type": "a", "children": []}]},
        {"type": "hr"}
    ]));
    let layouts: Vec<ChildLayout> = d
        .nodes()
        .iter()
        .filter_map(Node::as_element)
        .map(Element::layout)
        .collect();
    assert_eq!(
        layouts,
        vec![
            ChildLayout::Inline,
            ChildLayout::Blocks,
            ChildLayout::Mixed,
            ChildLayout::Empty
        ]
    );
}

// =========================================================
// 渲染
// =========================================================

#[test]
fn test_render_single_heading() {
    let c = content(json!([{"type": "h1", "children": [{"text": "Hello"}]}]));
    let rendered = blocks(&c);
    assert_eq!(rendered.len(), 1);
    assert_eq!(
        rendered[0],
        RenderedBlock::Heading {
            level: HeadingLevel::H1,
            spans: vec![Span {
                text: "Hello",
                marks: Marks::default()
            }]
        }
    );
}

#[test]
fn test_render_keeps_block_order() {
    let c = content(json!([
        {"type": "p", "children": [{"text": "first"}]},
        {"type": "blockquote", "children": [{"text": "second"}]},
        {"type": "h3", "children": [{"text": "third"}]},
        {"type": "code_block", "children": [
            {"type": "code_line", "children": [{"text": "fn main() {"}]},
            {"type": "code_line", "children": [{"text": "}"}]}
        ]},
        {"type": "ol", "children": [
            {"type": "li", "children": [{"type": "lic", "children": [{"text": "a"}]}]},
            {"type": "li", "children": [{"text": "b"}]}
        ]}
    ]));
    let texts: Vec<String> = blocks(&c).iter().map(RenderedBlock::plain_text).collect();
    assert_eq!(
        texts,
        vec!["first", "second", "third", "fn main() {\n}", "a\nb"]
    );
}

#[test]
fn test_render_list_items_and_code_lines() {
    let c = content(json!([
        {"type": "ul", "children": [
            {"type": "li", "children": [{"type": "lic", "children": [
                {"text": "x", "bold": true}, {"text": "y"}
            ]}]}
        ]},
        {"type": "code_block", "children": [
            {"type": "code_line", "children": [{"text": "let a = 1;"}]}
        ]}
    ]));
    let rendered = blocks(&c);
    match &rendered[0] {
        RenderedBlock::List { ordered, items } => {
            assert!(!ordered);
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].len(), 2);
            assert!(items[0][0].marks.bold);
        }
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(
        rendered[1],
        RenderedBlock::CodeBlock(vec!["let a = 1;".to_string()])
    );
}

#[test]
fn test_render_marks_combine() {
    let c = content(json!([{"type": "p", "children": [
        {"text": "all", "bold": true, "italic": true, "underline": true, "strikethrough": true, "code": true},
        {"text": "none", "bold": false}
    ]}]));
    let rendered = blocks(&c);
    let RenderedBlock::Paragraph(spans) = &rendered[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(
        spans[0].marks,
        Marks {
            bold: true,
            italic: true,
            underline: true,
            strikethrough: true,
            code: true
        }
    );
    assert_eq!(spans[1].marks, Marks::default());
}

#[test]
fn test_render_skips_unknown_blocks() {
    let c = content(json!([
        {"type": "callout", "children": [{"text": "skip"}]},
        {"type": "p", "children": [{"text": "keep"}]},
        {"text": "loose leaf"},
        7
    ]));
    let rendered = blocks(&c);
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].plain_text(), "keep");
}

#[test]
fn test_render_empty_array_has_no_blocks() {
    let c = content(json!([]));
    assert!(blocks(&c).is_empty());
}

#[test]
fn test_render_malformed_falls_back() {
    let c = content(json!({}));
    assert!(matches!(render(&c), Rendered::Fallback(FALLBACK_MESSAGE)));
    assert_eq!(FALLBACK_MESSAGE, "No content available.");
}

// =========================================================
// 编辑
// =========================================================

#[test]
fn test_outline_describes_structure() {
    let d = doc(json!([
        {"type": "p", "children": [{"text": "a"}, {"text": "b"}]},
        {"type": "ul", "children": [
            {"type": "li", "children": [{"type": "lic", "children": [{"text": "one"}]}]},
            {"type": "li", "children": [{"text": "two"}, {"text": "2"}]}
        ]},
        {"type": "callout", "children": []}
    ]));
    let outline = d.outline();
    assert_eq!(outline[0].kind, Some(BlockKind::Paragraph));
    assert_eq!(outline[0].lines, vec![2]);
    assert_eq!(outline[1].kind, Some(BlockKind::BulletedList));
    assert_eq!(outline[1].lines, vec![1, 2]);
    assert_eq!(outline[2].kind, None);
    assert_eq!(outline[2].tag, "callout");
}

#[test]
fn test_set_span_text_and_toggle_mark() {
    let mut d = Document::empty();
    d.set_span_text(0, SpanPath::inline(0), "Hello").unwrap();
    d.toggle_mark(0, SpanPath::inline(0), Mark::Bold).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "p", "children": [{"text": "Hello", "bold": true}]}])
    );

    // 再次切换会移除标记而不是写入 false
    d.toggle_mark(0, SpanPath::inline(0), Mark::Bold).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "p", "children": [{"text": "Hello"}]}])
    );
}

#[test]
fn test_edit_inside_lic_keeps_wrapper() {
    let mut d = doc(json!([{"type": "ul", "children": [
        {"type": "li", "children": [{"type": "lic", "children": [{"text": "one"}]}]}
    ]}]));
    d.set_span_text(0, SpanPath::in_item(0, 0), "uno").unwrap();
    assert_eq!(d.span_text(0, SpanPath::in_item(0, 0)).as_deref(), Some("uno"));
    assert_eq!(
        d.to_value(),
        json!([{"type": "ul", "children": [
            {"type": "li", "children": [{"type": "lic", "children": [{"text": "uno"}]}]}
        ]}])
    );
}

#[test]
fn test_insert_move_remove_blocks() {
    let mut d = Document::empty();
    let h = d.insert_block(Some(0), BlockKind::Heading2);
    assert_eq!(h, 1);
    let first = d.insert_block(None, BlockKind::Blockquote);
    assert_eq!(first, 0);
    assert_eq!(
        d.outline().iter().map(|b| b.tag.as_str()).collect::<Vec<_>>(),
        vec!["blockquote", "p", "h2"]
    );

    d.move_block(2, true).unwrap();
    d.move_block(0, true).unwrap();
    assert_eq!(
        d.outline().iter().map(|b| b.tag.as_str()).collect::<Vec<_>>(),
        vec!["blockquote", "h2", "p"]
    );

    d.remove_block(0).unwrap();
    d.remove_block(0).unwrap();
    d.remove_block(0).unwrap();
    assert_eq!(d, Document::empty());
    assert_eq!(d.remove_block(5), Err(EditError::BlockOutOfRange(5)));
}

#[test]
fn test_set_block_kind_between_text_kinds_keeps_attributes() {
    let mut d = doc(json!([{"type": "p", "id": "x1", "children": [{"text": "t", "italic": true}]}]));
    d.set_block_kind(0, BlockKind::Heading1).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "h1", "id": "x1", "children": [{"text": "t", "italic": true}]}])
    );
}

#[test]
fn test_set_block_kind_converts_list_and_code() {
    let mut d = doc(json!([{"type": "ol", "children": [
        {"type": "li", "children": [{"text": "a"}]},
        {"type": "li", "children": [{"text": "b"}]}
    ]}]));
    d.set_block_kind(0, BlockKind::CodeBlock).unwrap();
    assert_eq!(d.code_text(0).as_deref(), Some("a\nb"));

    d.set_block_kind(0, BlockKind::Paragraph).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "p", "children": [{"text": "a"}, {"text": " "}, {"text": "b"}]}])
    );

    d.set_block_kind(0, BlockKind::BulletedList).unwrap();
    assert_eq!(d.outline()[0].lines, vec![3]);
}

#[test]
fn test_unknown_blocks_are_read_only() {
    let source = json!([{"type": "callout", "children": [{"text": "x"}]}]);
    let mut d = doc(source.clone());
    assert_eq!(
        d.set_block_kind(0, BlockKind::Paragraph),
        Err(EditError::NotEditable(0))
    );
    assert_eq!(
        d.set_span_text(0, SpanPath::inline(0), "y"),
        Err(EditError::NotEditable(0))
    );
    assert_eq!(d.to_value(), source);
}

#[test]
fn test_spans_and_list_items() {
    let mut d = doc(json!([{"type": "ul", "children": [
        {"type": "li", "children": [{"text": "a"}]}
    ]}]));
    let item = d.push_list_item(0).unwrap();
    assert_eq!(item, 1);
    let path = d.push_span(0, Some(1)).unwrap();
    assert_eq!(path, SpanPath::in_item(1, 1));
    d.set_span_text(0, path, "tail").unwrap();
    assert_eq!(d.outline()[0].lines, vec![1, 2]);

    d.remove_span(0, path).unwrap();
    d.remove_list_item(0, 0).unwrap();
    d.remove_list_item(0, 0).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "ul", "children": [{"type": "li", "children": [{"text": ""}]}]}])
    );
    assert_eq!(d.push_list_item(5), Err(EditError::BlockOutOfRange(5)));
}

#[test]
fn test_remove_last_span_clears_it() {
    let mut d = doc(json!([{"type": "p", "children": [{"text": "only", "bold": true}]}]));
    d.remove_span(0, SpanPath::inline(0)).unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "p", "children": [{"text": ""}]}])
    );
}

#[test]
fn test_set_code_text_splits_lines() {
    let mut d = Document::empty();
    d.set_block_kind(0, BlockKind::CodeBlock).unwrap();
    d.set_code_text(0, "a\nb\n").unwrap();
    assert_eq!(
        d.to_value(),
        json!([{"type": "code_block", "children": [
            {"type": "code_line", "children": [{"text": "a"}]},
            {"type": "code_line", "children": [{"text": "b"}]},
            {"type": "code_line", "children": [{"text": ""}]}
        ]}])
    );
    assert_eq!(d.set_code_text(1, "x"), Err(EditError::BlockOutOfRange(1)));
}

#[test]
fn test_push_list_item_rejects_non_list() {
    let mut d = Document::empty();
    assert_eq!(d.push_list_item(0), Err(EditError::NotAList(0)));
}
