//! 章节表单状态
//!
//! 将零散的 signal 整合为 `ChapterFormState`，负责：
//! - 数据的持有
//! - 从已有章节载入
//! - 数据到请求字段的转换

use lectern_shared::document::Document;
use lectern_shared::protocol::ChapterFields;
use lectern_shared::{Chapter, CourseId, Visibility};
use leptos::prelude::*;

/// 使用 `RwSignal` 因为它实现了 `Copy`，可以直接作为 Props 在组件间传递
#[derive(Clone, Copy)]
pub struct ChapterFormState {
    pub title: RwSignal<String>,
    pub document: RwSignal<Document>,
    pub visibility: RwSignal<Visibility>,
    pub order: RwSignal<i32>,
}

impl ChapterFormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            document: RwSignal::new(Document::empty()),
            visibility: RwSignal::new(Visibility::Public),
            order: RwSignal::new(0),
        }
    }

    /// 载入已有章节；无法识别的内容以空文档开始编辑
    pub fn load(&self, chapter: &Chapter) {
        if chapter.content.document().is_none() {
            tracing::warn!(chapter = chapter.id, "chapter content is malformed, editing from empty");
        }
        self.title.set(chapter.title.clone());
        self.document.set(chapter.content.to_editable());
        self.visibility.set(chapter.visibility);
        self.order.set(chapter.order);
    }

    pub fn title_missing(&self) -> bool {
        self.title.with(|t| t.trim().is_empty())
    }

    pub fn to_fields(&self, course: CourseId) -> ChapterFields {
        ChapterFields {
            course,
            title: self.title.get_untracked().trim().to_string(),
            content: self.document.get_untracked().into(),
            visibility: self.visibility.get_untracked(),
            order: self.order.get_untracked(),
        }
    }
}

impl Default for ChapterFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_shared::Content;
    use serde_json::json;

    fn chapter(content: serde_json::Value) -> Chapter {
        serde_json::from_value(json!({
            "id": 9,
            "course": 3,
            "title": "Ownership",
            "content": content,
            "visibility": "private",
            "order": 2,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_load_then_save_keeps_content() {
        let content = json!([
            {"type": "h1", "children": [{"text": "Borrowing"}]},
            {"type": "p", "children": [{"text": "Rules", "bold": true}]}
        ]);
        let state = ChapterFormState::new();
        state.load(&chapter(content.clone()));

        let fields = state.to_fields(3);
        assert_eq!(fields.title, "Ownership");
        assert_eq!(fields.visibility, Visibility::Private);
        assert_eq!(fields.order, 2);
        assert_eq!(serde_json::to_value(&fields.content).unwrap(), content);
    }

    #[test]
    fn test_malformed_content_starts_empty() {
        let state = ChapterFormState::new();
        state.load(&chapter(json!({})));

        let fields = state.to_fields(3);
        assert_eq!(fields.content, Content::from(Document::empty()));
    }

    #[test]
    fn test_title_is_trimmed_and_required() {
        let state = ChapterFormState::new();
        assert!(state.title_missing());

        state.title.set("  Lifetimes ".to_string());
        assert!(!state.title_missing());
        assert_eq!(state.to_fields(1).title, "Lifetimes");
    }
}
