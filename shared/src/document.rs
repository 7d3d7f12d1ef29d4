//! 章节富文本文档模型
//!
//! 文档以 Plate 编辑器的 JSON 结构存储：顶层是有序的块节点数组，
//! 每个元素节点带有 `type` 标签和 `children`，叶子节点携带文本与样式标记。
//!
//! - 已知标签映射为封闭的 [`ElementKind`]，未知标签保留为 `ElementKind::Unknown`
//! - 既不是元素也不是叶子的数组项原样保留在 [`Node::Other`] 中
//! - 元素与叶子上的未知属性保存在 `attributes` 中
//!
//! 因此加载后未经修改的文档序列化回去与原始 JSON 值相等。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

mod edit;
mod render;

pub use edit::{BlockKind, BlockOutline, EditError, SpanPath};
pub use render::{FALLBACK_MESSAGE, Marks, RenderedBlock, Rendered, RenderedBlocks, Span, render};

// =========================================================
// 章节内容
// =========================================================

/// 章节的 `content` 字段
///
/// 后端对该字段没有约束（默认值是 `{}`），不是数组的值作为 `Malformed` 原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Document(Document),
    Malformed(Value),
}

/// 缺少 `content` 字段时等同于 `null`，渲染为回退提示
impl Default for Content {
    fn default() -> Self {
        Content::Malformed(Value::Null)
    }
}

impl Content {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Content::Document(doc) => Some(doc),
            Content::Malformed(_) => None,
        }
    }

    /// 交给编辑器的文档；无法识别的内容以空文档开始编辑
    pub fn to_editable(&self) -> Document {
        match self {
            Content::Document(doc) if !doc.is_empty() => doc.clone(),
            _ => Document::empty(),
        }
    }
}

impl From<Document> for Content {
    fn from(doc: Document) -> Self {
        Content::Document(doc)
    }
}

// =========================================================
// 文档与节点
// =========================================================

/// 可缺省且可为 `null` 的字段：`None` 表示缺省，`Some(None)` 表示显式 `null`
type Nullable<T> = Option<Option<T>>;

/// 将出现的字段（包括 `null`）包进 `Some`，缺省字段由 `#[serde(default)]` 给出 `None`
fn present<'de, T, D>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// 规范的空文档：仅包含一个空段落
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::Element(Element::new(
                ElementKind::Paragraph,
                vec![Node::Text(Text::plain(""))],
            ))],
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 整个文档的纯文本（块之间以换行分隔）
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(Node::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.nodes.iter().map(Node::to_value).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
    Other(Value),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn plain_text(&self) -> String {
        match self {
            Node::Element(e) => e.plain_text(),
            Node::Text(t) => t.text.clone(),
            Node::Other(_) => String::new(),
        }
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

/// 元素节点的 `type` 标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Paragraph,
    Heading(HeadingLevel),
    Blockquote,
    BulletedList,
    NumberedList,
    ListItem,
    /// 列表项内容（`lic`）
    ListItemContent,
    CodeBlock,
    CodeLine,
    Unknown(String),
}

impl ElementKind {
    pub fn tag(&self) -> &str {
        match self {
            ElementKind::Paragraph => "p",
            ElementKind::Heading(HeadingLevel::H1) => "h1",
            ElementKind::Heading(HeadingLevel::H2) => "h2",
            ElementKind::Heading(HeadingLevel::H3) => "h3",
            ElementKind::Blockquote => "blockquote",
            ElementKind::BulletedList => "ul",
            ElementKind::NumberedList => "ol",
            ElementKind::ListItem => "li",
            ElementKind::ListItemContent => "lic",
            ElementKind::CodeBlock => "code_block",
            ElementKind::CodeLine => "code_line",
            ElementKind::Unknown(tag) => tag,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ElementKind::BulletedList | ElementKind::NumberedList)
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "p" => ElementKind::Paragraph,
            "h1" => ElementKind::Heading(HeadingLevel::H1),
            "h2" => ElementKind::Heading(HeadingLevel::H2),
            "h3" => ElementKind::Heading(HeadingLevel::H3),
            "blockquote" => ElementKind::Blockquote,
            "ul" => ElementKind::BulletedList,
            "ol" => ElementKind::NumberedList,
            "li" => ElementKind::ListItem,
            "lic" => ElementKind::ListItemContent,
            "code_block" => ElementKind::CodeBlock,
            "code_line" => ElementKind::CodeLine,
            _ => ElementKind::Unknown(tag),
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Unknown(tag) => tag,
            other => other.tag().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    children: Nullable<Vec<Node>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Element {
    pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children: Some(Some(children)),
            attributes: Map::new(),
        }
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_ref().and_then(Option::as_deref).unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        self.children.get_or_insert(None).get_or_insert_with(Vec::new)
    }

    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = Some(Some(children));
    }

    /// 子节点是否全为叶子、全为元素或混合
    pub fn layout(&self) -> ChildLayout {
        let children = self.children();
        let leaves = children.iter().filter(|c| matches!(c, Node::Text(_))).count();
        match leaves {
            0 if children.is_empty() => ChildLayout::Empty,
            0 => ChildLayout::Blocks,
            n if n == children.len() => ChildLayout::Inline,
            _ => ChildLayout::Mixed,
        }
    }

    pub fn plain_text(&self) -> String {
        let separator = if self.kind == ElementKind::CodeBlock || self.kind.is_list() {
            "\n"
        } else {
            ""
        };
        self.children()
            .iter()
            .map(Node::plain_text)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildLayout {
    Empty,
    Inline,
    Blocks,
    Mixed,
}

/// 样式标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl Mark {
    pub const ALL: [Mark; 5] = [
        Mark::Bold,
        Mark::Italic,
        Mark::Underline,
        Mark::Strikethrough,
        Mark::Code,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mark::Bold => "B",
            Mark::Italic => "I",
            Mark::Underline => "U",
            Mark::Strikethrough => "S",
            Mark::Code => "</>",
        }
    }
}

/// 叶子节点：一段带样式的文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    bold: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    italic: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    underline: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    strikethrough: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    code: Nullable<bool>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: None,
            italic: None,
            underline: None,
            strikethrough: None,
            code: None,
            attributes: Map::new(),
        }
    }

    fn slot(&self, mark: Mark) -> Nullable<bool> {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
            Mark::Code => self.code,
        }
    }

    fn slot_mut(&mut self, mark: Mark) -> &mut Nullable<bool> {
        match mark {
            Mark::Bold => &mut self.bold,
            Mark::Italic => &mut self.italic,
            Mark::Underline => &mut self.underline,
            Mark::Strikethrough => &mut self.strikethrough,
            Mark::Code => &mut self.code,
        }
    }

    pub fn has(&self, mark: Mark) -> bool {
        self.slot(mark).flatten().unwrap_or(false)
    }

    pub fn toggle(&mut self, mark: Mark) {
        let enabled = self.has(mark);
        *self.slot_mut(mark) = if enabled { None } else { Some(Some(true)) };
    }

    pub fn with(mut self, mark: Mark) -> Self {
        *self.slot_mut(mark) = Some(Some(true));
        self
    }

    pub fn marks(&self) -> Marks {
        Marks {
            bold: self.has(Mark::Bold),
            italic: self.has(Mark::Italic),
            underline: self.has(Mark::Underline),
            strikethrough: self.has(Mark::Strikethrough),
            code: self.has(Mark::Code),
        }
    }
}

#[cfg(test)]
mod tests;
