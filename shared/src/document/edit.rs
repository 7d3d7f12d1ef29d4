//! 结构化编辑操作
//!
//! 编辑器组件只通过这里的方法修改文档，所有操作都基于块下标与 [`SpanPath`]。
//! 未知块只读并原样保留。

use thiserror::Error;

use super::{Document, Element, ElementKind, HeadingLevel, Mark, Node, Text};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("block {0} does not exist")]
    BlockOutOfRange(usize),
    #[error("block {0} cannot be edited")]
    NotEditable(usize),
    #[error("block {block} has no span at {path:?}")]
    SpanOutOfRange { block: usize, path: SpanPath },
    #[error("block {0} is not a list")]
    NotAList(usize),
}

/// 编辑器可选的块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Blockquote,
    CodeBlock,
    BulletedList,
    NumberedList,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Paragraph,
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Heading3,
        BlockKind::Blockquote,
        BlockKind::CodeBlock,
        BlockKind::BulletedList,
        BlockKind::NumberedList,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Paragraph",
            BlockKind::Heading1 => "Heading 1",
            BlockKind::Heading2 => "Heading 2",
            BlockKind::Heading3 => "Heading 3",
            BlockKind::Blockquote => "Quote",
            BlockKind::CodeBlock => "Code",
            BlockKind::BulletedList => "Bulleted list",
            BlockKind::NumberedList => "Numbered list",
        }
    }

    pub fn element_kind(&self) -> ElementKind {
        match self {
            BlockKind::Paragraph => ElementKind::Paragraph,
            BlockKind::Heading1 => ElementKind::Heading(HeadingLevel::H1),
            BlockKind::Heading2 => ElementKind::Heading(HeadingLevel::H2),
            BlockKind::Heading3 => ElementKind::Heading(HeadingLevel::H3),
            BlockKind::Blockquote => ElementKind::Blockquote,
            BlockKind::CodeBlock => ElementKind::CodeBlock,
            BlockKind::BulletedList => ElementKind::BulletedList,
            BlockKind::NumberedList => ElementKind::NumberedList,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading1 => "h1",
            BlockKind::Heading2 => "h2",
            BlockKind::Heading3 => "h3",
            BlockKind::Blockquote => "blockquote",
            BlockKind::CodeBlock => "code_block",
            BlockKind::BulletedList => "ul",
            BlockKind::NumberedList => "ol",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn of(kind: &ElementKind) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.element_kind() == *kind)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::BulletedList | BlockKind::NumberedList)
    }

    fn empty_element(&self) -> Element {
        build(*self, vec![vec![Node::Text(Text::plain(""))]])
    }
}

/// 定位块内的一段文本：列表块需要 `item`，其余块为 `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanPath {
    pub item: Option<usize>,
    pub span: usize,
}

impl SpanPath {
    pub fn inline(span: usize) -> Self {
        Self { item: None, span }
    }

    pub fn in_item(item: usize, span: usize) -> Self {
        Self {
            item: Some(item),
            span,
        }
    }
}

/// 文档的结构概要，只在结构变化时改变
///
/// 编辑器按概要构建界面，输入框的文本单独绑定，
/// 这样逐字输入不会重建整个编辑区域。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutline {
    /// `None` 表示只读的未知块
    pub kind: Option<BlockKind>,
    pub tag: String,
    /// 每行（普通块为一行，列表为每项一行）的 span 数量
    pub lines: Vec<usize>,
}

impl Document {
    pub fn outline(&self) -> Vec<BlockOutline> {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Element(element) => {
                    let kind = BlockKind::of(&element.kind);
                    let lines = match kind {
                        Some(k) if k.is_list() => list_items(element)
                            .map(|item| item_spans(item).len())
                            .collect(),
                        Some(BlockKind::CodeBlock) => vec![1],
                        Some(_) => vec![element.children().len()],
                        None => Vec::new(),
                    };
                    BlockOutline {
                        kind,
                        tag: element.kind.tag().to_string(),
                        lines,
                    }
                }
                Node::Text(_) => BlockOutline {
                    kind: None,
                    tag: "text".to_string(),
                    lines: Vec::new(),
                },
                Node::Other(_) => BlockOutline {
                    kind: None,
                    tag: "unknown".to_string(),
                    lines: Vec::new(),
                },
            })
            .collect()
    }

    // --- 读取 ---

    /// 指定 span 的叶子；非叶子的行内节点（如链接）返回 `None`
    pub fn span(&self, block: usize, path: SpanPath) -> Option<&Text> {
        let element = self.nodes.get(block)?.as_element()?;
        let line = match path.item {
            Some(item) => item_spans(list_items(element).nth(item)?),
            None => element.children(),
        };
        line.get(path.span)?.as_text()
    }

    pub fn span_text(&self, block: usize, path: SpanPath) -> Option<String> {
        self.span(block, path).map(|t| t.text.clone())
    }

    /// 代码块的全部文本，每个 `code_line` 一行
    pub fn code_text(&self, block: usize) -> Option<String> {
        let element = self.nodes.get(block)?.as_element()?;
        (element.kind == ElementKind::CodeBlock).then(|| element.plain_text())
    }

    // --- 块操作 ---

    /// 在 `after` 之后插入新块，`None` 表示插入到开头；返回新块下标
    pub fn insert_block(&mut self, after: Option<usize>, kind: BlockKind) -> usize {
        let index = after.map_or(0, |i| (i + 1).min(self.nodes.len()));
        self.nodes.insert(index, Node::Element(kind.empty_element()));
        index
    }

    /// 删除块；删除最后一个块后回到规范的空文档
    pub fn remove_block(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.nodes.len() {
            return Err(EditError::BlockOutOfRange(index));
        }
        self.nodes.remove(index);
        if self.nodes.is_empty() {
            *self = Document::empty();
        }
        Ok(())
    }

    /// 上移或下移一个位置；已在边界时不做任何事
    pub fn move_block(&mut self, index: usize, up: bool) -> Result<(), EditError> {
        if index >= self.nodes.len() {
            return Err(EditError::BlockOutOfRange(index));
        }
        let target = if up {
            index.checked_sub(1)
        } else {
            Some(index + 1).filter(|t| *t < self.nodes.len())
        };
        if let Some(target) = target {
            self.nodes.swap(index, target);
        }
        Ok(())
    }

    /// 改变块类型，必要时在文本块、代码块与列表之间转换内容
    pub fn set_block_kind(&mut self, index: usize, kind: BlockKind) -> Result<(), EditError> {
        let element = self.editable_mut(index)?;
        let current = BlockKind::of(&element.kind).ok_or(EditError::NotEditable(index))?;
        if current == kind {
            return Ok(());
        }

        if same_shape(current, kind) {
            element.kind = kind.element_kind();
            return Ok(());
        }

        let lines = into_lines(current, element);
        let attributes = std::mem::take(&mut element.attributes);
        *element = build(kind, lines);
        element.attributes = attributes;
        Ok(())
    }

    // --- span 操作 ---

    pub fn set_span_text(
        &mut self,
        block: usize,
        path: SpanPath,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        self.span_mut(block, path)?.text = text.into();
        Ok(())
    }

    pub fn toggle_mark(&mut self, block: usize, path: SpanPath, mark: Mark) -> Result<(), EditError> {
        self.span_mut(block, path)?.toggle(mark);
        Ok(())
    }

    /// 在行尾追加一个空 span，返回其路径
    pub fn push_span(&mut self, block: usize, item: Option<usize>) -> Result<SpanPath, EditError> {
        let line = self.line_mut(block, item)?;
        line.push(Node::Text(Text::plain("")));
        Ok(SpanPath {
            item,
            span: line.len() - 1,
        })
    }

    /// 删除 span；行内只剩一个 span 时改为清空它
    pub fn remove_span(&mut self, block: usize, path: SpanPath) -> Result<(), EditError> {
        let line = self.line_mut(block, path.item)?;
        if path.span >= line.len() {
            return Err(EditError::SpanOutOfRange { block, path });
        }
        if line.len() == 1 {
            line[0] = Node::Text(Text::plain(""));
        } else {
            line.remove(path.span);
        }
        Ok(())
    }

    pub fn set_code_text(&mut self, block: usize, text: &str) -> Result<(), EditError> {
        let element = self.editable_mut(block)?;
        if element.kind != ElementKind::CodeBlock {
            return Err(EditError::NotEditable(block));
        }
        element.set_children(code_lines(text.split('\n').map(str::to_string)));
        Ok(())
    }

    // --- 列表操作 ---

    pub fn push_list_item(&mut self, block: usize) -> Result<usize, EditError> {
        let element = self.list_mut(block)?;
        let children = element.children_mut();
        children.push(list_item(vec![Node::Text(Text::plain(""))]));
        Ok(children.len() - 1)
    }

    /// 删除列表项；只剩一项时改为清空它
    pub fn remove_list_item(&mut self, block: usize, item: usize) -> Result<(), EditError> {
        let element = self.list_mut(block)?;
        let positions: Vec<usize> = element
            .children()
            .iter()
            .enumerate()
            .filter(|(_, n)| is_list_item(n))
            .map(|(i, _)| i)
            .collect();
        let position = *positions.get(item).ok_or(EditError::SpanOutOfRange {
            block,
            path: SpanPath::in_item(item, 0),
        })?;

        let children = element.children_mut();
        if positions.len() == 1 {
            children[position] = list_item(vec![Node::Text(Text::plain(""))]);
        } else {
            children.remove(position);
        }
        Ok(())
    }

    // --- 内部工具 ---

    fn editable_mut(&mut self, index: usize) -> Result<&mut Element, EditError> {
        match self.nodes.get_mut(index) {
            None => Err(EditError::BlockOutOfRange(index)),
            Some(Node::Element(e)) if BlockKind::of(&e.kind).is_some() => Ok(e),
            Some(_) => Err(EditError::NotEditable(index)),
        }
    }

    fn list_mut(&mut self, index: usize) -> Result<&mut Element, EditError> {
        let element = self.editable_mut(index)?;
        if element.kind.is_list() {
            Ok(element)
        } else {
            Err(EditError::NotAList(index))
        }
    }

    fn line_mut(&mut self, block: usize, item: Option<usize>) -> Result<&mut Vec<Node>, EditError> {
        let element = self.editable_mut(block)?;
        match item {
            None if !element.kind.is_list() && element.kind != ElementKind::CodeBlock => {
                Ok(element.children_mut())
            }
            Some(item) if element.kind.is_list() => element
                .children_mut()
                .iter_mut()
                .filter(|n| is_list_item(n))
                .nth(item)
                .and_then(|n| match n {
                    Node::Element(li) => item_spans_mut(li),
                    _ => None,
                })
                .ok_or(EditError::SpanOutOfRange {
                    block,
                    path: SpanPath::in_item(item, 0),
                }),
            _ => Err(EditError::NotEditable(block)),
        }
    }

    fn span_mut(&mut self, block: usize, path: SpanPath) -> Result<&mut Text, EditError> {
        let line = self.line_mut(block, path.item)?;
        match line.get_mut(path.span) {
            Some(Node::Text(text)) => Ok(text),
            _ => Err(EditError::SpanOutOfRange { block, path }),
        }
    }
}

fn is_list_item(node: &Node) -> bool {
    matches!(node, Node::Element(e) if e.kind == ElementKind::ListItem)
}

fn list_items(list: &Element) -> impl Iterator<Item = &Element> {
    list.children()
        .iter()
        .filter_map(Node::as_element)
        .filter(|e| e.kind == ElementKind::ListItem)
}

/// 列表项的 span 所在：单个 `lic` 子元素时取其子节点，否则取列表项自身的子节点
fn item_spans(item: &Element) -> &[Node] {
    match item.children() {
        [Node::Element(lic)] if lic.kind == ElementKind::ListItemContent => lic.children(),
        children => children,
    }
}

fn item_spans_mut(item: &mut Element) -> Option<&mut Vec<Node>> {
    let wrapped = matches!(
        item.children(),
        [Node::Element(lic)] if lic.kind == ElementKind::ListItemContent
    );
    if wrapped {
        match item.children_mut().first_mut() {
            Some(Node::Element(lic)) => Some(lic.children_mut()),
            _ => None,
        }
    } else {
        Some(item.children_mut())
    }
}

fn list_item(spans: Vec<Node>) -> Node {
    Node::Element(Element::new(ElementKind::ListItem, spans))
}

fn code_lines(lines: impl Iterator<Item = String>) -> Vec<Node> {
    lines
        .map(|line| {
            Node::Element(Element::new(
                ElementKind::CodeLine,
                vec![Node::Text(Text::plain(line))],
            ))
        })
        .collect()
}

fn same_shape(a: BlockKind, b: BlockKind) -> bool {
    let shape = |k: BlockKind| match k {
        BlockKind::CodeBlock => 1,
        k if k.is_list() => 2,
        _ => 0,
    };
    shape(a) == shape(b)
}

/// 把块内容拆成若干行 span
fn into_lines(kind: BlockKind, element: &mut Element) -> Vec<Vec<Node>> {
    match kind {
        k if k.is_list() => element
            .children_mut()
            .iter_mut()
            .filter_map(|n| match n {
                Node::Element(li) if li.kind == ElementKind::ListItem => {
                    item_spans_mut(li).map(std::mem::take)
                }
                _ => None,
            })
            .collect(),
        BlockKind::CodeBlock => element
            .children()
            .iter()
            .map(|line| vec![Node::Text(Text::plain(line.plain_text()))])
            .collect(),
        _ => vec![std::mem::take(element.children_mut())],
    }
}

/// 按目标类型由行重新构建元素
fn build(kind: BlockKind, lines: Vec<Vec<Node>>) -> Element {
    let lines: Vec<Vec<Node>> = if lines.is_empty() {
        vec![vec![Node::Text(Text::plain(""))]]
    } else {
        lines
    };

    let children = match kind {
        k if k.is_list() => lines.into_iter().map(list_item).collect(),
        BlockKind::CodeBlock => code_lines(
            lines
                .iter()
                .map(|line| line.iter().map(Node::plain_text).collect::<String>()),
        ),
        _ => {
            let mut merged: Vec<Node> = Vec::new();
            for line in lines {
                if !merged.is_empty() && !line.is_empty() {
                    merged.push(Node::Text(Text::plain(" ")));
                }
                merged.extend(line);
            }
            if merged.is_empty() {
                merged.push(Node::Text(Text::plain("")));
            }
            merged
        }
    };
    Element::new(kind.element_kind(), children)
}
