/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    Bold(Vec<Span>),
    Italic(Vec<Span>),
    Code(String),
    Link { url: String, content: Vec<Span> },
    LineBreak,
}

impl Span {
    /// Append the text of this span to `out`, dropping all formatting.
    pub fn push_text(&self, out: &mut String) {
        match self {
            Span::Text(text) | Span::Code(text) => out.push_str(text),
            Span::Bold(inner) | Span::Italic(inner) | Span::Link { content: inner, .. } => {
                push_spans_text(inner, out);
            }
            Span::LineBreak => out.push('\n'),
        }
    }
}

pub(crate) fn push_spans_text(spans: &[Span], out: &mut String) {
    for span in spans {
        span.push_text(out);
    }
}

/// Block-level node of a rich-text document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Paragraph {
        content: Vec<Span>,
    },
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    BulletList {
        items: Vec<Node>,
    },
    OrderedList {
        items: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    /// Any container without its own rendering (blockquote, code block,
    /// table, rule, ...). Only its descendants can produce output.
    Other {
        kind: String,
        content: Vec<Span>,
        children: Vec<Node>,
    },
}

/// The kind of a [`Node`], used as the parent reference during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    Other,
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            content: vec![Span::Text(text.into())],
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level,
            content: vec![Span::Text(text.into())],
        }
    }

    /// A list item holding a single paragraph.
    pub fn item(text: impl Into<String>) -> Self {
        Node::ListItem {
            children: vec![Node::paragraph(text)],
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Heading { .. } => NodeKind::Heading,
            Node::BulletList { .. } => NodeKind::BulletList,
            Node::OrderedList { .. } => NodeKind::OrderedList,
            Node::ListItem { .. } => NodeKind::ListItem,
            Node::Other { .. } => NodeKind::Other,
        }
    }

    /// Block-level children, in document order.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph { .. } | Node::Heading { .. } => &[],
            Node::BulletList { items } | Node::OrderedList { items } => items,
            Node::ListItem { children } | Node::Other { children, .. } => children,
        }
    }

    /// All descendant text concatenated without separators.
    ///
    /// A list item with a nested list therefore reads as its own text
    /// directly followed by the nested items' text.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Paragraph { content } | Node::Heading { content, .. } => {
                push_spans_text(content, out);
            }
            Node::Other {
                content, children, ..
            } => {
                push_spans_text(content, out);
                for child in children {
                    child.push_text(out);
                }
            }
            _ => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }
}

/// A rich-text document: an ordered sequence of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
