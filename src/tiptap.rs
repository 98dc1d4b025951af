//! Conversion from the editor's JSON document format.
//!
//! The rich-text editor (TipTap, on top of ProseMirror) serializes its
//! document as nested JSON objects:
//!
//! ```json
//! {"type": "doc", "content": [
//!   {"type": "paragraph", "content": [
//!     {"type": "text", "text": "Hello ", "marks": [{"type": "bold"}]}
//!   ]}
//! ]}
//! ```
//!
//! Only the node types the normalizer distinguishes are mapped to their own
//! [`Node`] variant; everything else becomes [`Node::Other`] so that its
//! descendants are still walked.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::node::{Document, Node, Span};

/// A raw editor node as found in the JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct TiptapNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attrs: Map<String, Value>,
    #[serde(default)]
    pub content: Vec<TiptapNode>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub marks: Vec<TiptapMark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiptapMark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attrs: Map<String, Value>,
}

impl TiptapNode {
    fn is_inline(&self) -> bool {
        matches!(self.kind.as_str(), "text" | "hardBreak")
    }

    fn heading_level(&self) -> u8 {
        self.attrs
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|level| u8::try_from(level).ok())
            .unwrap_or(1)
    }
}

/// Parse the editor's JSON serialization into a document tree.
pub fn parse_tiptap_json(json: &str) -> Result<Document> {
    let root: TiptapNode = serde_json::from_str(json)?;
    Document::from_tiptap(root)
}

impl Document {
    /// Convert an editor document. The root node must be of type `doc`.
    pub fn from_tiptap(root: TiptapNode) -> Result<Self> {
        if root.kind != "doc" {
            return Err(Error::UnexpectedRoot { found: root.kind });
        }
        let nodes: Vec<Node> = root.content.into_iter().map(convert_block).collect();
        tracing::debug!(nodes = nodes.len(), "converted editor document");
        Ok(Document::new(nodes))
    }
}

fn convert_block(node: TiptapNode) -> Node {
    match node.kind.as_str() {
        "paragraph" => Node::Paragraph {
            content: convert_inline(node.content),
        },
        "heading" => Node::Heading {
            level: node.heading_level(),
            content: convert_inline(node.content),
        },
        "bulletList" => Node::BulletList {
            items: node.content.into_iter().map(convert_block).collect(),
        },
        "orderedList" => Node::OrderedList {
            items: node.content.into_iter().map(convert_block).collect(),
        },
        "listItem" => Node::ListItem {
            children: node.content.into_iter().map(convert_block).collect(),
        },
        _ => {
            let (inline, blocks): (Vec<_>, Vec<_>) =
                node.content.into_iter().partition(TiptapNode::is_inline);
            Node::Other {
                kind: node.kind,
                content: convert_inline(inline),
                children: blocks.into_iter().map(convert_block).collect(),
            }
        }
    }
}

fn convert_inline(nodes: Vec<TiptapNode>) -> Vec<Span> {
    nodes.into_iter().filter_map(convert_span).collect()
}

fn convert_span(node: TiptapNode) -> Option<Span> {
    match node.kind.as_str() {
        "text" => {
            let text = node.text?;
            Some(
                node.marks
                    .iter()
                    .rev()
                    .fold(Span::Text(text), |span, mark| apply_mark(span, mark)),
            )
        }
        "hardBreak" => Some(Span::LineBreak),
        // Inline atoms such as mentions carry their text in `attrs.label`
        _ => node
            .attrs
            .get("label")
            .and_then(Value::as_str)
            .map(|label| Span::Text(label.to_string())),
    }
}

fn apply_mark(span: Span, mark: &TiptapMark) -> Span {
    match mark.kind.as_str() {
        "bold" => Span::Bold(vec![span]),
        "italic" => Span::Italic(vec![span]),
        "link" => Span::Link {
            url: mark
                .attrs
                .get("href")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            content: vec![span],
        },
        "code" => match span {
            Span::Text(text) => Span::Code(text),
            other => other,
        },
        _ => span,
    }
}
