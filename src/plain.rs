use crate::config::Config;
use crate::node::{Document, Node, NodeKind};

/// How an emitted block takes part in separator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    ListItem,
    Other,
}

/// One unit of plain-text output, already carrying its list marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub text: String,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

/// Traversal state for a single extraction. Never outlives the call.
struct Walker<'a> {
    config: &'a Config,
    blocks: Vec<Block>,
    counter: u32,
    list: Option<ListKind>,
}

impl<'a> Walker<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            counter: 0,
            list: None,
        }
    }

    fn emit(&mut self, text: String, kind: BlockKind) {
        self.blocks.push(Block { text, kind });
    }

    fn walk(&mut self, nodes: &[Node], parent: Option<NodeKind>) {
        for node in nodes {
            self.visit(node, parent);
        }
    }

    fn visit(&mut self, node: &Node, parent: Option<NodeKind>) {
        match node {
            Node::ListItem { .. } if parent == Some(NodeKind::BulletList) => {
                let text = trimmed_text(node);
                if !text.is_empty() {
                    let text = format!("{}{}", self.config.list.bullet_prefix(), text);
                    self.emit(text, BlockKind::ListItem);
                }
            }
            Node::ListItem { .. } if parent == Some(NodeKind::OrderedList) => {
                if self.list != Some(ListKind::Ordered) {
                    self.counter = 0;
                    self.list = Some(ListKind::Ordered);
                }
                let text = trimmed_text(node);
                if !text.is_empty() {
                    self.counter += 1;
                    let text = format!("{}{}", self.config.list.ordered_prefix(self.counter), text);
                    self.emit(text, BlockKind::ListItem);
                }
            }
            Node::Paragraph { .. } => {
                let text = trimmed_text(node);
                if !text.is_empty() {
                    self.emit(text, BlockKind::Paragraph);
                }
                if parent != Some(NodeKind::OrderedList) {
                    self.list = None;
                }
            }
            Node::Heading { .. } => {
                let text = trimmed_text(node);
                if !text.is_empty() {
                    self.emit(text, BlockKind::Heading);
                }
                self.list = None;
            }
            Node::BulletList { items } => {
                self.list = Some(ListKind::Bullet);
                self.walk(items, Some(NodeKind::BulletList));
            }
            Node::OrderedList { items } => {
                self.list = Some(ListKind::Ordered);
                self.counter = 0;
                self.walk(items, Some(NodeKind::OrderedList));
            }
            // Other containers and list items outside a list
            _ => {
                self.list = None;
                self.walk(node.children(), Some(node.kind()));
            }
        }
    }
}

fn trimmed_text(node: &Node) -> String {
    node.text_content().trim().to_string()
}

/// Walk the document and collect the blocks that make up its plain text.
pub fn extract_blocks(document: &Document, config: &Config) -> Vec<Block> {
    let mut walker = Walker::new(config);
    walker.walk(&document.nodes, None);
    tracing::trace!(
        nodes = document.nodes.len(),
        blocks = walker.blocks.len(),
        "extracted blocks"
    );
    walker.blocks
}

/// Join blocks, keeping consecutive list items on adjacent lines and
/// separating everything else by the block separator.
pub fn join_blocks(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();
    let mut prev: Option<BlockKind> = None;

    for block in blocks {
        if let Some(prev) = prev {
            if prev == BlockKind::ListItem && block.kind == BlockKind::ListItem {
                out.push_str(&config.output.item_separator);
            } else {
                out.push_str(&config.output.block_separator);
            }
        }
        out.push_str(&block.text);
        prev = Some(block.kind);
    }

    out.trim().to_string()
}

/// Convert a document to plain text with custom config.
pub fn extract_plain_text_with_config(document: &Document, config: &Config) -> String {
    let blocks = extract_blocks(document, config);
    join_blocks(&blocks, config)
}

/// Convert a document to plain text using default config.
pub fn extract_plain_text(document: &Document) -> String {
    extract_plain_text_with_config(document, &Config::default())
}
