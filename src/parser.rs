use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::node::{Document, Node, Span};

/// Strip YAML frontmatter from the beginning of markdown content.
///
/// The block must open and close with a line that is exactly `---` and hold
/// `key:` lines, so a document that merely starts with a rule is kept.
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return markdown;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            if !looks_like_yaml(&rest[..offset]) {
                return markdown;
            }
            return rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
        }
        offset += line.len();
    }
    markdown
}

/// True when the first non-blank line is a `key: value` mapping entry.
fn looks_like_yaml(header: &str) -> bool {
    let Some(first) = header.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    match first.split_once(':') {
        Some((key, _)) => {
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        }
        None => false,
    }
}

/// Parse markdown text into a document tree
pub fn parse(markdown: &str) -> Document {
    let markdown = strip_frontmatter(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(markdown, options);
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state);
    }
    state.flush_spans();

    tracing::debug!(nodes = state.nodes.len(), "parsed markdown");
    Document::new(state.nodes)
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    spans: Vec<Span>,
    // Enclosing span buffers while inside bold, italic or a link
    span_stack: Vec<Vec<Span>>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_content: String,

    // Link state
    link_url: Option<String>,

    // Open containers, innermost last
    frames: Vec<Frame>,

    // Finished top-level nodes
    nodes: Vec<Node>,
}

/// A container node that is still collecting children
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
}

#[derive(Clone, Copy)]
enum FrameKind {
    BulletList,
    OrderedList,
    Item,
    Other(&'static str),
}

impl Frame {
    fn into_node(self) -> Node {
        let children = self.children;
        match self.kind {
            FrameKind::BulletList => Node::BulletList { items: children },
            FrameKind::OrderedList => Node::OrderedList { items: children },
            FrameKind::Item => Node::ListItem { children },
            FrameKind::Other(kind) => Node::Other {
                kind: kind.to_string(),
                content: Vec::new(),
                children,
            },
        }
    }
}

impl ParseState {
    fn push_node(&mut self, node: Node) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.nodes.push(node),
        }
    }

    /// Wrap loose inline content (tight list items, table cells) in a paragraph.
    fn flush_spans(&mut self) {
        if !self.spans.is_empty() {
            let content = std::mem::take(&mut self.spans);
            self.push_node(Node::Paragraph { content });
        }
    }

    fn open(&mut self, kind: FrameKind) {
        self.flush_spans();
        self.frames.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        self.flush_spans();
        if let Some(frame) = self.frames.pop() {
            let node = frame.into_node();
            self.push_node(node);
        }
    }

    fn push_leaf(&mut self, kind: &str, content: Vec<Span>) {
        self.flush_spans();
        self.push_node(Node::Other {
            kind: kind.to_string(),
            content,
            children: Vec::new(),
        });
    }

    fn begin_format(&mut self) {
        self.span_stack.push(std::mem::take(&mut self.spans));
    }

    fn end_format(&mut self, wrap: impl FnOnce(Vec<Span>) -> Span) {
        let inner = std::mem::take(&mut self.spans);
        if let Some(mut parent) = self.span_stack.pop() {
            parent.push(wrap(inner));
            self.spans = parent;
        }
    }
}

fn process_event(event: Event, state: &mut ParseState) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.flush_spans();
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.spans);
                state.push_node(Node::Heading { level, content });
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {
            state.flush_spans();
        }
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if !content.is_empty() {
                state.push_node(Node::Paragraph { content });
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.spans.push(Span::Text(text.into_string()));
            }
        }

        // Inline code
        Event::Code(code) => {
            state.spans.push(Span::Code(code.into_string()));
        }

        // Bold
        Event::Start(Tag::Strong) => state.begin_format(),
        Event::End(TagEnd::Strong) => state.end_format(Span::Bold),

        // Italic
        Event::Start(Tag::Emphasis) => state.begin_format(),
        Event::End(TagEnd::Emphasis) => state.end_format(Span::Italic),

        // Links
        Event::Start(Tag::Link { dest_url, .. }) => {
            state.link_url = Some(dest_url.into_string());
            state.begin_format();
        }
        Event::End(TagEnd::Link) => {
            let url = state.link_url.take().unwrap_or_default();
            state.end_format(|content| Span::Link { url, content });
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(kind)) => {
            state.in_code_block = true;
            if let CodeBlockKind::Fenced(lang) = kind {
                tracing::trace!(language = %lang, "code block");
            }
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            state.push_leaf("codeBlock", vec![Span::Text(content)]);
        }

        // Block quotes
        Event::Start(Tag::BlockQuote(_)) => state.open(FrameKind::Other("blockquote")),
        Event::End(TagEnd::BlockQuote(_)) => state.close(),

        // Lists
        Event::Start(Tag::List(first_item)) => {
            let kind = if first_item.is_some() {
                FrameKind::OrderedList
            } else {
                FrameKind::BulletList
            };
            state.open(kind);
        }
        Event::End(TagEnd::List(_)) => state.close(),

        Event::Start(Tag::Item) => state.open(FrameKind::Item),
        Event::End(TagEnd::Item) => state.close(),

        // Tables
        Event::Start(Tag::Table(_)) => state.open(FrameKind::Other("table")),
        Event::End(TagEnd::Table) => state.close(),

        // The header row has no TableRow of its own
        Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
            state.open(FrameKind::Other("tableRow"));
        }
        Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => state.close(),

        Event::Start(Tag::TableCell) => state.open(FrameKind::Other("tableCell")),
        Event::End(TagEnd::TableCell) => state.close(),

        // Horizontal rule
        Event::Rule => {
            state.push_leaf("horizontalRule", Vec::new());
        }

        // Soft/hard breaks
        Event::SoftBreak => {
            state.spans.push(Span::Text(" ".to_string()));
        }
        Event::HardBreak => {
            state.spans.push(Span::LineBreak);
        }

        // Task items read like plain list items
        Event::TaskListMarker(_) => {}

        // Ignore other events
        _ => {}
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown_to_plain_text;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    #[test]
    fn tight_list_items_get_paragraphs() {
        let doc = parse("- one\n- two");
        assert_eq!(
            doc.nodes,
            vec![Node::BulletList {
                items: vec![Node::item("one"), Node::item("two")],
            }]
        );
    }

    #[test]
    fn nested_list_stays_inside_item() {
        let doc = parse("1. Parent\n   - Child\n2. Next");
        assert_eq!(
            doc.nodes,
            vec![Node::OrderedList {
                items: vec![
                    Node::ListItem {
                        children: vec![
                            Node::paragraph("Parent"),
                            Node::BulletList {
                                items: vec![Node::item("Child")],
                            },
                        ],
                    },
                    Node::item("Next"),
                ],
            }]
        );
    }

    #[test]
    fn inline_formatting_becomes_spans() {
        let doc = parse("**Bold** and *italic* [link](https://x.io)");
        assert_eq!(
            doc.nodes,
            vec![Node::Paragraph {
                content: vec![
                    Span::Bold(vec![text("Bold")]),
                    text(" and "),
                    Span::Italic(vec![text("italic")]),
                    text(" "),
                    Span::Link {
                        url: "https://x.io".to_string(),
                        content: vec![text("link")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn code_block_is_an_inert_leaf() {
        let doc = parse("```rust\nlet x = 1;\n```");
        assert_eq!(
            doc.nodes,
            vec![Node::Other {
                kind: "codeBlock".to_string(),
                content: vec![text("let x = 1;\n")],
                children: Vec::new(),
            }]
        );
    }

    #[test]
    fn frontmatter_is_stripped() {
        assert_eq!(
            markdown_to_plain_text("---\ntitle: Proposal\n---\n\nHello"),
            "Hello"
        );
    }

    #[test]
    fn leading_rule_is_not_frontmatter() {
        assert_eq!(
            markdown_to_plain_text("---\n\nIntro\n\n---\n\nOutro"),
            "Intro\n\nOutro"
        );
        assert_eq!(strip_frontmatter("---\nnot: closed"), "---\nnot: closed");
        assert_eq!(strip_frontmatter("----\ntitle: x\n---\nBody"), "----\ntitle: x\n---\nBody");
    }

    #[test]
    fn frontmatter_without_trailing_body() {
        assert_eq!(strip_frontmatter("---\ntitle: x\n---"), "");
        assert_eq!(strip_frontmatter("---\r\nclient: Acme\r\n---\r\nBody"), "Body");
    }

    #[test]
    fn task_list_markers_are_dropped() {
        assert_eq!(
            markdown_to_plain_text("- [ ] todo\n- [x] done"),
            "• todo\n• done"
        );
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            markdown_to_plain_text("**Bold** and *italic* text"),
            "Bold and italic text"
        );
    }

    #[test]
    fn paragraphs_and_headings() {
        assert_eq!(markdown_to_plain_text("A\n\nB"), "A\n\nB");
        assert_eq!(
            markdown_to_plain_text("# H1\n\nContent\n\n## H2"),
            "H1\n\nContent\n\nH2"
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            markdown_to_plain_text("- Item 1\n- Item 2\n- Item 3"),
            "• Item 1\n• Item 2\n• Item 3"
        );
        assert_eq!(
            markdown_to_plain_text("1. First\n2. Second\n3. Third"),
            "1. First\n2. Second\n3. Third"
        );
    }

    #[test]
    fn ordered_list_start_is_ignored() {
        assert_eq!(markdown_to_plain_text("5. five\n6. six"), "1. five\n2. six");
    }

    #[test]
    fn mixed_document() {
        let md = "Introduction\n\n- Point 1\n- Point 2\n\nConclusion";
        assert_eq!(
            markdown_to_plain_text(md),
            "Introduction\n\n• Point 1\n• Point 2\n\nConclusion"
        );
    }

    #[test]
    fn numbering_resets_across_lists() {
        let md = "1. First list item 1\n\nSeparator\n\n1. Second list item 1";
        assert_eq!(
            markdown_to_plain_text(md),
            "1. First list item 1\n\nSeparator\n\n1. Second list item 1"
        );
    }

    #[test]
    fn blockquote_paragraphs_pass_through() {
        assert_eq!(
            markdown_to_plain_text("Intro\n\n> Quoted line\n\nOutro"),
            "Intro\n\nQuoted line\n\nOutro"
        );
    }

    #[test]
    fn table_cells_become_paragraphs() {
        let md = "| A | B |\n|---|---|\n| 1 | 2 |";
        assert_eq!(markdown_to_plain_text(md), "A\n\nB\n\n1\n\n2");
    }

    #[test]
    fn rule_and_code_produce_nothing() {
        assert_eq!(
            markdown_to_plain_text("Above\n\n---\n\n```\ncode\n```\n\nBelow"),
            "Above\n\nBelow"
        );
    }

    #[test]
    fn hard_break_keeps_line() {
        assert_eq!(
            markdown_to_plain_text("line one  \nline two"),
            "line one\nline two"
        );
    }

    #[test]
    fn soft_break_becomes_space() {
        assert_eq!(markdown_to_plain_text("line one\nline two"), "line one line two");
    }
}
