mod config;
mod error;
mod node;
mod parser;
mod plain;
mod tiptap;

pub use config::{Config, ListConfig, OutputConfig};
pub use error::{Error, Result};
pub use node::{Document, Node, NodeKind, Span};
pub use plain::{
    Block, BlockKind, extract_blocks, extract_plain_text, extract_plain_text_with_config,
    join_blocks,
};
pub use tiptap::{TiptapMark, TiptapNode, parse_tiptap_json};

use std::path::Path;

/// Parse markdown text into a document tree.
pub fn parse(markdown: &str) -> Document {
    parser::parse(markdown)
}

/// Convert markdown to plain text using default config.
pub fn markdown_to_plain_text(markdown: &str) -> String {
    extract_plain_text(&parse(markdown))
}

/// Serialization of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// JSON when the path ends in `.json` or the content opens with `{`,
    /// markdown otherwise.
    #[default]
    Auto,
    Markdown,
    Json,
}

impl InputFormat {
    /// Resolve `Auto` against the input's path and content.
    pub fn resolve(self, path: Option<&Path>, content: &str) -> Self {
        if self != InputFormat::Auto {
            return self;
        }
        let json_extension = path
            .and_then(Path::extension)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if json_extension || content.trim_start().starts_with('{') {
            InputFormat::Json
        } else {
            InputFormat::Markdown
        }
    }
}

/// Parse an input document in the given format.
pub fn parse_input(content: &str, format: InputFormat) -> Result<Document> {
    match format {
        InputFormat::Json => parse_tiptap_json(content),
        InputFormat::Markdown | InputFormat::Auto => Ok(parse(content)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_format_detection() {
        let md = Path::new("proposal.md");
        let json = Path::new("proposal.JSON");
        assert_eq!(InputFormat::Auto.resolve(Some(md), "# Hi"), InputFormat::Markdown);
        assert_eq!(InputFormat::Auto.resolve(Some(json), "# Hi"), InputFormat::Json);
        assert_eq!(InputFormat::Auto.resolve(None, "  {\"type\":\"doc\"}"), InputFormat::Json);
        assert_eq!(InputFormat::Markdown.resolve(Some(json), "{"), InputFormat::Markdown);
    }

    #[test]
    fn parse_input_dispatches_on_format() {
        let json = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hi"}]}]}"#;
        let doc = parse_input(json, InputFormat::Json).unwrap();
        assert_eq!(extract_plain_text(&doc), "Hi");

        let doc = parse_input("- Hi", InputFormat::Markdown).unwrap();
        assert_eq!(extract_plain_text(&doc), "• Hi");
    }
}
