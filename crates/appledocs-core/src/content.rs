//! Rich documentation content.
//!
//! Documentation pages describe their body as a tree of blocks. Blocks are a
//! closed tagged union; lists, asides and term definitions recurse into further
//! blocks. Anything the model does not recognise decodes as an `Unknown` variant
//! holding the raw JSON, so it survives a save instead of failing the document.
//!
//! Consumers walk the tree with [`ContentVisitor`] and [`walk_blocks`] rather
//! than matching on variants ad hoc.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A block-level content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    /// Section heading.
    Heading {
        /// Heading level, 1-based.
        #[serde(default = "default_heading_level")]
        level: u8,
        /// Heading text.
        text: String,
        /// Anchor id, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    /// Paragraph of inline content.
    Paragraph {
        /// Inline runs.
        #[serde(rename = "inlineContent", default)]
        inline_content: Vec<InlineContent>,
    },
    /// Source listing.
    CodeListing {
        /// Language of the listing, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        syntax: Option<String>,
        /// One entry per source line.
        #[serde(default)]
        code: Vec<String>,
    },
    /// Bulleted list.
    UnorderedList {
        /// List items.
        #[serde(default)]
        items: Vec<ListItem>,
    },
    /// Numbered list.
    OrderedList {
        /// List items.
        #[serde(default)]
        items: Vec<ListItem>,
    },
    /// Callout box (note, important, warning, ...).
    Aside {
        /// Callout style.
        #[serde(default = "default_aside_style")]
        style: String,
        /// Callout body.
        #[serde(default)]
        content: Vec<ContentBlock>,
    },
    /// Definition list.
    TermList {
        /// Term/definition pairs.
        #[serde(default)]
        items: Vec<TermListItem>,
    },
    /// Table made of rows of cells, each cell a list of blocks.
    Table {
        /// Header mode reported upstream ("row", "column", "none").
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<String>,
        /// Rows of cells.
        #[serde(default)]
        rows: Vec<Vec<Vec<ContentBlock>>>,
    },
    /// Any block type this model does not understand, kept verbatim.
    #[serde(untagged)]
    Unknown(Value),
}

/// One list item: a sequence of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item body.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One entry of a [`ContentBlock::TermList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermListItem {
    /// The term being defined.
    pub term: Term,
    /// The definition.
    pub definition: Definition,
}

/// Term part of a definition list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Inline runs of the term.
    #[serde(rename = "inlineContent", default)]
    pub inline_content: Vec<InlineContent>,
}

/// Definition part of a definition list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Definition body.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// An inline content run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineContent {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// Inline code.
    CodeVoice {
        /// The code.
        code: String,
    },
    /// Link to another documentation page by reference identifier.
    Reference {
        /// Key into the owning document's `references` table.
        identifier: String,
        /// Whether the link is live.
        #[serde(rename = "isActive", default)]
        is_active: bool,
    },
    /// Emphasized runs.
    Emphasis {
        /// Nested runs.
        #[serde(rename = "inlineContent", default)]
        inline_content: Vec<InlineContent>,
    },
    /// Strong runs.
    Strong {
        /// Nested runs.
        #[serde(rename = "inlineContent", default)]
        inline_content: Vec<InlineContent>,
    },
    /// Inline image by reference identifier.
    Image {
        /// Key into the owning document's `references` table.
        identifier: String,
    },
    /// Any inline type this model does not understand, kept verbatim.
    #[serde(untagged)]
    Unknown(Value),
}

const fn default_heading_level() -> u8 {
    2
}

fn default_aside_style() -> String {
    "note".to_string()
}

/// Callbacks invoked by [`walk_blocks`] and [`walk_inline`].
///
/// Every method has an empty default so visitors only implement what they need.
/// `enter_*`/`exit_*` pairs bracket the recursive cases.
pub trait ContentVisitor {
    /// A heading block.
    fn heading(&mut self, _level: u8, _text: &str) {}
    /// Start of a paragraph; its inline runs follow.
    fn enter_paragraph(&mut self) {}
    /// End of a paragraph.
    fn exit_paragraph(&mut self) {}
    /// A code listing.
    fn code_listing(&mut self, _syntax: Option<&str>, _lines: &[String]) {}
    /// Start of a list.
    fn enter_list(&mut self, _ordered: bool) {}
    /// Start of a list item; its blocks follow.
    fn enter_list_item(&mut self, _index: usize) {}
    /// End of a list item.
    fn exit_list_item(&mut self) {}
    /// End of a list.
    fn exit_list(&mut self, _ordered: bool) {}
    /// Start of an aside; its blocks follow.
    fn enter_aside(&mut self, _style: &str) {}
    /// End of an aside.
    fn exit_aside(&mut self) {}
    /// Start of a term; its inline runs follow.
    fn enter_term(&mut self) {}
    /// End of a term; the definition blocks follow.
    fn exit_term(&mut self) {}
    /// Start of a table row.
    fn enter_table_row(&mut self, _row: usize) {}
    /// End of a table cell.
    fn exit_table_cell(&mut self) {}
    /// End of a table row.
    fn exit_table_row(&mut self) {}
    /// Plain text run.
    fn text(&mut self, _text: &str) {}
    /// Inline code run.
    fn code_voice(&mut self, _code: &str) {}
    /// Reference run.
    fn reference(&mut self, _identifier: &str) {}
    /// Start of an emphasis or strong run.
    fn enter_emphasis(&mut self, _strong: bool) {}
    /// End of an emphasis or strong run.
    fn exit_emphasis(&mut self, _strong: bool) {}
    /// Any unknown node.
    fn unknown(&mut self) {}
}

/// Walk a block sequence depth-first.
pub fn walk_blocks<V: ContentVisitor + ?Sized>(blocks: &[ContentBlock], visitor: &mut V) {
    for block in blocks {
        walk_block(block, visitor);
    }
}

/// Walk one block depth-first.
pub fn walk_block<V: ContentVisitor + ?Sized>(block: &ContentBlock, visitor: &mut V) {
    match block {
        ContentBlock::Heading { level, text, .. } => visitor.heading(*level, text),
        ContentBlock::Paragraph { inline_content } => {
            visitor.enter_paragraph();
            walk_inline(inline_content, visitor);
            visitor.exit_paragraph();
        },
        ContentBlock::CodeListing { syntax, code } => {
            visitor.code_listing(syntax.as_deref(), code);
        },
        ContentBlock::UnorderedList { items } | ContentBlock::OrderedList { items } => {
            let ordered = matches!(block, ContentBlock::OrderedList { .. });
            visitor.enter_list(ordered);
            for (index, item) in items.iter().enumerate() {
                visitor.enter_list_item(index);
                walk_blocks(&item.content, visitor);
                visitor.exit_list_item();
            }
            visitor.exit_list(ordered);
        },
        ContentBlock::Aside { style, content } => {
            visitor.enter_aside(style);
            walk_blocks(content, visitor);
            visitor.exit_aside();
        },
        ContentBlock::TermList { items } => {
            for item in items {
                visitor.enter_term();
                walk_inline(&item.term.inline_content, visitor);
                visitor.exit_term();
                walk_blocks(&item.definition.content, visitor);
            }
        },
        ContentBlock::Table { rows, .. } => {
            for (index, row) in rows.iter().enumerate() {
                visitor.enter_table_row(index);
                for cell in row {
                    walk_blocks(cell, visitor);
                    visitor.exit_table_cell();
                }
                visitor.exit_table_row();
            }
        },
        ContentBlock::Unknown(_) => visitor.unknown(),
    }
}

/// Walk inline runs depth-first.
pub fn walk_inline<V: ContentVisitor + ?Sized>(runs: &[InlineContent], visitor: &mut V) {
    for run in runs {
        match run {
            InlineContent::Text { text } => visitor.text(text),
            InlineContent::CodeVoice { code } => visitor.code_voice(code),
            InlineContent::Reference { identifier, .. } => visitor.reference(identifier),
            InlineContent::Emphasis { inline_content } => {
                visitor.enter_emphasis(false);
                walk_inline(inline_content, visitor);
                visitor.exit_emphasis(false);
            },
            InlineContent::Strong { inline_content } => {
                visitor.enter_emphasis(true);
                walk_inline(inline_content, visitor);
                visitor.exit_emphasis(true);
            },
            InlineContent::Image { .. } | InlineContent::Unknown(_) => visitor.unknown(),
        }
    }
}

/// Collects the plain text of a tree, separating blocks with spaces.
#[derive(Debug, Default)]
pub struct PlainText {
    out: String,
}

impl PlainText {
    /// Flatten inline runs to text.
    #[must_use]
    pub fn of_inline(runs: &[InlineContent]) -> String {
        let mut collector = Self::default();
        walk_inline(runs, &mut collector);
        collector.finish()
    }

    /// Flatten blocks to text.
    #[must_use]
    pub fn of_blocks(blocks: &[ContentBlock]) -> String {
        let mut collector = Self::default();
        walk_blocks(blocks, &mut collector);
        collector.finish()
    }

    fn push(&mut self, fragment: &str) {
        self.out.push_str(fragment);
    }

    fn separate(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with(' ') {
            self.out.push(' ');
        }
    }

    fn finish(self) -> String {
        self.out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl ContentVisitor for PlainText {
    fn heading(&mut self, _level: u8, text: &str) {
        self.separate();
        self.push(text);
        self.separate();
    }

    fn exit_paragraph(&mut self) {
        self.separate();
    }

    fn code_listing(&mut self, _syntax: Option<&str>, lines: &[String]) {
        self.separate();
        self.push(&lines.join(" "));
        self.separate();
    }

    fn exit_list_item(&mut self) {
        self.separate();
    }

    fn text(&mut self, text: &str) {
        self.push(text);
    }

    fn code_voice(&mut self, code: &str) {
        self.push(code);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Counter {
        headings: usize,
        lists: usize,
        items: usize,
        unknown: usize,
        depth: usize,
        max_depth: usize,
    }

    impl ContentVisitor for Counter {
        fn heading(&mut self, _level: u8, _text: &str) {
            self.headings += 1;
        }
        fn enter_list(&mut self, _ordered: bool) {
            self.lists += 1;
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }
        fn exit_list(&mut self, _ordered: bool) {
            self.depth -= 1;
        }
        fn enter_list_item(&mut self, _index: usize) {
            self.items += 1;
        }
        fn unknown(&mut self) {
            self.unknown += 1;
        }
    }

    fn sample() -> Vec<ContentBlock> {
        serde_json::from_value(json!([
            {"type": "heading", "level": 2, "text": "Overview", "anchor": "overview"},
            {"type": "paragraph", "inlineContent": [
                {"type": "text", "text": "Use "},
                {"type": "codeVoice", "code": "View"},
                {"type": "text", "text": " to compose."}
            ]},
            {"type": "unorderedList", "items": [
                {"content": [{"type": "paragraph", "inlineContent": [{"type": "text", "text": "one"}]}]},
                {"content": [
                    {"type": "orderedList", "items": [
                        {"content": [{"type": "paragraph", "inlineContent": [{"type": "text", "text": "nested"}]}]}
                    ]}
                ]}
            ]},
            {"type": "video", "identifier": "intro.mp4"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_unknown_block_types_decode() {
        let blocks = sample();
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[3],
            ContentBlock::Unknown(json!({"type": "video", "identifier": "intro.mp4"}))
        );
        let saved = serde_json::to_value(&blocks[3]).unwrap();
        assert_eq!(saved, json!({"type": "video", "identifier": "intro.mp4"}));
    }

    #[test]
    fn test_visitor_reaches_nested_lists() {
        let mut counter = Counter::default();
        walk_blocks(&sample(), &mut counter);

        assert_eq!(counter.headings, 1);
        assert_eq!(counter.lists, 2);
        assert_eq!(counter.items, 3);
        assert_eq!(counter.max_depth, 2);
        assert_eq!(counter.unknown, 1);
        assert_eq!(counter.depth, 0);
    }

    #[test]
    fn test_plain_text_flattening() {
        let text = PlainText::of_blocks(&sample());
        assert_eq!(text, "Overview Use View to compose. one nested");
    }

    #[test]
    fn test_inline_emphasis_flattening() {
        let runs: Vec<InlineContent> = serde_json::from_value(json!([
            {"type": "text", "text": "A "},
            {"type": "emphasis", "inlineContent": [{"type": "text", "text": "very"}]},
            {"type": "text", "text": " good control"}
        ]))
        .unwrap();

        assert_eq!(PlainText::of_inline(&runs), "A very good control");
    }
}
