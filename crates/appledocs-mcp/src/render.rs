//! Markdown rendering of documentation pages.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use appledocs_core::content::{ContentVisitor, walk_blocks};
use appledocs_core::{ContentSection, Platform, ReferenceData, SymbolData, TopicSection};

/// Writes content blocks as markdown, resolving references to their titles.
struct MarkdownWriter<'a> {
    out: String,
    references: &'a BTreeMap<String, ReferenceData>,
    list_stack: Vec<bool>,
    quote_depth: usize,
}

impl<'a> MarkdownWriter<'a> {
    fn new(references: &'a BTreeMap<String, ReferenceData>) -> Self {
        Self {
            out: String::new(),
            references,
            list_stack: Vec::new(),
            quote_depth: 0,
        }
    }

    fn line_prefix(&self) -> String {
        let mut prefix = "> ".repeat(self.quote_depth);
        if !self.list_stack.is_empty() {
            prefix.push_str(&"  ".repeat(self.list_stack.len()));
        }
        prefix
    }

    fn blank_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            if !self.out.ends_with('\n') {
                self.out.push('\n');
            }
            if self.list_stack.is_empty() {
                self.out.push('\n');
            }
        }
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

impl ContentVisitor for MarkdownWriter<'_> {
    fn heading(&mut self, level: u8, text: &str) {
        self.blank_line();
        let hashes = "#".repeat((usize::from(level) + 1).clamp(3, 6));
        let _ = write!(self.out, "{hashes} {text}");
        self.blank_line();
    }

    fn enter_paragraph(&mut self) {
        if !self.list_stack.is_empty() {
            return;
        }
        if self.quote_depth == 0 {
            self.blank_line();
        } else if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str(&self.line_prefix());
    }

    fn exit_paragraph(&mut self) {
        self.blank_line();
    }

    fn code_listing(&mut self, syntax: Option<&str>, lines: &[String]) {
        self.blank_line();
        let prefix = self.line_prefix();
        let _ = writeln!(self.out, "{prefix}```{}", syntax.unwrap_or_default());
        for line in lines {
            let _ = writeln!(self.out, "{prefix}{line}");
        }
        let _ = write!(self.out, "{prefix}```");
        self.blank_line();
    }

    fn enter_list(&mut self, ordered: bool) {
        self.blank_line();
        self.list_stack.push(ordered);
    }

    fn enter_list_item(&mut self, index: usize) {
        let depth = self.list_stack.len().saturating_sub(1);
        let ordered = self.list_stack.last().copied().unwrap_or(false);
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str(&"> ".repeat(self.quote_depth));
        self.out.push_str(&"  ".repeat(depth));
        if ordered {
            let _ = write!(self.out, "{}. ", index + 1);
        } else {
            self.out.push_str("- ");
        }
    }

    fn exit_list(&mut self, _ordered: bool) {
        self.list_stack.pop();
        self.blank_line();
    }

    fn enter_aside(&mut self, style: &str) {
        self.blank_line();
        let mut label = style.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        let _ = write!(self.out, "{}**{label}:**", "> ".repeat(self.quote_depth + 1));
        self.quote_depth += 1;
        self.out.push('\n');
    }

    fn exit_aside(&mut self) {
        self.quote_depth = self.quote_depth.saturating_sub(1);
        self.blank_line();
    }

    fn enter_term(&mut self) {
        self.blank_line();
        self.out.push_str("**");
    }

    fn exit_term(&mut self) {
        self.out.push_str("**");
        self.blank_line();
    }

    fn exit_table_cell(&mut self) {
        self.out.push_str(" | ");
    }

    fn exit_table_row(&mut self) {
        self.out.push('\n');
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn code_voice(&mut self, code: &str) {
        let _ = write!(self.out, "`{code}`");
    }

    fn reference(&mut self, identifier: &str) {
        match self.references.get(identifier) {
            Some(r) if !r.title.is_empty() => {
                let _ = write!(self.out, "`{}`", r.title);
            },
            _ => {
                let fallback = identifier.rsplit('/').next().unwrap_or(identifier);
                let _ = write!(self.out, "`{fallback}`");
            },
        }
    }

    fn enter_emphasis(&mut self, strong: bool) {
        self.out.push_str(if strong { "**" } else { "_" });
    }

    fn exit_emphasis(&mut self, strong: bool) {
        self.out.push_str(if strong { "**" } else { "_" });
    }
}

fn availability(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| {
            let mut label = p.name.clone();
            if let Some(version) = &p.introduced_at {
                let _ = write!(label, " {version}+");
            }
            if p.beta == Some(true) {
                label.push_str(" (beta)");
            }
            if p.deprecated == Some(true) {
                label.push_str(" (deprecated)");
            }
            label
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_topics(out: &mut String, heading: &str, sections: &[TopicSection], references: &BTreeMap<String, ReferenceData>) {
    if sections.iter().all(|s| s.identifiers.is_empty()) {
        return;
    }
    let _ = writeln!(out, "\n## {heading}");
    for section in sections {
        if section.identifiers.is_empty() {
            continue;
        }
        if !section.title.is_empty() {
            let _ = writeln!(out, "\n### {}", section.title);
        }
        for id in &section.identifiers {
            match references.get(id) {
                Some(r) => {
                    let summary = r.abstract_text();
                    let path = r.url.as_deref().unwrap_or_default();
                    if summary.is_empty() {
                        let _ = writeln!(out, "- **{}** `{path}`", r.title);
                    } else {
                        let _ = writeln!(out, "- **{}** `{path}`: {summary}", r.title);
                    }
                },
                None => {
                    let _ = writeln!(out, "- `{id}`");
                },
            }
        }
    }
}

/// Render a symbol page as markdown.
pub fn render_symbol(symbol: &SymbolData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", symbol.metadata.title);

    let mut facts = vec![format!("**Kind:** {}", symbol.kind())];
    if let Some(path) = symbol.path() {
        facts.push(format!("**Path:** `{path}`"));
    }
    let platforms = availability(&symbol.metadata.platforms);
    if !platforms.is_empty() {
        facts.push(format!("**Availability:** {platforms}"));
    }
    let _ = writeln!(out, "\n{}", facts.join("  \n"));

    let summary = symbol.abstract_text();
    if !summary.is_empty() {
        let _ = writeln!(out, "\n{summary}");
    }

    for section in &symbol.primary_content_sections {
        match section {
            ContentSection::Declarations { declarations } => {
                if declarations.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "\n## Declaration");
                for declaration in declarations {
                    let language = declaration
                        .languages
                        .first()
                        .map_or("swift", String::as_str);
                    let _ = writeln!(out, "\n```{language}\n{}\n```", declaration.source());
                }
            },
            ContentSection::Parameters { parameters } => {
                if parameters.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "\n## Parameters\n");
                for parameter in parameters {
                    let mut writer = MarkdownWriter::new(&symbol.references);
                    walk_blocks(&parameter.content, &mut writer);
                    let body = writer.finish().replace('\n', " ");
                    let _ = writeln!(out, "- `{}`: {body}", parameter.name);
                }
            },
            ContentSection::Content { content } => {
                let mut writer = MarkdownWriter::new(&symbol.references);
                walk_blocks(content, &mut writer);
                let body = writer.finish();
                if !body.is_empty() {
                    let _ = writeln!(out, "\n{body}");
                }
            },
            ContentSection::Mentions { .. } | ContentSection::Unknown(_) => {},
        }
    }

    render_topics(&mut out, "Topics", &symbol.topic_sections, &symbol.references);
    render_topics(&mut out, "See Also", &symbol.see_also_sections, &symbol.references);

    out.trim_end().to_string()
}
