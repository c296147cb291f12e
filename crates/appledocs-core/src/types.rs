//! Documentation payload types.
//!
//! These mirror the subset of the upstream documentation JSON needed for
//! indexing, searching and rendering. Each payload keeps unrecognised fields in
//! an `extra` map, so a document written back to disk round-trips and upstream
//! additions are not lost.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::{ContentBlock, InlineContent, PlainText};

/// Opaque bag of fields the model does not interpret.
pub type Extra = Map<String, Value>;

/// Reference kinds that never describe a code symbol.
const NON_SYMBOL_KINDS: &[&str] = &[
    "image",
    "article",
    "overview",
    "section",
    "sampleCode",
    "project",
    "video",
    "download",
    "link",
];

/// A selectable top-level grouping from the technology list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    /// Unique opaque identifier, e.g. `doc://com.apple.documentation/documentation/swiftui`.
    pub identifier: String,
    /// Display title.
    pub title: String,
    /// Documentation path, e.g. `/documentation/swiftui`.
    #[serde(default)]
    pub url: String,
    /// Entity kind (`symbol`, `article`, ...).
    #[serde(default)]
    pub kind: String,
    /// Entity role (`collection`, `article`, ...).
    #[serde(default)]
    pub role: String,
    /// Short description.
    #[serde(rename = "abstract", default)]
    pub abstract_content: Vec<InlineContent>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Technology {
    /// Only symbol collections are selectable frameworks.
    #[must_use]
    pub fn is_framework(&self) -> bool {
        self.kind == "symbol" && self.role == "collection"
    }

    /// Abstract flattened to plain text.
    #[must_use]
    pub fn abstract_text(&self) -> String {
        PlainText::of_inline(&self.abstract_content)
    }

    /// Framework name used in documentation paths (`swiftui` for SwiftUI).
    ///
    /// Taken from the last segment of the URL, falling back to the identifier.
    #[must_use]
    pub fn path_name(&self) -> String {
        let source = if self.url.is_empty() {
            self.identifier.as_str()
        } else {
            self.url.as_str()
        };
        source
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Platform availability entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// Platform name (`iOS`, `macOS`, ...).
    pub name: String,
    /// Version that introduced the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduced_at: Option<String>,
    /// Whether the entity is deprecated on this platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Whether the entity is in beta on this platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<bool>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A cross-referenced entity inside a document's `references` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Display title. Images carry no title upstream.
    #[serde(default)]
    pub title: String,
    /// Entity kind; absent for images and similar media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Entity role (`symbol`, `collection`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Documentation path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Short description.
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_content: Option<Vec<InlineContent>>,
    /// Platform availability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
    /// Unrecognised fields (`type`, `fragments`, `variants`, ...).
    #[serde(flatten)]
    pub extra: Extra,
}

impl ReferenceData {
    /// Whether this reference describes a documented code symbol.
    ///
    /// References without a kind, media references, articles, and references
    /// whose URL does not point into the documentation tree are not symbols.
    #[must_use]
    pub fn is_symbol(&self) -> bool {
        let Some(kind) = self.kind.as_deref() else {
            return false;
        };
        if NON_SYMBOL_KINDS.contains(&kind) {
            return false;
        }
        if self.role.as_deref() == Some("article") {
            return false;
        }
        self.url
            .as_deref()
            .is_some_and(|url| url.starts_with("/documentation/"))
    }

    /// Abstract flattened to plain text.
    #[must_use]
    pub fn abstract_text(&self) -> String {
        self.abstract_content
            .as_deref()
            .map(PlainText::of_inline)
            .unwrap_or_default()
    }

    /// Platform names.
    #[must_use]
    pub fn platform_names(&self) -> Vec<String> {
        self.platforms
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Kind used for display and filtering: role for symbols, else kind.
    #[must_use]
    pub fn display_kind(&self) -> String {
        self.extra
            .get("symbolKind")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.role.clone())
            .or_else(|| self.kind.clone())
            .unwrap_or_default()
    }
}

/// `identifier` block of a documentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocIdentifier {
    /// `doc://` URL of the page.
    pub url: String,
    /// Source language of the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_language: Option<String>,
}

impl DocIdentifier {
    /// Documentation path extracted from a `doc://bundle/documentation/...` URL, lower-cased.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        let rest = self.url.strip_prefix("doc://")?;
        let slash = rest.find('/')?;
        Some(rest[slash..].to_lowercase())
    }
}

/// A titled group of reference identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSection {
    /// Group title.
    #[serde(default)]
    pub title: String,
    /// Keys into the owning document's `references` table.
    #[serde(default)]
    pub identifiers: Vec<String>,
    /// Anchor id, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Page title.
    pub title: String,
    /// Page role (`symbol`, `collection`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Symbol kind (`struct`, `protocol`, ...), symbols only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_kind: Option<String>,
    /// Human heading for the role ("Structure", "Framework", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_heading: Option<String>,
    /// Platform availability.
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// One declaration token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationToken {
    /// Token kind (`keyword`, `identifier`, `text`, ...).
    #[serde(default)]
    pub kind: String,
    /// Token text.
    #[serde(default)]
    pub text: String,
}

/// One declaration (per language/platform combination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration tokens in order.
    #[serde(default)]
    pub tokens: Vec<DeclarationToken>,
    /// Languages this declaration applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Platforms this declaration applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
}

impl Declaration {
    /// Declaration source text.
    #[must_use]
    pub fn source(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// A documented parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// A primary content section of a symbol page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentSection {
    /// Declarations.
    Declarations {
        /// One per language/platform combination.
        #[serde(default)]
        declarations: Vec<Declaration>,
    },
    /// Parameter list.
    Parameters {
        /// Documented parameters.
        #[serde(default)]
        parameters: Vec<Parameter>,
    },
    /// Discussion, return value and similar prose.
    Content {
        /// Body blocks.
        #[serde(default)]
        content: Vec<ContentBlock>,
    },
    /// Pages that mention this symbol.
    Mentions {
        /// Reference identifiers.
        #[serde(default)]
        mentions: Vec<String>,
    },
    /// Any section kind this model does not understand, kept verbatim.
    #[serde(untagged)]
    Unknown(Value),
}

/// A framework landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkData {
    /// Short description.
    #[serde(rename = "abstract", default)]
    pub abstract_content: Vec<InlineContent>,
    /// Page metadata.
    pub metadata: Metadata,
    /// Flat neighbour table, symbols and non-symbols alike.
    pub references: BTreeMap<String, ReferenceData>,
    /// Topic groups.
    pub topic_sections: Vec<TopicSection>,
    /// Page identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<DocIdentifier>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl FrameworkData {
    /// Abstract flattened to plain text.
    #[must_use]
    pub fn abstract_text(&self) -> String {
        PlainText::of_inline(&self.abstract_content)
    }
}

/// A symbol page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolData {
    /// Short description.
    #[serde(rename = "abstract", default)]
    pub abstract_content: Vec<InlineContent>,
    /// Page metadata.
    pub metadata: Metadata,
    /// Declarations, parameters, discussion, mentions.
    pub primary_content_sections: Vec<ContentSection>,
    /// Topic groups (members, related types).
    #[serde(default)]
    pub topic_sections: Vec<TopicSection>,
    /// "See Also" groups.
    #[serde(default)]
    pub see_also_sections: Vec<TopicSection>,
    /// Nested reference table.
    #[serde(default)]
    pub references: BTreeMap<String, ReferenceData>,
    /// Page identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<DocIdentifier>,
    /// Documentation path when the payload carries one directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl SymbolData {
    /// Abstract flattened to plain text.
    #[must_use]
    pub fn abstract_text(&self) -> String {
        PlainText::of_inline(&self.abstract_content)
    }

    /// Documentation path of this page, if it can be determined.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        self.url
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.identifier.as_ref().and_then(DocIdentifier::path))
    }

    /// Kind used for display: symbol kind, then role, then role heading.
    #[must_use]
    pub fn kind(&self) -> String {
        self.metadata
            .symbol_kind
            .clone()
            .or_else(|| self.metadata.role.clone())
            .or_else(|| self.metadata.role_heading.clone())
            .unwrap_or_else(|| "symbol".to_string())
    }

    /// Reference identifiers listed in topic and see-also sections, in order.
    #[must_use]
    pub fn topic_identifiers(&self) -> Vec<String> {
        self.topic_sections
            .iter()
            .chain(&self.see_also_sections)
            .flat_map(|s| s.identifiers.iter().cloned())
            .collect()
    }
}

/// A parsed cache document of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedDocument {
    /// A symbol page.
    Symbol(Box<SymbolData>),
    /// A framework landing page.
    Framework(Box<FrameworkData>),
}

impl CachedDocument {
    /// Validate a JSON value, trying the symbol schema first, then the framework schema.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        if let Ok(symbol) = serde_json::from_value::<SymbolData>(value.clone()) {
            return Some(Self::Symbol(Box::new(symbol)));
        }
        serde_json::from_value::<FrameworkData>(value)
            .ok()
            .map(|framework| Self::Framework(Box::new(framework)))
    }
}

/// Technology list keyed by identifier.
pub type TechnologyMap = BTreeMap<String, Technology>;
