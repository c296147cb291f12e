//! Report the active technology

use serde::Serialize;

use crate::tools::ToolContext;

/// Output from current_technology
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOutput {
    /// Active framework title and identifier
    pub active: Option<(String, String)>,
    /// Whether framework data is loaded
    pub framework_loaded: bool,
    /// Local index entries, when an index exists
    pub indexed_symbols: Option<usize>,
}

impl CurrentOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let Some((title, identifier)) = &self.active else {
            return "No technology selected. Use discover_technologies and choose_technology first."
                .to_string();
        };
        let mut out = format!("Active technology: **{title}** (`{identifier}`)");
        out.push_str(if self.framework_loaded {
            "\n\nFramework data: loaded"
        } else {
            "\n\nFramework data: not loaded"
        });
        if let Some(count) = self.indexed_symbols {
            out.push_str(&format!("\nLocal index: {count} symbols"));
        }
        out
    }
}

/// Handle current_technology
pub async fn handle_current(ctx: &ToolContext) -> CurrentOutput {
    let active = ctx
        .session
        .active_technology()
        .await
        .map(|t| (t.title, t.identifier));
    let framework_loaded = ctx.session.framework_data().await.is_some();
    let indexed_symbols = match ctx.session.local_index().await {
        Some(index) => Some(index.symbol_count().await),
        None => None,
    };
    CurrentOutput {
        active,
        framework_loaded,
        indexed_symbols,
    }
}
