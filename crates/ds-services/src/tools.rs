//! The developer-tools directory.

use std::sync::Arc;

use ds_core::{ContentSource, Tool};
use serde::Serialize;

/// Categories listed after "All Tools" when any tool carries them.
const MAIN_CATEGORIES: [&str; 4] = ["Frontend", "Backend", "Design", "Utility"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCategory {
    pub name: String,
    pub count: usize,
    pub active: bool,
}

#[derive(Clone)]
pub struct ToolService {
    content: Arc<dyn ContentSource>,
}

impl ToolService {
    pub fn new(content: Arc<dyn ContentSource>) -> Self {
        Self { content }
    }

    /// Every declared tool, or none when the declarations cannot be read.
    pub async fn tools(&self) -> Vec<Tool> {
        self.content.load_tools().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load tools");
            Vec::new()
        })
    }

    pub async fn tool(&self, slug: &str) -> Option<Tool> {
        self.tools().await.into_iter().find(|t| t.slug == slug)
    }
}

pub fn tools_by_tag(tools: &[Tool], tag: &str) -> Vec<Tool> {
    tools
        .iter()
        .filter(|t| t.tags.iter().any(|x| x == tag))
        .cloned()
        .collect()
}

/// "All Tools" followed by each main category present, `selected` marked
/// active ("All Tools" when none is selected).
pub fn categories(tools: &[Tool], selected: Option<&str>) -> Vec<ToolCategory> {
    let mut out = vec![ToolCategory {
        name: "All Tools".to_string(),
        count: tools.len(),
        active: selected.is_none(),
    }];
    for name in MAIN_CATEGORIES {
        let count = tools_by_tag(tools, name).len();
        if count > 0 {
            out.push(ToolCategory {
                name: name.to_string(),
                count,
                active: selected == Some(name),
            });
        }
    }
    out
}
