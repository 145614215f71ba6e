//! Tree drawing
//!
//! ```text
//!   ├─Item 1
//!   │  └─Child
//!   └─Item 2
//! ```

use super::color::colorize;
use serde::{Deserialize, Serialize};

/// One tree item: a bare label or a labelled node with children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeItem {
    Label(String),
    Node {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<TreeItem>,
    },
}

impl TreeItem {
    pub fn node(text: impl Into<String>, children: Vec<TreeItem>) -> Self {
        TreeItem::Node {
            text: text.into(),
            color: None,
            children,
        }
    }

    #[must_use]
    pub fn with_color(self, color: impl Into<String>) -> Self {
        match self {
            TreeItem::Label(text) => TreeItem::Node {
                text,
                color: Some(color.into()),
                children: Vec::new(),
            },
            TreeItem::Node { text, children, .. } => TreeItem::Node {
                text,
                color: Some(color.into()),
                children,
            },
        }
    }
}

impl From<&str> for TreeItem {
    fn from(label: &str) -> Self {
        TreeItem::Label(label.to_string())
    }
}

impl From<String> for TreeItem {
    fn from(label: String) -> Self {
        TreeItem::Label(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeOptions {
    /// Leading text of every line
    pub prefix: String,
    /// Levels to draw before truncating with the ellipsis; `None` is unbounded
    pub max_depth: Option<usize>,
    pub ellipsis: String,
    /// Color applied to the whole tree
    pub color: Option<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            prefix: "  ".to_string(),
            max_depth: None,
            ellipsis: "...".to_string(),
            color: None,
        }
    }
}

/// Draw `items` as a tree
pub fn format_tree(items: &[TreeItem], options: &TreeOptions) -> String {
    let mut lines = Vec::new();
    build(items, &options.prefix, options.max_depth, &options.ellipsis, &mut lines);
    let tree: String = lines.into_iter().map(|line| line + "\n").collect();
    match options.color.as_deref() {
        Some(color) => colorize(color, &tree),
        None => tree,
    }
}

fn build(items: &[TreeItem], prefix: &str, depth: Option<usize>, ellipsis: &str, out: &mut Vec<String>) {
    let last_index = items.len().saturating_sub(1);
    for (i, item) in items.iter().enumerate() {
        if depth == Some(0) {
            let line = format!("{}{}", prefix, ellipsis);
            out.push(match item {
                TreeItem::Node { color: Some(color), .. } => colorize(color, &line),
                _ => line,
            });
            return;
        }

        let is_last = i == last_index;
        let branch = if is_last { "└─" } else { "├─" };
        match item {
            TreeItem::Label(text) => out.push(format!("{}{}{}", prefix, branch, text)),
            TreeItem::Node {
                text,
                color,
                children,
            } => {
                let line = format!("{}{}{}", prefix, branch, text);
                out.push(match color {
                    Some(color) => colorize(color, &line),
                    None => line,
                });
                if !children.is_empty() {
                    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│  " });
                    build(children, &child_prefix, depth.map(|d| d - 1), ellipsis, out);
                }
            }
        }
    }
}
