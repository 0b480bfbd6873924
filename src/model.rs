use serde::{Deserialize, Serialize};

/// One selectable file, as returned by the list endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    #[serde(rename = "Filename")]
    pub filename: String,
}

/// A decision tree node as written by the tree builder.
///
/// Extra fields in the document (the analysed sample, gains, entropies) are
/// ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    #[serde(rename = "Label", default)]
    pub label: String,
    #[serde(rename = "FilterValue", default)]
    pub filter_value: String,
    #[serde(rename = "Terminal", default)]
    pub terminal: bool,
    #[serde(rename = "Children", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn child_nodes(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Total number of nodes, this one included.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(TreeNode::count_nodes)
            .sum::<usize>()
    }

    /// Number of levels; a lone node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .child_nodes()
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeText {
    pub filter: String,
    pub label: String,
}

/// Node shape expected by the Treant widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WidgetNode {
    pub text: NodeText,
    #[serde(rename = "HTMLclass")]
    pub html_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<WidgetNode>>,
}
