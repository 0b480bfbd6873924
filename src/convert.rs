use crate::model::{NodeText, TreeNode, WidgetNode};

pub const TERMINAL_CLASS: &str = "blue";
pub const BRANCH_CLASS: &str = "light-gray";

/// Maps a decision tree node, and everything below it, onto the widget's
/// node shape. Nodes without children get no `children` key at all.
pub fn convert_node(node: &TreeNode) -> WidgetNode {
    let children = match node.children.as_deref() {
        Some(children) if !children.is_empty() => {
            Some(children.iter().map(convert_node).collect())
        }
        _ => None,
    };

    WidgetNode {
        text: NodeText {
            filter: node.filter_value.clone(),
            label: node.label.clone(),
        },
        html_class: html_class(node.terminal).to_string(),
        children,
    }
}

pub fn html_class(terminal: bool) -> &'static str {
    if terminal {
        TERMINAL_CLASS
    } else {
        BRANCH_CLASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_root_with_leaf() {
        let root: TreeNode = serde_json::from_value(json!({
            "Label": "root",
            "FilterValue": "r",
            "Terminal": false,
            "Children": [{"Label": "leaf", "FilterValue": "l", "Terminal": true}]
        }))
        .unwrap();

        let converted = serde_json::to_value(convert_node(&root)).unwrap();
        assert_eq!(
            converted,
            json!({
                "text": {"label": "root", "filter": "r"},
                "HTMLclass": "light-gray",
                "children": [
                    {"text": {"label": "leaf", "filter": "l"}, "HTMLclass": "blue"}
                ]
            })
        );
    }

    #[test]
    fn empty_and_absent_children_have_no_key() {
        for json in [
            r#"{"Label":"a"}"#,
            r#"{"Label":"a","Children":null}"#,
            r#"{"Label":"a","Children":[]}"#,
        ] {
            let node: TreeNode = serde_json::from_str(json).unwrap();
            let value = serde_json::to_value(convert_node(&node)).unwrap();
            assert!(value.get("children").is_none(), "{json}");
        }
    }

    #[test]
    fn keeps_child_order_and_count() {
        let labels = ["sunny", "overcast", "rain"];
        let root = TreeNode {
            label: "outlook".into(),
            children: Some(
                labels
                    .iter()
                    .map(|l| TreeNode {
                        label: l.to_string(),
                        filter_value: l.to_string(),
                        terminal: true,
                        children: None,
                    })
                    .collect(),
            ),
            ..TreeNode::default()
        };

        let converted = convert_node(&root);
        let children = converted.children.unwrap();
        assert_eq!(children.len(), 3);
        let got: Vec<&str> = children.iter().map(|c| c.text.label.as_str()).collect();
        assert_eq!(got, labels);
        assert!(children.iter().all(|c| c.html_class == TERMINAL_CLASS));
    }

    #[test]
    fn terminal_flag_selects_class() {
        assert_eq!(html_class(true), "blue");
        assert_eq!(html_class(false), "light-gray");
        assert_ne!(TERMINAL_CLASS, BRANCH_CLASS);
    }

    #[test]
    fn terminal_node_with_children_still_recurses() {
        let node = TreeNode {
            label: "odd".into(),
            terminal: true,
            children: Some(vec![TreeNode::default()]),
            ..TreeNode::default()
        };
        let converted = convert_node(&node);
        assert_eq!(converted.html_class, TERMINAL_CLASS);
        assert_eq!(converted.children.map(|c| c.len()), Some(1));
    }
}
