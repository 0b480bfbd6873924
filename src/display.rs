use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::convert::{convert_node, TERMINAL_CLASS};
use crate::error::ViewerError;
use crate::model::{TreeNode, WidgetNode};

pub const DEFAULT_CONTAINER: &str = "#oak-tree";

/// Something that can draw a finished chart configuration.
pub trait ChartWidget: Send {
    fn render(&mut self, config: &ChartConfig) -> Result<(), ViewerError>;
}

impl<T: ChartWidget + ?Sized> ChartWidget for Box<T> {
    fn render(&mut self, config: &ChartConfig) -> Result<(), ViewerError> {
        (**self).render(config)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Connectors {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeStyle {
    #[serde(rename = "HTMLclass")]
    pub html_class: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub container: String,
    pub node_align: String,
    pub connectors: Connectors,
    pub node: NodeStyle,
}

impl ChartOptions {
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            node_align: "BOTTOM".to_string(),
            connectors: Connectors {
                r#type: "step".to_string(),
            },
            node: NodeStyle {
                html_class: "nodeExample1".to_string(),
            },
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER)
    }
}

/// Configuration object handed to the Treant constructor.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart: ChartOptions,
    pub node_structure: WidgetNode,
}

impl ChartConfig {
    pub fn new(chart: ChartOptions, root: &TreeNode) -> Self {
        Self {
            chart,
            node_structure: convert_node(root),
        }
    }
}

/// Converts `root` and passes the resulting chart to `widget`.
pub fn convert_tree<W: ChartWidget + ?Sized>(
    root: &TreeNode,
    options: &ChartOptions,
    widget: &mut W,
) -> Result<(), ViewerError> {
    let config = ChartConfig::new(options.clone(), root);
    widget.render(&config)
}

/// Draws the tree as indented text, terminal nodes in blue.
pub struct TerminalChart<W: Write + Send> {
    out: W,
    color: bool,
}

impl TerminalChart<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write + Send> TerminalChart<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChartWidget for TerminalChart<W> {
    fn render(&mut self, config: &ChartConfig) -> Result<(), ViewerError> {
        print_tree(&mut self.out, &config.node_structure, 0, self.color)?;
        self.out.flush()?;
        Ok(())
    }
}

pub fn print_tree<W: Write>(
    out: &mut W,
    node: &WidgetNode,
    level: usize,
    color: bool,
) -> io::Result<()> {
    let indent = "  ".repeat(level);
    let label = if !color {
        node.text.label.clone()
    } else if node.html_class == TERMINAL_CLASS {
        node.text.label.blue().to_string()
    } else {
        node.text.label.bright_black().to_string()
    };
    if node.text.filter.is_empty() {
        writeln!(out, "{indent}{label}")?;
    } else {
        writeln!(out, "{indent}{} -> {label}", node.text.filter)?;
    }
    for child in node.children.iter().flatten() {
        print_tree(out, child, level + 1, color)?;
    }
    Ok(())
}

/// Writes a standalone Treant page into a directory.
#[derive(Debug, Clone)]
pub struct HtmlChart {
    out_dir: PathBuf,
}

impl HtmlChart {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn page_path(&self) -> PathBuf {
        self.out_dir.join("index.html")
    }

    pub fn page(&self, config: &ChartConfig) -> Result<String, ViewerError> {
        let json = serde_json::to_string(config).map_err(io::Error::from)?;
        // Keep a label containing "</script>" from closing the tag early.
        let json = json.replace("</", "<\\/");
        let mount = mount_element(&config.chart.container);
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>oak-viewer</title>
<link rel="stylesheet" href="Treant.css">
<style>
.nodeExample1 {{ padding: 4px 8px; border-radius: 3px; }}
.blue {{ background: #cce5ff; }}
.light-gray {{ background: #e2e3e5; }}
</style>
</head>
<body>
{mount}
<script src="raphael.js"></script>
<script src="Treant.js"></script>
<script>new Treant({json});</script>
</body>
</html>
"#
        ))
    }
}

impl ChartWidget for HtmlChart {
    fn render(&mut self, config: &ChartConfig) -> Result<(), ViewerError> {
        let page = self.page(config)?;
        fs::create_dir_all(&self.out_dir)?;
        let path = self.page_path();
        fs::write(&path, page)?;
        info!(path = %path.display(), "wrote chart page");
        Ok(())
    }
}

fn mount_element(selector: &str) -> String {
    if let Some(id) = selector.strip_prefix('#') {
        format!(r#"<div id="{}"></div>"#, escape_attr(id))
    } else if let Some(class) = selector.strip_prefix('.') {
        format!(r#"<div class="{}"></div>"#, escape_attr(class))
    } else {
        format!(r#"<div id="{}"></div>"#, escape_attr(selector))
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
