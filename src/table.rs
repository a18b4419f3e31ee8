use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::Deserialize;

use crate::config::TableConfig;
use crate::dot;
use crate::error::{ErdError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub type_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl<N: Into<String>, T: Into<String>> From<(N, T)> for Column {
    fn from((name, type_name): (N, T)) -> Self {
        Column::new(name, type_name)
    }
}

/// Header background of a table node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    LightBlue,
    SkyBlue,
    Pink,
    LightYellow,
    Grey,
    Gold,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::LightBlue,
        Style::SkyBlue,
        Style::Pink,
        Style::LightYellow,
        Style::Grey,
        Style::Gold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::LightBlue => "lightblue",
            Style::SkyBlue => "skyblue",
            Style::Pink => "pink",
            Style::LightYellow => "lightyellow",
            Style::Grey => "grey",
            Style::Gold => "gold",
        }
    }
}

impl FromStr for Style {
    type Err = ErdError;

    fn from_str(s: &str) -> Result<Self> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Style::ALL.iter().map(|s| s.as_str()).collect();
                ErdError::Configuration(format!(
                    "style `{s}` not available; style must be one of [{}]",
                    allowed.join(", ")
                ))
            })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table rendered as one graph node. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    column_set: HashSet<String>,
    style: Option<Style>,
    fragment: String,
}

impl Table {
    pub fn build(name: impl Into<String>, columns: Vec<Column>, style: Option<Style>) -> Self {
        Self::build_with(name, columns, style, &TableConfig::default())
    }

    pub fn build_with(
        name: impl Into<String>,
        columns: Vec<Column>,
        style: Option<Style>,
        config: &TableConfig,
    ) -> Self {
        let name = name.into();
        let column_set = columns.iter().map(|c| c.name.clone()).collect();
        let fragment = node_fragment(&name, &columns, style, config);
        Self {
            name,
            columns,
            column_set,
            style,
            fragment,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_set.contains(column)
    }

    pub fn style(&self) -> Option<Style> {
        self.style
    }

    /// The node statement for this table.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.fragment)?;
        info!(table = self.name, path = path.display().to_string(); "Table written");
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment)
    }
}

fn node_fragment(name: &str, columns: &[Column], style: Option<Style>, config: &TableConfig) -> String {
    let label = dot::escape_html(name);
    let bgcolor = style
        .map(|s| format!(" bgcolor=\"{s}\""))
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(columns.len() + 4);
    lines.push(format!("\t{} [ label=<", dot::id(name)));
    lines.push("\t\t<table border=\"0\" cellborder=\"1\" cellspacing=\"0\">".to_string());
    lines.push(format!("\t\t<tr><td{bgcolor}><b>{label}</b></td></tr>"));
    for column in columns {
        let col = dot::escape_html(&column.name);
        lines.push(format!(
            "\t\t<tr><td port=\"{col}\" align=\"{}\" cellpadding=\"{}\">{col} <font color=\"{}\">{}</font></td></tr>",
            config.align.as_str(),
            config.cell_padding,
            dot::escape_html(&config.font_color),
            dot::escape_html(&column.type_name),
        ));
    }
    lines.push("\t\t</table>>];".to_string());
    lines.join("\n")
}
