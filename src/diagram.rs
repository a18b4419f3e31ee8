//! Registered tables, declared relationships and the ordered fragment
//! sequence they serialize into. Node fragments refer to their table by name.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::dot::{self, Endpoint, Marker};
use crate::error::{ErdError, Result};
use crate::table::{Column, Style, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ZeroOrMore,
    OneOrMore,
    Unmarked,
}

impl Cardinality {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "*" => Cardinality::ZeroOrMore,
            "+" => Cardinality::OneOrMore,
            _ => Cardinality::Unmarked,
        }
    }

    fn marker(self) -> Marker {
        match self {
            Cardinality::ZeroOrMore => Marker::ZeroOrMore,
            Cardinality::OneOrMore => Marker::OneOrMore,
            Cardinality::Unmarked => Marker::None,
        }
    }
}

/// Cardinalities take precedence: the arrow flags only apply when neither end
/// has a cardinality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
    pub left_cardinality: Option<Cardinality>,
    pub right_cardinality: Option<Cardinality>,
    pub left_arrow: bool,
    pub right_arrow: bool,
}

impl Relationship {
    /// Join both tables on a column of the same name.
    pub fn on(
        left_table: impl Into<String>,
        right_table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let column = column.into();
        Self::between(left_table, column.clone(), right_table, column)
    }

    pub fn between(
        left_table: impl Into<String>,
        left_column: impl Into<String>,
        right_table: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            left_table: left_table.into(),
            left_column: left_column.into(),
            right_table: right_table.into(),
            right_column: right_column.into(),
            left_cardinality: None,
            right_cardinality: None,
            left_arrow: false,
            right_arrow: false,
        }
    }

    pub fn left_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.left_cardinality = Some(cardinality);
        self
    }

    pub fn right_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.right_cardinality = Some(cardinality);
        self
    }

    pub fn left_arrow(mut self, arrow: bool) -> Self {
        self.left_arrow = arrow;
        self
    }

    pub fn right_arrow(mut self, arrow: bool) -> Self {
        self.right_arrow = arrow;
        self
    }

    pub fn key(&self) -> RelationshipKey {
        RelationshipKey {
            left_table: self.left_table.clone(),
            left_column: self.left_column.clone(),
            right_table: self.right_table.clone(),
            right_column: self.right_column.clone(),
        }
    }

    /// Resolve `(arrowhead, arrowtail)`; `None` omits the attribute.
    fn markers(&self) -> (Option<Marker>, Option<Marker>) {
        match (self.left_cardinality, self.right_cardinality) {
            (None, None) => match (self.left_arrow, self.right_arrow) {
                (true, false) => (Some(Marker::None), None),
                (false, true) => (None, Some(Marker::None)),
                _ => (None, None),
            },
            (left, right) => {
                let head = right.map_or(Marker::None, Cardinality::marker);
                let tail = left.map_or(Marker::None, Cardinality::marker);
                (Some(head), Some(tail))
            }
        }
    }

    fn edge_fragment(&self) -> String {
        let (head, tail) = self.markers();
        dot::edge_statement(
            Endpoint {
                node: &self.left_table,
                port: &self.left_column,
            },
            Endpoint {
                node: &self.right_table,
                port: &self.right_column,
            },
            head,
            tail,
        )
    }
}

/// Identity of a relationship for deduplication. Markers are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
}

impl fmt::Display for RelationshipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}:{}",
            self.left_table, self.left_column, self.right_table, self.right_column
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipStatus {
    Added,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramState {
    Empty,
    Populated,
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    Preamble(String),
    Node(String),
    Edge { key: RelationshipKey, text: String },
    Closer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    config: AppConfig,
    tables: HashMap<String, Table>,
    relationship_keys: HashSet<RelationshipKey>,
    fragments: Vec<Fragment>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let preamble = dot::preamble(&config.graph.font_name);
        Self {
            config,
            tables: HashMap::new(),
            relationship_keys: HashSet::new(),
            fragments: vec![Fragment::Preamble(preamble)],
        }
    }

    pub fn state(&self) -> DiagramState {
        if self.tables.is_empty() {
            DiagramState::Empty
        } else {
            DiagramState::Populated
        }
    }

    /// Build a table and register it. A table without a style gets the
    /// configured default style.
    pub fn add_table<I, C>(&mut self, columns: I, name: impl Into<String>, style: Option<Style>) -> &Table
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        let style = style.or(self.config.table.default_style);
        let columns = columns.into_iter().map(Into::into).collect();
        let table = Table::build_with(name, columns, style, &self.config.table);
        self.insert_table(table)
    }

    /// Register a prebuilt table. Last write wins on a name collision: the
    /// node keeps its original position and renders the new table. Edges to
    /// columns the new table lacks are dropped.
    pub fn insert_table(&mut self, table: Table) -> &Table {
        let name = table.name().to_string();
        debug!(table = name, columns = table.columns().len(); "Registering table");
        if self.tables.insert(name.clone(), table).is_some() {
            debug!(table = name; "Replaced existing table");
            self.drop_unresolved_edges();
        } else {
            self.fragments.push(Fragment::Node(name.clone()));
        }
        &self.tables[&name]
    }

    /// Edges whose columns vanished with a re-registered table.
    fn drop_unresolved_edges(&mut self) {
        let tables = &self.tables;
        let keys = &mut self.relationship_keys;
        self.fragments.retain(|fragment| match fragment {
            Fragment::Edge { key, .. } if !resolves(tables, key) => {
                warn!(relationship = key.to_string(); "Dropping edge to a column no longer in its table");
                keys.remove(key);
                false
            }
            _ => true,
        });
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Node(name) => self.tables.get(name),
            _ => None,
        })
    }

    pub fn relationship_count(&self) -> usize {
        self.relationship_keys.len()
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Validate and append one relationship edge. On error nothing changes.
    pub fn create_relationship(&mut self, relationship: &Relationship) -> Result<RelationshipStatus> {
        let left = self.lookup(&relationship.left_table)?;
        let right = self.lookup(&relationship.right_table)?;
        require_column(left, &relationship.left_column)?;
        require_column(right, &relationship.right_column)?;

        let key = relationship.key();
        if self.relationship_keys.contains(&key) {
            warn!(relationship = key.to_string(); "Edge already exists, skipping this edge creation");
            return Ok(RelationshipStatus::Duplicate);
        }

        let edge = relationship.edge_fragment();
        debug!(relationship = key.to_string(); "Adding edge");
        self.relationship_keys.insert(key.clone());
        self.fragments.push(Fragment::Edge { key, text: edge });
        Ok(RelationshipStatus::Added)
    }

    fn lookup(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| ErdError::TableNotFound(name.to_string()))
    }

    /// Close the graph and serialize it. Safe to call repeatedly; the closer
    /// always appears exactly once, at the end.
    pub fn finalize(&mut self) -> Document {
        self.fragments.retain(|f| *f != Fragment::Closer);
        self.fragments.push(Fragment::Closer);

        let mut parts: Vec<&str> = Vec::with_capacity(self.fragments.len());
        for fragment in &self.fragments {
            match fragment {
                Fragment::Preamble(text) | Fragment::Edge { text, .. } => parts.push(text),
                Fragment::Node(name) => {
                    if let Some(table) = self.tables.get(name) {
                        parts.push(table.fragment());
                    }
                }
                Fragment::Closer => parts.push(dot::CLOSER),
            }
        }
        let mut text = parts.join("\n");
        text.push('\n');
        Document(text)
    }
}

fn resolves(tables: &HashMap<String, Table>, key: &RelationshipKey) -> bool {
    let has = |table: &str, column: &str| tables.get(table).is_some_and(|t| t.has_column(column));
    has(&key.left_table, &key.left_column) && has(&key.right_table, &key.right_column)
}

fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(ErdError::ColumnNotFound {
            table: table.name().to_string(),
            column: column.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.0)?;
        info!(path = path.display().to_string(), bytes = self.0.len(); "Document written");
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
