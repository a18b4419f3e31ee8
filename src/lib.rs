pub mod config;
pub mod diagram;
pub mod dot;
pub mod error;
pub mod schema_ast;
pub mod schema_parser;
pub mod table;

pub use config::AppConfig;
pub use diagram::{Cardinality, Diagram, Document, Relationship, RelationshipStatus};
pub use error::{ErdError, Result};
pub use table::{Column, Style, Table};

use schema_ast::{Schema, Statement};

pub fn render(input: &str) -> Result<Document> {
    render_with_config(input, &AppConfig::default())
}

pub fn render_with_config(input: &str, config: &AppConfig) -> Result<Document> {
    let schema = schema_parser::parse_schema(input)?;
    let mut diagram = build_diagram(&schema, config.clone())?;
    Ok(diagram.finalize())
}

/// Apply schema statements in source order. Stops at the first table with an
/// invalid style or relationship that fails validation.
pub fn build_diagram(schema: &Schema, config: AppConfig) -> Result<Diagram> {
    let mut diagram = Diagram::with_config(config);
    for statement in &schema.statements {
        match statement {
            Statement::Table(decl) => {
                let style = decl.style.as_deref().map(str::parse::<Style>).transpose()?;
                let columns = decl
                    .columns
                    .iter()
                    .map(|c| Column::new(c.name.as_str(), c.type_name.as_str()));
                diagram.add_table(columns, decl.name.as_str(), style);
            }
            Statement::Relationship(decl) => {
                let relationship = decl.to_relationship()?;
                diagram.create_relationship(&relationship)?;
            }
        }
    }
    Ok(diagram)
}
