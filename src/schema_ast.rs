use crate::diagram::{Cardinality, Relationship};
use crate::error::{ErdError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Table(TableDecl),
    Relationship(RelationshipDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDecl {
    pub name: String,
    pub style: Option<String>,
    pub columns: Vec<ColumnDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDecl {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDecl {
    pub left: EndRef,
    pub right: EndRef,
    pub left_mark: Option<EndMark>,
    pub right_mark: Option<EndMark>,
    pub on: Option<String>,
}

/// `TABLE` or `TABLE.column`.
#[derive(Debug, Clone, PartialEq)]
pub struct EndRef {
    pub table: String,
    pub column: Option<String>,
}

/// Symbol next to the `--` of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndMark {
    Arrow,
    Cardinality(char),
}

impl RelationshipDecl {
    pub fn to_relationship(&self) -> Result<Relationship> {
        let (left_column, right_column) = match (&self.on, &self.left.column, &self.right.column) {
            (Some(on), None, None) => (on.clone(), on.clone()),
            (None, Some(left), Some(right)) => (left.clone(), right.clone()),
            (Some(_), _, _) => {
                return Err(ErdError::Parse(format!(
                    "{}: use either `: column` or explicit `TABLE.column` ends, not both",
                    self.describe()
                )));
            }
            (None, _, _) => {
                return Err(ErdError::Parse(format!(
                    "{}: both ends need a column, or add `: column`",
                    self.describe()
                )));
            }
        };

        let mut relationship = Relationship::between(
            self.left.table.clone(),
            left_column,
            self.right.table.clone(),
            right_column,
        );
        match self.left_mark {
            Some(EndMark::Arrow) => relationship = relationship.left_arrow(true),
            Some(EndMark::Cardinality(c)) => {
                relationship = relationship.left_cardinality(Cardinality::from_symbol(&c.to_string()))
            }
            None => {}
        }
        match self.right_mark {
            Some(EndMark::Arrow) => relationship = relationship.right_arrow(true),
            Some(EndMark::Cardinality(c)) => {
                relationship = relationship.right_cardinality(Cardinality::from_symbol(&c.to_string()))
            }
            None => {}
        }
        Ok(relationship)
    }

    fn describe(&self) -> String {
        format!("relationship {} -- {}", self.left.table, self.right.table)
    }
}
