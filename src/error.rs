use thiserror::Error;

pub type Result<T> = std::result::Result<T, ErdError>;

#[derive(Debug, Error)]
pub enum ErdError {
    #[error("table `{0}` not found, register it with add_table first")]
    TableNotFound(String),

    #[error("column `{column}` not in table `{table}`")]
    ColumnNotFound { table: String, column: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("syntax error in schema: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_not_found_names_the_table() {
        let err = ErdError::TableNotFound("GHOST".into());
        assert!(err.to_string().contains("`GHOST`"), "got: {err}");
    }

    #[test]
    fn column_not_found_names_table_and_column() {
        let err = ErdError::ColumnNotFound {
            table: "PERSON".into(),
            column: "EMAIL".into(),
        };
        assert_eq!(err.to_string(), "column `EMAIL` not in table `PERSON`");
    }
}
