use erdot::{Cardinality, Column, Diagram, ErdError, Relationship, RelationshipStatus, Style, Table};
use pretty_assertions::assert_eq;

fn person_and_card() -> Diagram {
    let mut diagram = Diagram::new();
    diagram.add_table([("PERSON", "INT64"), ("AGE", "INT64")], "PERSON", None);
    diagram.add_table(
        [("PERSON", "INT64"), ("CREDIT_CARD", "INT64")],
        "CREDIT_CARD",
        None,
    );
    diagram
}

fn edges(text: &str) -> Vec<&str> {
    text.lines().filter(|l| l.contains(" -> ")).collect()
}

#[test]
fn table_fragment_is_deterministic() {
    let columns = || vec![Column::new("id", "INT64"), Column::new("name", "STRING")];
    let a = Table::build("USERS", columns(), Some(Style::LightYellow));
    let b = Table::build("USERS", columns(), Some(Style::LightYellow));
    assert_eq!(a.fragment(), b.fragment());
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn table_rows_preserve_column_order() {
    for len in [0usize, 1, 7] {
        let columns: Vec<Column> = (0..len)
            .rev()
            .map(|i| Column::new(format!("c{i}"), "INT64"))
            .collect();
        let expected: Vec<String> = columns.iter().map(|c| format!("port=\"{}\"", c.name)).collect();
        let table = Table::build("T", columns, None);
        let rows: Vec<String> = table
            .fragment()
            .lines()
            .filter_map(|l| l.split_whitespace().find(|w| w.starts_with("port=")))
            .map(str::to_string)
            .collect();
        assert_eq!(rows, expected);
    }
}

#[test]
fn zero_or_more_on_right() {
    let mut diagram = person_and_card();
    let status = diagram
        .create_relationship(
            &Relationship::on("PERSON", "CREDIT_CARD", "PERSON")
                .right_cardinality(Cardinality::ZeroOrMore),
        )
        .unwrap();
    assert_eq!(status, RelationshipStatus::Added);

    let doc = diagram.finalize();
    let text = doc.as_str();
    assert!(text.contains("<td port=\"PERSON\""));
    assert!(text.contains("<td port=\"AGE\""));
    assert!(text.contains("<td port=\"CREDIT_CARD\""));
    assert_eq!(text.matches("port=\"PERSON\"").count(), 2);
    assert_eq!(
        edges(text),
        ["\tPERSON:PERSON -> CREDIT_CARD:PERSON [ arrowhead=ocrow, arrowtail=none ];"]
    );
}

#[test]
fn unknown_table() {
    let mut diagram = person_and_card();
    let before = diagram.fragment_count();
    let err = diagram
        .create_relationship(&Relationship::on("PERSON", "GHOST", "PERSON"))
        .unwrap_err();
    match err {
        ErdError::TableNotFound(name) => assert_eq!(name, "GHOST"),
        other => panic!("expected TableNotFound, got {other:?}"),
    }
    assert_eq!(diagram.fragment_count(), before);
}

#[test]
fn unknown_right_column() {
    let mut diagram = person_and_card();
    let before = diagram.clone();
    let err = diagram
        .create_relationship(&Relationship::between("PERSON", "AGE", "CREDIT_CARD", "AGE"))
        .unwrap_err();
    assert!(
        matches!(&err, ErdError::ColumnNotFound { table, column } if table == "CREDIT_CARD" && column == "AGE"),
        "got: {err:?}"
    );
    assert_eq!(diagram, before);
}

#[test]
fn duplicate_keeps_first() {
    let mut diagram = person_and_card();
    let first = Relationship::on("PERSON", "CREDIT_CARD", "PERSON")
        .left_cardinality(Cardinality::OneOrMore)
        .right_cardinality(Cardinality::ZeroOrMore);
    let second = Relationship::on("PERSON", "CREDIT_CARD", "PERSON")
        .right_cardinality(Cardinality::OneOrMore);

    assert_eq!(diagram.create_relationship(&first).unwrap(), RelationshipStatus::Added);
    assert_eq!(
        diagram.create_relationship(&second).unwrap(),
        RelationshipStatus::Duplicate
    );

    let doc = diagram.finalize();
    assert_eq!(
        edges(doc.as_str()),
        ["\tPERSON:PERSON -> CREDIT_CARD:PERSON [ arrowhead=ocrow, arrowtail=noneotee ];"]
    );
}

#[test]
fn finalize_is_idempotent() {
    let mut diagram = person_and_card();
    diagram
        .create_relationship(&Relationship::on("PERSON", "CREDIT_CARD", "PERSON"))
        .unwrap();
    let first = diagram.finalize();
    let fragments = diagram.fragment_count();
    let second = diagram.finalize();
    assert_eq!(first.as_str(), second.as_str());
    assert_eq!(diagram.fragment_count(), fragments);
    assert_eq!(second.as_str().lines().filter(|l| *l == "}").count(), 1);
}

#[test]
fn reregistered_table_has_single_node() {
    let mut diagram = person_and_card();
    diagram.add_table([("PERSON", "STRING")], "PERSON", Some(Style::Pink));
    let doc = diagram.finalize();
    let text = doc.as_str();
    assert_eq!(text.matches("<b>PERSON</b>").count(), 1);
    assert!(text.contains("<td bgcolor=\"pink\"><b>PERSON</b></td>"));
    assert!(text.contains("PERSON <font color=\"grey60\">STRING</font>"));
}

#[test]
fn insert_prebuilt_table() {
    let mut diagram = Diagram::new();
    let table = Table::build("ORDERS", vec![Column::new("id", "INT64")], Some(Style::Gold));
    let expected = table.fragment().to_string();
    diagram.insert_table(table);
    assert_eq!(diagram.table("ORDERS").unwrap().fragment(), expected);
    assert!(diagram.finalize().as_str().contains(&expected));
}
