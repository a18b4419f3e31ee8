use winnow::ascii::{line_ending, space0, space1, till_line_ending};
use winnow::combinator::{alt, delimited, eof, opt, preceded, repeat};
use winnow::error::ParserError;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::error::ErdError;
use crate::schema_ast::*;

pub fn parse_schema(source: &str) -> Result<Schema, ErdError> {
    let mut input = source;
    let parsed = schema(&mut input);
    match parsed {
        Ok(schema) if input.trim().is_empty() => Ok(schema),
        _ => {
            let consumed = source.len() - input.len();
            let line_no = source[..consumed].matches('\n').count() + 1;
            let context = input.lines().next().unwrap_or("").trim();
            let context_display = if context.chars().count() > 40 {
                let cut: String = context.chars().take(40).collect();
                format!("{cut}...")
            } else {
                context.to_string()
            };
            Err(ErdError::Parse(format!(
                "line {line_no}: unexpected `{context_display}`"
            )))
        }
    }
}

fn schema(input: &mut &str) -> winnow::Result<Schema> {
    let () = repeat(0.., blank_or_comment).parse_next(input)?;
    space0.parse_next(input)?;
    "erd".parse_next(input)?;
    line_end.parse_next(input)?;

    let lines: Vec<Option<Statement>> = repeat(0.., schema_line).parse_next(input)?;
    Ok(Schema {
        statements: lines.into_iter().flatten().collect(),
    })
}

fn schema_line(input: &mut &str) -> winnow::Result<Option<Statement>> {
    alt((
        table_block.map(|t| Some(Statement::Table(t))),
        relationship_line.map(|r| Some(Statement::Relationship(r))),
        blank_or_comment.map(|_| None),
    ))
    .parse_next(input)
}

fn blank_or_comment(input: &mut &str) -> winnow::Result<()> {
    alt((blank_line, comment_line)).parse_next(input)
}

fn blank_line(input: &mut &str) -> winnow::Result<()> {
    space0.parse_next(input)?;
    line_ending.parse_next(input)?;
    Ok(())
}

fn comment_line(input: &mut &str) -> winnow::Result<()> {
    space0.parse_next(input)?;
    "%%".parse_next(input)?;
    till_line_ending.parse_next(input)?;
    alt((line_ending.void(), eof.void())).parse_next(input)
}

/// Trailing spaces, then end of line or input.
fn line_end(input: &mut &str) -> winnow::Result<()> {
    space0.parse_next(input)?;
    alt((line_ending.void(), eof.void())).parse_next(input)
}

fn table_block(input: &mut &str) -> winnow::Result<TableDecl> {
    space0.parse_next(input)?;
    let name = identifier.parse_next(input)?;
    space0.parse_next(input)?;
    let style = opt((bare_identifier, space0)).parse_next(input)?;
    "{".parse_next(input)?;
    line_end.parse_next(input)?;

    let mut columns = Vec::new();
    loop {
        space0.parse_next(input)?;
        if input.starts_with('}') {
            "}".parse_next(input)?;
            line_end.parse_next(input)?;
            break;
        }
        if input.is_empty() {
            return Err(ParserError::from_input(input));
        }
        if blank_or_comment(input).is_ok() {
            continue;
        }
        columns.push(column_line.parse_next(input)?);
    }

    Ok(TableDecl {
        name,
        style: style.map(|(s, _)| s.to_string()),
        columns,
    })
}

fn column_line(input: &mut &str) -> winnow::Result<ColumnDecl> {
    space0.parse_next(input)?;
    let name = identifier.parse_next(input)?;
    space1.parse_next(input)?;
    let type_name = till_line_ending.parse_next(input)?.trim();
    if type_name.is_empty() {
        return Err(ParserError::from_input(input));
    }
    opt(line_ending).parse_next(input)?;

    Ok(ColumnDecl {
        name,
        type_name: type_name.to_string(),
    })
}

fn relationship_line(input: &mut &str) -> winnow::Result<RelationshipDecl> {
    space0.parse_next(input)?;
    let left = end_ref.parse_next(input)?;
    space1.parse_next(input)?;
    let (left_mark, right_mark) = connector.parse_next(input)?;
    space1.parse_next(input)?;
    let right = end_ref.parse_next(input)?;
    space0.parse_next(input)?;
    let on = opt(preceded((":", space0), identifier)).parse_next(input)?;
    line_end.parse_next(input)?;

    Ok(RelationshipDecl {
        left,
        right,
        left_mark,
        right_mark,
        on,
    })
}

fn end_ref(input: &mut &str) -> winnow::Result<EndRef> {
    let table = identifier.parse_next(input)?;
    let column = opt(preceded(".", identifier)).parse_next(input)?;
    Ok(EndRef { table, column })
}

fn connector(input: &mut &str) -> winnow::Result<(Option<EndMark>, Option<EndMark>)> {
    let left = opt(one_of(['<', '*', '+', '1'])).parse_next(input)?;
    "--".parse_next(input)?;
    let right = opt(one_of(['>', '*', '+', '1'])).parse_next(input)?;
    Ok((left.map(end_mark), right.map(end_mark)))
}

fn end_mark(c: char) -> EndMark {
    match c {
        '<' | '>' => EndMark::Arrow,
        other => EndMark::Cardinality(other),
    }
}

fn identifier(input: &mut &str) -> winnow::Result<String> {
    alt((
        quoted_identifier.map(str::to_string),
        bare_identifier.map(str::to_string),
    ))
    .parse_next(input)
}

fn bare_identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-').parse_next(input)
}

fn quoted_identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    delimited('"', take_till(1.., ['"', '\r', '\n']), '"').parse_next(input)
}
