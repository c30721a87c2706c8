// Mapping entry parser
//
// Format: Religion
//         "Familienstand (ledig)"
//         pie(column: Religion, top: 8)
//         bar(column: Partei, value: Stimmen_Prozent, top: 12, title: "Wahl", source: elections)

use super::lexer::{identifier, integer, keyword, string_literal, ws};
use crate::mapping::{MappingEntry, StructuredEntry};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::preceded,
    IResult,
};

#[derive(Debug)]
enum EntryArg {
    Column(String),
    Value(String),
    Top(usize),
    Title(String),
    Source(String),
}

/// Column names may be bare identifiers or quoted strings
fn column_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}

fn parse_arg(input: &str) -> IResult<&str, EntryArg> {
    alt((
        map(preceded(ws(tag("column:")), ws(column_name)), EntryArg::Column),
        map(preceded(ws(tag("value:")), ws(column_name)), EntryArg::Value),
        map(preceded(ws(tag("top:")), ws(integer)), EntryArg::Top),
        map(preceded(ws(tag("title:")), ws(string_literal)), EntryArg::Title),
        map(preceded(ws(tag("source:")), ws(column_name)), EntryArg::Source),
    ))(input)
}

/// Parse a structured entry: kind(arg: value, ...)
/// The kind is kept verbatim; `column:` is required.
pub fn parse_call(input: &str) -> IResult<&str, MappingEntry> {
    let (input, kind) = ws(keyword)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, args) = separated_list0(ws(char(',')), parse_arg)(input)?;
    let (input, _) = ws(char(')'))(input)?;

    let mut column = None;
    let mut entry = StructuredEntry {
        kind: Some(kind.to_string()),
        ..Default::default()
    };

    for arg in args {
        match arg {
            EntryArg::Column(c) => column = Some(c),
            EntryArg::Value(v) => entry.measure = Some(v),
            EntryArg::Top(n) => entry.top_n = Some(n),
            EntryArg::Title(t) => entry.title = Some(t),
            EntryArg::Source(s) => entry.source = Some(s),
        }
    }

    match column {
        Some(c) => {
            entry.column = c;
            Ok((input, MappingEntry::Structured(entry)))
        }
        // A call without a column is not a shorthand either
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

/// Parse a shorthand entry: a bare or quoted column name
pub fn parse_shorthand(input: &str) -> IResult<&str, MappingEntry> {
    map(ws(column_name), MappingEntry::Shorthand)(input)
}

/// Parse a complete entry and require end of input
pub fn parse_entry(input: &str) -> IResult<&str, MappingEntry> {
    let (input, entry) = alt((parse_call, parse_shorthand))(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::RequestedKind;

    #[test]
    fn test_parse_shorthand() {
        let (_, entry) = parse_entry("einFamiliebestand").unwrap();
        assert_eq!(entry, MappingEntry::Shorthand("einFamiliebestand".to_string()));
    }

    #[test]
    fn test_parse_quoted_shorthand() {
        let (_, entry) = parse_entry(r#"  "Alter (Jahre)"  "#).unwrap();
        assert_eq!(entry, MappingEntry::Shorthand("Alter (Jahre)".to_string()));
    }

    #[test]
    fn test_parse_pie_call() {
        let (_, entry) = parse_entry("pie(column: Religion, top: 5)").unwrap();
        let spec = entry.canonicalize("kosis");
        assert_eq!(spec.kind, RequestedKind::Pie);
        assert_eq!(spec.column, "Religion");
        assert_eq!(spec.top_n, 5);
    }

    #[test]
    fn test_parse_full_bar_call() {
        let input = r#"bar(column: Partei, value: Stimmen_Prozent, top: 12, title: "Wahlergebnis", source: elections)"#;
        let (_, entry) = parse_entry(input).unwrap();
        let spec = entry.canonicalize("kosis");
        assert_eq!(spec.kind, RequestedKind::Bar);
        assert_eq!(spec.measure.as_deref(), Some("Stimmen_Prozent"));
        assert_eq!(spec.top_n, 12);
        assert_eq!(spec.title.as_deref(), Some("Wahlergebnis"));
        assert_eq!(spec.source, "elections");
    }

    #[test]
    fn test_parse_args_any_order() {
        let (_, entry) = parse_entry("bar( source: btw , column: \"CDU/CSU Anteil\" )").unwrap();
        let spec = entry.canonicalize("kosis");
        assert_eq!(spec.column, "CDU/CSU Anteil");
        assert_eq!(spec.source, "btw");
    }

    #[test]
    fn test_unknown_kind_parses() {
        let (_, entry) = parse_entry("line(column: Jahr)").unwrap();
        assert_eq!(entry.canonicalize("kosis").kind, RequestedKind::Unknown("line".to_string()));
    }

    #[test]
    fn test_call_without_column_fails() {
        assert!(parse_entry("bar(top: 3)").is_err());
        assert!(parse_entry("bar()").is_err());
    }

    #[test]
    fn test_trailing_input_fails() {
        assert!(parse_entry("Religion extra").is_err());
        assert!(parse_entry("pie(column: x) | bar()").is_err());
    }

    #[test]
    fn test_unclosed_call_fails() {
        assert!(parse_entry("pie(column: x").is_err());
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse_entry("").is_err());
        assert!(parse_entry("   ").is_err());
    }
}
