// Lexical helpers for the mapping-entry parser

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, value},
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Bare column or source name: letters, digits and `_ - . /`
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')),
        |s: &str| s.to_string(),
    )(input)
}

/// Chart kind keyword: letters, digits and `_`
pub fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Double-quoted string with `\"` and `\\` escapes; may be empty
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let escaped = nom::bytes::complete::escaped_transform(
        is_not("\\\""),
        '\\',
        alt((value("\\", tag("\\")), value("\"", tag("\"")), value("\n", tag("n")))),
    );
    map(delimited(char('"'), opt(escaped), char('"')), Option::unwrap_or_default)(input)
}

pub fn integer(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("Stimmen_Prozent)"), Ok((")", "Stimmen_Prozent".to_string())));
        assert_eq!(identifier("Größe,"), Ok((",", "Größe".to_string())));
        assert!(identifier(" x").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(r#""Wahl 2025" rest"#), Ok((" rest", "Wahl 2025".to_string())));
        assert_eq!(string_literal(r#""a \"b\"""#), Ok(("", "a \"b\"".to_string())));
        assert_eq!(string_literal(r#""""#), Ok(("", String::new())));
        assert!(string_literal(r#""open"#).is_err());
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer("12)"), Ok((")", 12)));
        assert!(integer("-1").is_err());
    }

    #[test]
    fn test_ws() {
        let mut p = ws(char::<&str, nom::error::Error<&str>>('('));
        assert_eq!(p("  (  x"), Ok(("x", '(')));
    }
}
