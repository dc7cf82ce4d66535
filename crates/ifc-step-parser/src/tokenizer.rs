// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom combinators
//!
//! Splits a record into its id, type name and a tree of argument tokens.
//! Nested lists are parsed recursively, so parentheses must balance.

use ifc_step_model::{Result, StepError};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP record
///
/// Strings keep their escaped form; the scalar codec decodes them on demand.
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u32),
    /// String value, still escaped, without the surrounding quotes
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Real value
    Real(f64),
    /// Enumeration or boolean (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::EntityRef(id) => format!("reference #{id}"),
            Token::String(_) => "string".to_string(),
            Token::Integer(i) => format!("integer {i}"),
            Token::Real(f) => format!("real {f}"),
            Token::Enum(name) => format!(".{name}."),
            Token::List(items) => format!("list of {}", items.len()),
            Token::TypedValue(name, _) => format!("typed value {name}(...)"),
            Token::Null => "$".to_string(),
            Token::Derived => "*".to_string(),
        }
    }
}

/// One tokenized record: `#id=TYPE(args);`
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub arguments: Vec<Token<'a>>,
}

// ============================================================================
// Parsing Primitives
// ============================================================================

fn failure(input: &str, kind: ErrorKind) -> nom::Err<Error<&str>> {
    nom::Err::Failure(Error::new(input, kind))
}

/// Parse whitespace (including /* */ comments)
fn ws(input: &str) -> IResult<&str, ()> {
    let mut rest = input.trim_start();
    while let Some(comment) = rest.strip_prefix("/*") {
        match comment.find("*/") {
            Some(end) => rest = comment[end + 2..].trim_start(),
            None => return Err(failure(rest, ErrorKind::TakeUntil)),
        }
    }
    Ok((rest, ()))
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('#')(input)?;
    let (rest, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = digits
        .parse::<u32>()
        .map_err(|_| failure(input, ErrorKind::Digit))?;
    Ok((rest, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('\'')(input)?;

    let bytes = input.as_bytes();
    let mut end = 0;
    loop {
        match memchr::memchr(b'\'', &bytes[end..]) {
            Some(offset) => {
                end += offset;
                if bytes.get(end + 1) == Some(&b'\'') {
                    end += 2;
                    continue;
                }
                break;
            }
            None => return Err(failure(input, ErrorKind::Char)),
        }
    }

    Ok((&input[end + 1..], Token::String(&input[..end])))
}

/// Parse a number (integer or real)
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    let digits = num_str.strip_prefix('+').unwrap_or(num_str);
    if num_str.contains(['.', 'e', 'E']) {
        let f: f64 = lexical_core::parse(digits.as_bytes())
            .map_err(|_| failure(input, ErrorKind::Float))?;
        Ok((rest, Token::Real(f)))
    } else {
        let i: i64 = lexical_core::parse(digits.as_bytes())
            .map_err(|_| failure(input, ErrorKind::Digit))?;
        Ok((rest, Token::Integer(i)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesized, comma separated token sequence
fn parameter_list(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token<'_>> {
    let (input, items) = parameter_list(input)?;
    Ok((input, Token::List(items)))
}

fn type_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token<'_>> {
    let (input, name) = type_name(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = parameter_list(input)?;
    Ok((input, Token::TypedValue(name, args)))
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

fn describe_error(err: nom::Err<Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near: String = e.input.chars().take(24).collect();
            if near.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected input near `{near}`")
            }
        }
    }
}

// ============================================================================
// Public Entry Points
// ============================================================================

/// Parse a single standalone value lexeme, e.g. `((1,2),(3,4,5))`
///
/// The whole input must be consumed.
pub fn parse_value(input: &str) -> Result<Token<'_>> {
    let parsed = (ws, token, ws).parse(input);
    match parsed {
        Ok(("", (_, value, _))) => Ok(value),
        Ok((rest, _)) => Err(StepError::malformed(format!(
            "trailing input after value: `{}`",
            rest.chars().take(24).collect::<String>()
        ))),
        Err(e) => Err(StepError::malformed(describe_error(e))),
    }
}

/// Parse a complete record
///
/// Format: `#123=IFCMATERIAL('Concrete',$,$);`
pub fn parse_record(input: &str) -> Result<RawRecord<'_>> {
    let (input, _) = ws(input).map_err(|e| StepError::format(describe_error(e)))?;

    let (input, _) = char::<&str, Error<&str>>('#')
        .parse(input)
        .map_err(|_| StepError::format("expected # at start of record"))?;

    let (input, id_str) = take_while1::<_, &str, Error<&str>>(|c: char| c.is_ascii_digit())
        .parse(input)
        .map_err(|_| StepError::format("expected entity id"))?;

    let id: u32 = id_str
        .parse()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| StepError::format(format!("invalid entity id #{id_str}")))?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<Error<&str>>| StepError::format(format!("expected = after #{id}")))?;

    let (input, name) = type_name(input)
        .map_err(|_| StepError::format(format!("expected type name after #{id}=")))?;

    let (input, _) = ws(input).map_err(|e| StepError::format(describe_error(e)))?;

    let (input, arguments) = parameter_list(input).map_err(|e| {
        StepError::malformed(format!("#{id}={name}: {}", describe_error(e)))
    })?;

    let (input, _) = (ws, opt(char(';')), ws)
        .parse(input)
        .map_err(|e| StepError::format(describe_error(e)))?;
    if !input.is_empty() {
        return Err(StepError::format(format!(
            "unexpected text after record #{id}"
        )));
    }

    Ok(RawRecord {
        id,
        type_name: name,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ref() {
        let (remaining, token) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::EntityRef(123));
    }

    #[test]
    fn test_parse_string() {
        let (remaining, token) = step_string("'hello world'").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::String("hello world"));
    }

    #[test]
    fn test_parse_string_with_escaped_quote() {
        let (remaining, token) = step_string("'it''s a test',").unwrap();
        assert_eq!(remaining, ",");
        assert_eq!(token, Token::String("it''s a test"));
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert!(matches!(step_string("'open"), Err(nom::Err::Failure(_))));
        assert!(parse_value("'open").is_err());
    }

    #[test]
    fn test_parse_number_integer() {
        let (remaining, token) = number("42").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::Integer(42));
    }

    #[test]
    fn test_parse_number_real() {
        let (remaining, token) = number("3.14159").unwrap();
        assert_eq!(remaining, "");
        if let Token::Real(f) = token {
            assert!((f - 3.14159).abs() < 1e-10);
        } else {
            panic!("Expected real");
        }
    }

    #[test]
    fn test_parse_number_scientific() {
        let (_, token) = number("1.5E-3").unwrap();
        assert_eq!(token, Token::Real(0.0015));
        let (_, token) = number("1.E2").unwrap();
        assert_eq!(token, Token::Real(100.0));
    }

    #[test]
    fn test_integer_overflow_is_error() {
        assert!(number("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_enum() {
        let (remaining, token) = enumeration(".NOTDEFINED.").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::Enum("NOTDEFINED"));
    }

    #[test]
    fn test_parse_nested_list() {
        let token = parse_value("((1,2),(3,4,5))").unwrap();
        assert_eq!(
            token,
            Token::List(vec![
                Token::List(vec![Token::Integer(1), Token::Integer(2)]),
                Token::List(vec![
                    Token::Integer(3),
                    Token::Integer(4),
                    Token::Integer(5)
                ]),
            ])
        );
    }

    #[test]
    fn test_unbalanced_list_rejected() {
        assert!(parse_value("((1,2),(3,4,5)").is_err());
        assert!(parse_value("((1,2),(3,4,5)))").is_err());
    }

    #[test]
    fn test_parse_typed_value() {
        let token = parse_value("IFCLABEL( 'Foo' )").unwrap();
        assert_eq!(token, Token::TypedValue("IFCLABEL", vec![Token::String("Foo")]));
    }

    #[test]
    fn test_comments_are_whitespace() {
        let record = parse_record("#7= IFCACTORROLE(/* role */ .ARCHITECT., $ ,$);").unwrap();
        assert_eq!(record.arguments.len(), 3);
        assert_eq!(record.arguments[0], Token::Enum("ARCHITECT"));
    }

    #[test]
    fn test_parse_record() {
        let record = parse_record("#1=IFCCLASSIFICATIONREFERENCE('a',$,*,#2,(#3,$),1.);").unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.type_name, "IFCCLASSIFICATIONREFERENCE");
        assert_eq!(record.arguments.len(), 6);
        assert_eq!(record.arguments[2], Token::Derived);
        assert_eq!(
            record.arguments[4],
            Token::List(vec![Token::EntityRef(3), Token::Null])
        );
    }

    #[test]
    fn test_record_frame_errors() {
        assert!(matches!(
            parse_record("IFCWALL();"),
            Err(StepError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_record("#0=IFCWALL();"),
            Err(StepError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_record("#1=IFCMATERIAL('a',(1,2);"),
            Err(StepError::MalformedValue { .. })
        ));
    }
}
