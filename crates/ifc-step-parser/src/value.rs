// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed value codec
//!
//! [`StepValue`] maps between argument tokens and typed field values. The
//! impls here cover the EXPRESS simple types, optional values and nested
//! lists; schema types (defined types, enumerations, SELECTs) build on them.

use crate::resolver::ReadContext;
use crate::scalar::{decode_string, encode_string, format_real};
use crate::tokenizer::{parse_value, Token};
use ifc_step_model::{AttributeValue, Decoded, EntityLookup, Logical, Result, StepError};

/// A field value that can be read from and written to STEP text
pub trait StepValue: Sized {
    /// Decode from a token; `$`/`*` are only accepted by wrappers
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self>;

    /// Write the lexeme
    fn encode(&self, out: &mut String);

    /// Write the lexeme as a SELECT member, wrapped in `TYPENAME(...)`
    /// for defined types
    fn encode_select(&self, out: &mut String) {
        self.encode(out);
    }

    /// Reflection handle
    fn to_attribute(&self) -> AttributeValue;

    /// Empty collections are left out of attribute reflection
    fn is_empty_collection(&self) -> bool {
        false
    }
}

pub(crate) fn unexpected(expected: &str, token: &Token<'_>) -> StepError {
    StepError::malformed(format!("expected {expected}, found {}", token.describe()))
}

impl StepValue for i64 {
    fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Integer(i) => Ok(*i),
            other => Err(unexpected("integer", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Integer(*self)
    }
}

impl StepValue for f64 {
    fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Real(f) => Ok(*f),
            Token::Integer(i) => Ok(*i as f64),
            other => Err(unexpected("real", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        format_real(*self, out);
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Real(*self)
    }
}

impl StepValue for bool {
    fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Enum(name) if name.eq_ignore_ascii_case("T") => Ok(true),
            Token::Enum(name) if name.eq_ignore_ascii_case("F") => Ok(false),
            other => Err(unexpected("boolean .T. or .F.", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        out.push_str(if *self { ".T." } else { ".F." });
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Bool(*self)
    }
}

impl StepValue for Logical {
    fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Enum(name) if name.eq_ignore_ascii_case("T") => Ok(Logical::True),
            Token::Enum(name) if name.eq_ignore_ascii_case("F") => Ok(Logical::False),
            Token::Enum(name) if name.eq_ignore_ascii_case("U") => Ok(Logical::Unknown),
            other => Err(unexpected("logical .T., .F. or .U.", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        out.push('.');
        out.push(self.letter());
        out.push('.');
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Logical(*self)
    }
}

impl StepValue for String {
    fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::String(raw) => decode_string(raw),
            other => Err(unexpected("string", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        encode_string(self, out);
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::String(self.clone())
    }
}

/// `$` and `*` both decode to `None`
///
/// Under a lenient context a reference to an unknown id also becomes
/// `None`; the id is recorded on the context.
impl<T: StepValue> StepValue for Option<T> {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Null | Token::Derived => Ok(None),
            _ => match T::decode(token, ctx) {
                Ok(value) => Ok(Some(value)),
                Err(StepError::MissingReference { id }) if ctx.is_lenient() => {
                    ctx.record_unresolved(id);
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    fn encode(&self, out: &mut String) {
        match self {
            Some(value) => value.encode(out),
            None => out.push('$'),
        }
    }

    fn to_attribute(&self) -> AttributeValue {
        match self {
            Some(value) => value.to_attribute(),
            None => AttributeValue::Null,
        }
    }

    fn is_empty_collection(&self) -> bool {
        self.as_ref().is_some_and(T::is_empty_collection)
    }
}

/// Keeps `$` and `*` apart
impl<T: StepValue> StepValue for Decoded<T> {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::Null => Ok(Decoded::Null),
            Token::Derived => Ok(Decoded::Derived),
            _ => match T::decode(token, ctx) {
                Ok(value) => Ok(Decoded::Value(value)),
                Err(StepError::MissingReference { id }) if ctx.is_lenient() => {
                    ctx.record_unresolved(id);
                    Ok(Decoded::Null)
                }
                Err(e) => Err(e),
            },
        }
    }

    fn encode(&self, out: &mut String) {
        match self {
            Decoded::Null => out.push('$'),
            Decoded::Derived => out.push('*'),
            Decoded::Value(value) => value.encode(out),
        }
    }

    fn to_attribute(&self) -> AttributeValue {
        match self {
            Decoded::Null => AttributeValue::Null,
            Decoded::Derived => AttributeValue::Derived,
            Decoded::Value(value) => value.to_attribute(),
        }
    }
}

/// Lists of any depth; an empty list is written as `$`
impl<T: StepValue> StepValue for Vec<T> {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        match token {
            Token::List(items) => items.iter().map(|item| T::decode(item, ctx)).collect(),
            Token::Null | Token::Derived => Ok(Vec::new()),
            other => Err(unexpected("list", other)),
        }
    }

    fn encode(&self, out: &mut String) {
        if self.is_empty() {
            out.push('$');
            return;
        }
        out.push('(');
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            item.encode(out);
        }
        out.push(')');
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::List(self.iter().map(T::to_attribute).collect())
    }

    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

/// Decode a standalone lexeme against an id → kind lookup
///
/// Missing references are errors here.
pub fn decode_value<T: StepValue>(text: &str, lookup: &dyn EntityLookup) -> Result<T> {
    let token = parse_value(text)?;
    let ctx = ReadContext::strict(lookup);
    T::decode(&token, &ctx)
}

/// Encode a value to its lexeme
pub fn encode_value<T: StepValue>(value: &T) -> String {
    let mut out = String::new();
    value.encode(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::EmptyLookup;

    fn decode<T: StepValue>(text: &str) -> Result<T> {
        decode_value(text, &EmptyLookup)
    }

    #[test]
    fn test_numeric_rendering() {
        assert_eq!(encode_value(&1.0f64), "1.");
        assert_eq!(encode_value(&1.5f64), "1.5");
        assert_eq!(encode_value(&100i64), "100");
        assert_eq!(encode_value(&-7i64), "-7");
    }

    #[test]
    fn test_scalar_round_trip() {
        assert_eq!(decode::<i64>(&encode_value(&42i64)).unwrap(), 42);
        assert_eq!(decode::<f64>(&encode_value(&0.125f64)).unwrap(), 0.125);
        assert!(decode::<bool>(&encode_value(&true)).unwrap());
        assert_eq!(
            decode::<Logical>(&encode_value(&Logical::Unknown)).unwrap(),
            Logical::Unknown
        );
        let text = "Tür 😀".to_string();
        assert_eq!(decode::<String>(&encode_value(&text)).unwrap(), text);
    }

    #[test]
    fn test_canonical_text_round_trip() {
        for text in ["1.", "2.5", "-0.25", "1250."] {
            assert_eq!(encode_value(&decode::<f64>(text).unwrap()), text);
        }
        for text in [".T.", ".F."] {
            assert_eq!(encode_value(&decode::<bool>(text).unwrap()), text);
        }
        for text in ["'Foo'", "'it''s'", "'W\\X2\\00E4\\X0\\rme'"] {
            assert_eq!(encode_value(&decode::<String>(text).unwrap()), text);
        }
    }

    #[test]
    fn test_null_and_derived_distinct() {
        assert_eq!(decode::<Decoded<i64>>("$").unwrap(), Decoded::Null);
        assert_eq!(decode::<Decoded<i64>>("*").unwrap(), Decoded::Derived);
        assert_eq!(decode::<Decoded<i64>>("3").unwrap(), Decoded::Value(3));
        assert_eq!(encode_value(&Decoded::<i64>::Derived), "*");
        assert_eq!(decode::<Option<i64>>("$").unwrap(), None);
        assert_eq!(decode::<Option<i64>>("*").unwrap(), None);
    }

    #[test]
    fn test_booleans_case_insensitive() {
        assert!(decode::<bool>(".t.").unwrap());
        assert_eq!(decode::<Logical>(".u.").unwrap(), Logical::Unknown);
        assert!(decode::<bool>(".U.").is_err());
        assert!(decode::<bool>("$").is_err());
    }

    #[test]
    fn test_type_mismatches_are_malformed() {
        assert!(matches!(
            decode::<i64>("'12'"),
            Err(StepError::MalformedValue { .. })
        ));
        assert!(matches!(
            decode::<i64>("1.5"),
            Err(StepError::MalformedValue { .. })
        ));
        assert!(matches!(
            decode::<f64>(".T."),
            Err(StepError::MalformedValue { .. })
        ));
        assert_eq!(decode::<f64>("3").unwrap(), 3.0);
    }

    #[test]
    fn test_empty_list_is_null() {
        let empty: Vec<Option<i64>> = Vec::new();
        assert_eq!(encode_value(&empty), "$");
        assert!(decode::<Vec<i64>>("$").unwrap().is_empty());
        assert!(decode::<Vec<i64>>("()").unwrap().is_empty());
    }

    #[test]
    fn test_nested_lists() {
        let nested: Vec<Vec<i64>> = decode("((1,2),(3,4,5))").unwrap();
        assert_eq!(nested, vec![vec![1, 2], vec![3, 4, 5]]);
        assert_eq!(encode_value(&nested), "((1,2),(3,4,5))");

        let cube: Vec<Vec<Vec<f64>>> = decode("(((0.,1.),(2.,3.)),((4.,5.)))").unwrap();
        assert_eq!(cube[1][0], vec![4.0, 5.0]);
        assert_eq!(encode_value(&cube), "(((0.,1.),(2.,3.)),((4.,5.)))");
    }

    #[test]
    fn test_unbalanced_list_is_malformed() {
        assert!(matches!(
            decode::<Vec<Vec<i64>>>("((1,2),(3,4,5)"),
            Err(StepError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_reflection_shapes() {
        assert_eq!(Some(2i64).to_attribute(), AttributeValue::Integer(2));
        assert_eq!(None::<i64>.to_attribute(), AttributeValue::Null);
        assert!(Vec::<i64>::new().is_empty_collection());
        assert!(Some(Vec::<i64>::new()).is_empty_collection());
        assert!(!None::<Vec<i64>>.is_empty_collection());
    }
}
