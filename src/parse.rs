use crate::error::JsonFormError;
use crate::types::{is_bare_key_char, Assignment, PathToken, Separator, ValueKind};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, take_while, take_while1},
    character::complete::{alpha1, char, digit1, none_of, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, rest, value},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use nom_language::error::VerboseError;

type Res<T, U> = IResult<T, U, VerboseError<T>>;

/// Parses a path string into path tokens.
///
/// ## Arguments
///
/// * `input` - The path, e.g. "addresses[0].city". The empty string is the root.
/// * `separator` - The separator to use between keys, a Separator enum variant.
///
/// ## Returns
///
/// Returns the path tokens if successful, or a `JsonFormError::InvalidPath` naming
/// the first column that could not be parsed.
pub fn parse_path(input: &str, separator: Separator) -> Result<Vec<PathToken>, JsonFormError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let sep_char = separator.as_char();
    match all_consuming(move |i| path(i, sep_char)).parse(input) {
        Ok((_, tokens)) => Ok(tokens),
        Err(err) => Err(JsonFormError::InvalidPath {
            path: input.to_string(),
            reason: describe_error(input, err),
        }),
    }
}

/// Parses an assignment expression of the form `path[:type]=value`.
///
/// An empty path assigns the document root, so `=[]` replaces the whole document.
/// A single space after `=` is skipped.
pub fn parse_assignment(input: &str, separator: Separator) -> Result<Assignment, JsonFormError> {
    let sep_char = separator.as_char();
    match all_consuming(move |i| assignment(i, sep_char)).parse(input) {
        Ok((_, assignment)) => Ok(assignment),
        Err(err) => Err(JsonFormError::InvalidPath {
            path: input.to_string(),
            reason: describe_error(input, err),
        }),
    }
}

/// Returns true if `name` matches `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_valid_field_name(name: &str) -> bool {
    all_consuming(field_name).parse(name).is_ok()
}

fn describe_error(input: &str, err: nom::Err<VerboseError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let remaining = e.errors.first().map(|(i, _)| *i).unwrap_or(input);
            let consumed = input.len().saturating_sub(remaining.len());
            let column = input[..consumed].chars().count() + 1;
            match remaining.chars().next() {
                Some(c) => format!("unexpected `{}` at column {}", c, column),
                None => "unexpected end of input".to_string(),
            }
        }
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    }
}

fn assignment(input: &str, separator: char) -> Res<&str, Assignment> {
    let (input, tokens) = opt(|i| path(i, separator)).parse(input)?;
    let (input, kind) = opt(preceded(char(':'), value_kind)).parse(input)?;
    let (input, _) = char('=').parse(input)?;
    let (input, _) = opt(char(' ')).parse(input)?;
    let (input, raw) = rest(input)?;

    Ok((
        input,
        Assignment {
            tokens: tokens.unwrap_or_default(),
            kind,
            raw: raw.to_string(),
        },
    ))
}

fn value_kind(input: &str) -> Res<&str, ValueKind> {
    map_res(alpha1, |s: &str| s.parse::<ValueKind>()).parse(input)
}

fn path(input: &str, separator: char) -> Res<&str, Vec<PathToken>> {
    let (input, head) = alt((many1(array_index), |i| key_segment(i, separator))).parse(input)?;
    let (input, tail) =
        many0(preceded(char(separator), |i| key_segment(i, separator))).parse(input)?;

    let tokens = head.into_iter().chain(tail.into_iter().flatten()).collect();

    Ok((input, tokens))
}

fn key_segment(input: &str, separator: char) -> Res<&str, Vec<PathToken>> {
    let (input, key) = alt((quoted_string, |i| bare_key(i, separator))).parse(input)?;
    let (input, indices) = many0(array_index).parse(input)?;

    let mut tokens = Vec::with_capacity(indices.len() + 1);
    tokens.push(PathToken::Key(key));
    tokens.extend(indices);

    Ok((input, tokens))
}

fn array_index(input: &str) -> Res<&str, PathToken> {
    map(
        delimited(
            char('['),
            map_res(digit1, |s: &str| s.parse::<usize>()),
            char(']'),
        ),
        PathToken::Index,
    )
    .parse(input)
}

fn bare_key(input: &str, separator: char) -> Res<&str, String> {
    map(
        take_while1(move |c: char| is_bare_key_char(c, separator)),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn quoted_string(input: &str) -> Res<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(none_of("\\\""), '\\', escape_sequence)),
            Option::unwrap_or_default,
        ),
        char('"'),
    )
    .parse(input)
}

fn escape_sequence(input: &str) -> Res<&str, char> {
    alt((
        value('\\', char('\\')),
        value('"', char('"')),
        value('\n', char('n')),
        value('\t', char('t')),
        value('\r', char('r')),
    ))
    .parse(input)
}

fn field_name(input: &str) -> Res<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_quoted_key_is_allowed() {
        assert_eq!(
            parse_path(r#""""#, Separator::Dot),
            Ok(vec![PathToken::Key(String::new())])
        );
    }

    #[test]
    fn error_names_the_column() {
        let err = parse_path("a..b", Separator::Dot).unwrap_err();
        assert_eq!(
            err,
            JsonFormError::InvalidPath {
                path: "a..b".to_string(),
                reason: "unexpected `.` at column 2".to_string(),
            }
        );
    }
}
