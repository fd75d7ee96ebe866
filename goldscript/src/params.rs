//! The parameter-row mini-language used inside `{` ... `}` blocks.
//!
//! A row is a comma-separated field list. Outside quotes, characters at or
//! below space are dropped; a `"` starts a quoted run whose characters pass
//! through untouched, commas included. A finished field equal to `null`
//! (case-insensitive, quoted or not) binds SQL NULL.

/// Parse one parameter row into bind values, 1-based by position.
///
/// Fails only on an unterminated quoted run; the caller attaches script and
/// line context to the message.
pub(crate) fn parse_param_row(row: &str) -> Result<Vec<Option<String>>, &'static str> {
    let mut fields = Vec::new();
    let mut buff = String::new();
    let mut chars = row.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ',' => fields.push(finish_field(&mut buff)),
            '"' => loop {
                match chars.next() {
                    Some('"') => break,
                    Some(inner) => buff.push(inner),
                    None => return Err("unterminated quoted field"),
                }
            },
            ch if ch > ' ' => buff.push(ch),
            _ => {}
        }
    }
    // A trailing comma leaves the buffer empty and adds no field.
    if !buff.is_empty() {
        fields.push(finish_field(&mut buff));
    }
    Ok(fields)
}

fn finish_field(buff: &mut String) -> Option<String> {
    let text = std::mem::take(buff);
    if text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_param_row;

    fn some(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    /// Quoting passes a comma through; the `null` token binds NULL.
    #[test]
    fn quoted_commas_and_null_token() {
        let fields = parse_param_row("1,\"a,b\",null").unwrap();
        assert_eq!(fields, vec![some("1"), some("a,b"), None]);
    }

    /// The null token is case-insensitive, quoted or bare.
    #[test]
    fn null_token_is_case_insensitive() {
        assert_eq!(parse_param_row("NULL").unwrap(), vec![None]);
        assert_eq!(parse_param_row("Null").unwrap(), vec![None]);
        assert_eq!(parse_param_row("\"null\"").unwrap(), vec![None]);
        assert_eq!(parse_param_row("nulls").unwrap(), vec![some("nulls")]);
    }

    /// Whitespace outside quotes is stripped; inside quotes it survives.
    #[test]
    fn whitespace_stripped_outside_quotes() {
        assert_eq!(
            parse_param_row(" 1 ,\t2 ").unwrap(),
            vec![some("1"), some("2")]
        );
        assert_eq!(parse_param_row("\" a b \"").unwrap(), vec![some(" a b ")]);
    }

    /// An empty field between commas binds an empty string, not NULL.
    #[test]
    fn empty_field_is_empty_string() {
        assert_eq!(
            parse_param_row("1,,2").unwrap(),
            vec![some("1"), some(""), some("2")]
        );
    }

    /// A trailing comma does not produce an extra field.
    #[test]
    fn trailing_comma_adds_no_field() {
        assert_eq!(parse_param_row("1,").unwrap(), vec![some("1")]);
        assert_eq!(parse_param_row("").unwrap(), Vec::<Option<String>>::new());
    }

    /// Quoted runs splice into the surrounding field text.
    #[test]
    fn quotes_splice_into_field() {
        assert_eq!(parse_param_row("a\"b,c\"d").unwrap(), vec![some("ab,cd")]);
    }

    /// A quote with no closing partner fails the row.
    #[test]
    fn unterminated_quote_fails() {
        assert!(parse_param_row("\"abc").is_err());
        assert!(parse_param_row("1,\"x").is_err());
    }
}
