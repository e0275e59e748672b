//! Token construction macros shared by the lexer's pattern table.

/// Builds a `Token` from its kind, text, start position and whitespace flag.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), Position { line: 1, col: 1 }, true);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $position:expr, $whitespace:expr) => {
        Token {
            kind: $kind,
            value: $value,
            position: $position,
            preceded_by_whitespace: $whitespace,
        }
    };
}

/// Expands to a handler for a fixed operator or punctuation token: it
/// records the token at the cursor and skips `$value.len()` bytes.
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\?\\?").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::NullishCoalescing, "??"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| -> Result<(), Error> {
            let position = lexer.position();
            let whitespace = lexer.take_whitespace();
            lexer.push(MK_TOKEN!($kind, String::from($value), position, whitespace));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}
