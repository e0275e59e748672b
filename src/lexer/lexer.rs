use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins, so longer
    // operators are listed before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^#[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r#"^f["']"#).unwrap(), handler: fstring_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+(\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r#"^["']"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^\.\.\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDotDot, "...") },
        RegexPattern { regex: Regex::new(r"^\*\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarStarEquals, "**=") },
        RegexPattern { regex: Regex::new(r"^\*\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**") },
        RegexPattern { regex: Regex::new(r"^\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r"^=>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "=>") },
        RegexPattern { regex: Regex::new(r"^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new(r"^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new(r"^&").unwrap(), handler: ampersand_handler },
        RegexPattern { regex: Regex::new(r"^\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new(r"^\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|") },
        RegexPattern { regex: Regex::new(r"^\?\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NullishCoalescing, "??") },
        RegexPattern { regex: Regex::new(r"^\?\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::QuestionDot, "?.") },
        RegexPattern { regex: Regex::new(r"^\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?") },
        RegexPattern { regex: Regex::new(r"^\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^%=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=") },
        RegexPattern { regex: Regex::new(r"^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    col: u32,
    whitespace_pending: bool,
}

impl Lexer {
    pub fn new(source: String, start: Position) -> Lexer {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: start.line,
            col: start.col,
            whitespace_pending: true,
        }
    }

    /// Moves the cursor `n` bytes forward, keeping line and column in sync.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }

    /// Returns whether whitespace preceded the cursor and resets the flag.
    pub fn take_whitespace(&mut self) -> bool {
        std::mem::replace(&mut self.whitespace_pending, false)
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn peek(&self) -> Option<char> {
        self.remainder().chars().nth(1)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Maps the character after a backslash to the character it stands for.
pub fn unescape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

fn matched_len(lexer: &Lexer, regex: &Regex) -> usize {
    regex.find(lexer.remainder()).map(|m| m.end()).unwrap_or(0)
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let len = matched_len(lexer, regex);
    lexer.advance_n(len);
    lexer.whitespace_pending = true;
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let len = matched_len(lexer, regex);
    let value = lexer.remainder()[..len].to_string();
    let position = lexer.position();
    let whitespace = lexer.take_whitespace();

    lexer.push(MK_TOKEN!(TokenKind::Number, value, position, whitespace));
    lexer.advance_n(len);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let len = matched_len(lexer, regex);
    let value = lexer.remainder()[..len].to_string();
    let position = lexer.position();
    let whitespace = lexer.take_whitespace();

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value, position, whitespace));
    lexer.advance_n(len);
    Ok(())
}

fn ampersand_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    Err(Error::new(ErrorImpl::BitwiseAnd, lexer.position()))
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();
    let whitespace = lexer.take_whitespace();
    let quote = lexer.at().unwrap_or('"');
    lexer.advance_n(1);

    let mut value = String::new();

    loop {
        match lexer.at() {
            None | Some('\n') => return Err(Error::new(ErrorImpl::UnterminatedString, start)),
            Some(ch) if ch == quote => {
                lexer.advance_n(1);
                break;
            }
            Some('\\') => {
                let escape_position = lexer.position();
                match lexer.peek() {
                    None | Some('\n') => {
                        return Err(Error::new(ErrorImpl::UnterminatedString, start))
                    }
                    Some(sequence) => match unescape(sequence) {
                        Some(escaped) => {
                            value.push(escaped);
                            lexer.advance_n(1 + sequence.len_utf8());
                        }
                        None => {
                            return Err(Error::new(
                                ErrorImpl::UnknownEscapeSequence { sequence },
                                escape_position,
                            ))
                        }
                    },
                }
            }
            Some(ch) => {
                value.push(ch);
                lexer.advance_n(ch.len_utf8());
            }
        }
    }

    lexer.push(MK_TOKEN!(TokenKind::String, value, start, whitespace));
    Ok(())
}

/// Lexes `f"..."`. The raw body (escapes and braces untouched) becomes the
/// token value; the parser splits it into text and interpolations.
fn fstring_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();
    let whitespace = lexer.take_whitespace();
    lexer.advance_n(1);
    let quote = lexer.at().unwrap_or('"');
    lexer.advance_n(1);

    let body_start = lexer.pos;

    loop {
        match lexer.at() {
            None | Some('\n') => return Err(Error::new(ErrorImpl::UnterminatedString, start)),
            Some(ch) if ch == quote => break,
            Some('\\') => {
                let escape_position = lexer.position();
                match lexer.peek() {
                    None | Some('\n') => {
                        return Err(Error::new(ErrorImpl::UnterminatedString, start))
                    }
                    Some(sequence) if unescape(sequence).is_some() => {
                        lexer.advance_n(1 + sequence.len_utf8())
                    }
                    Some(sequence) => {
                        return Err(Error::new(
                            ErrorImpl::UnknownEscapeSequence { sequence },
                            escape_position,
                        ))
                    }
                }
            }
            Some('{') if lexer.peek() == Some('{') => lexer.advance_n(2),
            Some('{') => skip_interpolation(lexer)?,
            Some('}') if lexer.peek() == Some('}') => lexer.advance_n(2),
            Some('}') => {
                return Err(Error::new(
                    ErrorImpl::UnmatchedInterpolationBrace,
                    lexer.position(),
                ))
            }
            Some(ch) => lexer.advance_n(ch.len_utf8()),
        }
    }

    let body = lexer.source[body_start..lexer.pos].to_string();
    lexer.advance_n(1);

    lexer.push(MK_TOKEN!(TokenKind::FString, body, start, whitespace));
    Ok(())
}

/// Steps over `{ ... }` inside an f-string, honouring nested braces and
/// quoted strings within the expression.
fn skip_interpolation(lexer: &mut Lexer) -> Result<(), Error> {
    let open = lexer.position();
    let mut depth = 0;

    loop {
        match lexer.at() {
            None | Some('\n') => {
                return Err(Error::new(ErrorImpl::UnterminatedInterpolation, open))
            }
            Some('{') => {
                depth += 1;
                lexer.advance_n(1);
            }
            Some('}') => {
                depth -= 1;
                lexer.advance_n(1);
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(quote @ ('"' | '\'')) => {
                lexer.advance_n(1);
                loop {
                    match lexer.at() {
                        None | Some('\n') => {
                            return Err(Error::new(ErrorImpl::UnterminatedInterpolation, open))
                        }
                        Some('\\') => {
                            let len = 1 + lexer.peek().map(char::len_utf8).unwrap_or(0);
                            lexer.advance_n(len);
                        }
                        Some(ch) if ch == quote => {
                            lexer.advance_n(1);
                            break;
                        }
                        Some(ch) => lexer.advance_n(ch.len_utf8()),
                    }
                }
            }
            Some(ch) => lexer.advance_n(ch.len_utf8()),
        }
    }
}

/// Tokenizes source text that starts somewhere other than 1:1, used for
/// expressions embedded in f-strings.
pub fn tokenize_at(source: &str, start: Position) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source.to_string(), start);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let character = lex.at().unwrap_or('\0');
                return Err(Error::new(
                    ErrorImpl::UnexpectedCharacter { character },
                    lex.position(),
                ));
            }
        }
    }

    let position = lex.position();
    let whitespace = lex.take_whitespace();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), position, whitespace));
    Ok(lex.tokens)
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    tokenize_at(source, Position { line: 1, col: 1 })
}
