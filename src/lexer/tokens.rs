use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("val", TokenKind::Val);
        map.insert("function", TokenKind::Function);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("switch", TokenKind::Switch);
        map.insert("case", TokenKind::Case);
        map.insert("default", TokenKind::Default);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("try", TokenKind::Try);
        map.insert("catch", TokenKind::Catch);
        map.insert("finally", TokenKind::Finally);
        map.insert("throw", TokenKind::Throw);
        map.insert("typeof", TokenKind::Typeof);
        map.insert("this", TokenKind::This);
        map.insert("import", TokenKind::Import);
        map.insert("export", TokenKind::Export);
        map.insert("from", TokenKind::From);
        map.insert("as", TokenKind::As);
        map.insert("of", TokenKind::Of);
        map.insert("type", TokenKind::Type);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("None", TokenKind::None);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    FString,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment,    // =
    Equals,        // ==
    Not,           // !
    NotEquals,     // !=
    Less,          // <
    LessEquals,    // <=
    Greater,       // >
    GreaterEquals, // >=

    And,               // &&
    Or,                // ||
    Pipe,              // |
    NullishCoalescing, // ??

    Dot,         // .
    DotDotDot,   // ...
    QuestionDot, // ?.
    Question,    // ?
    Colon,       // :
    Semicolon,   // ;
    Comma,       // ,
    Arrow,       // =>

    PlusEquals,     // +=
    MinusEquals,    // -=
    StarEquals,     // *=
    SlashEquals,    // /=
    PercentEquals,  // %=
    StarStarEquals, // **=

    Plus,     // +
    Dash,     // -
    Slash,    // /
    Star,     // *
    StarStar, // **
    Percent,  // %

    // Reserved
    Let,
    Val,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Try,
    Catch,
    Finally,
    Throw,
    Typeof,
    This,
    Import,
    Export,
    From,
    As,
    Of,
    Type,
    True,
    False,
    None,
}

impl TokenKind {
    /// Whether the kind comes from the reserved word table. Keywords are still
    /// valid property names after `.` and as object literal keys.
    pub fn is_keyword(&self) -> bool {
        RESERVED_LOOKUP.values().any(|kind| kind == self)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
    pub preceded_by_whitespace: bool,
}

impl Token {
    /// Describes the token for "Expected ... but found ..." messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::from("end of input"),
            TokenKind::String | TokenKind::FString => format!("{}({:?})", self.kind, self.value),
            _ => format!("'{}'", self.value),
        }
    }
}
