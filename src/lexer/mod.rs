//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts GPJ source
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an ordered regex pattern table
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line/column tracking and the whitespace flag used for spacing checks
//! - String escapes and raw f-string bodies
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
