//! Streaming HTML5 tokenizer emitting byte-span tokens.
//!
//! This crate is the lexical front end of an HTML language server /
//! formatter: callers own a byte buffer, pull tokens one at a time with
//! [`Tokenizer::next`], and reslice the buffer through the emitted
//! [`Span`]s. The surrounding tooling (document manager, formatter,
//! diagnostics publisher) lives elsewhere and only sees this token stream.
//!
//! Guarantees:
//! - Tokens are emitted in strict left-to-right source order; where one byte
//!   produces two tokens, the second is returned by the following `next`
//!   call.
//! - Token payloads are spans only; the tokenizer allocates nothing per
//!   token.
//! - Errors are non-fatal: every violation becomes a
//!   [`Token::ParseError`] and tokenization continues.
//! - Two runs over byte-equal input emit byte-equal token sequences.
//!
//! Out of scope, by design: tree construction, character-reference
//! resolution, Unicode decoding (only ASCII is classified; other bytes pass
//! through inside spans), NUL replacement, and case normalization of names.
//!
//! ```
//! use html_lexer::{Token, Tokenizer};
//!
//! let src = b"<p>hi</p>";
//! let mut tokenizer = Tokenizer::new();
//! let mut names: Vec<&[u8]> = Vec::new();
//! while let Some(token) = tokenizer.next(src) {
//!     if let Token::Tag(tag) = token {
//!         names.push(tag.name.of(src));
//!     }
//! }
//! assert_eq!(names, [b"p".as_slice(), b"p".as_slice()]);
//! ```

mod error;
mod span;
mod token;
pub mod token_fmt;
mod tokenizer;

pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::span::Span;
pub use crate::token::{Attr, AttrValue, Doctype, Quote, Tag, TagKind, Token};
pub use crate::tokenizer::{Tokenizer, TokenizerStats, tokenize};
