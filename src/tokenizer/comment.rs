//! Comment states: `<!--` pipeline, bogus comments, and CDATA sections.
//!
//! Comment tokens span the whole construct, delimiters included. CDATA
//! sections are surfaced as comment tokens; distinguishing them is left to
//! the host parser. EOF inside a proper comment produces `eof-in-comment`
//! plus the partial comment through the deferred slot; a bogus comment at
//! EOF is emitted without an error.

use crate::error::ParseErrorKind;
use crate::span::Span;
use crate::token::Token;
use crate::tokenizer::state::State;
use crate::tokenizer::{Emit, Tokenizer};

impl Tokenizer {
    fn comment_token(&self, start: usize, end: usize) -> Token {
        Token::Comment {
            span: Span::new(start, end),
        }
    }

    fn eof_in_comment(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let salvage = self.comment_token(start, src.len());
        self.eof_error(
            ParseErrorKind::EofInComment,
            Span::empty(src.len()),
            Some(salvage),
        )
    }

    pub(super) fn step_comment_start(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentStartDash { start });
                None
            }
            b'>' => {
                let span = Span::new(start, self.idx);
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::AbruptClosingOfEmptyComment, span);
                Some(Emit::pair(error, self.comment_token(start, self.idx)))
            }
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment_start_dash(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentEnd { start });
                None
            }
            b'>' => {
                let span = Span::new(start, self.idx);
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::AbruptClosingOfEmptyComment, span);
                Some(Emit::pair(error, self.comment_token(start, self.idx)))
            }
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        match memchr::memchr3(b'-', b'<', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.eof_in_comment(src, start)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                match src[pos] {
                    b'-' => {
                        self.transition_to(State::CommentEndDash { start });
                        None
                    }
                    b'<' => {
                        self.transition_to(State::CommentLessThanSign { start });
                        None
                    }
                    _ => {
                        let span = Span::new(pos, pos + 1);
                        Some(Emit::one(
                            self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                        ))
                    }
                }
            }
        }
    }

    pub(super) fn step_comment_less_than_sign(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'!' => {
                self.transition_to(State::CommentLessThanSignBang { start });
                None
            }
            b'<' => None, // consecutive `<` bytes keep us here
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment_less_than_sign_bang(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentLessThanSignBangDash { start });
                None
            }
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment_less_than_sign_bang_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentLessThanSignBangDashDash { start });
                None
            }
            _ => {
                self.reconsume();
                self.transition_to(State::CommentEndDash { start });
                None
            }
        }
    }

    pub(super) fn step_comment_less_than_sign_bang_dash_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            // Reprocessed as comment end, which handles the EOF itself.
            self.transition_to(State::CommentEnd { start });
            return None;
        };
        match byte {
            b'>' => {
                self.reconsume();
                self.transition_to(State::CommentEnd { start });
                None
            }
            _ => {
                // A `<!--` inside an open comment.
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::CommentEnd { start });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::NestedComment, span),
                ))
            }
        }
    }

    pub(super) fn step_comment_end_dash(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentEnd { start });
                None
            }
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment_end(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'>' => {
                self.transition_to(State::Data);
                Some(Emit::one(self.comment_token(start, self.idx)))
            }
            b'!' => {
                self.transition_to(State::CommentEndBang { start });
                None
            }
            b'-' => None, // extra dashes stay part of the comment tail
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_comment_end_bang(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_comment(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::CommentEndDash { start });
                None
            }
            b'>' => {
                // `--!>` closes the comment but is flagged.
                let span = Span::new(self.idx - 4, self.idx);
                self.transition_to(State::Data);
                let error = self.error_token(ParseErrorKind::IncorrectlyClosedComment, span);
                Some(Emit::pair(error, self.comment_token(start, self.idx)))
            }
            _ => {
                self.reconsume();
                self.transition_to(State::Comment { start });
                None
            }
        }
    }

    pub(super) fn step_bogus_comment(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        match memchr::memchr2(b'>', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.transition_to(State::Eof);
                Some(Emit::one(self.comment_token(start, src.len())))
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                if src[pos] == b'>' {
                    self.transition_to(State::Data);
                    Some(Emit::one(self.comment_token(start, self.idx)))
                } else {
                    let span = Span::new(pos, pos + 1);
                    Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ))
                }
            }
        }
    }

    pub(super) fn step_cdata_section(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        match memchr::memchr(b']', &src[self.idx..]) {
            None => {
                self.idx = src.len();
                let salvage = self.comment_token(start, src.len());
                self.eof_error(
                    ParseErrorKind::EofInCdata,
                    Span::empty(src.len()),
                    Some(salvage),
                )
            }
            Some(rel) => {
                self.idx += rel + 1;
                self.transition_to(State::CdataSectionBracket { start });
                None
            }
        }
    }

    pub(super) fn step_cdata_section_bracket(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            let salvage = self.comment_token(start, src.len());
            return self.eof_error(
                ParseErrorKind::EofInCdata,
                Span::empty(src.len()),
                Some(salvage),
            );
        };
        match byte {
            b']' => {
                self.transition_to(State::CdataSectionEnd { start });
                None
            }
            _ => {
                self.reconsume();
                self.transition_to(State::CdataSection { start });
                None
            }
        }
    }

    pub(super) fn step_cdata_section_end(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            let salvage = self.comment_token(start, src.len());
            return self.eof_error(
                ParseErrorKind::EofInCdata,
                Span::empty(src.len()),
                Some(salvage),
            );
        };
        match byte {
            b']' => None, // runs of `]` keep the last two candidates alive
            b'>' => {
                self.transition_to(State::Data);
                Some(Emit::one(self.comment_token(start, self.idx)))
            }
            _ => {
                self.reconsume();
                self.transition_to(State::CdataSection { start });
                None
            }
        }
    }
}
