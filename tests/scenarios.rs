//! End-to-end token sequences for representative inputs.
//!
//! Each case compares the full formatted token stream so regressions show up
//! as a readable line diff rather than a single failed field.

use html_lexer::token_fmt::format_tokens;
use html_lexer::{Token, Tokenizer, tokenize};

/// Drive a tokenizer the way a host parser would: switch into the matching
/// text-content mode right after the start tags that require one.
fn tokenize_with_host(src: &[u8]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        if let Token::Tag(tag) = &token {
            if tag.kind.is_start() && !tag.kind.is_self_closing() {
                let name = tag.name.of(src);
                if name.eq_ignore_ascii_case(b"script") {
                    tokenizer.enter_script_data();
                } else if name.eq_ignore_ascii_case(b"style") {
                    tokenizer.enter_rawtext(name);
                } else if name.eq_ignore_ascii_case(b"title")
                    || name.eq_ignore_ascii_case(b"textarea")
                {
                    tokenizer.enter_rcdata(name);
                } else if name.eq_ignore_ascii_case(b"plaintext") {
                    tokenizer.enter_plaintext();
                }
            }
        }
        tokens.push(token);
    }
    tokens
}

fn assert_lines(case: &str, src: &[u8], expected: &[&str]) {
    let actual = format_tokens(src, &tokenize(src));
    assert_eq!(actual, expected, "token mismatch in case '{case}'");
}

#[test]
fn representative_documents_tokenize_as_expected() {
    assert_lines(
        "simple element",
        b"<p>hi</p>",
        &[
            "TAG name=p kind=start",
            "TEXT \"hi\"",
            "TAG name=p kind=end",
        ],
    );
    assert_lines(
        "self-closing with attribute",
        b"<img src=\"a.png\"/>",
        &["TAG name=img kind=start_attrs_self"],
    );
    assert_lines("comment", b"<!-- x -->", &["COMMENT \"<!-- x -->\""]);
    assert_lines(
        "doctype",
        b"<!DOCTYPE html>",
        &["DOCTYPE name=html extra=\"\" force_quirks=false"],
    );
    assert_lines(
        "unquoted and bare attributes",
        b"<p class=foo bar>",
        &["TAG name=p kind=start_attrs"],
    );
    assert_lines(
        "less-than in attribute position",
        b"<x<y>",
        &[
            "ERROR code=unexpected-character-in-attribute-name span=2..3",
            "TAG name=x kind=start_attrs",
        ],
    );
    assert_lines(
        "bang-closed comment",
        b"<!--a--!>",
        &[
            "ERROR code=incorrectly-closed-comment span=5..9",
            "COMMENT \"<!--a--!>\"",
        ],
    );
    assert_lines(
        "markup declaration at end of input",
        b"<!",
        &[
            "ERROR code=incorrectly-opened-comment span=0..2",
            "COMMENT \"<!\"",
        ],
    );
}

#[test]
fn less_than_inside_tag_becomes_a_literal_attribute_name() {
    let src = b"<x<y>";
    let attrs: Vec<_> = {
        let mut tokenizer = Tokenizer::with_attrs();
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next(src) {
            tokens.push(token);
        }
        tokens
    };
    let lines = format_tokens(src, &attrs);
    assert_eq!(
        lines,
        [
            "TAG-NAME name=x",
            "ERROR code=unexpected-character-in-attribute-name span=2..3",
            "ATTR name=<y",
        ],
        "the attribute is named `<y`, byte for byte"
    );
}

#[test]
fn script_content_ends_at_the_first_close_tag_even_inside_strings() {
    let src = b"<script>let x = \"</script>\";</script>";
    let lines = format_tokens(src, &tokenize_with_host(src));
    assert_eq!(
        lines,
        [
            "TAG name=script kind=start",
            "TEXT \"let x = \\\"\"",
            "TAG name=script kind=end",
            "TEXT \"\\\";\"",
            "TAG name=script kind=end",
        ],
    );
}

#[test]
fn host_driven_modes_cover_style_title_and_plaintext() {
    let src = b"<style>p{color:red}</style><title>a<b</title><plaintext>rest";
    let lines = format_tokens(src, &tokenize_with_host(src));
    assert_eq!(
        lines,
        [
            "TAG name=style kind=start",
            "TEXT \"p{color:red}\"",
            "TAG name=style kind=end",
            "TAG name=title kind=start",
            "TEXT \"a<b\"",
            "TAG name=title kind=end",
            "TAG name=plaintext kind=start",
            "ERROR code=deprecated-and-unsupported span=56..60",
        ],
    );
}

#[test]
fn attribute_mode_reconstructs_the_attribute_list_in_source_order() {
    let src = b"<form action=\"/send\" method=post novalidate data-x='1'>";
    let mut tokenizer = Tokenizer::with_attrs();
    let mut reconstructed = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        if let Token::Attr(attr) = token {
            let name = String::from_utf8_lossy(attr.name.of(src)).into_owned();
            let value = attr
                .value
                .map(|value| String::from_utf8_lossy(value.span.of(src)).into_owned());
            reconstructed.push((name, value));
        }
    }
    assert_eq!(
        reconstructed,
        [
            ("action".to_string(), Some("/send".to_string())),
            ("method".to_string(), Some("post".to_string())),
            ("novalidate".to_string(), None),
            ("data-x".to_string(), Some("1".to_string())),
        ],
    );
}

#[test]
fn non_ascii_bytes_pass_through_inside_spans() {
    let src = "<p data=naïve>café</p>".as_bytes();
    let tokens = tokenize(src);
    let text = tokens
        .iter()
        .find_map(|token| match token {
            Token::Text { span } => Some(span.of(src)),
            _ => None,
        })
        .expect("expected a text token");
    assert_eq!(text, "café".as_bytes());
}
