use super::{Tokenizer, tokenize};
use crate::token::{TagKind, Token};
use crate::token_fmt::format_tokens;

fn collect(tokenizer: &mut Tokenizer, src: &[u8]) -> Vec<Token> {
    let mut out = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        out.push(token);
    }
    out
}

fn lines(src: &[u8]) -> Vec<String> {
    format_tokens(src, &tokenize(src))
}

fn attr_lines(src: &[u8]) -> Vec<String> {
    let mut tokenizer = Tokenizer::with_attrs();
    let tokens = collect(&mut tokenizer, src);
    format_tokens(src, &tokens)
}

#[test]
fn empty_input_yields_no_tokens() {
    let mut tokenizer = Tokenizer::new();
    assert_eq!(tokenizer.next(b""), None);
    assert_eq!(tokenizer.next(b""), None, "EOF state must be absorbing");
}

#[test]
fn simple_element_tokenizes_as_tag_text_tag() {
    assert_eq!(
        lines(b"<p>hi</p>"),
        [
            "TAG name=p kind=start",
            "TEXT \"hi\"",
            "TAG name=p kind=end",
        ],
    );
}

#[test]
fn text_runs_are_trimmed_on_both_sides() {
    assert_eq!(
        lines(b"<b>  hi there\t</b>"),
        [
            "TAG name=b kind=start",
            "TEXT \"hi there\"",
            "TAG name=b kind=end",
        ],
    );
}

#[test]
fn whitespace_only_runs_are_dropped() {
    assert_eq!(
        lines(b"<b> \t\n </b>"),
        ["TAG name=b kind=start", "TAG name=b kind=end"],
    );
}

#[test]
fn trailing_text_is_emitted_at_end_of_input() {
    assert_eq!(
        lines(b"<p>tail  "),
        ["TAG name=p kind=start", "TEXT \"tail\""],
    );
}

#[test]
fn nul_in_data_is_flagged_and_abandons_the_run() {
    let src = b"ab\0cd";
    assert_eq!(
        lines(src),
        ["ERROR code=unexpected-null-character span=2..3", "TEXT \"cd\""],
        "run before the NUL is dropped, run after it survives"
    );
}

#[test]
fn lone_less_than_at_eof_is_flagged_and_salvaged_as_text() {
    assert_eq!(
        lines(b"<"),
        ["ERROR code=eof-before-tag-name span=0..1", "TEXT \"<\""],
    );
}

#[test]
fn non_letter_after_less_than_reprocesses_as_text() {
    assert_eq!(
        lines(b"<1>"),
        [
            "ERROR code=invalid-first-character-of-tag-name span=1..2",
            "TEXT \"<\"",
            "TEXT \"1>\"",
        ],
    );
}

#[test]
fn empty_end_tag_is_flagged_and_swallowed() {
    assert_eq!(lines(b"</>"), ["ERROR code=missing-end-tag-name span=0..3"]);
}

#[test]
fn end_tag_with_non_letter_becomes_bogus_comment() {
    assert_eq!(
        lines(b"</ x>"),
        [
            "ERROR code=invalid-first-character-of-tag-name span=2..3",
            "COMMENT \"</ x>\"",
        ],
    );
}

#[test]
fn names_keep_source_casing() {
    let src = b"<DIV Class=Foo></dIv>";
    let tokens = tokenize(src);
    let names: Vec<&[u8]> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Tag(tag) => Some(tag.name.of(src)),
            _ => None,
        })
        .collect();
    assert_eq!(names, [b"DIV".as_slice(), b"dIv".as_slice()]);
}

#[test]
fn void_membership_is_case_insensitive_and_fixed() {
    let src = b"<BR><p><Input>";
    let tags: Vec<_> = tokenize(src)
        .into_iter()
        .filter_map(|token| match token {
            Token::Tag(tag) => Some(tag),
            _ => None,
        })
        .collect();
    assert!(tags[0].is_void(src));
    assert!(!tags[1].is_void(src));
    assert!(tags[2].is_void(src));
}

#[test]
fn tag_kinds_fuse_attribute_presence_and_self_closing() {
    assert_eq!(lines(b"<br/>"), ["TAG name=br kind=start_self"]);
    assert_eq!(
        lines(b"<img src=\"a.png\"/>"),
        ["TAG name=img kind=start_attrs_self"],
    );
    assert_eq!(lines(b"<p class=foo bar>"), ["TAG name=p kind=start_attrs"]);
}

#[test]
fn tag_span_covers_the_whole_tag() {
    let src = b"x<img src=\"a.png\"/>y";
    let tag = tokenize(src)
        .into_iter()
        .find_map(|token| match token {
            Token::Tag(tag) => Some(tag),
            _ => None,
        })
        .expect("expected an img tag");
    assert_eq!(tag.span.of(src), b"<img src=\"a.png\"/>");
}

#[test]
fn attribute_mode_emits_name_then_one_token_per_attribute() {
    assert_eq!(
        attr_lines(b"<p class=\"a\" id=b disabled>x</p>"),
        [
            "TAG-NAME name=p",
            "ATTR name=class value=\"a\" quote=double",
            "ATTR name=id value=\"b\" quote=none",
            "ATTR name=disabled",
            "TEXT \"x\"",
            "TAG-NAME name=p",
        ],
        "terminal tags are suppressed in attribute mode"
    );
}

#[test]
fn single_quoted_values_keep_their_quote_discipline() {
    assert_eq!(
        attr_lines(b"<a href='x\"y'>"),
        [
            "TAG-NAME name=a",
            "ATTR name=href value=\"x\\\"y\" quote=single",
        ],
        "a mismatched quote inside a quoted value is a literal byte"
    );
}

#[test]
fn missing_attribute_value_is_flagged_with_empty_value() {
    assert_eq!(
        lines(b"<p a=>"),
        [
            "ERROR code=missing-attribute-value span=5..6",
            "TAG name=p kind=start_attrs",
        ],
    );
    assert_eq!(
        attr_lines(b"<p a=>"),
        [
            "TAG-NAME name=p",
            "ERROR code=missing-attribute-value span=5..6",
            "ATTR name=a value=\"\" quote=none",
        ],
    );
}

#[test]
fn stray_quote_in_unquoted_value_is_flagged_and_kept() {
    let src = b"<p a=b\"c>";
    assert_eq!(
        attr_lines(src),
        [
            "TAG-NAME name=p",
            "ERROR code=unexpected-character-in-unquoted-attribute-value span=6..7",
            "ATTR name=a value=\"b\\\"c\" quote=none",
        ],
    );
}

#[test]
fn missing_whitespace_between_attributes_reconsumes() {
    assert_eq!(
        attr_lines(b"<p a=\"b\"c=d>"),
        [
            "TAG-NAME name=p",
            "ATTR name=a value=\"b\" quote=double",
            "ERROR code=missing-whitespace-between-attributes span=8..9",
            "ATTR name=c value=\"d\" quote=none",
        ],
    );
}

#[test]
fn stray_solidus_in_tag_is_flagged_and_skipped() {
    assert_eq!(
        lines(b"<p / x>"),
        [
            "ERROR code=unexpected-solidus-in-tag span=4..5",
            "TAG name=p kind=start_attrs",
        ],
    );
}

#[test]
fn leading_equals_starts_an_attribute_name() {
    assert_eq!(
        attr_lines(b"<p =a>"),
        [
            "TAG-NAME name=p",
            "ERROR code=unexpected-equals-sign-before-attribute-name span=3..4",
            "ATTR name==a",
        ],
    );
}

#[test]
fn eof_inside_a_tag_salvages_the_partial_tag() {
    assert_eq!(
        lines(b"<p class"),
        [
            "ERROR code=eof-in-tag span=8..8",
            "TAG name=p kind=start_attrs",
        ],
    );
    assert_eq!(
        attr_lines(b"<p class"),
        [
            "TAG-NAME name=p",
            "ERROR code=eof-in-tag span=8..8",
            "ATTR name=class",
        ],
    );
}

#[test]
fn eof_inside_a_quoted_value_has_its_own_code() {
    assert_eq!(
        lines(b"<p a=\"b"),
        [
            "ERROR code=eof-in-attribute-value span=7..7",
            "TAG name=p kind=start_attrs",
        ],
    );
}

#[test]
fn comment_span_covers_delimiters() {
    assert_eq!(lines(b"<!-- x -->"), ["COMMENT \"<!-- x -->\""]);
}

#[test]
fn empty_comment_close_is_abrupt() {
    assert_eq!(
        lines(b"<!-->"),
        [
            "ERROR code=abrupt-closing-of-empty-comment span=0..5",
            "COMMENT \"<!-->\"",
        ],
    );
    assert_eq!(
        lines(b"<!--->"),
        [
            "ERROR code=abrupt-closing-of-empty-comment span=0..6",
            "COMMENT \"<!--->\"",
        ],
    );
}

#[test]
fn bang_close_is_flagged_but_closes() {
    assert_eq!(
        lines(b"<!--a--!>"),
        [
            "ERROR code=incorrectly-closed-comment span=5..9",
            "COMMENT \"<!--a--!>\"",
        ],
    );
}

#[test]
fn comment_open_inside_comment_is_nested() {
    let src = b"<!--a<!--b-->";
    assert_eq!(
        lines(src),
        [
            "ERROR code=nested-comment span=9..10",
            "COMMENT \"<!--a<!--b-->\"",
        ],
    );
}

#[test]
fn dashes_and_angle_brackets_inside_comments_are_data() {
    assert_eq!(lines(b"<!-- a - b < c -- >-->"), ["COMMENT \"<!-- a - b < c -- >-->\""]);
}

#[test]
fn eof_in_comment_salvages_the_partial_comment() {
    assert_eq!(
        lines(b"<!--abc"),
        [
            "ERROR code=eof-in-comment span=7..7",
            "COMMENT \"<!--abc\"",
        ],
    );
}

#[test]
fn bare_markup_declaration_becomes_an_empty_bogus_comment() {
    assert_eq!(
        lines(b"<!"),
        [
            "ERROR code=incorrectly-opened-comment span=0..2",
            "COMMENT \"<!\"",
        ],
    );
}

#[test]
fn cdata_is_surfaced_as_a_comment() {
    assert_eq!(lines(b"<![CDATA[x]]y]]>"), ["COMMENT \"<![CDATA[x]]y]]>\""]);
}

#[test]
fn unterminated_cdata_is_flagged() {
    assert_eq!(
        lines(b"<![CDATA[x]]"),
        ["ERROR code=eof-in-cdata span=12..12", "COMMENT \"<![CDATA[x]]\""],
    );
}

#[test]
fn doctype_html_has_no_quirks() {
    assert_eq!(
        lines(b"<!DOCTYPE html>"),
        ["DOCTYPE name=html extra=\"\" force_quirks=false"],
    );
}

#[test]
fn doctype_extra_covers_both_identifiers() {
    assert_eq!(
        lines(b"<!DOCTYPE html PUBLIC \"a\" 'b'>"),
        ["DOCTYPE name=html extra=\"\\\"a\\\" 'b'\" force_quirks=false"],
    );
}

#[test]
fn doctype_without_name_forces_quirks() {
    assert_eq!(
        lines(b"<!DOCTYPE>"),
        [
            "ERROR code=missing-doctype-name span=0..10",
            "DOCTYPE name=null extra=\"\" force_quirks=true",
        ],
    );
}

#[test]
fn junk_after_doctype_name_forces_quirks() {
    assert_eq!(
        lines(b"<!doctype html syste>"),
        [
            "ERROR code=invalid-character-sequence-after-doctype-name span=15..16",
            "DOCTYPE name=html extra=\"\" force_quirks=true",
        ],
    );
}

#[test]
fn apostrophe_after_system_keyword_reads_a_system_identifier() {
    assert_eq!(
        lines(b"<!DOCTYPE html SYSTEM'x'>"),
        [
            "ERROR code=missing-whitespace-after-doctype-system-keyword span=21..22",
            "DOCTYPE name=html extra=\"'x'\" force_quirks=false",
        ],
    );
}

#[test]
fn abrupt_public_identifier_forces_quirks() {
    assert_eq!(
        lines(b"<!DOCTYPE html PUBLIC \"a>"),
        [
            "ERROR code=abrupt-doctype-public-identifier span=24..25",
            "DOCTYPE name=html extra=\"\\\"a\" force_quirks=true",
        ],
    );
}

#[test]
fn eof_in_doctype_salvages_with_quirks() {
    assert_eq!(
        lines(b"<!DOCTYPE ht"),
        [
            "ERROR code=eof-in-doctype span=12..12",
            "DOCTYPE name=ht extra=\"\" force_quirks=true",
        ],
    );
}

#[test]
fn rcdata_runs_until_the_appropriate_end_tag() {
    let src = b"<title> a<b </title>";
    let mut tokenizer = Tokenizer::new();
    let start = tokenizer.next(src).expect("start tag");
    assert!(matches!(start, Token::Tag(tag) if tag.kind == TagKind::Start));
    tokenizer.enter_rcdata(b"title");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"a<b\"", "TAG name=title kind=end"]);
}

#[test]
fn rcdata_near_matches_stay_literal_text() {
    let src = b"<title>x</titl></title>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_rcdata(b"title");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"x</titl>\"", "TAG name=title kind=end"]);
}

#[test]
fn end_tag_match_is_case_insensitive() {
    let src = b"<style>p{}</STYLE>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_rawtext(b"style");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"p{}\"", "TAG name=STYLE kind=end"]);
}

#[test]
fn empty_last_start_tag_name_is_never_appropriate() {
    let src = b"<style>x</style>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_rawtext(b"");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"x</style>\""]);
}

#[test]
fn rawtext_end_tag_with_trailing_solidus_is_flagged_and_closes() {
    let src = b"<style>x</style/>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_rawtext(b"style");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(
        rest,
        [
            "TEXT \"x\"",
            "ERROR code=end-tag-with-trailing-solidus span=15..16",
            "TAG name=style kind=end",
        ],
    );
}

#[test]
fn rawtext_end_tag_with_whitespace_before_close_still_matches() {
    let src = b"<style>p{}</style \t>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_rawtext(b"style");
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"p{}\"", "TAG name=style kind=end"]);
}

#[test]
fn script_data_ends_at_the_first_matching_close_tag() {
    let src = b"<script>let x = \"</script>\";</script>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_script_data();
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(
        rest,
        [
            "TEXT \"let x = \\\"\"",
            "TAG name=script kind=end",
            "TEXT \"\\\";\"",
            "TAG name=script kind=end",
        ],
        "the first case-insensitive close tag wins regardless of JS context"
    );
}

#[test]
fn script_double_escape_hides_the_inner_close_tag() {
    let src = b"<script><!--<script>x</script>--></script>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_script_data();
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(
        rest,
        [
            "TEXT \"<!--<script>x</script>-->\"",
            "TAG name=script kind=end",
        ],
        "the close tag inside the double escape must not end the mode"
    );
}

#[test]
fn script_escaped_end_tag_terminates_the_mode() {
    let src = b"<script><!--</script>";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_script_data();
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(rest, ["TEXT \"<!--\"", "TAG name=script kind=end"]);
}

#[test]
fn eof_in_escaped_script_is_flagged_with_salvaged_text() {
    let src = b"<script><!--x";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_script_data();
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(
        rest,
        [
            "ERROR code=eof-in-script-html-comment-like-text span=13..13",
            "TEXT \"<!--x\"",
        ],
    );
}

#[test]
fn plaintext_swallows_the_rest_of_the_input() {
    let src = b"<plaintext>a<b>c";
    let mut tokenizer = Tokenizer::new();
    let _ = tokenizer.next(src);
    tokenizer.enter_plaintext();
    let rest = format_tokens(src, &collect(&mut tokenizer, src));
    assert_eq!(
        rest,
        ["ERROR code=deprecated-and-unsupported span=11..16"],
    );
    assert_eq!(tokenizer.next(src), None, "plaintext never resumes");
}

#[test]
fn stats_track_emission_counts() {
    let src = b"<p>hi</p>";
    let mut tokenizer = Tokenizer::new();
    let tokens = collect(&mut tokenizer, src);
    let stats = tokenizer.stats();
    assert_eq!(stats.tokens_emitted, tokens.len() as u64);
    assert_eq!(stats.bytes_consumed, src.len() as u64);
    assert!(stats.steps >= tokens.len() as u64);
    assert_eq!(stats.errors_emitted, 0);
}
