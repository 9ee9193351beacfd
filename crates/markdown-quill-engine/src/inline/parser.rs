//! The inline tokenizer and structure parser.
//!
//! One pass walks a leaf block's raw text left to right, resolving escapes,
//! code spans, autolinks, raw markup, links, images, and line breaks as it
//! goes, while delimiter runs are left in place for the emphasis pass.
//! Anything that fails to parse falls back to literal text.

use crate::inline::cursor::Cursor;
use crate::inline::emphasis::{self, DelimiterRun};
use crate::inline::kinds::{Autolink, BareUrl, CodeSpan, RawHtmlTag};
use crate::inline::types::InlineNode;
use crate::options::Options;
use crate::refs::RefMap;

/// How deep bracket constructs may nest before their content is flattened
/// to plain text.
pub const MAX_BRACKET_DEPTH: usize = 32;

pub struct InlineParser<'a> {
    refs: &'a RefMap,
    options: &'a Options,
}

impl<'a> InlineParser<'a> {
    pub fn new(refs: &'a RefMap, options: &'a Options) -> Self {
        Self { refs, options }
    }

    pub fn parse(&self, text: &str) -> Vec<InlineNode> {
        self.parse_at(text.trim_end(), 0)
    }

    fn parse_at(&self, text: &str, depth: usize) -> Vec<InlineNode> {
        let mut nodes: Vec<InlineNode> = vec![];
        let mut delims: Vec<DelimiterRun> = vec![];
        let mut plain = String::new();
        let mut cursor = Cursor::new(text);

        while let Some(ch) = cursor.peek() {
            match ch {
                '\\' => self.escape(&mut cursor, &mut plain, &mut nodes),
                '`' => {
                    if let Some((content, len)) = CodeSpan::parse(cursor.rest()) {
                        flush(&mut plain, &mut nodes);
                        nodes.push(InlineNode::CodeSpan(content));
                        cursor.seek(cursor.pos() + len);
                    } else {
                        let start = cursor.pos();
                        cursor.eat_while(|c| c == CodeSpan::TICK);
                        plain.push_str(cursor.slice(start, cursor.pos()));
                    }
                }
                Autolink::OPEN => self.angle(&mut cursor, &mut plain, &mut nodes),
                '*' | '_' | '~' => {
                    self.delimiter_run(&mut cursor, &mut plain, &mut nodes, &mut delims)
                }
                '[' => {
                    match self.bracket(cursor.rest(), depth, false) {
                        Some((node, len)) => {
                            flush(&mut plain, &mut nodes);
                            nodes.push(node);
                            cursor.seek(cursor.pos() + len);
                        }
                        None => {
                            plain.push('[');
                            cursor.bump();
                        }
                    }
                }
                '!' if cursor.rest().starts_with("![") => {
                    match self.bracket(&cursor.rest()[1..], depth, true) {
                        Some((node, len)) => {
                            flush(&mut plain, &mut nodes);
                            nodes.push(node);
                            cursor.seek(cursor.pos() + 1 + len);
                        }
                        None => {
                            plain.push('!');
                            cursor.bump();
                        }
                    }
                }
                '\n' => {
                    let trailing = plain.chars().rev().take_while(|c| *c == ' ').count();
                    let hard = trailing >= 2 || self.options.hardbreaks;
                    plain.truncate(plain.trim_end_matches(' ').len());
                    flush(&mut plain, &mut nodes);
                    nodes.push(InlineNode::LineBreak { hard });
                    cursor.bump();
                    cursor.eat_while(|c| c == ' ');
                }
                'h' | 'w' if self.at_bare_url(&cursor) => {
                    if let Some((target, len)) = BareUrl::parse(cursor.rest()) {
                        flush(&mut plain, &mut nodes);
                        nodes.push(InlineNode::Autolink {
                            target: target.to_string(),
                            email: false,
                        });
                        cursor.seek(cursor.pos() + len);
                    } else {
                        plain.push(ch);
                        cursor.bump();
                    }
                }
                _ => {
                    plain.push(ch);
                    cursor.bump();
                }
            }
        }
        flush(&mut plain, &mut nodes);
        emphasis::process(&mut nodes, &mut delims);
        finalize(nodes)
    }

    /// Backslash escapes: punctuation becomes literal, end-of-line becomes a
    /// hard break, anything else keeps the backslash.
    fn escape(&self, cursor: &mut Cursor<'_>, plain: &mut String, nodes: &mut Vec<InlineNode>) {
        cursor.bump();
        match cursor.peek() {
            Some('\n') => {
                plain.truncate(plain.trim_end_matches(' ').len());
                flush(plain, nodes);
                nodes.push(InlineNode::LineBreak { hard: true });
                cursor.bump();
                cursor.eat_while(|c| c == ' ');
            }
            Some(c) if c.is_ascii_punctuation() => {
                plain.push(c);
                cursor.bump();
            }
            _ => plain.push('\\'),
        }
    }

    /// `<...>` is an autolink, a raw tag, or just a less-than sign.
    fn angle(&self, cursor: &mut Cursor<'_>, plain: &mut String, nodes: &mut Vec<InlineNode>) {
        let rest = cursor.rest();
        if let Some(gt) = rest.find(Autolink::CLOSE) {
            let inner = &rest[1..gt];
            let email = Autolink::is_email(inner);
            if email || Autolink::is_uri(inner) {
                flush(plain, nodes);
                nodes.push(InlineNode::Autolink {
                    target: inner.to_string(),
                    email,
                });
                cursor.seek(cursor.pos() + gt + 1);
                return;
            }
        }
        if let Some(len) = RawHtmlTag::parse(rest) {
            flush(plain, nodes);
            nodes.push(InlineNode::RawHtml(rest[..len].to_string()));
            cursor.seek(cursor.pos() + len);
            return;
        }
        plain.push(Autolink::OPEN);
        cursor.bump();
    }

    fn delimiter_run(
        &self,
        cursor: &mut Cursor<'_>,
        plain: &mut String,
        nodes: &mut Vec<InlineNode>,
        delims: &mut Vec<DelimiterRun>,
    ) {
        let before = cursor.prev();
        let start = cursor.pos();
        let ch = match cursor.peek() {
            Some(c) => c,
            None => return,
        };
        let count = cursor.eat_while(|c| c == ch);
        let after = cursor.peek();
        let run = cursor.slice(start, cursor.pos());

        // Strikethrough only exists as a doubled run with the extension on.
        let eligible = match ch {
            '~' => self.options.extensions.strikethrough && count == 2,
            _ => true,
        };
        let (can_open, can_close) = emphasis::flanking(ch, before, after);
        if eligible && (can_open || can_close) {
            flush(plain, nodes);
            nodes.push(InlineNode::Text(run.to_string()));
            delims.push(DelimiterRun {
                ch,
                count,
                pos: nodes.len() - 1,
                can_open,
                can_close,
            });
        } else {
            plain.push_str(run);
        }
    }

    fn at_bare_url(&self, cursor: &Cursor<'_>) -> bool {
        if !self.options.extensions.autolink {
            return false;
        }
        cursor
            .prev()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '*' | '_' | '~'))
    }

    /// A `[...]` construct at the start of `text`: inline link, reference
    /// link, or (with `image`) the same forms for images.
    fn bracket(&self, text: &str, depth: usize, image: bool) -> Option<(InlineNode, usize)> {
        let close = matching_bracket(text)?;
        let label = &text[1..close];
        let after = close + 1;

        let (dest, title, end) = if text[after..].starts_with('(') {
            let (dest, title, used) = inline_suffix(&text[after..])?;
            (dest, title, after + used)
        } else if text[after..].starts_with('[') {
            let ref_close = text[after..].find(']')?;
            let ref_label = &text[after + 1..after + ref_close];
            let key = if ref_label.trim().is_empty() {
                label
            } else {
                ref_label
            };
            let link = self.refs.lookup(key)?;
            (link.dest.clone(), link.title.clone(), after + ref_close + 1)
        } else {
            let link = self.refs.lookup(label)?;
            (link.dest.clone(), link.title.clone(), after)
        };

        let children = if depth + 1 > MAX_BRACKET_DEPTH {
            vec![InlineNode::Text(label.to_string())]
        } else {
            self.parse_at(label, depth + 1)
        };
        let node = if image {
            InlineNode::Image {
                dest,
                title,
                alt: InlineNode::plain_text(&children),
            }
        } else {
            InlineNode::Link {
                dest,
                title,
                children,
            }
        };
        Some((node, end))
    }
}

fn flush(plain: &mut String, nodes: &mut Vec<InlineNode>) {
    if !plain.is_empty() {
        nodes.push(InlineNode::Text(std::mem::take(plain)));
    }
}

/// Finds the `]` matching the `[` at byte 0, skipping escapes and code spans.
fn matching_bracket(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut nesting = 0usize;
    let mut i = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => match CodeSpan::parse(&text[i..]) {
                Some((_, len)) => i += len,
                None => i += 1,
            },
            b'[' => {
                nesting += 1;
                i += 1;
            }
            b']' => {
                if nesting == 0 {
                    return Some(i);
                }
                nesting -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Parses `(dest "title")` at the start of `text`, returning the unescaped
/// destination, the optional title, and bytes consumed.
fn inline_suffix(text: &str) -> Option<(String, Option<String>, usize)> {
    let bytes = text.as_bytes();
    let mut i = 1usize;
    i = skip_link_whitespace(bytes, i);

    let dest = if bytes.get(i) == Some(&b'<') {
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && bytes[j] != b'>' && bytes[j] != b'\n' {
            j += 1;
        }
        if bytes.get(j) != Some(&b'>') {
            return None;
        }
        i = j + 1;
        unescape(&text[start..j])
    } else {
        let start = i;
        let mut parens = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                // A backslash at the very end escapes nothing.
                b'\\' if i + 1 < bytes.len() => i += 1,
                b'(' => parens += 1,
                b')' if parens == 0 => break,
                b')' => parens -= 1,
                c if c.is_ascii_whitespace() => break,
                _ => {}
            }
            i += 1;
        }
        unescape(&text[start..i])
    };

    i = skip_link_whitespace(bytes, i);
    let title = match bytes.get(i) {
        Some(&open @ (b'"' | b'\'' | b'(')) => {
            let close = if open == b'(' { b')' } else { open };
            let start = i + 1;
            let mut j = start;
            while j < bytes.len() && bytes[j] != close {
                if bytes[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            if j >= bytes.len() {
                return None;
            }
            i = skip_link_whitespace(bytes, j + 1);
            Some(unescape(&text[start..j]))
        }
        _ => None,
    };

    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some((dest, title, i + 1))
}

fn skip_link_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\n') {
        i += 1;
    }
    i
}

/// Drops the backslash from escaped punctuation.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(c) if c.is_ascii_punctuation() => out.push(c),
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Drops empty text nodes and merges adjacent ones, recursing through
/// containers. Nesting is capped upstream, so the recursion is bounded.
fn finalize(nodes: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            InlineNode::Emphasis { strong, children } => InlineNode::Emphasis {
                strong,
                children: finalize(children),
            },
            InlineNode::Strikethrough { children } => InlineNode::Strikethrough {
                children: finalize(children),
            },
            InlineNode::Link {
                dest,
                title,
                children,
            } => InlineNode::Link {
                dest,
                title,
                children: finalize(children),
            },
            other => other,
        };
        match node {
            InlineNode::Text(t) if t.is_empty() => {}
            InlineNode::Text(t) => {
                if let Some(InlineNode::Text(prev)) = out.last_mut() {
                    prev.push_str(&t);
                } else {
                    out.push(InlineNode::Text(t));
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<InlineNode> {
        let refs = RefMap::default();
        let options = Options::default();
        InlineParser::new(&refs, &options).parse(text)
    }

    fn parse_with(text: &str, refs: &RefMap, options: &Options) -> Vec<InlineNode> {
        InlineParser::new(refs, options).parse(text)
    }

    fn text(s: &str) -> InlineNode {
        InlineNode::Text(s.to_string())
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(parse("just words"), vec![text("just words")]);
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(
            parse("a *b* c"),
            vec![
                text("a "),
                InlineNode::Emphasis {
                    strong: false,
                    children: vec![text("b")]
                },
                text(" c"),
            ]
        );
        assert_eq!(
            parse("**b**"),
            vec![InlineNode::Emphasis {
                strong: true,
                children: vec![text("b")]
            }]
        );
    }

    #[test]
    fn unmatched_star_stays_literal() {
        assert_eq!(parse("2 * 3 = 6"), vec![text("2 * 3 = 6")]);
        assert_eq!(parse("*open only"), vec![text("*open only")]);
    }

    #[test]
    fn intraword_underscore_is_literal() {
        assert_eq!(parse("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn escaped_star_is_literal() {
        assert_eq!(parse(r"\*not em\*"), vec![text("*not em*")]);
    }

    #[test]
    fn code_span_shields_contents() {
        assert_eq!(
            parse("a `*raw*` b"),
            vec![
                text("a "),
                InlineNode::CodeSpan("*raw*".to_string()),
                text(" b"),
            ]
        );
    }

    #[test]
    fn unclosed_backtick_is_literal() {
        assert_eq!(parse("a `b"), vec![text("a `b")]);
    }

    #[test]
    fn inline_link() {
        assert_eq!(
            parse("[text](/url \"title\")"),
            vec![InlineNode::Link {
                dest: "/url".to_string(),
                title: Some("title".to_string()),
                children: vec![text("text")],
            }]
        );
    }

    #[test]
    fn link_with_emphasis_inside() {
        assert_eq!(
            parse("[*em*](/u)"),
            vec![InlineNode::Link {
                dest: "/u".to_string(),
                title: None,
                children: vec![InlineNode::Emphasis {
                    strong: false,
                    children: vec![text("em")]
                }],
            }]
        );
    }

    #[test]
    fn broken_link_is_literal() {
        assert_eq!(parse("[text](no close"), vec![text("[text](no close")]);
        assert_eq!(parse("[text] (sep)"), vec![text("[text] (sep)")]);
    }

    #[test]
    fn trailing_backslash_destination_is_literal() {
        assert_eq!(parse(r"[x](\"), vec![text(r"[x](\")]);
        assert_eq!(parse(r"![x](\"), vec![text(r"![x](\")]);
    }

    #[test]
    fn reference_and_collapsed_links() {
        let mut refs = RefMap::default();
        refs.insert("label", "/dest".to_string(), Some("t".to_string()));
        let options = Options::default();
        assert_eq!(
            parse_with("[x][label]", &refs, &options),
            vec![InlineNode::Link {
                dest: "/dest".to_string(),
                title: Some("t".to_string()),
                children: vec![text("x")],
            }]
        );
        assert_eq!(
            parse_with("[label][]", &refs, &options),
            vec![InlineNode::Link {
                dest: "/dest".to_string(),
                title: Some("t".to_string()),
                children: vec![text("label")],
            }]
        );
        assert_eq!(
            parse_with("[label]", &refs, &options),
            vec![InlineNode::Link {
                dest: "/dest".to_string(),
                title: Some("t".to_string()),
                children: vec![text("label")],
            }]
        );
    }

    #[test]
    fn unknown_reference_is_literal() {
        assert_eq!(parse("[nope][missing]"), vec![text("[nope][missing]")]);
    }

    #[test]
    fn image_flattens_alt_text() {
        assert_eq!(
            parse("![the *alt*](/img.png)"),
            vec![InlineNode::Image {
                dest: "/img.png".to_string(),
                title: None,
                alt: "the alt".to_string(),
            }]
        );
    }

    #[test]
    fn angle_autolink_uri_and_email() {
        assert_eq!(
            parse("<https://example.com>"),
            vec![InlineNode::Autolink {
                target: "https://example.com".to_string(),
                email: false,
            }]
        );
        assert_eq!(
            parse("<a@b.com>"),
            vec![InlineNode::Autolink {
                target: "a@b.com".to_string(),
                email: true,
            }]
        );
    }

    #[test]
    fn raw_inline_tag() {
        assert_eq!(
            parse("a <em>b</em>"),
            vec![
                text("a "),
                InlineNode::RawHtml("<em>".to_string()),
                text("b"),
                InlineNode::RawHtml("</em>".to_string()),
            ]
        );
    }

    #[test]
    fn stray_angle_is_literal() {
        assert_eq!(parse("1 < 2"), vec![text("1 < 2")]);
    }

    #[test]
    fn soft_and_hard_breaks() {
        assert_eq!(
            parse("a\nb"),
            vec![text("a"), InlineNode::LineBreak { hard: false }, text("b")]
        );
        assert_eq!(
            parse("a  \nb"),
            vec![text("a"), InlineNode::LineBreak { hard: true }, text("b")]
        );
        assert_eq!(
            parse("a\\\nb"),
            vec![text("a"), InlineNode::LineBreak { hard: true }, text("b")]
        );
    }

    #[test]
    fn hardbreaks_option_promotes_newlines() {
        let refs = RefMap::default();
        let mut options = Options::default();
        options.hardbreaks = true;
        assert_eq!(
            parse_with("a\nb", &refs, &options),
            vec![text("a"), InlineNode::LineBreak { hard: true }, text("b")]
        );
    }

    #[test]
    fn strikethrough_requires_extension() {
        assert_eq!(parse("~~x~~"), vec![text("~~x~~")]);

        let refs = RefMap::default();
        let mut options = Options::default();
        options.extensions.strikethrough = true;
        assert_eq!(
            parse_with("~~x~~", &refs, &options),
            vec![InlineNode::Strikethrough {
                children: vec![text("x")]
            }]
        );
    }

    #[test]
    fn bare_url_requires_extension() {
        assert_eq!(
            parse("see https://example.com here"),
            vec![text("see https://example.com here")]
        );

        let refs = RefMap::default();
        let mut options = Options::default();
        options.extensions.autolink = true;
        assert_eq!(
            parse_with("see https://example.com here", &refs, &options),
            vec![
                text("see "),
                InlineNode::Autolink {
                    target: "https://example.com".to_string(),
                    email: false,
                },
                text(" here"),
            ]
        );
    }

    #[test]
    fn bare_url_mid_word_is_not_a_link() {
        let refs = RefMap::default();
        let mut options = Options::default();
        options.extensions.autolink = true;
        assert_eq!(
            parse_with("xhttps://example.com", &refs, &options),
            vec![text("xhttps://example.com")]
        );
    }

    #[test]
    fn deep_bracket_nesting_flattens() {
        let mut input = String::new();
        for _ in 0..(MAX_BRACKET_DEPTH + 4) {
            input.push_str("![a");
        }
        // Malformed nesting parses as literal text rather than recursing.
        let nodes = parse(&input);
        assert!(!nodes.is_empty());
    }
}
