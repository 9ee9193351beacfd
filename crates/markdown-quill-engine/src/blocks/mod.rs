//! Block-structure recognition.
//!
//! Consumes scanned lines and produces the document's block tree, with inline
//! content left unresolved and link-reference definitions collected on the
//! way through.

pub mod builder;
pub mod kinds;

pub use builder::{CODE_INDENT, MAX_CONTAINER_DEPTH, TreeBuilder};

use crate::doc::Document;
use crate::options::Options;
use crate::scanner::Scanner;

/// Parses all lines of `scanner` into a block tree.
pub fn parse_blocks(scanner: &Scanner<'_>, options: &Options) -> Document {
    let mut builder = TreeBuilder::new(options);
    for line in scanner.lines() {
        builder.push(&line);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Alignment, BlockId, BlockKind, ListKind};
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Document {
        parse_with(input, &Options::default())
    }

    fn parse_with(input: &str, options: &Options) -> Document {
        let scanner = Scanner::new(input.as_bytes()).unwrap();
        parse_blocks(&scanner, options)
    }

    fn top(doc: &Document) -> Vec<BlockId> {
        doc.get(Document::ROOT).children.clone()
    }

    #[test]
    fn heading_line() {
        let doc = parse("# Hello");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Heading { level: 1 });
        assert_eq!(doc.get(ids[0]).raw, "Hello");
    }

    #[test]
    fn paragraph_lines_merge() {
        let doc = parse("one\ntwo\n\nthree");
        let ids = top(&doc);
        assert_eq!(ids.len(), 2);
        assert_eq!(doc.get(ids[0]).raw, "one\ntwo");
        assert_eq!(doc.get(ids[1]).raw, "three");
    }

    #[test]
    fn block_quote_wraps_paragraph() {
        let doc = parse("> quoted\n> text");
        let ids = top(&doc);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::BlockQuote);
        let inner = &doc.get(ids[0]).children;
        assert_eq!(inner.len(), 1);
        assert_eq!(doc.get(inner[0]).raw, "quoted\ntext");
    }

    #[test]
    fn lazy_continuation_joins_quoted_paragraph() {
        let doc = parse("> quoted\nlazy line");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        let inner = &doc.get(ids[0]).children;
        assert_eq!(doc.get(inner[0]).raw, "quoted\nlazy line");
    }

    #[test]
    fn nested_quotes() {
        let doc = parse("> > deep");
        let outer = top(&doc)[0];
        let mid = doc.get(outer).children[0];
        assert_eq!(doc.get(mid).kind, BlockKind::BlockQuote);
        let para = doc.get(mid).children[0];
        assert_eq!(doc.get(para).raw, "deep");
    }

    #[test]
    fn fenced_code_keeps_raw_lines() {
        let doc = parse("```rust\nlet x = 1;\n\nfn f() {}\n```\nafter");
        let ids = top(&doc);
        assert_eq!(
            doc.get(ids[0]).kind,
            BlockKind::CodeBlock {
                fenced: true,
                info: Some("rust".to_string())
            }
        );
        assert_eq!(doc.get(ids[0]).raw, "let x = 1;\n\nfn f() {}");
        assert_eq!(doc.get(ids[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn unterminated_fence_runs_to_eof() {
        let doc = parse("```\ncode");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).raw, "code");
    }

    #[test]
    fn indented_code_block() {
        let doc = parse("    let a = 1;\n    let b = 2;");
        let ids = top(&doc);
        assert_eq!(
            doc.get(ids[0]).kind,
            BlockKind::CodeBlock {
                fenced: false,
                info: None
            }
        );
        assert_eq!(doc.get(ids[0]).raw, "let a = 1;\nlet b = 2;");
    }

    #[test]
    fn indented_line_continues_paragraph() {
        let doc = parse("text\n    more");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).raw, "text\nmore");
    }

    #[test]
    fn thematic_break_between_paragraphs() {
        let doc = parse("a\n\n---\n\nb");
        let ids = top(&doc);
        assert_eq!(ids.len(), 3);
        assert_eq!(doc.get(ids[1]).kind, BlockKind::ThematicBreak);
    }

    #[test]
    fn setext_heading_from_paragraph() {
        let doc = parse("Title\n=====\nbody");
        let ids = top(&doc);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Heading { level: 1 });
        assert_eq!(doc.get(ids[0]).raw, "Title");
        assert_eq!(doc.get(ids[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn dash_underline_is_level_two() {
        let doc = parse("Title\n---");
        let ids = top(&doc);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Heading { level: 2 });
    }

    #[test]
    fn tight_list_items() {
        let doc = parse("- a\n- b");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        match &doc.get(ids[0]).kind {
            BlockKind::List { kind, tight } => {
                assert_eq!(*kind, ListKind::Bullet { marker: '-' });
                assert!(tight);
            }
            other => panic!("expected list, got {other:?}"),
        }
        assert_eq!(doc.get(ids[0]).children.len(), 2);
    }

    #[test]
    fn blank_between_items_makes_list_loose() {
        let doc = parse("- a\n\n- b");
        let ids = top(&doc);
        match &doc.get(ids[0]).kind {
            BlockKind::List { tight, .. } => assert!(!tight),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn trailing_blank_keeps_list_tight() {
        let doc = parse("- a\n- b\n\npara");
        let ids = top(&doc);
        match &doc.get(ids[0]).kind {
            BlockKind::List { tight, .. } => assert!(tight),
            other => panic!("expected list, got {other:?}"),
        }
        assert_eq!(doc.get(ids[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn ordered_list_keeps_start() {
        let doc = parse("3. a\n4. b");
        let ids = top(&doc);
        match &doc.get(ids[0]).kind {
            BlockKind::List { kind, .. } => {
                assert_eq!(*kind, ListKind::Ordered { start: 3, delim: '.' });
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn ordered_marker_not_starting_at_one_does_not_interrupt() {
        let doc = parse("para\n2. x");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).raw, "para\n2. x");
    }

    #[test]
    fn task_checkbox_is_consumed_from_item_content() {
        let mut options = Options::default();
        options.extensions.tasklist = true;
        let doc = parse_with("- [x] done\n- [ ] todo", &options);
        let list = top(&doc)[0];
        let items = &doc.get(list).children;
        assert_eq!(doc.get(items[0]).kind, BlockKind::ListItem { task: Some(true) });
        assert_eq!(doc.get(items[1]).kind, BlockKind::ListItem { task: Some(false) });
        let para = doc.get(items[0]).children[0];
        assert_eq!(doc.get(para).raw, "done");
    }

    #[test]
    fn checkbox_without_extension_stays_in_content() {
        let doc = parse("- [x] done");
        let list = top(&doc)[0];
        let item = doc.get(list).children[0];
        assert_eq!(doc.get(item).kind, BlockKind::ListItem { task: None });
        let para = doc.get(item).children[0];
        assert_eq!(doc.get(para).raw, "[x] done");
    }

    #[test]
    fn changed_bullet_starts_new_list() {
        let doc = parse("- a\n* b");
        let ids = top(&doc);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn nested_list_in_item() {
        let doc = parse("- a\n  - b");
        let ids = top(&doc);
        let item = doc.get(ids[0]).children[0];
        let kinds: Vec<_> = doc
            .get(item)
            .children
            .iter()
            .map(|c| doc.get(*c).kind.clone())
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], BlockKind::Paragraph));
        assert!(matches!(kinds[1], BlockKind::List { .. }));
    }

    #[test]
    fn unindented_text_after_item_is_lazy() {
        let doc = parse("- item\ncontinuation");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        let item = doc.get(ids[0]).children[0];
        let para = doc.get(item).children[0];
        assert_eq!(doc.get(para).raw, "item\ncontinuation");
    }

    #[test]
    fn link_definition_is_stripped_into_refs() {
        let doc = parse("[label]: /url \"t\"\n\npara");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Paragraph);
        assert_eq!(doc.refs.lookup("label").unwrap().dest, "/url");
    }

    #[test]
    fn html_block_runs_to_blank_line() {
        let doc = parse("<div>\n<span>x</span>\n</div>\n\npara");
        let ids = top(&doc);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::HtmlBlock);
        assert_eq!(doc.get(ids[0]).raw, "<div>\n<span>x</span>\n</div>");
        assert_eq!(doc.get(ids[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn table_requires_extension() {
        let doc = parse("| a | b |\n| - | - |\n| 1 | 2 |");
        let ids = top(&doc);
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn table_parses_with_extension() {
        let mut options = Options::default();
        options.extensions.tables = true;
        let doc = parse_with("| a | b |\n| :- | -: |\n| 1 | 2 |", &options);
        let ids = top(&doc);
        match &doc.get(ids[0]).kind {
            BlockKind::Table { alignments } => {
                assert_eq!(*alignments, vec![Alignment::Left, Alignment::Right]);
            }
            other => panic!("expected table, got {other:?}"),
        }
        let rows = &doc.get(ids[0]).children;
        assert_eq!(rows.len(), 2);
        assert_eq!(doc.get(rows[0]).kind, BlockKind::TableRow { head: true });
        let cells = &doc.get(rows[1]).children;
        assert_eq!(doc.get(cells[0]).raw, "1");
        assert_eq!(doc.get(cells[1]).raw, "2");
    }

    #[test]
    fn short_row_is_padded_to_column_count() {
        let mut options = Options::default();
        options.extensions.tables = true;
        let doc = parse_with("| a | b |\n| - | - |\n| only |", &options);
        let ids = top(&doc);
        let rows = &doc.get(ids[0]).children;
        let cells = &doc.get(rows[1]).children;
        assert_eq!(cells.len(), 2);
        assert_eq!(doc.get(cells[1]).raw, "");
    }

    #[test]
    fn mismatched_delimiter_row_stays_paragraph() {
        let mut options = Options::default();
        options.extensions.tables = true;
        let doc = parse_with("| a | b |\n| - |", &options);
        let ids = top(&doc);
        assert_eq!(doc.get(ids[0]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn excessive_quote_nesting_degrades_to_text() {
        let input = format!("{} deep", "> ".repeat(MAX_CONTAINER_DEPTH + 8));
        let doc = parse(&input);
        // The document must stay within the cap and still contain the text.
        let mut depth = 0usize;
        let mut id = top(&doc)[0];
        loop {
            let node = doc.get(id);
            if node.kind == BlockKind::BlockQuote {
                depth += 1;
                id = node.children[0];
            } else {
                assert!(node.raw.contains("deep"));
                break;
            }
        }
        assert!(depth < MAX_CONTAINER_DEPTH);
    }

    #[test]
    fn empty_input_yields_empty_document() {
        let doc = parse("");
        assert!(top(&doc).is_empty());
    }
}
