//! Tree-to-HTML emission.
//!
//! A depth-first walk over the resolved document. Nesting depth is capped by
//! the block and inline parsers, so the recursion here is bounded. Rendering
//! itself never fails; the only error is a refused output allocation.

use crate::doc::{Alignment, BlockId, BlockKind, Document, ListKind};
use crate::error::RenderError;
use crate::inline::InlineNode;
use crate::inline::kinds::BareUrl;
use crate::options::Options;
use crate::render::escape;

/// Renders a resolved document to an HTML string.
pub fn render_html(doc: &Document, options: &Options) -> Result<String, RenderError> {
    let mut renderer = HtmlRenderer {
        options,
        out: String::new(),
    };
    let estimate = doc
        .ids()
        .map(|id| doc.get(id).raw.len())
        .sum::<usize>()
        .saturating_mul(2)
        + 64;
    renderer
        .out
        .try_reserve(estimate)
        .map_err(|_| RenderError::AllocationFailure)?;
    renderer.children(doc, Document::ROOT, false);
    Ok(renderer.out)
}

struct HtmlRenderer<'a> {
    options: &'a Options,
    out: String,
}

impl HtmlRenderer<'_> {
    fn children(&mut self, doc: &Document, id: BlockId, tight: bool) {
        for child in &doc.get(id).children {
            self.block(doc, *child, tight);
        }
    }

    fn block(&mut self, doc: &Document, id: BlockId, tight: bool) {
        let node = doc.get(id);
        match &node.kind {
            BlockKind::Document => self.children(doc, id, false),
            BlockKind::Paragraph => {
                if tight {
                    self.inlines(&node.inlines);
                } else {
                    self.out.push_str("<p>");
                    self.inlines(&node.inlines);
                    self.out.push_str("</p>\n");
                }
            }
            BlockKind::Heading { level } => {
                let level = (*level).clamp(1, 6);
                self.out.push_str("<h");
                self.out.push((b'0' + level) as char);
                self.out.push('>');
                self.inlines(&node.inlines);
                self.out.push_str("</h");
                self.out.push((b'0' + level) as char);
                self.out.push_str(">\n");
            }
            BlockKind::BlockQuote => {
                self.out.push_str("<blockquote>\n");
                self.children(doc, id, false);
                self.out.push_str("</blockquote>\n");
            }
            BlockKind::List { kind, tight } => self.list(doc, id, *kind, *tight),
            BlockKind::ListItem { task } => self.list_item(doc, id, tight, *task),
            BlockKind::CodeBlock { info, .. } => {
                self.out.push_str("<pre><code");
                if let Some(info) = info {
                    if let Some(lang) = info.split_whitespace().next() {
                        self.out.push_str(" class=\"language-");
                        escape::attr_into(&mut self.out, lang);
                        self.out.push('"');
                    }
                }
                self.out.push('>');
                escape::text_into(&mut self.out, &node.raw);
                if !node.raw.is_empty() {
                    self.out.push('\n');
                }
                self.out.push_str("</code></pre>\n");
            }
            BlockKind::HtmlBlock => {
                if self.options.safe {
                    self.out.push_str("<p>");
                    escape::text_into(&mut self.out, &node.raw);
                    self.out.push_str("</p>\n");
                } else {
                    self.out.push_str(&node.raw);
                    self.out.push('\n');
                }
            }
            BlockKind::ThematicBreak => self.out.push_str("<hr />\n"),
            BlockKind::Table { alignments } => self.table(doc, id, alignments),
            // Rows and cells are emitted by `table`; reaching one directly
            // means a malformed tree, which degrades to nothing.
            BlockKind::TableRow { .. } | BlockKind::TableCell => {}
        }
    }

    fn list(&mut self, doc: &Document, id: BlockId, kind: ListKind, tight: bool) {
        match kind {
            ListKind::Bullet { .. } => self.out.push_str("<ul>\n"),
            ListKind::Ordered { start, .. } => {
                if start == 1 {
                    self.out.push_str("<ol>\n");
                } else {
                    self.out.push_str("<ol start=\"");
                    self.out.push_str(&start.to_string());
                    self.out.push_str("\">\n");
                }
            }
        }
        self.children(doc, id, tight);
        match kind {
            ListKind::Bullet { .. } => self.out.push_str("</ul>\n"),
            ListKind::Ordered { .. } => self.out.push_str("</ol>\n"),
        }
    }

    fn list_item(&mut self, doc: &Document, id: BlockId, tight: bool, task: Option<bool>) {
        self.out.push_str("<li>");
        match task {
            Some(true) => self
                .out
                .push_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> "),
            Some(false) => self.out.push_str("<input type=\"checkbox\" disabled=\"\" /> "),
            None => {}
        }
        let children = &doc.get(id).children;
        for (i, child) in children.iter().enumerate() {
            let node = doc.get(*child);
            if tight && node.kind == BlockKind::Paragraph {
                self.inlines(&node.inlines);
                if i + 1 < children.len() {
                    self.out.push('\n');
                }
            } else {
                if i == 0 {
                    self.out.push('\n');
                }
                self.block(doc, *child, tight);
            }
        }
        self.out.push_str("</li>\n");
    }

    fn table(&mut self, doc: &Document, id: BlockId, alignments: &[Alignment]) {
        self.out.push_str("<table>\n");
        let rows = &doc.get(id).children;
        let mut body_open = false;
        for row in rows {
            let head = matches!(doc.get(*row).kind, BlockKind::TableRow { head: true });
            if head {
                self.out.push_str("<thead>\n");
            } else if !body_open {
                self.out.push_str("<tbody>\n");
                body_open = true;
            }
            self.out.push_str("<tr>\n");
            for (col, cell) in doc.get(*row).children.iter().enumerate() {
                let tag = if head { "th" } else { "td" };
                self.out.push('<');
                self.out.push_str(tag);
                match alignments.get(col).copied().unwrap_or(Alignment::None) {
                    Alignment::None => {}
                    Alignment::Left => self.out.push_str(" align=\"left\""),
                    Alignment::Center => self.out.push_str(" align=\"center\""),
                    Alignment::Right => self.out.push_str(" align=\"right\""),
                }
                self.out.push('>');
                self.inlines(&doc.get(*cell).inlines);
                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push_str(">\n");
            }
            self.out.push_str("</tr>\n");
            if head {
                self.out.push_str("</thead>\n");
            }
        }
        if body_open {
            self.out.push_str("</tbody>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn inlines(&mut self, nodes: &[InlineNode]) {
        for node in nodes {
            match node {
                InlineNode::Text(t) => escape::text_into(&mut self.out, t),
                InlineNode::Emphasis { strong, children } => {
                    let tag = if *strong { "strong" } else { "em" };
                    self.out.push('<');
                    self.out.push_str(tag);
                    self.out.push('>');
                    self.inlines(children);
                    self.out.push_str("</");
                    self.out.push_str(tag);
                    self.out.push('>');
                }
                InlineNode::Strikethrough { children } => {
                    self.out.push_str("<del>");
                    self.inlines(children);
                    self.out.push_str("</del>");
                }
                InlineNode::Link {
                    dest,
                    title,
                    children,
                } => {
                    self.out.push_str("<a href=\"");
                    self.dest(dest);
                    self.out.push('"');
                    if let Some(title) = title {
                        self.out.push_str(" title=\"");
                        escape::attr_into(&mut self.out, title);
                        self.out.push('"');
                    }
                    self.out.push('>');
                    self.inlines(children);
                    self.out.push_str("</a>");
                }
                InlineNode::Image { dest, title, alt } => {
                    self.out.push_str("<img src=\"");
                    self.dest(dest);
                    self.out.push_str("\" alt=\"");
                    escape::attr_into(&mut self.out, alt);
                    self.out.push('"');
                    if let Some(title) = title {
                        self.out.push_str(" title=\"");
                        escape::attr_into(&mut self.out, title);
                        self.out.push('"');
                    }
                    self.out.push_str(" />");
                }
                InlineNode::CodeSpan(t) => {
                    self.out.push_str("<code>");
                    escape::text_into(&mut self.out, t);
                    self.out.push_str("</code>");
                }
                InlineNode::RawHtml(t) => {
                    if self.options.safe {
                        escape::text_into(&mut self.out, t);
                    } else {
                        self.out.push_str(t);
                    }
                }
                InlineNode::LineBreak { hard } => {
                    if *hard {
                        self.out.push_str("<br />\n");
                    } else {
                        self.out.push('\n');
                    }
                }
                InlineNode::Autolink { target, email } => {
                    self.out.push_str("<a href=\"");
                    if *email {
                        let mailto = format!("mailto:{target}");
                        self.dest(&mailto);
                    } else {
                        let href = BareUrl::href(target);
                        self.dest(&href);
                    }
                    self.out.push_str("\">");
                    escape::text_into(&mut self.out, target);
                    self.out.push_str("</a>");
                }
            }
        }
    }

    /// Writes a destination attribute value, honoring safe mode.
    fn dest(&mut self, dest: &str) {
        if self.options.safe && escape::is_unsafe_scheme(dest) {
            return;
        }
        escape::href_into(&mut self.out, dest);
    }
}
