//! Incremental open-block matching over the scanned line sequence.
//!
//! Each incoming line is processed in two phases: (a) every open container is
//! asked to continue, outermost first, and blocks whose condition fails are
//! closed; (b) from the first unconsumed column, new blocks are opened in
//! priority order. Unparseable constructs always fall through to paragraph
//! text, so a block tree is produced for any input.

use crate::blocks::kinds::{
    AtxHeading, CodeFence, DelimiterRow, Fence, HtmlBlockStart, LinkDef, ListMarker, QuoteMarker,
    SetextUnderline, TableRowLine, TaskMarker, ThematicBreakRule,
};
use crate::doc::{BlockId, BlockKind, Document, ListKind};
use crate::options::Options;
use crate::scanner::Line;

/// Container nesting cap; markers past this depth are kept as literal text.
pub const MAX_CONTAINER_DEPTH: usize = 64;

/// Column width that starts an indented code block.
pub const CODE_INDENT: usize = 4;

#[derive(Debug, Clone, Copy)]
enum ContainerData {
    Root,
    Quote,
    List {
        kind: ListKind,
        loose: bool,
        pending_blank: bool,
    },
    Item {
        content_indent: usize,
    },
    Table {
        cols: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct OpenContainer {
    id: BlockId,
    data: ContainerData,
}

#[derive(Debug, Clone, Copy)]
enum LeafState {
    None,
    Paragraph { id: BlockId },
    Fenced { id: BlockId, fence: Fence },
    Indented { id: BlockId, pending_blanks: usize },
    Html { id: BlockId },
}

/// Builds the block tree line by line.
pub struct TreeBuilder<'a> {
    doc: Document,
    options: &'a Options,
    containers: Vec<OpenContainer>,
    leaf: LeafState,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            doc: Document::new(),
            options,
            containers: vec![OpenContainer {
                id: Document::ROOT,
                data: ContainerData::Root,
            }],
            leaf: LeafState::None,
        }
    }

    /// Feeds one logical line through continuation and opening.
    pub fn push(&mut self, line: &Line) {
        let text = line.text.clone();
        let (pos, matched) = self.match_containers(&text, line.is_blank());

        if self.consume_open_leaf(&text, pos, matched, line.number) {
            return;
        }

        // Blank for the innermost matched container: ends a paragraph and
        // marks open lists for looseness, but containers stay open as long
        // as they matched.
        if text[pos..].trim().is_empty() {
            if matches!(self.leaf, LeafState::Paragraph { .. }) {
                self.close_leaf();
            }
            self.close_containers_to(matched);
            self.note_blank();
            return;
        }

        if matched < self.containers.len() {
            if matches!(self.leaf, LeafState::Paragraph { .. })
                && !self.interrupts_paragraph(&text, pos, matched)
            {
                // Lazy continuation of the innermost open paragraph.
                self.append_paragraph_line(text[pos..].trim_start_matches(' '), line.number);
                return;
            }
            self.close_containers_to(matched);
        }

        self.open_blocks(&text, pos, line.number);
    }

    /// Closes everything still open and returns the finished document.
    pub fn finish(mut self) -> Document {
        self.close_containers_to(1);
        self.close_leaf();
        self.doc
    }

    /// Phase (a): walk the open containers outermost to innermost, consuming
    /// each one's marker or indent. Returns the consumed byte position and
    /// how many containers matched (the root always does).
    fn match_containers(&self, text: &str, blank: bool) -> (usize, usize) {
        let mut pos = 0usize;
        let mut matched = 1usize;
        for container in &self.containers[1..] {
            match container.data {
                ContainerData::Root => {}
                ContainerData::Quote => match QuoteMarker::strip(&text[pos..]) {
                    Some(n) => pos += n,
                    None => break,
                },
                ContainerData::Item { content_indent } => {
                    if !blank {
                        if leading_spaces(&text[pos..]) >= content_indent {
                            pos += content_indent;
                        } else {
                            break;
                        }
                    }
                }
                ContainerData::List { .. } => {}
                ContainerData::Table { .. } => {
                    if blank || !text[pos..].contains(DelimiterRow::PIPE) {
                        break;
                    }
                }
            }
            matched += 1;
        }
        (pos, matched)
    }

    /// Routes the line into an open code or HTML leaf. Returns true when the
    /// line was fully consumed.
    fn consume_open_leaf(&mut self, text: &str, pos: usize, matched: usize, number: usize) -> bool {
        let all = matched == self.containers.len();
        let rest_blank = text[pos..].trim().is_empty();
        match self.leaf {
            LeafState::Fenced { id, fence } if all => {
                let rest = &text[pos..];
                let indent = leading_spaces(rest);
                if !rest_blank && indent < CODE_INDENT && CodeFence::closes(fence, &rest[indent..])
                {
                    self.leaf = LeafState::None;
                    return true;
                }
                let strip = leading_spaces(rest).min(fence.indent);
                self.doc.append_raw(id, &rest[strip..], number);
                true
            }
            LeafState::Fenced { .. } => {
                // The surrounding container ended; the fence ends with it.
                self.close_leaf();
                false
            }
            LeafState::Indented { id, pending_blanks } if all => {
                if rest_blank {
                    self.leaf = LeafState::Indented {
                        id,
                        pending_blanks: pending_blanks + 1,
                    };
                    self.note_blank();
                    return true;
                }
                let rest = &text[pos..];
                if leading_spaces(rest) >= CODE_INDENT {
                    for _ in 0..pending_blanks {
                        self.doc.append_raw(id, "", number);
                    }
                    self.leaf = LeafState::Indented {
                        id,
                        pending_blanks: 0,
                    };
                    self.doc.append_raw(id, &rest[CODE_INDENT..], number);
                    return true;
                }
                self.close_leaf();
                false
            }
            LeafState::Indented { .. } => {
                self.close_leaf();
                false
            }
            LeafState::Html { id } if all && !rest_blank => {
                self.doc.append_raw(id, &text[pos..], number);
                true
            }
            LeafState::Html { .. } => {
                self.close_leaf();
                false
            }
            _ => false,
        }
    }

    /// Phase (b): open new blocks from `pos` in priority order.
    fn open_blocks(&mut self, text: &str, mut pos: usize, number: usize) {
        loop {
            // Rows of an open table bind before any other opener.
            if let ContainerData::Table { cols } = self.innermost().data {
                self.append_table_row(&text[pos..], cols, number);
                return;
            }

            let rest = &text[pos..];
            if rest.trim().is_empty() {
                return;
            }
            let indent = leading_spaces(rest);
            let content = &rest[indent..];

            // Indented code, or continuation of an open paragraph.
            if indent >= CODE_INDENT {
                if let LeafState::Paragraph { .. } = self.leaf {
                    self.append_paragraph_line(content, number);
                    return;
                }
                self.close_trailing_lists();
                let parent = self.innermost().id;
                let id = self.doc.push_child(
                    parent,
                    BlockKind::CodeBlock {
                        fenced: false,
                        info: None,
                    },
                    number,
                );
                self.doc.append_raw(id, &rest[CODE_INDENT..], number);
                self.leaf = LeafState::Indented {
                    id,
                    pending_blanks: 0,
                };
                return;
            }

            // A paragraph already open here can be rewritten by a setext
            // underline or, with tables enabled, by a delimiter row.
            if let LeafState::Paragraph { id } = self.leaf {
                if let Some(level) = SetextUnderline::level(content) {
                    if self.finish_setext(id, level) {
                        return;
                    }
                    // The paragraph held nothing but link definitions, so
                    // the underline is reconsidered as a fresh line.
                    continue;
                }
                if self.options.extensions.tables && self.try_open_table(id, content, number) {
                    return;
                }
            }

            if ThematicBreakRule::matches(content) {
                self.close_leaf();
                self.close_trailing_lists();
                let parent = self.innermost().id;
                self.doc.push_child(parent, BlockKind::ThematicBreak, number);
                return;
            }

            if let Some((level, heading_text)) = AtxHeading::parse(content) {
                self.close_leaf();
                self.close_trailing_lists();
                let parent = self.innermost().id;
                let id = self
                    .doc
                    .push_child(parent, BlockKind::Heading { level }, number);
                self.doc.append_raw(id, &heading_text, number);
                return;
            }

            if let Some((fence, info)) = CodeFence::open(content, indent) {
                self.close_leaf();
                self.close_trailing_lists();
                let parent = self.innermost().id;
                let info = if info.is_empty() { None } else { Some(info) };
                let id = self
                    .doc
                    .push_child(parent, BlockKind::CodeBlock { fenced: true, info }, number);
                self.leaf = LeafState::Fenced { id, fence };
                return;
            }

            if HtmlBlockStart::matches(content) {
                self.close_leaf();
                self.close_trailing_lists();
                let parent = self.innermost().id;
                let id = self.doc.push_child(parent, BlockKind::HtmlBlock, number);
                self.doc.append_raw(id, rest, number);
                self.leaf = LeafState::Html { id };
                return;
            }

            if self.containers.len() < MAX_CONTAINER_DEPTH {
                if let Some(consumed) = QuoteMarker::strip(rest) {
                    self.close_leaf();
                    self.close_trailing_lists();
                    let parent = self.innermost().id;
                    let id = self.doc.push_child(parent, BlockKind::BlockQuote, number);
                    self.containers.push(OpenContainer {
                        id,
                        data: ContainerData::Quote,
                    });
                    pos += consumed;
                    continue;
                }

                if let Some(marker) = ListMarker::parse(content) {
                    // Only a non-empty item whose ordered marker starts at 1
                    // may interrupt an open paragraph.
                    let interrupts = !matches!(self.leaf, LeafState::Paragraph { .. }) || {
                        let has_content = !content[marker.width..].trim().is_empty();
                        let plain_start = match marker.kind {
                            ListKind::Bullet { .. } => true,
                            ListKind::Ordered { start, .. } => start == 1,
                        };
                        has_content && plain_start
                    };
                    if interrupts {
                        self.close_leaf();
                        // An empty item can leave the marker geometry pointing
                        // past the end of the line.
                        let after = (pos + indent + marker.content_indent()).min(text.len());
                        let task = if self.options.extensions.tasklist {
                            TaskMarker::parse(&text[after..])
                        } else {
                            None
                        };
                        self.open_list_item(marker, indent, number, task.map(|(c, _)| c));
                        pos = after + task.map_or(0, |(_, consumed)| consumed);
                        continue;
                    }
                }
            }

            // Paragraph start or continuation: the universal fallback.
            if let LeafState::Paragraph { .. } = self.leaf {
                self.append_paragraph_line(content, number);
            } else {
                self.close_trailing_lists();
                let parent = self.innermost().id;
                let id = self.doc.push_child(parent, BlockKind::Paragraph, number);
                self.doc.append_raw(id, content, number);
                self.leaf = LeafState::Paragraph { id };
            }
            return;
        }
    }

    /// Opens a list item, joining the innermost open list when the marker is
    /// compatible and starting a fresh list otherwise.
    fn open_list_item(
        &mut self,
        marker: ListMarker,
        indent: usize,
        number: usize,
        task: Option<bool>,
    ) {
        if let ContainerData::List {
            kind,
            pending_blank,
            ..
        } = self.innermost().data
        {
            if ListMarker::compatible(kind, marker.kind) {
                if pending_blank {
                    let top = self.containers.last_mut().unwrap();
                    top.data = ContainerData::List {
                        kind,
                        loose: true,
                        pending_blank: false,
                    };
                }
            } else {
                self.close_trailing_lists();
            }
        }

        if !matches!(self.innermost().data, ContainerData::List { .. }) {
            let parent = self.innermost().id;
            let id = self.doc.push_child(
                parent,
                BlockKind::List {
                    kind: marker.kind,
                    tight: true,
                },
                number,
            );
            self.containers.push(OpenContainer {
                id,
                data: ContainerData::List {
                    kind: marker.kind,
                    loose: false,
                    pending_blank: false,
                },
            });
        }

        let list_id = self.innermost().id;
        let item = self.doc.push_child(list_id, BlockKind::ListItem { task }, number);
        self.containers.push(OpenContainer {
            id: item,
            data: ContainerData::Item {
                content_indent: indent + marker.content_indent(),
            },
        });
    }

    /// Converts the open single-line paragraph into a table when the current
    /// line is a matching delimiter row.
    fn try_open_table(&mut self, para: BlockId, content: &str, number: usize) -> bool {
        let raw = self.doc.get(para).raw.clone();
        if raw.contains('\n') {
            return false;
        }
        let Some(alignments) = DelimiterRow::parse(content) else {
            return false;
        };
        let Some(head_cells) = TableRowLine::split(&raw) else {
            return false;
        };
        if head_cells.len() != alignments.len() {
            return false;
        }

        self.doc.detach(para);
        self.leaf = LeafState::None;
        let cols = alignments.len();
        let parent = self.innermost().id;
        let table = self
            .doc
            .push_child(parent, BlockKind::Table { alignments }, number);
        self.containers.push(OpenContainer {
            id: table,
            data: ContainerData::Table { cols },
        });
        self.push_table_row(table, &head_cells, cols, true, number);
        true
    }

    fn append_table_row(&mut self, rest: &str, cols: usize, number: usize) {
        let table = self.innermost().id;
        if let Some(cells) = TableRowLine::split(rest) {
            self.push_table_row(table, &cells, cols, false, number);
        }
    }

    /// Adds one row, padding or truncating the cells to the column count
    /// fixed by the delimiter row.
    fn push_table_row(
        &mut self,
        table: BlockId,
        cells: &[String],
        cols: usize,
        head: bool,
        number: usize,
    ) {
        let row = self.doc.push_child(table, BlockKind::TableRow { head }, number);
        for i in 0..cols {
            let cell = self.doc.push_child(row, BlockKind::TableCell, number);
            if let Some(raw) = cells.get(i) {
                if !raw.is_empty() {
                    self.doc.append_raw(cell, raw, number);
                }
            }
        }
    }

    /// Whether a line that failed container continuation still interrupts
    /// the open paragraph instead of continuing it lazily.
    fn interrupts_paragraph(&self, text: &str, pos: usize, matched: usize) -> bool {
        let rest = &text[pos..];
        let indent = leading_spaces(rest);
        if indent >= CODE_INDENT {
            return false;
        }
        let content = &rest[indent..];
        if ThematicBreakRule::matches(content)
            || AtxHeading::parse(content).is_some()
            || CodeFence::open(content, indent).is_some()
            || HtmlBlockStart::matches(content)
            || QuoteMarker::strip(rest).is_some()
        {
            return true;
        }
        if let Some(marker) = ListMarker::parse(content) {
            // A sibling of the innermost matched list always interrupts.
            if let ContainerData::List { kind, .. } = self.containers[matched - 1].data {
                if ListMarker::compatible(kind, marker.kind) {
                    return true;
                }
            }
            let has_content = !content[marker.width..].trim().is_empty();
            let plain_start = match marker.kind {
                ListKind::Bullet { .. } => true,
                ListKind::Ordered { start, .. } => start == 1,
            };
            return has_content && plain_start;
        }
        false
    }

    fn append_paragraph_line(&mut self, content: &str, number: usize) {
        if let LeafState::Paragraph { id } = self.leaf {
            self.doc.append_raw(id, content, number);
        }
    }

    /// Rewrites the open paragraph into a setext heading. Returns false when
    /// the paragraph held only link definitions and no heading was produced.
    fn finish_setext(&mut self, id: BlockId, level: u8) -> bool {
        let raw = std::mem::take(&mut self.doc.get_mut(id).raw);
        let rest = LinkDef::extract(&raw, &mut self.doc.refs);
        let rest = rest.trim();
        self.leaf = LeafState::None;
        if rest.is_empty() {
            self.doc.detach(id);
            return false;
        }
        let node = self.doc.get_mut(id);
        node.kind = BlockKind::Heading { level };
        node.raw = rest.to_string();
        true
    }

    fn innermost(&self) -> OpenContainer {
        *self.containers.last().unwrap()
    }

    /// Closes the open leaf block. Closing a paragraph strips leading
    /// link-reference definitions into the reference map and drops the node
    /// entirely when nothing else remains.
    fn close_leaf(&mut self) {
        let leaf = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Paragraph { id } = leaf {
            let raw = std::mem::take(&mut self.doc.get_mut(id).raw);
            let rest = LinkDef::extract(&raw, &mut self.doc.refs);
            if rest.trim().is_empty() {
                self.doc.detach(id);
            } else {
                self.doc.get_mut(id).raw = rest.trim_start_matches(' ').to_string();
            }
        }
    }

    /// Closes containers until only `target` remain, finalizing list
    /// tightness on the way out.
    fn close_containers_to(&mut self, target: usize) {
        if self.containers.len() > target {
            self.close_leaf();
        }
        while self.containers.len() > target {
            let closed = self.containers.pop().unwrap();
            self.finalize_container(closed);
        }
    }

    /// Closes innermost lists and tables so a non-item block can open in the
    /// surrounding container.
    fn close_trailing_lists(&mut self) {
        while matches!(
            self.innermost().data,
            ContainerData::List { .. } | ContainerData::Table { .. }
        ) {
            let closed = self.containers.pop().unwrap();
            self.finalize_container(closed);
        }
    }

    fn finalize_container(&mut self, closed: OpenContainer) {
        if let ContainerData::List { kind, loose, .. } = closed.data {
            self.doc.get_mut(closed.id).kind = BlockKind::List {
                kind,
                tight: !loose,
            };
        }
    }

    /// A blank line marks every open list: if another item follows, the list
    /// renders loose.
    fn note_blank(&mut self) {
        for container in self.containers.iter_mut() {
            if let ContainerData::List { kind, loose, .. } = container.data {
                container.data = ContainerData::List {
                    kind,
                    loose,
                    pending_blank: true,
                };
            }
        }
    }
}

fn leading_spaces(s: &str) -> usize {
    s.len() - s.trim_start_matches(' ').len()
}
