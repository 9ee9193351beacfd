//! The block tree, stored as an index-addressed arena owned by [`Document`].
//!
//! Child links are `BlockId` indices rather than owning references, which
//! keeps ownership acyclic and makes late tree rewrites (list tightness,
//! reference-definition stripping) cheap.

use crate::inline::InlineNode;
use crate::refs::RefMap;

/// Index of a block node inside the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(u32);

impl BlockId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of an ordered or bullet list.
///
/// The marker character is kept so the block parser can tell whether an
/// incoming item belongs to the open list or starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet { marker: char },
    Ordered { start: u64, delim: char },
}

/// Per-column table alignment from the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// Tagged variant for every block-level construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    List { kind: ListKind, tight: bool },
    /// `task` is set when the tasklist extension recognized a checkbox at
    /// the start of the item.
    ListItem { task: Option<bool> },
    CodeBlock { fenced: bool, info: Option<String> },
    HtmlBlock,
    ThematicBreak,
    Table { alignments: Vec<Alignment> },
    TableRow { head: bool },
    TableCell,
}

impl BlockKind {
    /// Containers own child blocks; leaves own raw text and inline content.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::Document
                | BlockKind::BlockQuote
                | BlockKind::List { .. }
                | BlockKind::ListItem { .. }
                | BlockKind::Table { .. }
                | BlockKind::TableRow { .. }
        )
    }

    /// Leaves whose raw text goes through the inline parser.
    #[must_use]
    pub fn has_inline_content(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading { .. } | BlockKind::TableCell
        )
    }
}

/// One node in the block arena.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub parent: BlockId,
    /// Child block ids, populated for container kinds only.
    pub children: Vec<BlockId>,
    /// Accumulated raw content lines, populated for leaf kinds only.
    pub raw: String,
    /// Inline tree, filled in by the inline pass for textual leaves.
    pub inlines: Vec<InlineNode>,
    /// Source line range (first, last), advisory only.
    pub lines: (usize, usize),
}

/// The parsed document: a block arena plus the link-reference map.
///
/// Immutable once rendering begins.
#[derive(Debug)]
pub struct Document {
    blocks: Vec<BlockNode>,
    pub refs: RefMap,
}

impl Document {
    pub const ROOT: BlockId = BlockId(0);

    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockNode {
                kind: BlockKind::Document,
                parent: BlockId(0),
                children: vec![],
                raw: String::new(),
                inlines: vec![],
                lines: (0, 0),
            }],
            refs: RefMap::default(),
        }
    }

    /// Appends a new block as the last child of `parent`.
    pub fn push_child(&mut self, parent: BlockId, kind: BlockKind, line: usize) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BlockNode {
            kind,
            parent,
            children: vec![],
            raw: String::new(),
            inlines: vec![],
            lines: (line, line),
        });
        self.blocks[parent.index()].children.push(id);
        id
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> &BlockNode {
        &self.blocks[id.index()]
    }

    pub fn get_mut(&mut self, id: BlockId) -> &mut BlockNode {
        &mut self.blocks[id.index()]
    }

    /// Removes `id` from its parent's child list. The node itself stays in
    /// the arena but is no longer reachable from the root.
    pub fn detach(&mut self, id: BlockId) {
        let parent = self.blocks[id.index()].parent;
        self.blocks[parent.index()].children.retain(|c| *c != id);
    }

    /// Ids of every block in the arena, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + use<> {
        (0..self.blocks.len() as u32).map(BlockId)
    }

    /// Appends a raw content line to a leaf block.
    pub fn append_raw(&mut self, id: BlockId, text: &str, line: usize) {
        let node = &mut self.blocks[id.index()];
        if !node.raw.is_empty() {
            node.raw.push('\n');
        }
        node.raw.push_str(text);
        node.lines.1 = line;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_exists_and_is_container() {
        let doc = Document::new();
        assert!(doc.get(Document::ROOT).kind.is_container());
        assert!(doc.get(Document::ROOT).children.is_empty());
    }

    #[test]
    fn push_child_links_both_directions() {
        let mut doc = Document::new();
        let p = doc.push_child(Document::ROOT, BlockKind::Paragraph, 1);
        assert_eq!(doc.get(Document::ROOT).children, vec![p]);
        assert_eq!(doc.get(p).parent, Document::ROOT);
    }

    #[test]
    fn append_raw_joins_lines() {
        let mut doc = Document::new();
        let p = doc.push_child(Document::ROOT, BlockKind::Paragraph, 1);
        doc.append_raw(p, "first", 1);
        doc.append_raw(p, "second", 2);
        assert_eq!(doc.get(p).raw, "first\nsecond");
        assert_eq!(doc.get(p).lines, (1, 2));
    }

    #[test]
    fn detach_unlinks_from_parent() {
        let mut doc = Document::new();
        let a = doc.push_child(Document::ROOT, BlockKind::Paragraph, 1);
        let b = doc.push_child(Document::ROOT, BlockKind::ThematicBreak, 2);
        doc.detach(a);
        assert_eq!(doc.get(Document::ROOT).children, vec![b]);
    }

    #[test]
    fn leaf_kinds_are_not_containers() {
        assert!(!BlockKind::Paragraph.is_container());
        assert!(!BlockKind::HtmlBlock.is_container());
        assert!(BlockKind::TableRow { head: true }.is_container());
    }
}
