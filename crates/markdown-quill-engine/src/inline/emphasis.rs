//! Emphasis resolution over a flat node list.
//!
//! The tokenizer leaves every `*`, `_`, and `~` run in place as a text node
//! and records it as a [`DelimiterRun`]. This pass pairs closers with the
//! nearest compatible opener, wrapping the nodes between them; leftover run
//! text stays literal.

use crate::inline::types::InlineNode;

/// How deep a resolved inline tree may nest before further pairings are
/// refused and left as literal text.
pub const MAX_INLINE_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct DelimiterRun {
    pub ch: char,
    pub count: usize,
    /// Index of the run's text node in the node list.
    pub pos: usize,
    pub can_open: bool,
    pub can_close: bool,
}

/// Classifies a run by its neighbors. `None` counts as whitespace, so runs
/// at the ends of the text behave like runs next to a space.
pub fn flanking(ch: char, before: Option<char>, after: Option<char>) -> (bool, bool) {
    let before_ws = before.is_none_or(|c| c.is_whitespace());
    let after_ws = after.is_none_or(|c| c.is_whitespace());
    let before_punct = before.is_some_and(|c| c.is_ascii_punctuation());
    let after_punct = after.is_some_and(|c| c.is_ascii_punctuation());

    let left = !after_ws && (!after_punct || before_ws || before_punct);
    let right = !before_ws && (!before_punct || after_ws || after_punct);

    match ch {
        // Intraword underscores do not open or close.
        '_' => (
            left && (!right || before_punct),
            right && (!left || after_punct),
        ),
        _ => (left, right),
    }
}

/// Pairs delimiter runs and rewrites `nodes` in place.
pub fn process(nodes: &mut Vec<InlineNode>, delims: &mut Vec<DelimiterRun>) {
    let mut closer_idx = 0usize;
    while closer_idx < delims.len() {
        if !delims[closer_idx].can_close {
            closer_idx += 1;
            continue;
        }
        let Some(opener_idx) = find_opener(delims, closer_idx) else {
            closer_idx += 1;
            continue;
        };

        let opener_pos = delims[opener_idx].pos;
        let closer_pos = delims[closer_idx].pos;
        let ch = delims[closer_idx].ch;
        let use_count = if ch == '~' {
            2
        } else if delims[opener_idx].count >= 2 && delims[closer_idx].count >= 2 {
            2
        } else {
            1
        };

        let inner_depth = subtree_depth(&nodes[opener_pos + 1..closer_pos]);
        if inner_depth + 1 > MAX_INLINE_DEPTH {
            closer_idx += 1;
            continue;
        }

        let children: Vec<InlineNode> = nodes
            .splice(opener_pos + 1..closer_pos, std::iter::empty())
            .collect();
        let wrapper = match ch {
            '~' => InlineNode::Strikethrough { children },
            _ => InlineNode::Emphasis {
                strong: use_count == 2,
                children,
            },
        };
        nodes.insert(opener_pos + 1, wrapper);
        // Content nodes collapsed into one wrapper node.
        let shift = (closer_pos - opener_pos - 1) - 1;

        delims[opener_idx].count -= use_count;
        set_run_text(nodes, opener_pos, ch, delims[opener_idx].count);

        // Runs between the pair can no longer match across the wrapper.
        delims.drain(opener_idx + 1..closer_idx);
        let mut ci = opener_idx + 1;
        for run in delims[ci..].iter_mut() {
            run.pos -= shift;
        }
        delims[ci].count -= use_count;
        set_run_text(nodes, delims[ci].pos, ch, delims[ci].count);

        if delims[ci].count == 0 {
            delims.remove(ci);
        }
        if delims[opener_idx].count == 0 {
            delims.remove(opener_idx);
            ci -= 1;
        }
        closer_idx = ci;
    }
}

/// Nearest preceding compatible opener, honoring the multiple-of-three rule.
fn find_opener(delims: &[DelimiterRun], closer_idx: usize) -> Option<usize> {
    let closer = &delims[closer_idx];
    for idx in (0..closer_idx).rev() {
        let opener = &delims[idx];
        if opener.ch != closer.ch || !opener.can_open || opener.count == 0 {
            continue;
        }
        if closer.ch == '~' && (opener.count != 2 || closer.count != 2) {
            continue;
        }
        if closer.ch != '~'
            && (closer.can_open || opener.can_close)
            && (opener.count + closer.count) % 3 == 0
            && !(opener.count % 3 == 0 && closer.count % 3 == 0)
        {
            continue;
        }
        return Some(idx);
    }
    None
}

fn set_run_text(nodes: &mut [InlineNode], pos: usize, ch: char, count: usize) {
    nodes[pos] = InlineNode::Text(ch.to_string().repeat(count));
}

/// Iterative depth measurement; inline trees are never walked recursively.
fn subtree_depth(nodes: &[InlineNode]) -> usize {
    let mut max = 0usize;
    let mut stack: Vec<(&InlineNode, usize)> = nodes.iter().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        max = max.max(depth);
        match node {
            InlineNode::Emphasis { children, .. }
            | InlineNode::Strikethrough { children }
            | InlineNode::Link { children, .. } => {
                for child in children {
                    stack.push((child, depth + 1));
                }
            }
            _ => {}
        }
    }
    max
}
