/// A resolved inline node.
///
/// Inline nodes form an owned tree per leaf block; nothing here refers back
/// into the source text or is shared between blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text, already unescaped.
    Text(String),
    Emphasis {
        strong: bool,
        children: Vec<InlineNode>,
    },
    Strikethrough {
        children: Vec<InlineNode>,
    },
    Link {
        dest: String,
        title: Option<String>,
        children: Vec<InlineNode>,
    },
    Image {
        dest: String,
        title: Option<String>,
        alt: String,
    },
    /// Backtick-delimited literal; no inline parsing applies inside.
    CodeSpan(String),
    /// Inline raw markup, carried verbatim until the renderer decides.
    RawHtml(String),
    LineBreak {
        hard: bool,
    },
    Autolink {
        target: String,
        email: bool,
    },
}

impl InlineNode {
    /// Flattens a node sequence to its plain text, used for image alt text.
    pub fn plain_text(nodes: &[InlineNode]) -> String {
        let mut out = String::new();
        let mut stack: Vec<&InlineNode> = nodes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                InlineNode::Text(t) | InlineNode::CodeSpan(t) | InlineNode::RawHtml(t) => {
                    out.push_str(t);
                }
                InlineNode::Emphasis { children, .. }
                | InlineNode::Strikethrough { children }
                | InlineNode::Link { children, .. } => {
                    stack.extend(children.iter().rev());
                }
                InlineNode::Image { alt, .. } => out.push_str(alt),
                InlineNode::LineBreak { .. } => out.push('\n'),
                InlineNode::Autolink { target, .. } => out.push_str(target),
            }
        }
        out
    }
}
