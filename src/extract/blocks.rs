//! Generic block tree the extraction rules operate on
//!
//! The page parser flattens a document into a preorder list of blocks.
//! Leaves carry cleaned text; containers only group other blocks. Nothing
//! here depends on a particular HTML library.

/// Structural role of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `h1`..`h6`, with the level
    Heading(u8),
    /// `<summary>` of a `<details>` element
    Summary,
    Paragraph,
    ListItem,
    /// Definition-list term (`dt`)
    Term,
    /// Definition-list description (`dd`)
    Definition,
    Preformatted,
    /// Groups child blocks; has no text of its own
    Container,
}

impl BlockKind {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container)
    }
}

/// One block of a page
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Source tag name, lowercase
    pub tag: String,
    /// Cleaned text; empty for containers
    pub text: String,
    /// Index of the enclosing container
    pub parent: Option<usize>,
    pub depth: u32,
}

impl Block {
    pub fn leaf(kind: BlockKind, tag: &str, text: String, parent: Option<usize>, depth: u32) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
            text,
            parent,
            depth,
        }
    }

    pub fn container(tag: &str, parent: Option<usize>, depth: u32) -> Self {
        Self {
            kind: BlockKind::Container,
            tag: tag.to_string(),
            text: String::new(),
            parent,
            depth,
        }
    }
}

/// Blocks of one page in document (preorder) order
///
/// Descendants of a container always occupy the contiguous index range
/// right after it.
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block and returns its index
    pub fn push(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate()
    }

    /// Drops a trailing container that ended up with no children
    pub(crate) fn pop_empty_container(&mut self, index: usize) {
        if index + 1 == self.blocks.len() && self.blocks[index].kind.is_container() {
            self.blocks.pop();
        }
    }

    /// Indices of the direct children of `index`, in order
    pub fn children(&self, index: usize) -> Vec<usize> {
        (index + 1..self.subtree_end(index))
            .filter(|&i| self.blocks[i].parent == Some(index))
            .collect()
    }

    /// One past the last descendant of `index`
    pub fn subtree_end(&self, index: usize) -> usize {
        let Some(block) = self.blocks.get(index) else {
            return index;
        };
        let mut end = index + 1;
        while end < self.blocks.len() && self.blocks[end].depth > block.depth {
            end += 1;
        }
        end
    }

    /// True if `descendant` lies strictly inside the subtree of `ancestor`
    pub fn contains(&self, ancestor: usize, descendant: usize) -> bool {
        descendant > ancestor && descendant < self.subtree_end(ancestor)
    }

    /// Indices of all leaf blocks, in document order
    pub fn leaves(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, b)| !b.kind.is_container())
            .map(|(i, _)| i)
            .collect()
    }

    /// Text of a block; for containers, the leaf texts of the subtree joined by newlines
    pub fn text_of(&self, index: usize) -> String {
        match self.blocks.get(index) {
            None => String::new(),
            Some(b) if !b.kind.is_container() => b.text.clone(),
            Some(_) => (index + 1..self.subtree_end(index))
                .filter_map(|i| {
                    let b = &self.blocks[i];
                    (!b.kind.is_container() && !b.text.is_empty()).then_some(b.text.as_str())
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
