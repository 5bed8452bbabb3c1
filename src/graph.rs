use crate::block::{Block, BlockId, BlockKind};
use crate::geometry::Point;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Flat, insertion-ordered collection of every placed block.
///
/// Insertion order is meaningful: the resolver breaks ties between blocks
/// competing for one slot by it. Edges between blocks are stored on the
/// blocks themselves as [`BlockId`]s into this collection.
#[derive(Debug, Clone, Default)]
pub struct BlockGraph {
    blocks: Vec<Block>,
}

impl BlockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> BlockId {
        self.blocks.push(block);
        BlockId(self.blocks.len() - 1)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(BlockId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// All blocks without a predecessor, in insertion order.
    pub fn heads(&self) -> Vec<BlockId> {
        self.iter()
            .filter(|(_, b)| b.back_block().is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// The entry block, when exactly one block has no predecessor.
    pub fn head(&self) -> Option<BlockId> {
        match self.heads().as_slice() {
            [head] => Some(*head),
            _ => None,
        }
    }

    /// Iterate a sequence starting at `from` and following `next` links.
    pub fn chain(&self, from: Option<BlockId>) -> Chain<'_> {
        Chain { graph: self, current: from }
    }

    /// Iterate the body of a nest block. Empty for every other kind.
    pub fn body_chain(&self, nest: BlockId) -> Chain<'_> {
        self.chain(self.get(nest).and_then(Block::nest_block))
    }

    /// Whether `candidate` is reachable from `of` by following `back` links.
    pub fn is_ancestor(&self, candidate: BlockId, of: BlockId) -> bool {
        let mut current = self.get(of).and_then(Block::back_block);
        let mut steps = 0;
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            steps += 1;
            if steps > self.blocks.len() {
                break;
            }
            current = self.get(id).and_then(Block::back_block);
        }
        false
    }

    /// Number of nest bodies enclosing `id`.
    pub fn nesting_depth(&self, id: BlockId) -> usize {
        let mut depth = 0;
        let mut child = id;
        let mut steps = 0;
        while let Some(parent) = self.get(child).and_then(Block::back_block) {
            if self[parent].nest_block() == Some(child) {
                depth += 1;
            }
            steps += 1;
            if steps > self.blocks.len() {
                break;
            }
            child = parent;
        }
        depth
    }

    /// Every block reachable from `id` through `next`, `elem` and `nest_body`
    /// links, `id` first. Each block appears once.
    pub fn subtree(&self, id: BlockId) -> Vec<BlockId> {
        let mut seen = vec![false; self.blocks.len()];
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(block) = self.get(current) else { continue };
            if std::mem::replace(&mut seen[current.0], true) {
                continue;
            }
            order.push(current);
            let links = block.links();
            stack.extend(links.next);
            stack.extend(links.nest_body);
            stack.extend(links.elem);
        }
        order
    }

    /// Translate `id` and everything linked below it by `delta`.
    pub fn translate_subtree(&mut self, id: BlockId, delta: Point) {
        if delta.is_zero() {
            return;
        }
        for member in self.subtree(id) {
            self.blocks[member.0].translate(delta);
        }
    }

    /// Translate the subtree of `id` so its start point lands exactly on
    /// `target`.
    pub fn snap(&mut self, id: BlockId, target: Point) {
        let Some(block) = self.get(id) else { return };
        let delta = target - block.start_point();
        self.translate_subtree(id, delta);
        self.blocks[id.0].pin_start(target);
    }

    /// Clear every edge in the graph.
    pub fn reset_links(&mut self) {
        for block in &mut self.blocks {
            block.reset_links();
        }
    }

    /// Record the edge `from --slot--> to`.
    pub(crate) fn link(&mut self, from: BlockId, to: BlockId, slot: Slot) {
        let links = self.blocks[from.0].links_mut();
        match slot {
            Slot::Sequential => links.next = Some(to),
            Slot::Argument => links.elem = Some(to),
            Slot::NestBody => links.nest_body = Some(to),
        }
        self.blocks[to.0].links_mut().back = Some(from);
    }
}

impl Index<BlockId> for BlockGraph {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }
}

impl IndexMut<BlockId> for BlockGraph {
    fn index_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }
}

/// Iterator over a `next`-linked sequence.
pub struct Chain<'a> {
    graph: &'a BlockGraph,
    current: Option<BlockId>,
}

impl Iterator for Chain<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        let id = self.current?;
        self.current = self.graph.get(id).and_then(Block::next_block);
        Some(id)
    }
}

// ============================================================================
// Slot rules
// ============================================================================

/// An attachment point on a block that binds at most one other block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `end_point`, binds the successor in a sequence.
    Sequential,
    /// `elem_point`, binds an argument block.
    Argument,
    /// `nest_point`, binds the first block of a nest body.
    NestBody,
}

impl Slot {
    /// Tested in this order for every pair of blocks.
    pub const ALL: [Slot; 3] = [Slot::Sequential, Slot::Argument, Slot::NestBody];

    /// Position of this slot on `block`, if the block has it.
    pub fn point(self, block: &Block) -> Option<Point> {
        match self {
            Slot::Sequential => (!block.kind().is_argument()).then(|| block.end_point()),
            Slot::Argument => block.elem_point(),
            Slot::NestBody => block.nest_point(),
        }
    }

    /// Block currently bound to this slot on `block`.
    pub fn occupant(self, block: &Block) -> Option<BlockId> {
        match self {
            Slot::Sequential => block.next_block(),
            Slot::Argument => block.elem_block(),
            Slot::NestBody => block.nest_block(),
        }
    }

    /// Whether a block of `kind` may be bound to this slot.
    pub fn accepts(self, kind: BlockKind) -> bool {
        match self {
            Slot::Argument => kind.is_argument(),
            Slot::Sequential | Slot::NestBody => !kind.is_argument(),
        }
    }
}

/// Outcome of testing whether one block may attach to another's slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotCheck {
    Accept,
    Reject(SlotRejection),
}

impl SlotCheck {
    pub fn is_accept(&self) -> bool {
        matches!(self, SlotCheck::Accept)
    }
}

impl SlotRejection {
    /// Whether the target was in range but lost to another block or link.
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            SlotRejection::SlotFilled(_) | SlotRejection::TargetLinked(_) | SlotRejection::WouldCycle
        )
    }
}

/// Why a block was not attached to a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotRejection {
    /// A block cannot attach to itself.
    SameBlock,
    /// Argument blocks have no slots.
    SourceIsArgument,
    /// The source block's kind has no such slot.
    SlotUnavailable,
    /// The slot already holds a block.
    SlotFilled(BlockId),
    /// The target's kind cannot go into this slot.
    TargetKind(BlockKind),
    /// The target already has a predecessor.
    TargetLinked(BlockId),
    /// The target is an ancestor of the source.
    WouldCycle,
    /// The target's start point is too far from the slot.
    OutOfRange { distance: f32 },
}

impl fmt::Display for SlotRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameBlock => write!(f, "cannot attach a block to itself"),
            Self::SourceIsArgument => write!(f, "argument blocks have no slots"),
            Self::SlotUnavailable => write!(f, "block has no such slot"),
            Self::SlotFilled(id) => write!(f, "slot already holds block {}", id.index()),
            Self::TargetKind(kind) => write!(f, "{:?} block cannot fill this slot", kind),
            Self::TargetLinked(id) => {
                write!(f, "block is already attached to block {}", id.index())
            }
            Self::WouldCycle => write!(f, "block is an ancestor of the slot owner"),
            Self::OutOfRange { distance } => write!(f, "block is {:.1} units away", distance),
        }
    }
}

/// Check whether `target` may be attached to `slot` of `source`.
///
/// Kind and range rules are checked first, so `SlotFilled`, `TargetLinked`
/// and `WouldCycle` are only ever reported for blocks within range.
pub fn check_slot(
    graph: &BlockGraph,
    source: BlockId,
    target: BlockId,
    slot: Slot,
    range: f32,
) -> SlotCheck {
    if source == target {
        return SlotCheck::Reject(SlotRejection::SameBlock);
    }
    let (a, b) = (&graph[source], &graph[target]);

    if a.kind().is_argument() {
        return SlotCheck::Reject(SlotRejection::SourceIsArgument);
    }
    let Some(slot_point) = slot.point(a) else {
        return SlotCheck::Reject(SlotRejection::SlotUnavailable);
    };
    if !slot.accepts(b.kind()) {
        return SlotCheck::Reject(SlotRejection::TargetKind(b.kind()));
    }

    let distance = slot_point.distance_to(b.start_point());
    if distance >= range {
        return SlotCheck::Reject(SlotRejection::OutOfRange { distance });
    }

    // Past this point the target is a candidate: the remaining rules settle
    // competition between blocks within range of the same slot.
    if let Some(occupant) = slot.occupant(a) {
        return SlotCheck::Reject(SlotRejection::SlotFilled(occupant));
    }
    if let Some(back) = b.back_block() {
        return SlotCheck::Reject(SlotRejection::TargetLinked(back));
    }
    if graph.is_ancestor(target, source) {
        return SlotCheck::Reject(SlotRejection::WouldCycle);
    }

    SlotCheck::Accept
}
