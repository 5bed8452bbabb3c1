//! Block entity model.
//!
//! A [`Block`] is a single record carrying a closed [`BlockKind`] tag plus the
//! slot points that kind owns. Slot geometry is a pure function of the kind and
//! the placement point (see [`BlockLayout::for_kind`]); the resolver depends on
//! these positions, rendering only decorates them.

use crate::geometry::{Point, Rect};

/// Base length of every block dimension.
pub const BLOCK_UNIT: f32 = 50.0;
/// Thickness of a nest block's bar and of its closing marker.
pub const MARKER_THICKNESS: f32 = BLOCK_UNIT / 3.0;
/// Width of the colored frame drawn around a block body.
pub const FRAME_WIDTH: f32 = 3.0;
/// Bar length of a nest block with an empty body.
pub const BAR_BASE_EXTENT: f32 = BLOCK_UNIT;
/// Bar growth contributed by one plain block in a nest body.
pub const NEST_INCREMENT: f32 = BLOCK_UNIT;

const MARKER_WIDTH: f32 = BLOCK_UNIT * 4.0;

/// Index of a block in the editor's collection.
///
/// Ids are handed out in insertion order and are never reused. They are plain
/// lookup keys: holding one does not keep a block alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Rebuild an id from the integer form used in Slint callbacks.
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw).ok().map(BlockId)
    }

    /// Integer form for Slint models and callbacks.
    pub fn raw(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

/// The construct a nest block opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestForm {
    /// `if <condition>:`
    If,
    /// `class <name>:`
    Class,
    /// `def <name>(<params>):`
    Define,
}

impl NestForm {
    pub fn label(self) -> &'static str {
        match self {
            NestForm::If => "If",
            NestForm::Class => "Class",
            NestForm::Define => "define",
        }
    }
}

/// Closed set of block roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Calls `code` with the attached argument, e.g. `print(x)`.
    Function,
    /// A bare expression consumed by its parent's argument slot.
    Argument,
    /// Opens an indented body.
    Nest(NestForm),
    /// Assigns the attached argument to the name in `code`.
    Declare,
    /// Calls `code` with no arguments.
    Call,
}

impl BlockKind {
    pub fn is_argument(self) -> bool {
        matches!(self, BlockKind::Argument)
    }

    pub fn is_nest(self) -> bool {
        matches!(self, BlockKind::Nest(_))
    }

    /// Whether the block owns an argument slot (`elem_point`).
    pub fn has_elem_slot(self) -> bool {
        matches!(self, BlockKind::Function | BlockKind::Declare | BlockKind::Nest(_))
    }

    /// Width of the block header; the argument slot sits on its right edge.
    pub fn header_width(self) -> f32 {
        match self {
            BlockKind::Function
            | BlockKind::Argument
            | BlockKind::Nest(NestForm::If)
            | BlockKind::Nest(NestForm::Class) => BLOCK_UNIT * 2.0,
            BlockKind::Declare | BlockKind::Call | BlockKind::Nest(NestForm::Define) => {
                BLOCK_UNIT * 4.0
            }
        }
    }

    pub fn default_code(self) -> &'static str {
        match self {
            BlockKind::Function => "print",
            BlockKind::Nest(NestForm::If) => "if",
            BlockKind::Nest(NestForm::Class) => "class",
            BlockKind::Nest(NestForm::Define)
            | BlockKind::Argument
            | BlockKind::Declare
            | BlockKind::Call => "",
        }
    }

    /// Fixed caption drawn on the header, if the kind has one.
    pub fn caption(self) -> Option<&'static str> {
        match self {
            BlockKind::Function | BlockKind::Argument => None,
            BlockKind::Nest(form) => Some(form.label()),
            BlockKind::Declare => Some("Declare"),
            BlockKind::Call => Some("Call"),
        }
    }

    /// Whether the user edits `code` through a text field.
    pub fn has_text_field(self) -> bool {
        matches!(
            self,
            BlockKind::Argument
                | BlockKind::Declare
                | BlockKind::Call
                | BlockKind::Nest(NestForm::Define)
        )
    }

    /// Name of the palette entry that places this kind.
    pub fn palette_name(self) -> &'static str {
        match self {
            BlockKind::Function => "print",
            BlockKind::Argument => "elem",
            BlockKind::Nest(NestForm::If) => "if",
            BlockKind::Nest(NestForm::Class) => "object",
            BlockKind::Nest(NestForm::Define) => "define",
            BlockKind::Declare => "variable",
            BlockKind::Call => "call",
        }
    }

    pub fn from_palette_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.palette_name() == name)
    }

    pub const ALL: [BlockKind; 7] = [
        BlockKind::Function,
        BlockKind::Argument,
        BlockKind::Nest(NestForm::If),
        BlockKind::Nest(NestForm::Class),
        BlockKind::Nest(NestForm::Define),
        BlockKind::Declare,
        BlockKind::Call,
    ];
}

/// Slot data only nest blocks carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestSlot {
    pub form: NestForm,
    /// Where the first block of the body attaches.
    pub nest_point: Point,
    /// Top of the vertical bar marking the body.
    pub bar_point: Point,
    /// Current bar length.
    pub bar_extent: f32,
}

impl NestSlot {
    /// Position of the closing marker's top-left corner.
    pub fn marker_origin(&self) -> Point {
        Point::new(self.bar_point.x, self.bar_point.y + self.bar_extent)
    }

    /// End point implied by the closing marker: its bottom-left corner.
    pub fn end_point(&self) -> Point {
        let marker = self.marker_origin();
        Point::new(marker.x, marker.y + MARKER_THICKNESS)
    }
}

/// Graph edges of one block. Derived state, rebuilt by every resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockLinks {
    pub next: Option<BlockId>,
    pub back: Option<BlockId>,
    pub elem: Option<BlockId>,
    pub nest_body: Option<BlockId>,
}

/// Every slot point of a block placed at some origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLayout {
    pub start: Point,
    pub end: Point,
    pub elem: Option<Point>,
    pub nest: Option<NestSlot>,
}

impl BlockLayout {
    pub fn for_kind(kind: BlockKind, origin: Point) -> Self {
        let elem = kind
            .has_elem_slot()
            .then(|| origin + Point::new(kind.header_width(), 0.0));

        match kind {
            BlockKind::Nest(form) => {
                let nest = NestSlot {
                    form,
                    nest_point: origin + Point::new(MARKER_THICKNESS, BLOCK_UNIT),
                    bar_point: origin + Point::new(0.0, BLOCK_UNIT),
                    bar_extent: BAR_BASE_EXTENT,
                };
                BlockLayout {
                    start: origin,
                    end: nest.end_point(),
                    elem,
                    nest: Some(nest),
                }
            }
            _ => BlockLayout {
                start: origin,
                end: origin + Point::new(0.0, BLOCK_UNIT),
                elem,
                nest: None,
            },
        }
    }
}

/// A placed program fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    kind: BlockKind,
    code: String,
    start_point: Point,
    end_point: Point,
    elem_point: Option<Point>,
    nest: Option<NestSlot>,
    links: BlockLinks,
}

impl Block {
    /// Create a block of `kind` with its start point at `origin`.
    pub fn new(kind: BlockKind, origin: Point) -> Self {
        let layout = BlockLayout::for_kind(kind, origin);
        Self {
            kind,
            code: kind.default_code().to_owned(),
            start_point: layout.start,
            end_point: layout.end,
            elem_point: layout.elem,
            nest: layout.nest,
            links: BlockLinks::default(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn start_point(&self) -> Point {
        self.start_point
    }

    pub fn end_point(&self) -> Point {
        self.end_point
    }

    pub fn elem_point(&self) -> Option<Point> {
        self.elem_point
    }

    pub fn nest_point(&self) -> Option<Point> {
        self.nest.map(|n| n.nest_point)
    }

    pub fn bar_point(&self) -> Option<Point> {
        self.nest.map(|n| n.bar_point)
    }

    pub fn bar_extent(&self) -> Option<f32> {
        self.nest.map(|n| n.bar_extent)
    }

    pub fn nest_slot(&self) -> Option<&NestSlot> {
        self.nest.as_ref()
    }

    pub fn links(&self) -> &BlockLinks {
        &self.links
    }

    pub fn next_block(&self) -> Option<BlockId> {
        self.links.next
    }

    pub fn back_block(&self) -> Option<BlockId> {
        self.links.back
    }

    pub fn elem_block(&self) -> Option<BlockId> {
        self.links.elem
    }

    pub fn nest_block(&self) -> Option<BlockId> {
        self.links.nest_body
    }

    pub(crate) fn links_mut(&mut self) -> &mut BlockLinks {
        &mut self.links
    }

    pub(crate) fn reset_links(&mut self) {
        self.links = BlockLinks::default();
    }

    /// Move every point this block carries by `delta`. Linked blocks are not
    /// touched; see [`BlockGraph::translate_subtree`](crate::BlockGraph::translate_subtree).
    pub fn translate(&mut self, delta: Point) {
        self.start_point += delta;
        self.end_point += delta;
        if let Some(elem) = self.elem_point.as_mut() {
            *elem += delta;
        }
        if let Some(nest) = self.nest.as_mut() {
            nest.nest_point += delta;
            nest.bar_point += delta;
        }
    }

    /// Pin the start point to `target` without touching the other points.
    pub(crate) fn pin_start(&mut self, target: Point) {
        self.start_point = target;
    }

    /// Vertical span from start to end point.
    pub fn extent(&self) -> f32 {
        self.end_point.y - self.start_point.y
    }

    /// Resize the bar of a nest block and move its closing marker to match.
    ///
    /// Returns the displacement of `end_point`. Non-nest blocks are left
    /// unchanged and report a zero displacement.
    pub fn set_bar_extent(&mut self, extent: f32) -> Point {
        let Some(nest) = self.nest.as_mut() else {
            return Point::ORIGIN;
        };
        nest.bar_extent = extent;
        let new_end = nest.end_point();
        let delta = new_end - self.end_point;
        self.end_point = new_end;
        delta
    }

    pub fn header_rect(&self) -> Rect {
        Rect::new(
            self.start_point.x,
            self.start_point.y,
            self.kind.header_width(),
            BLOCK_UNIT,
        )
    }

    /// Vertical bar of a nest block.
    pub fn bar_rect(&self) -> Option<Rect> {
        self.nest.map(|n| {
            Rect::new(n.bar_point.x, n.bar_point.y, MARKER_THICKNESS, n.bar_extent)
        })
    }

    /// Closing marker of a nest block.
    pub fn marker_rect(&self) -> Option<Rect> {
        self.nest.map(|n| {
            let origin = n.marker_origin();
            Rect::new(origin.x, origin.y, MARKER_WIDTH, MARKER_THICKNESS)
        })
    }

    /// Every rectangle the block occupies on the canvas.
    pub fn footprint(&self) -> Vec<Rect> {
        let mut rects = vec![self.header_rect()];
        rects.extend(self.bar_rect());
        rects.extend(self.marker_rect());
        rects
    }

    pub fn contains(&self, point: Point) -> bool {
        self.footprint().iter().any(|r| r.contains(point))
    }
}
