//! The editor core: a block graph plus everything needed to edit, resolve,
//! render and run it.
//!
//! [`BlockEditor`] is UI-agnostic. Pointer gestures arrive as plain method
//! calls, drawing goes through a [`Canvas`], and programs run in a
//! [`Sandbox`]. Wiring it to an actual window is the job of
//! [`BlockEditorController`](crate::BlockEditorController).

use crate::block::{Block, BlockId, BlockKind};
use crate::canvas::{render_block, Canvas};
use crate::codegen::generate_program;
use crate::geometry::Point;
use crate::graph::BlockGraph;
use crate::hit_test::find_block_at;
use crate::resolver::{resolve, ResolveReport, ResolverConfig};
use crate::sandbox::{ExecutionResult, PythonSandbox, Sandbox};
use slint::platform::PointerEventButton;
use tracing::{debug, trace};

/// A block being dragged with the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub block: BlockId,
    /// Pointer position of the last drag event.
    pub last_position: Point,
}

/// Pointer interaction state. At most one drag is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionSession {
    active_drag: Option<ActiveDrag>,
}

impl InteractionSession {
    pub fn active_drag(&self) -> Option<ActiveDrag> {
        self.active_drag
    }

    pub fn is_dragging(&self) -> bool {
        self.active_drag.is_some()
    }

    /// Start dragging `block`. Returns `false` if another drag is active.
    pub fn begin_drag(&mut self, block: BlockId, position: Point) -> bool {
        if self.active_drag.is_some() {
            return false;
        }
        self.active_drag = Some(ActiveDrag {
            block,
            last_position: position,
        });
        true
    }

    /// Record a pointer move; returns the dragged block and the delta since
    /// the previous event.
    pub fn drag_to(&mut self, position: Point) -> Option<(BlockId, Point)> {
        let drag = self.active_drag.as_mut()?;
        let delta = position - drag.last_position;
        drag.last_position = position;
        Some((drag.block, delta))
    }

    pub fn end_drag(&mut self) -> Option<ActiveDrag> {
        self.active_drag.take()
    }
}

/// Editable block program.
pub struct BlockEditor {
    graph: BlockGraph,
    config: ResolverConfig,
    sandbox: Box<dyn Sandbox>,
    selected_kind: BlockKind,
    session: InteractionSession,
    layout_dirty: bool,
    last_code: Option<String>,
    last_result: Option<ExecutionResult>,
}

impl Default for BlockEditor {
    fn default() -> Self {
        Self::new(PythonSandbox::default())
    }
}

impl BlockEditor {
    pub fn new(sandbox: impl Sandbox + 'static) -> Self {
        Self {
            graph: BlockGraph::new(),
            config: ResolverConfig::default(),
            sandbox: Box::new(sandbox),
            selected_kind: BlockKind::Function,
            session: InteractionSession::default(),
            layout_dirty: false,
            last_code: None,
            last_result: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> &BlockGraph {
        &self.graph
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.graph.get(id)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn selected_kind(&self) -> BlockKind {
        self.selected_kind
    }

    /// Source produced by the last successful [`generate_code`](Self::generate_code).
    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    pub fn last_result(&self) -> Option<&ExecutionResult> {
        self.last_result.as_ref()
    }

    // === Graph editing ===

    /// Add a block with its start point at `position`.
    pub fn place_block(&mut self, kind: BlockKind, position: Point) -> BlockId {
        let id = self.graph.push(Block::new(kind, position));
        self.layout_dirty = true;
        debug!(block = id.index(), ?kind, x = position.x, y = position.y, "placed block");
        id
    }

    /// Translate a block together with everything linked below it.
    pub fn move_block(&mut self, id: BlockId, dx: f32, dy: f32) {
        if self.graph.get(id).is_none() {
            trace!(block = id.index(), "move of unknown block ignored");
            return;
        }
        self.graph.translate_subtree(id, Point::new(dx, dy));
        self.layout_dirty = true;
    }

    /// Commit text edited in a block's text field.
    pub fn set_block_code(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        match self.graph.get_mut(id) {
            Some(block) => {
                block.set_code(text);
                true
            }
            None => false,
        }
    }

    pub fn resolve_connections(&mut self) -> ResolveReport {
        let report = resolve(&mut self.graph, &self.config);
        self.layout_dirty = false;
        report
    }

    /// Generate the program, resolving first if blocks moved since the last
    /// pass. `None` unless exactly one block is an entry point.
    pub fn generate_code(&mut self) -> Option<String> {
        if self.layout_dirty {
            self.resolve_connections();
        }
        let code = generate_program(&self.graph)?;
        self.last_code = Some(code.clone());
        Some(code)
    }

    /// Generate and execute the program.
    ///
    /// When the graph has no single entry block nothing runs, the previous
    /// result is kept and `None` is returned.
    #[tracing::instrument(level = "debug", skip(self), fields(blocks = self.graph.len()))]
    pub fn run(&mut self) -> Option<&ExecutionResult> {
        let Some(code) = self.generate_code() else {
            debug!(heads = self.graph.heads().len(), "program has no single entry block");
            return None;
        };
        let result = self.sandbox.execute(&code);
        debug!(success = result.is_success(), "program executed");
        self.last_result = Some(result);
        self.last_result.as_ref()
    }

    // === Palette and gestures ===

    pub fn select_kind(&mut self, kind: BlockKind) {
        self.selected_kind = kind;
    }

    /// Right button places the selected kind; left button picks up the
    /// topmost block under the pointer.
    pub fn pointer_down(&mut self, button: PointerEventButton, position: Point) -> Option<BlockId> {
        match button {
            PointerEventButton::Right => Some(self.place_block(self.selected_kind, position)),
            PointerEventButton::Left => {
                if self.session.is_dragging() {
                    return None;
                }
                let id = find_block_at(position, self.graph.iter())?;
                self.session.begin_drag(id, position);
                trace!(block = id.index(), "drag started");
                Some(id)
            }
            _ => None,
        }
    }

    pub fn pointer_drag(&mut self, position: Point) {
        if let Some((id, delta)) = self.session.drag_to(position) {
            self.move_block(id, delta.x, delta.y);
        }
    }

    /// Left button finishes a drag and re-resolves the whole graph.
    pub fn pointer_up(&mut self, button: PointerEventButton, position: Point) -> Option<ResolveReport> {
        match button {
            PointerEventButton::Left => {
                self.pointer_drag(position);
                if let Some(drag) = self.session.end_drag() {
                    trace!(block = drag.block.index(), "drag ended");
                }
                Some(self.resolve_connections())
            }
            _ => None,
        }
    }

    // === Rendering ===

    /// Draw every block in insertion order.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for (id, block) in self.graph.iter() {
            render_block(canvas, id, block);
        }
    }
}
