//! Test harness driving a block editor through its controller.
//!
//! Provides the same wiring an application would set up, with a scripted
//! sandbox in place of the Python interpreter and helpers for simulating
//! user gestures.

#![allow(dead_code)]

use super::{RecordingCanvas, ScriptedSandbox};
use slint::platform::PointerEventButton;
use slint::{Model, SharedString};
use slint_block_editor::{
    Block, BlockEditorController, BlockId, BlockKind, Point, ResolveReport,
};

/// Test harness for an editor with a scripted sandbox.
pub struct BlockEditorHarness {
    pub ctrl: BlockEditorController,
    pub sandbox: ScriptedSandbox,
}

impl BlockEditorHarness {
    pub fn new() -> Self {
        let sandbox = ScriptedSandbox::new();
        let ctrl = BlockEditorController::with_sandbox(sandbox.clone());
        Self { ctrl, sandbox }
    }

    // === Gestures ===

    /// Right click with `kind` selected in the palette.
    pub fn place(&self, kind: BlockKind, x: f32, y: f32) -> BlockId {
        assert!(self.ctrl.select_kind(kind.palette_name()));
        let before = self.block_count();
        self.ctrl.pointer_down_callback()(PointerEventButton::Right, x, y);
        self.ctrl.pointer_up_callback()(PointerEventButton::Right, x, y);
        assert_eq!(self.block_count(), before + 1, "right click should place a block");
        BlockId::from_raw(before as i32).expect("index fits in i32")
    }

    /// Place a block and commit `code` into its text field.
    pub fn place_with_code(&self, kind: BlockKind, x: f32, y: f32, code: &str) -> BlockId {
        let id = self.place(kind, x, y);
        self.ctrl.commit_text_callback()(id.raw(), code.into());
        id
    }

    /// Press the left button at `from`, drag to `to` in one step and release.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.ctrl.pointer_down_callback()(PointerEventButton::Left, from.0, from.1);
        self.ctrl.pointer_drag_callback()(to.0, to.1);
        self.ctrl.pointer_up_callback()(PointerEventButton::Left, to.0, to.1);
    }

    /// Drag a block by grabbing it just inside its start point and moving that
    /// point to `(x, y)`.
    pub fn drag_block_to(&self, id: BlockId, x: f32, y: f32) {
        let start = self.start(id);
        self.drag((start.x + 1.0, start.y + 1.0), (x + 1.0, y + 1.0));
    }

    /// Release the left button without dragging anything.
    pub fn release(&self) -> Option<ResolveReport> {
        let editor = self.ctrl.editor();
        let report = editor
            .borrow_mut()
            .pointer_up(PointerEventButton::Left, Point::ORIGIN);
        report
    }

    pub fn run(&self) -> SharedString {
        self.ctrl.run_callback()()
    }

    // === Inspection ===

    pub fn block_count(&self) -> usize {
        self.ctrl.editor().borrow().graph().len()
    }

    pub fn block(&self, id: BlockId) -> Block {
        self.ctrl
            .editor()
            .borrow()
            .block(id)
            .cloned()
            .expect("block exists")
    }

    pub fn start(&self, id: BlockId) -> Point {
        self.block(id).start_point()
    }

    pub fn heads(&self) -> Vec<BlockId> {
        self.ctrl.editor().borrow().graph().heads()
    }

    pub fn console(&self) -> Vec<String> {
        self.ctrl.console().iter().map(|line| line.to_string()).collect()
    }

    pub fn render(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.ctrl.render(&mut canvas);
        canvas
    }
}
