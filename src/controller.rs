//! High-level controller for block editor applications.
//!
//! The [`BlockEditorController`] owns a [`BlockEditor`] behind a shared
//! handle and hands out closures ready to be plugged into Slint callbacks.
//!
//! # Example
//!
//! ```ignore
//! use slint_block_editor::BlockEditorController;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = BlockEditorController::new();
//!
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_drag(ctrl.pointer_drag_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!     window.on_commit_text(ctrl.commit_text_callback());
//!     window.on_select_kind(ctrl.select_kind_callback());
//!
//!     window.set_console(ctrl.console().into());
//!     window.on_run({
//!         let run = ctrl.run_callback();
//!         let w = window.as_weak();
//!         move || {
//!             if let Some(w) = w.upgrade() {
//!                 w.set_code(run());
//!             }
//!         }
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::block::{BlockId, BlockKind};
use crate::canvas::Canvas;
use crate::editor::BlockEditor;
use crate::geometry::Point;
use crate::sandbox::{ExecutionResult, Sandbox};
use slint::platform::PointerEventButton;
use slint::{SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Controller that wires a [`BlockEditor`] to UI callbacks.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct BlockEditorController {
    editor: Rc<RefCell<BlockEditor>>,
    console: Rc<VecModel<SharedString>>,
}

impl Default for BlockEditorController {
    fn default() -> Self {
        Self::with_editor(BlockEditor::default())
    }
}

impl BlockEditorController {
    /// Create a controller running programs with the system Python.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller running programs in `sandbox`.
    pub fn with_sandbox(sandbox: impl Sandbox + 'static) -> Self {
        Self::with_editor(BlockEditor::new(sandbox))
    }

    pub fn with_editor(editor: BlockEditor) -> Self {
        Self {
            editor: Rc::new(RefCell::new(editor)),
            console: Rc::new(VecModel::default()),
        }
    }

    /// Get access to the underlying editor.
    pub fn editor(&self) -> Rc<RefCell<BlockEditor>> {
        self.editor.clone()
    }

    /// Output lines of the last run, error text last.
    pub fn console(&self) -> Rc<VecModel<SharedString>> {
        self.console.clone()
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-down(button, x, y)`.
    pub fn pointer_down_callback(&self) -> impl Fn(PointerEventButton, f32, f32) {
        let editor = self.editor.clone();
        move |button, x, y| {
            editor.borrow_mut().pointer_down(button, Point::new(x, y));
        }
    }

    /// Returns a callback for `pointer-drag(x, y)`.
    pub fn pointer_drag_callback(&self) -> impl Fn(f32, f32) {
        let editor = self.editor.clone();
        move |x, y| editor.borrow_mut().pointer_drag(Point::new(x, y))
    }

    /// Returns a callback for `pointer-up(button, x, y)`.
    pub fn pointer_up_callback(&self) -> impl Fn(PointerEventButton, f32, f32) {
        let editor = self.editor.clone();
        move |button, x, y| {
            editor.borrow_mut().pointer_up(button, Point::new(x, y));
        }
    }

    /// Returns a callback for `run()`.
    ///
    /// The callback returns the generated program, or an empty string when
    /// nothing could run. The console is only updated when a program ran.
    pub fn run_callback(&self) -> impl Fn() -> SharedString {
        let ctrl = self.clone();
        move || ctrl.run()
    }

    /// Returns a callback for `commit-text(block-id, text)`.
    pub fn commit_text_callback(&self) -> impl Fn(i32, SharedString) {
        let ctrl = self.clone();
        move |block_id, text| {
            ctrl.commit_text(block_id, &text);
        }
    }

    /// Returns a callback for `select-kind(name)` taking a palette name such
    /// as `"print"` or `"if"`.
    pub fn select_kind_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |name| {
            ctrl.select_kind(&name);
        }
    }

    // === Direct handlers ===

    pub fn run(&self) -> SharedString {
        let mut editor = self.editor.borrow_mut();
        let Some(result) = editor.run() else {
            return SharedString::default();
        };
        self.console.set_vec(console_lines(result));
        editor.last_code().map(SharedString::from).unwrap_or_default()
    }

    /// Commit text-field contents. Returns `false` for unknown block ids.
    pub fn commit_text(&self, block_id: i32, text: &str) -> bool {
        match BlockId::from_raw(block_id) {
            Some(id) => self.editor.borrow_mut().set_block_code(id, text),
            None => false,
        }
    }

    /// Select the kind placed by right clicks. Returns `false` for unknown
    /// palette names.
    pub fn select_kind(&self, name: &str) -> bool {
        match BlockKind::from_palette_name(name) {
            Some(kind) => {
                self.editor.borrow_mut().select_kind(kind);
                true
            }
            None => {
                trace!(name, "unknown palette entry");
                false
            }
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.editor.borrow().render(canvas);
    }
}

fn console_lines(result: &ExecutionResult) -> Vec<SharedString> {
    result
        .stdout
        .lines()
        .chain(result.error.as_deref())
        .map(SharedString::from)
        .collect()
}
