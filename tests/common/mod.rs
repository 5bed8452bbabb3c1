//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint::Color;
use slint_block_editor::{Canvas, ExecutionResult, Point, Sandbox, ShapeKind, TextField};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One `draw_shape` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    pub kind: ShapeKind,
    pub position: Point,
    pub size: (f32, f32),
    pub color: Color,
}

/// Canvas that records every drawing call.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub shapes: Vec<DrawnShape>,
    /// (text, position)
    pub labels: Vec<(String, Point)>,
    pub text_fields: Vec<TextField>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes_of(&self, kind: ShapeKind) -> Vec<&DrawnShape> {
        self.shapes.iter().filter(|s| s.kind == kind).collect()
    }

    pub fn label_texts(&self) -> Vec<&str> {
        self.labels.iter().map(|(text, _)| text.as_str()).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_shape(&mut self, kind: ShapeKind, position: Point, size: (f32, f32), color: Color) {
        self.shapes.push(DrawnShape {
            kind,
            position,
            size,
            color,
        });
    }

    fn draw_label(&mut self, text: &str, position: Point, _size: (f32, f32)) {
        self.labels.push((text.to_owned(), position));
    }

    fn place_text_field(&mut self, field: TextField) {
        self.text_fields.push(field);
    }
}

/// Sandbox that records submitted programs and replays canned results.
///
/// When the script runs out every program succeeds with empty output.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSandbox {
    pub programs: Rc<RefCell<Vec<String>>>,
    pub results: Rc<RefCell<VecDeque<ExecutionResult>>>,
}

impl ScriptedSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result for the next execution.
    pub fn then(&self, result: ExecutionResult) -> &Self {
        self.results.borrow_mut().push_back(result);
        self
    }

    pub fn run_count(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn last_program(&self) -> Option<String> {
        self.programs.borrow().last().cloned()
    }
}

impl Sandbox for ScriptedSandbox {
    fn execute(&self, source: &str) -> ExecutionResult {
        self.programs.borrow_mut().push(source.to_owned());
        self.results.borrow_mut().pop_front().unwrap_or_default()
    }
}
