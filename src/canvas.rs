//! Drawing surface the editor paints blocks onto.
//!
//! The core never talks to a window directly. It describes every block as a
//! handful of colored rectangles, captions and editable text fields, and a
//! host-side [`Canvas`] turns those into whatever its UI toolkit needs.

use crate::block::{Block, BlockId, BlockKind, NestForm, BLOCK_UNIT, FRAME_WIDTH};
use crate::geometry::{Point, Rect};
use slint::{Color, SharedString};

/// Role of a rectangle in a block's chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Colored outline of the header.
    Frame,
    /// White interior of the header.
    Body,
    /// Vertical bar down the left of a nest block's body.
    Bar,
    /// Closing marker under a nest block's body.
    EndMarker,
}

/// An editable code fragment placed over a block.
///
/// The host reports edits back through
/// [`BlockEditor::set_block_code`](crate::BlockEditor::set_block_code).
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub block: BlockId,
    pub position: Point,
    pub size: (f32, f32),
    pub text: SharedString,
}

/// Host drawing capability.
pub trait Canvas {
    fn draw_shape(&mut self, kind: ShapeKind, position: Point, size: (f32, f32), color: Color);

    /// Fixed, non-editable text such as a block caption.
    fn draw_label(&mut self, text: &str, position: Point, size: (f32, f32));

    fn place_text_field(&mut self, field: TextField);
}

/// Outline color for a block kind.
pub fn block_color(kind: BlockKind) -> Color {
    match kind {
        BlockKind::Function => Color::from_rgb_f32(1.0, 0.0, 0.0),
        BlockKind::Argument => Color::from_rgb_f32(0.0, 1.0, 0.0),
        BlockKind::Nest(NestForm::If) => Color::from_rgb_f32(0.0, 0.0, 1.0),
        BlockKind::Nest(NestForm::Class) => Color::from_rgb_f32(0.7, 0.7, 0.7),
        BlockKind::Nest(NestForm::Define) | BlockKind::Declare => {
            Color::from_rgb_f32(0.5, 0.3, 0.7)
        }
        BlockKind::Call => Color::from_rgb_f32(1.0, 1.0, 0.0),
    }
}

pub fn body_color() -> Color {
    Color::from_rgb_f32(1.0, 1.0, 1.0)
}

/// Split the header interior into caption and text-field areas.
fn header_areas(block: &Block) -> (Option<Rect>, Option<Rect>) {
    let body = block.header_rect().inset(FRAME_WIDTH);
    let kind = block.kind();
    let has_caption = kind.caption().is_some() || !kind.has_text_field();

    match (has_caption, kind.has_text_field()) {
        (true, true) => {
            let caption_width = BLOCK_UNIT.min(body.width);
            let caption = Rect::new(body.x, body.y, caption_width, body.height);
            let field = Rect::new(
                body.x + caption_width,
                body.y,
                body.width - caption_width,
                body.height,
            );
            (Some(caption), Some(field))
        }
        (true, false) => (Some(body), None),
        (false, _) => (None, Some(body)),
    }
}

/// Paint one block.
pub fn render_block(canvas: &mut dyn Canvas, id: BlockId, block: &Block) {
    let color = block_color(block.kind());
    let header = block.header_rect();
    canvas.draw_shape(ShapeKind::Frame, header.origin(), header.size(), color);

    let body = header.inset(FRAME_WIDTH);
    canvas.draw_shape(ShapeKind::Body, body.origin(), body.size(), body_color());

    if let Some(bar) = block.bar_rect() {
        canvas.draw_shape(ShapeKind::Bar, bar.origin(), bar.size(), color);
    }
    if let Some(marker) = block.marker_rect() {
        canvas.draw_shape(ShapeKind::EndMarker, marker.origin(), marker.size(), color);
    }

    let (caption_area, field_area) = header_areas(block);
    if let Some(area) = caption_area {
        let text = block.kind().caption().unwrap_or(block.code());
        canvas.draw_label(text, area.origin(), area.size());
    }
    if let Some(area) = field_area {
        canvas.place_text_field(TextField {
            block: id,
            position: area.origin(),
            size: area.size(),
            text: block.code().into(),
        });
    }
}
