//! Level 3: Connection Tests
//!
//! Tests proximity-based linking: sequential and argument snapping, the
//! distance threshold, insertion-order tie-breaking and idempotence.

mod common;

use common::harness::BlockEditorHarness;
use slint_block_editor::{
    check_slot, BlockEditor, BlockKind, Point, ResolverConfig, Slot, SlotCheck, SlotRejection,
    BLOCK_UNIT, DISTANCE_RANGE,
};

// ============================================================================
// Sequential slot
// ============================================================================

#[test]
fn test_sequential_snap_is_exact() {
    let harness = BlockEditorHarness::new();
    let a = harness.place(BlockKind::Call, 100.0, 100.0);
    let b = harness.place(BlockKind::Call, 110.0, 160.0);

    let report = harness.release().expect("left release resolves");

    assert_eq!(report.links, 1);
    assert_eq!(harness.block(a).next_block(), Some(b));
    assert_eq!(harness.block(b).back_block(), Some(a));
    assert_eq!(harness.start(b), harness.block(a).end_point());
}

#[test]
fn test_distance_threshold_is_strict() {
    let harness = BlockEditorHarness::new();
    let a = harness.place(BlockKind::Call, 0.0, 0.0);
    let b = harness.place(BlockKind::Call, 0.0, BLOCK_UNIT + DISTANCE_RANGE);

    let report = harness.release().expect("left release resolves");

    assert_eq!(report.links, 0);
    assert_eq!(harness.block(a).next_block(), None);
    assert_eq!(harness.start(b), Point::new(0.0, BLOCK_UNIT + DISTANCE_RANGE));
}

#[test]
fn test_custom_distance_range() {
    let mut editor = BlockEditor::new(common::ScriptedSandbox::new())
        .with_config(ResolverConfig::new().with_distance_range(40.0));
    let a = editor.place_block(BlockKind::Call, Point::ORIGIN);
    let b = editor.place_block(BlockKind::Call, Point::new(0.0, BLOCK_UNIT + 30.0));

    editor.resolve_connections();

    assert_eq!(editor.graph()[a].next_block(), Some(b));
}

#[test]
fn test_snap_cascades_down_a_chain() {
    let harness = BlockEditorHarness::new();
    let a = harness.place(BlockKind::Call, 0.0, 0.0);
    let b = harness.place(BlockKind::Call, 5.0, 55.0);
    let c = harness.place(BlockKind::Call, 12.0, 110.0);

    harness.release();

    assert_eq!(harness.start(b), Point::new(0.0, BLOCK_UNIT));
    assert_eq!(harness.start(c), Point::new(0.0, 2.0 * BLOCK_UNIT));
    assert_eq!(harness.heads(), vec![a]);
}

// ============================================================================
// Argument slot
// ============================================================================

#[test]
fn test_argument_snaps_to_elem_point() {
    let harness = BlockEditorHarness::new();
    let print = harness.place(BlockKind::Function, 0.0, 0.0);
    let arg = harness.place(BlockKind::Argument, 105.0, 5.0);

    harness.release();

    assert_eq!(harness.block(print).elem_block(), Some(arg));
    assert_eq!(harness.block(arg).back_block(), Some(print));
    assert_eq!(harness.start(arg), Point::new(2.0 * BLOCK_UNIT, 0.0));
    assert_eq!(harness.heads(), vec![print]);
}

#[test]
fn test_argument_blocks_never_link_outward() {
    let harness = BlockEditorHarness::new();
    let arg = harness.place(BlockKind::Argument, 0.0, 0.0);
    let below = harness.place(BlockKind::Call, 0.0, BLOCK_UNIT);
    let beside = harness.place(BlockKind::Argument, 2.0 * BLOCK_UNIT, 0.0);

    let report = harness.release().expect("left release resolves");

    assert_eq!(report.links, 0);
    let links = *harness.block(arg).links();
    assert_eq!(links.next, None);
    assert_eq!(links.elem, None);
    assert_eq!(harness.heads(), vec![arg, below, beside]);
}

#[test]
fn test_statement_blocks_do_not_fill_argument_slot() {
    let harness = BlockEditorHarness::new();
    let print = harness.place(BlockKind::Function, 0.0, 0.0);
    harness.place(BlockKind::Call, 2.0 * BLOCK_UNIT, 0.0);

    harness.release();

    assert_eq!(harness.block(print).elem_block(), None);
}

#[test]
fn test_argument_does_not_follow_in_sequence() {
    let harness = BlockEditorHarness::new();
    let print = harness.place(BlockKind::Function, 0.0, 0.0);
    harness.place(BlockKind::Argument, 0.0, BLOCK_UNIT);

    harness.release();

    assert_eq!(harness.block(print).next_block(), None);
    assert_eq!(harness.heads().len(), 2);
}

// ============================================================================
// Contention
// ============================================================================

#[test]
fn test_first_inserted_candidate_wins_over_closer_one() {
    let harness = BlockEditorHarness::new();
    let a = harness.place(BlockKind::Call, 0.0, 0.0);
    let far = harness.place(BlockKind::Call, 0.0, 65.0);
    let near = harness.place(BlockKind::Call, 2.0, 52.0);

    harness.release();

    assert_eq!(harness.block(a).next_block(), Some(far));
    assert_eq!(harness.start(far), Point::new(0.0, BLOCK_UNIT));
    assert_eq!(harness.start(near), Point::new(2.0, 52.0));
    assert_eq!(harness.heads(), vec![a, near]);
}

#[test]
fn test_filled_slot_reported_as_contention() {
    let mut editor = BlockEditor::new(common::ScriptedSandbox::new());
    let a = editor.place_block(BlockKind::Call, Point::ORIGIN);
    let b = editor.place_block(BlockKind::Call, Point::new(0.0, BLOCK_UNIT));
    let c = editor.place_block(BlockKind::Call, Point::new(0.0, BLOCK_UNIT + 1.0));
    editor.resolve_connections();

    let check = check_slot(editor.graph(), a, c, Slot::Sequential, DISTANCE_RANGE);
    assert_eq!(check, SlotCheck::Reject(SlotRejection::SlotFilled(b)));
    if let SlotCheck::Reject(reason) = check {
        assert!(reason.is_contention());
    }
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_second_resolve_changes_nothing() {
    let harness = BlockEditorHarness::new();
    let ids = [
        harness.place(BlockKind::Declare, 0.0, 0.0),
        harness.place(BlockKind::Argument, 203.0, 4.0),
        harness.place(BlockKind::Function, 3.0, 47.0),
        harness.place(BlockKind::Argument, 98.0, 55.0),
        harness.place(BlockKind::Call, 7.0, 104.0),
    ];

    let first = harness.release();
    let snapshot: Vec<_> = ids.iter().map(|&id| harness.block(id)).collect();
    let second = harness.release();
    let again: Vec<_> = ids.iter().map(|&id| harness.block(id)).collect();

    assert_eq!(first, second);
    assert_eq!(snapshot, again);
    assert_eq!(harness.heads(), vec![ids[0]]);
}
