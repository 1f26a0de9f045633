//! Level 5: Persistence Tests
//!
//! Tests saving and restoring the editor layout through the ini format.

mod common;

use common::harness::{EditorHarness, EMPTY_SPACE, NODE_1_BODY};
use slint_immediate_nodes::{EditorContext, EditorError, Vec2};

#[test]
fn test_layout_round_trips_through_ini() {
    let mut harness = EditorHarness::new();
    harness.drag(NODE_1_BODY, NODE_1_BODY + Vec2::new(30.0, 12.0));
    harness.ctx.set_panning(Vec2::new(-20.0, 5.0));

    let saved = harness.ctx.save_state_to_ini_string();

    let mut restored = EditorHarness::new();
    restored.ctx = EditorContext::new();
    restored.ctx.load_state_from_ini_string(&saved).unwrap();
    restored.hover(EMPTY_SPACE);

    assert_eq!(restored.ctx.panning(), Vec2::new(-20.0, 5.0));
    assert_eq!(restored.ctx.node_grid_space_pos(1), Some(Vec2::new(130.0, 112.0)));
    assert_eq!(restored.ctx.node_grid_space_pos(2), Some(Vec2::new(300.0, 100.0)));
    assert_eq!(restored.pin_pos(11), Vec2::new(166.0, 155.0));
}

#[test]
fn test_load_before_first_frame_positions_new_nodes() {
    let mut harness = EditorHarness::new();
    harness.ctx = EditorContext::new();
    harness
        .ctx
        .load_state_from_ini_string("[node.1]\norigin=10,20\n")
        .unwrap();
    harness.hover(EMPTY_SPACE);

    assert_eq!(harness.ctx.node_screen_space_pos(1), Some(Vec2::new(10.0, 20.0)));
    assert_eq!(harness.pin_pos(10), Vec2::new(10.0, 38.0));
}

#[test]
fn test_load_updates_live_nodes() {
    let mut harness = EditorHarness::new();
    harness.hover(EMPTY_SPACE);

    harness
        .ctx
        .load_state_from_ini_string("[node.2]\norigin=500,300\n")
        .unwrap();
    harness.hover(EMPTY_SPACE);

    assert_eq!(harness.pin_pos(20), Vec2::new(500.0, 318.0));
}

#[test]
fn test_malformed_ini_is_rejected() {
    let mut ctx = EditorContext::new();
    let err = ctx
        .load_state_from_ini_string("[editor]\npanning=1;2\n")
        .unwrap_err();

    match err {
        EditorError::MalformedIni { line, content } => {
            assert_eq!(line, 2);
            assert_eq!(content, "panning=1;2");
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(ctx.panning(), Vec2::ZERO);
}

#[test]
fn test_ini_file_round_trip() {
    let file_name = format!("slint-immediate-nodes-{}.ini", std::process::id());
    let path = std::env::temp_dir().join(file_name);

    let mut ctx = EditorContext::new();
    ctx.set_node_grid_space_pos(4, Vec2::new(7.0, 8.0));
    ctx.save_state_to_ini_file(&path).unwrap();

    let mut loaded = EditorContext::new();
    loaded.load_state_from_ini_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.node_grid_space_pos(4), Some(Vec2::new(7.0, 8.0)));
}

#[test]
fn test_missing_file_is_io_error() {
    let mut ctx = EditorContext::new();
    let result = ctx.load_state_from_ini_file("/nonexistent/dir/editor.ini");
    assert!(matches!(result, Err(EditorError::Io(_))));
}
