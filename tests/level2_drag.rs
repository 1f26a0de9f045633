//! Level 2: Node Click & Drag Tests
//!
//! Tests node selection via click, dragging selected nodes and depth order.

mod common;

use common::harness::{EditorHarness, EMPTY_SPACE, NODE_1_BODY, NODE_2_BODY};
use slint_immediate_nodes::{ClickInteraction, Vec2};

#[test]
fn test_press_on_node_starts_node_interaction() {
    let mut harness = EditorHarness::new();
    harness.press(NODE_1_BODY);

    assert_eq!(harness.ctx.hovered_node(), Some(1));
    assert_eq!(*harness.ctx.click_interaction(), ClickInteraction::Node);
    assert_eq!(harness.ctx.selected_nodes(), vec![1]);

    harness.release();
    assert_eq!(*harness.ctx.click_interaction(), ClickInteraction::None);
    assert_eq!(harness.ctx.selected_nodes(), vec![1]);
}

#[test]
fn test_drag_moves_node_by_mouse_delta() {
    let mut harness = EditorHarness::new();
    harness.press(NODE_1_BODY);
    harness.drag_to(NODE_1_BODY + Vec2::new(5.0, -3.0));

    assert_eq!(harness.ctx.node_grid_space_pos(1), Some(Vec2::new(105.0, 97.0)));

    harness.drag_to(NODE_1_BODY + Vec2::new(25.0, 7.0));
    harness.release();

    assert_eq!(harness.ctx.node_grid_space_pos(1), Some(Vec2::new(125.0, 107.0)));
    assert_eq!(harness.ctx.node_grid_space_pos(2), Some(Vec2::new(300.0, 100.0)));
}

#[test]
fn test_press_without_motion_does_not_move_node() {
    let mut harness = EditorHarness::new();
    harness.press(NODE_1_BODY);
    harness.hold();
    harness.release();

    assert_eq!(harness.ctx.node_grid_space_pos(1), Some(Vec2::new(100.0, 100.0)));
}

#[test]
fn test_drag_moves_every_selected_node() {
    let mut harness = EditorHarness::new();
    harness.hover(EMPTY_SPACE);
    harness.ctx.select_node(1);
    harness.ctx.select_node(2);

    // Pressing a node that is already selected keeps the group.
    harness.press(NODE_2_BODY);
    harness.drag_to(NODE_2_BODY + Vec2::new(10.0, 20.0));
    harness.release();

    assert_eq!(harness.ctx.node_grid_space_pos(1), Some(Vec2::new(110.0, 120.0)));
    assert_eq!(harness.ctx.node_grid_space_pos(2), Some(Vec2::new(310.0, 120.0)));
}

#[test]
fn test_non_draggable_node_stays_put() {
    let mut harness = EditorHarness::new();
    harness.hover(EMPTY_SPACE);
    assert!(harness.ctx.set_node_draggable(1, false));

    harness.drag(NODE_1_BODY, NODE_1_BODY + Vec2::new(40.0, 40.0));

    assert!(harness.ctx.is_node_selected(1));
    assert_eq!(harness.ctx.node_grid_space_pos(1), Some(Vec2::new(100.0, 100.0)));
}

#[test]
fn test_click_raises_node_to_top() {
    let mut harness = EditorHarness::new();
    harness.hover(EMPTY_SPACE);
    assert_eq!(harness.ctx.node_depth_order(), &[1, 2]);

    harness.click(NODE_1_BODY);
    assert_eq!(harness.ctx.node_depth_order(), &[2, 1]);
}

#[test]
fn test_topmost_overlapping_node_is_hovered() {
    let mut harness = EditorHarness::new();
    harness.ctx.set_node_grid_space_pos(2, Vec2::new(120.0, 100.0));
    harness.hover(Vec2::new(140.0, 104.0));
    assert_eq!(harness.ctx.hovered_node(), Some(2));

    // Raising node 1 flips which node sits under the mouse.
    harness.click(Vec2::new(104.0, 150.0));
    harness.hover(Vec2::new(140.0, 104.0));
    assert_eq!(harness.ctx.hovered_node(), Some(1));
}
