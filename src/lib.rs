//! # Slint Immediate Nodes
//!
//! An immediate-mode node graph editor core. The host describes its nodes,
//! attributes and links from scratch every frame; the editor keeps only what
//! must persist (node origins, panning, selection, depth order, the gesture in
//! progress) and reports what the user did.
//!
//! ## Features
//!
//! - **Frame-coherent hit testing** - pins, nodes and bezier links resolved
//!   once per frame with occlusion and depth order
//! - **Click interactions** - node dragging, link creation and detaching, box
//!   selection, panning and auto-panning
//! - **Pluggable link rules** - [`LinkValidator`] decides what a dragged link
//!   may snap to
//! - **Renderer agnostic** - drawing goes through the [`Canvas`] trait;
//!   [`SvgPathCanvas`] turns a frame into Slint `Path` commands
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_immediate_nodes::{
//!     EditorContext, InputState, PinKind, PinShape, Rect, SvgPathCanvas, Vec2,
//! };
//!
//! let mut ctx = EditorContext::new();
//! let mut canvas = SvgPathCanvas::new();
//!
//! // every frame
//! let canvas_rect = Rect::from_min_size(Vec2::ZERO, Vec2::new(800.0, 600.0));
//! let mut frame = ctx.begin_editor(input, canvas_rect)?;
//! let mut node = frame.begin_node(1)?;
//! node.title_bar(Vec2::new(80.0, 16.0))?;
//! let mut out = node.begin_attribute(2, PinKind::Output, PinShape::CircleFilled)?;
//! out.content(Vec2::new(60.0, 16.0))?;
//! out.end()?;
//! node.end()?;
//! frame.end(&mut canvas)?;
//!
//! if let Some(link) = ctx.link_created() {
//!     // store link.start_pin -> link.end_pin in the host graph
//! }
//! ```
//!
//! ## Modules
//!
//! - [`frame`] - `begin_editor` and the node/attribute builders
//! - [`context`] - persistent state and queries
//! - [`interaction`] - the click-interaction state machine
//! - [`path`], [`hit_test`] - geometry kernel
//! - [`pool`] - per-frame object pools
//! - [`svg`] - Slint path renderer

pub mod context;
pub mod error;
pub mod frame;
pub mod grid;
pub mod input;
pub mod interaction;
pub mod links;
pub mod math;
pub mod path;
pub mod persistence;
pub mod pool;
pub mod records;
pub mod render;
pub mod selection;
pub mod style;
pub mod svg;

pub use context::{EditorContext, DEFAULT_NODE_ORIGIN};
pub use error::{EditorError, EditorResult};
pub use frame::{AttributeBuilder, EditorFrame, NodeBuilder, Scope};
pub use grid::grid_lines;
pub use hit_test::{
    find_link_at, find_node_at, find_pin_at, links_in_selection_box, nodes_in_selection_box,
    LinkGeometry, NodeGeometry, PinGeometry,
};
pub use input::{InputState, Io, Modifier, Modifiers, MouseButtonState};
pub use interaction::{
    ClickInteraction, CreatedLink, DroppedLink, InteractionEvents, LinkCreation, LinkCreationSource,
};
pub use links::{
    BasicLinkValidator, CompositeValidator, LinkEnds, LinkValidator, NoDuplicatesValidator,
    ValidationError, ValidationResult,
};
pub use math::{Rect, Vec2};
pub use path::CubicBezier;
pub use pool::{ObjectPool, PoolItem};
pub use records::{LinkRecord, NodeRecord, PinFlags, PinKind, PinRecord, PinShape};
pub use render::{Canvas, DrawCommand, DrawList, RoundedCorners};
pub use selection::SelectionManager;
pub use style::{AttributeFlag, ColorStyle, Style, StyleFlags, StyleStack, StyleVar, StyleVarValue};
pub use svg::{PathLayer, SvgPathCanvas};
