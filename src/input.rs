//! Per-frame input snapshot and the input configuration.
//!
//! The embedding toolkit fills an [`InputState`] before every
//! [`begin_editor`](crate::EditorContext::begin_editor). The editor never reads
//! input from anywhere else.

use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseButtonState {
    /// Held this frame.
    pub down: bool,
    /// Went down this frame.
    pub clicked: bool,
    /// Went up this frame.
    pub released: bool,
    /// Held and moved past the toolkit's drag threshold.
    pub dragging: bool,
}

impl MouseButtonState {
    pub const IDLE: MouseButtonState = MouseButtonState {
        down: false,
        clicked: false,
        released: false,
        dragging: false,
    };

    pub fn pressed() -> Self {
        Self {
            down: true,
            clicked: true,
            ..Self::IDLE
        }
    }

    pub fn dragged() -> Self {
        Self {
            down: true,
            dragging: true,
            ..Self::IDLE
        }
    }

    pub fn released() -> Self {
        Self {
            released: true,
            ..Self::IDLE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn is_held(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Super => self.super_key,
        }
    }
}

/// Everything the editor needs to know about the mouse and keyboard this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputState {
    /// Mouse position in screen space.
    pub mouse_pos: Vec2,
    /// Mouse movement since the previous frame.
    pub mouse_delta: Vec2,
    pub primary: MouseButtonState,
    /// The panning button (usually the middle button).
    pub alt: MouseButtonState,
    pub modifiers: Modifiers,
    /// A host widget inside a node is hovered.
    pub item_hovered: bool,
    /// A host widget inside a node holds the mouse.
    pub item_active: bool,
    /// The mouse is over the editor canvas and not covered by another window.
    pub canvas_hovered: bool,
    /// Seconds since the previous frame.
    pub delta_time: f32,
}

impl InputState {
    /// Idle input with the mouse at `pos` over the canvas.
    pub fn at(pos: Vec2) -> Self {
        Self {
            mouse_pos: pos,
            canvas_hovered: true,
            delta_time: 1.0 / 60.0,
            ..Self::default()
        }
    }

    /// The effective panning button, taking three-button emulation into account.
    pub fn panning_button(&self, io: &Io) -> MouseButtonState {
        match io.emulate_three_button_mouse {
            Some(modifier) if self.modifiers.is_held(modifier) => self.primary,
            _ => self.alt,
        }
    }
}

/// Input configuration for an editor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Io {
    /// Clicking a link while this modifier is held detaches it from the
    /// closest pin.
    pub link_detach_with_modifier_click: Option<Modifier>,
    /// Clicking a node while this modifier is held toggles it in the selection.
    pub multiple_select_modifier: Modifier,
    /// Holding this modifier turns the primary button into the panning button.
    pub emulate_three_button_mouse: Option<Modifier>,
    /// Canvas scroll speed in pixels per second while dragging outside it.
    pub auto_panning_speed: f32,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            link_detach_with_modifier_click: None,
            multiple_select_modifier: Modifier::Ctrl,
            emulate_three_button_mouse: None,
            auto_panning_speed: 1000.0,
        }
    }
}
