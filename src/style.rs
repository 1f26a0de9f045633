//! Colours, layout variables and the push/pop stacks that override them.
//!
//! Nodes, pins and links snapshot the style that is active when they are
//! submitted, so a `push_color` / `pop_color` pair around one node only
//! affects that node.

use crate::error::{EditorError, EditorResult};
use crate::math::Vec2;
use crate::records::PinFlags;
use slint::Color;

/// Indices into [`Style::colors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorStyle {
    NodeBackground,
    NodeBackgroundHovered,
    NodeBackgroundSelected,
    NodeOutline,
    TitleBar,
    TitleBarHovered,
    TitleBarSelected,
    Link,
    LinkHovered,
    LinkSelected,
    Pin,
    PinHovered,
    BoxSelector,
    BoxSelectorOutline,
    GridBackground,
    GridLine,
}

impl ColorStyle {
    pub const COUNT: usize = 16;
}

/// Numeric style variables that can be pushed and popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleVar {
    GridSpacing,
    NodeCornerRounding,
    NodePadding,
    NodeBorderThickness,
    LinkThickness,
    LinkLineSegmentsPerLength,
    LinkHoverDistance,
    PinCircleRadius,
    PinQuadSideLength,
    PinTriangleSideLength,
    PinLineThickness,
    PinHoverRadius,
    PinOffset,
}

/// Value of a [`StyleVar`]; only [`StyleVar::NodePadding`] is a vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleVarValue {
    Float(f32),
    Vec2(Vec2),
}

impl From<f32> for StyleVarValue {
    fn from(value: f32) -> Self {
        StyleVarValue::Float(value)
    }
}

impl From<Vec2> for StyleVarValue {
    fn from(value: Vec2) -> Self {
        StyleVarValue::Vec2(value)
    }
}

/// Attribute flags that can be pushed for a group of attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeFlag {
    /// Dragging a link away from this pin detaches it.
    DetachWithDragClick,
    /// A dragged link is created as soon as it snaps onto this pin.
    CreateOnSnap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleFlags {
    pub node_outline: bool,
    pub grid_lines: bool,
}

impl Default for StyleFlags {
    fn default() -> Self {
        Self {
            node_outline: true,
            grid_lines: true,
        }
    }
}

/// Global editor style. Defaults match the dark colour scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub grid_spacing: f32,

    pub node_corner_rounding: f32,
    pub node_padding: Vec2,
    pub node_border_thickness: f32,

    pub link_thickness: f32,
    pub link_line_segments_per_length: f32,
    pub link_hover_distance: f32,

    pub pin_circle_radius: f32,
    pub pin_quad_side_length: f32,
    pub pin_triangle_side_length: f32,
    pub pin_line_thickness: f32,
    pub pin_hover_radius: f32,
    pub pin_offset: f32,

    pub flags: StyleFlags,
    pub colors: [Color; ColorStyle::COUNT],
}

impl Default for Style {
    fn default() -> Self {
        Self::dark()
    }
}

impl Style {
    fn with_colors(colors: [Color; ColorStyle::COUNT]) -> Self {
        Self {
            grid_spacing: 32.0,
            node_corner_rounding: 4.0,
            node_padding: Vec2::new(8.0, 8.0),
            node_border_thickness: 1.0,
            link_thickness: 3.0,
            link_line_segments_per_length: 0.1,
            link_hover_distance: 10.0,
            pin_circle_radius: 4.0,
            pin_quad_side_length: 7.0,
            pin_triangle_side_length: 9.5,
            pin_line_thickness: 1.0,
            pin_hover_radius: 10.0,
            pin_offset: 0.0,
            flags: StyleFlags::default(),
            colors,
        }
    }

    pub fn dark() -> Self {
        let rgba = |r, g, b, a| Color::from_argb_u8(a, r, g, b);
        Self::with_colors([
            rgba(50, 50, 50, 255),    // NodeBackground
            rgba(75, 75, 75, 255),    // NodeBackgroundHovered
            rgba(75, 75, 75, 255),    // NodeBackgroundSelected
            rgba(100, 100, 100, 255), // NodeOutline
            rgba(41, 74, 122, 255),   // TitleBar
            rgba(66, 150, 250, 255),  // TitleBarHovered
            rgba(66, 150, 250, 255),  // TitleBarSelected
            rgba(61, 133, 224, 200),  // Link
            rgba(66, 150, 250, 255),  // LinkHovered
            rgba(66, 150, 250, 255),  // LinkSelected
            rgba(53, 150, 250, 180),  // Pin
            rgba(53, 150, 250, 255),  // PinHovered
            rgba(61, 133, 224, 30),   // BoxSelector
            rgba(61, 133, 224, 150),  // BoxSelectorOutline
            rgba(40, 40, 50, 200),    // GridBackground
            rgba(200, 200, 200, 40),  // GridLine
        ])
    }

    pub fn light() -> Self {
        let rgba = |r, g, b, a| Color::from_argb_u8(a, r, g, b);
        Self::with_colors([
            rgba(240, 240, 240, 255),
            rgba(240, 240, 240, 255),
            rgba(240, 240, 240, 255),
            rgba(100, 100, 100, 255),
            rgba(248, 248, 248, 255),
            rgba(209, 209, 209, 255),
            rgba(209, 209, 209, 255),
            rgba(66, 150, 250, 100),
            rgba(66, 150, 250, 242),
            rgba(66, 150, 250, 242),
            rgba(66, 150, 250, 160),
            rgba(66, 150, 250, 255),
            rgba(90, 170, 250, 30),
            rgba(90, 170, 250, 150),
            rgba(225, 225, 225, 255),
            rgba(180, 180, 180, 100),
        ])
    }

    pub fn color(&self, item: ColorStyle) -> Color {
        self.colors[item as usize]
    }

    pub fn set_color(&mut self, item: ColorStyle, color: Color) {
        self.colors[item as usize] = color;
    }

    pub fn var(&self, var: StyleVar) -> StyleVarValue {
        use StyleVarValue::Float;
        match var {
            StyleVar::GridSpacing => Float(self.grid_spacing),
            StyleVar::NodeCornerRounding => Float(self.node_corner_rounding),
            StyleVar::NodePadding => StyleVarValue::Vec2(self.node_padding),
            StyleVar::NodeBorderThickness => Float(self.node_border_thickness),
            StyleVar::LinkThickness => Float(self.link_thickness),
            StyleVar::LinkLineSegmentsPerLength => Float(self.link_line_segments_per_length),
            StyleVar::LinkHoverDistance => Float(self.link_hover_distance),
            StyleVar::PinCircleRadius => Float(self.pin_circle_radius),
            StyleVar::PinQuadSideLength => Float(self.pin_quad_side_length),
            StyleVar::PinTriangleSideLength => Float(self.pin_triangle_side_length),
            StyleVar::PinLineThickness => Float(self.pin_line_thickness),
            StyleVar::PinHoverRadius => Float(self.pin_hover_radius),
            StyleVar::PinOffset => Float(self.pin_offset),
        }
    }

    fn float_var_mut(&mut self, var: StyleVar) -> Option<&mut f32> {
        Some(match var {
            StyleVar::GridSpacing => &mut self.grid_spacing,
            StyleVar::NodeCornerRounding => &mut self.node_corner_rounding,
            StyleVar::NodePadding => return None,
            StyleVar::NodeBorderThickness => &mut self.node_border_thickness,
            StyleVar::LinkThickness => &mut self.link_thickness,
            StyleVar::LinkLineSegmentsPerLength => &mut self.link_line_segments_per_length,
            StyleVar::LinkHoverDistance => &mut self.link_hover_distance,
            StyleVar::PinCircleRadius => &mut self.pin_circle_radius,
            StyleVar::PinQuadSideLength => &mut self.pin_quad_side_length,
            StyleVar::PinTriangleSideLength => &mut self.pin_triangle_side_length,
            StyleVar::PinLineThickness => &mut self.pin_line_thickness,
            StyleVar::PinHoverRadius => &mut self.pin_hover_radius,
            StyleVar::PinOffset => &mut self.pin_offset,
        })
    }

    /// Overwrite a style variable. Fails when the value kind does not match.
    pub fn set_var(&mut self, var: StyleVar, value: StyleVarValue) -> EditorResult<()> {
        match (var, value) {
            (StyleVar::NodePadding, StyleVarValue::Vec2(v)) => {
                self.node_padding = v;
                Ok(())
            }
            (var, StyleVarValue::Float(f)) => match self.float_var_mut(var) {
                Some(slot) => {
                    *slot = f;
                    Ok(())
                }
                None => Err(EditorError::StyleVarMismatch(var)),
            },
            (var, StyleVarValue::Vec2(_)) => Err(EditorError::StyleVarMismatch(var)),
        }
    }

    pub(crate) fn node_colors(&self) -> NodeColors {
        NodeColors {
            background: self.color(ColorStyle::NodeBackground),
            background_hovered: self.color(ColorStyle::NodeBackgroundHovered),
            background_selected: self.color(ColorStyle::NodeBackgroundSelected),
            outline: self.color(ColorStyle::NodeOutline),
            titlebar: self.color(ColorStyle::TitleBar),
            titlebar_hovered: self.color(ColorStyle::TitleBarHovered),
            titlebar_selected: self.color(ColorStyle::TitleBarSelected),
        }
    }

    pub(crate) fn node_layout(&self) -> NodeLayout {
        NodeLayout {
            corner_rounding: self.node_corner_rounding,
            padding: self.node_padding,
            border_thickness: self.node_border_thickness,
        }
    }

    pub(crate) fn pin_colors(&self) -> PinColors {
        PinColors {
            background: self.color(ColorStyle::Pin),
            hovered: self.color(ColorStyle::PinHovered),
        }
    }

    pub(crate) fn link_colors(&self) -> LinkColors {
        LinkColors {
            base: self.color(ColorStyle::Link),
            hovered: self.color(ColorStyle::LinkHovered),
            selected: self.color(ColorStyle::LinkSelected),
        }
    }
}

/// Per-node colour snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeColors {
    pub background: Color,
    pub background_hovered: Color,
    pub background_selected: Color,
    pub outline: Color,
    pub titlebar: Color,
    pub titlebar_hovered: Color,
    pub titlebar_selected: Color,
}

/// Per-node layout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeLayout {
    pub corner_rounding: f32,
    pub padding: Vec2,
    pub border_thickness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinColors {
    pub background: Color,
    pub hovered: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinkColors {
    pub base: Color,
    pub hovered: Color,
    pub selected: Color,
}

/// The active style plus the override stacks.
#[derive(Debug, Clone, Default)]
pub struct StyleStack {
    style: Style,
    color_stack: Vec<(ColorStyle, Color)>,
    var_stack: Vec<(StyleVar, StyleVarValue)>,
    flag_stack: Vec<AttributeFlag>,
}

impl StyleStack {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Direct access to the base style. Pushed overrides are applied on top of
    /// it and restored on pop.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn push_color(&mut self, item: ColorStyle, color: Color) {
        self.color_stack.push((item, self.style.color(item)));
        self.style.set_color(item, color);
    }

    pub fn pop_color(&mut self, count: usize) -> EditorResult<()> {
        for _ in 0..count {
            let (item, previous) = self
                .color_stack
                .pop()
                .ok_or(EditorError::StyleStackUnderflow("color"))?;
            self.style.set_color(item, previous);
        }
        Ok(())
    }

    pub fn push_var(&mut self, var: StyleVar, value: impl Into<StyleVarValue>) -> EditorResult<()> {
        let previous = self.style.var(var);
        self.style.set_var(var, value.into())?;
        self.var_stack.push((var, previous));
        Ok(())
    }

    pub fn pop_var(&mut self, count: usize) -> EditorResult<()> {
        for _ in 0..count {
            let (var, previous) = self
                .var_stack
                .pop()
                .ok_or(EditorError::StyleStackUnderflow("style var"))?;
            self.style.set_var(var, previous)?;
        }
        Ok(())
    }

    pub fn push_attribute_flag(&mut self, flag: AttributeFlag) {
        self.flag_stack.push(flag);
    }

    pub fn pop_attribute_flag(&mut self) -> EditorResult<()> {
        self.flag_stack
            .pop()
            .map(|_| ())
            .ok_or(EditorError::StyleStackUnderflow("attribute flag"))
    }

    /// Union of all pushed attribute flags.
    pub fn attribute_flags(&self) -> PinFlags {
        let mut flags = PinFlags::default();
        for flag in &self.flag_stack {
            match flag {
                AttributeFlag::DetachWithDragClick => flags.detach_with_drag_click = true,
                AttributeFlag::CreateOnSnap => flags.create_on_snap = true,
            }
        }
        flags
    }

    /// True when every push has been matched by a pop.
    pub fn is_balanced(&self) -> bool {
        self.color_stack.is_empty() && self.var_stack.is_empty() && self.flag_stack.is_empty()
    }
}
