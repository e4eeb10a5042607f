//! Style tables consumed by the widgets and the panel machinery.
//!
//! One [`Style`] value lives on the context. Widgets read it every frame, so
//! apps can swap any part of it between widgets and restore it afterwards;
//! highlighting a single card works exactly that way.

use crate::{Color, Vec2};

/// When a press-and-release cycle counts as a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickTrigger {
    /// Activate on the press that starts inside the widget.
    OnPress,
    /// Activate when a press that started inside the widget is released
    /// inside it.
    #[default]
    OnRelease,
}

#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            color: Color::from_rgb(210, 210, 210),
            size: 16.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonStyle {
    pub normal: Color,
    pub hover: Color,
    pub active: Color,
    pub text_normal: Color,
    pub text_hover: Color,
    pub text_active: Color,
    pub border_color: Color,
    pub border: f32,
    pub rounding: f32,
    pub padding: Vec2,
    pub touch_padding: Vec2,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        ButtonStyle {
            normal: Color::from_rgb(50, 50, 50),
            hover: Color::from_rgb(64, 64, 64),
            active: Color::from_rgb(40, 40, 40),
            text_normal: Color::from_rgb(210, 210, 210),
            text_hover: Color::from_rgb(235, 235, 235),
            text_active: Color::from_rgb(235, 235, 235),
            border_color: Color::from_rgb(65, 65, 65),
            border: 1.0,
            rounding: 4.0,
            padding: Vec2::new(4.0, 4.0),
            touch_padding: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HeaderStyle {
    pub background: Color,
    pub text: Color,
    pub height: f32,
    pub padding: Vec2,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        HeaderStyle {
            background: Color::from_rgb(40, 40, 40),
            text: Color::from_rgb(200, 200, 200),
            height: 30.0,
            padding: Vec2::new(8.0, 4.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WindowStyle {
    pub background: Color,
    pub border_color: Color,
    pub border: f32,
    /// Inset between the window edge and its content.
    pub padding: Vec2,
    /// Inset applied inside nested group panels (cards included).
    pub group_padding: Vec2,
    /// Gap between layout rows (y) and row columns (x).
    pub spacing: Vec2,
    pub header: HeaderStyle,
}

impl Default for WindowStyle {
    fn default() -> Self {
        WindowStyle {
            background: Color::from_rgb(45, 45, 45),
            border_color: Color::from_rgb(65, 65, 65),
            border: 2.0,
            padding: Vec2::new(8.0, 8.0),
            group_padding: Vec2::new(4.0, 4.0),
            spacing: Vec2::new(4.0, 4.0),
            header: HeaderStyle::default(),
        }
    }
}

/// Per-call card configuration.
///
/// The three state colors would be fill descriptors (color or image) in a
/// fuller style system; image fills are out of scope, so they are plain
/// colors here. `color_factor_background` and `color_factor_text` uniformly
/// scale the resolved background/text colors, saturating at white.
#[derive(Clone, Copy, Debug)]
pub struct CardStyle {
    pub rounding: f32,
    /// Outset reserved around the card inside its layout row.
    pub margin: Vec2,
    /// Inset between the card edge and its content panel. Must satisfy
    /// `padding * 2 >= rounding` per axis or child content may overlap the
    /// rounded border.
    pub padding: Vec2,
    /// Extra hit-test slack; never affects the visual rectangle.
    pub touch_padding: Vec2,
    pub border: f32,
    pub border_color: Color,
    pub normal: Color,
    pub hover: Color,
    pub active: Color,
    pub text_normal: Color,
    pub text_hover: Color,
    pub text_active: Color,
    pub color_factor_background: f32,
    pub color_factor_text: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        CardStyle {
            rounding: 10.0,
            margin: Vec2::new(10.0, 10.0),
            padding: Vec2::new(5.0, 5.0),
            touch_padding: Vec2::new(5.0, 5.0),
            border: 1.0,
            border_color: Color::from_rgb(200, 200, 200),
            normal: Color::from_rgb(100, 100, 100),
            hover: Color::from_rgb(120, 120, 120),
            active: Color::from_rgb(80, 80, 80),
            text_normal: Color::from_rgb(235, 235, 235),
            text_hover: Color::WHITE,
            text_active: Color::WHITE,
            color_factor_background: 1.0,
            color_factor_text: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Style {
    pub window: WindowStyle,
    pub button: ButtonStyle,
    pub text: TextStyle,
    pub card: CardStyle,
    pub click_trigger: ClickTrigger,
    pub clear_color: Color,
}

impl Style {
    pub fn dark() -> Self {
        Style {
            clear_color: Color::from_rgb(30, 30, 30),
            ..Style::default()
        }
    }
}
