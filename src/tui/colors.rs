//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Header and default accents.
pub const PRIMARY: Color = Color::Rgb(93, 64, 55);
/// Muted text: placeholders, hints.
pub const TEXT_LIGHT: Color = Color::Rgb(141, 110, 99);
/// Text of completed tasks.
pub const TEXT_DONE: Color = Color::Rgb(161, 136, 127);
/// Unfocused input borders.
pub const BORDER: Color = Color::Rgb(215, 204, 200);
/// Done marker and the save action while editing.
pub const SUCCESS: Color = Color::Rgb(85, 139, 47);
/// Overdue tasks and destructive actions.
pub const DANGER: Color = Color::Rgb(216, 67, 21);
/// Row currently loaded into the editor.
pub const EDIT: Color = Color::Rgb(25, 118, 210);
