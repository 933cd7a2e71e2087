// Refs:
//   Build Your Own Text Editor: https://viewsourcecode.org/snaptoken/kilo/index.html
//   VT100 User Guide: https://vt100.net/docs/vt100-ug/chapter3.html

mod ansi_color;
mod editor;
mod error;
mod highlight;
mod input;
mod keymap;
mod mode;
mod prompt;
mod row;
mod screen;
mod signal;
mod status_bar;
mod syntax;
mod text_buffer;

#[cfg(test)]
mod ui_test;

pub use editor::Editor;
pub use error::{Error, Result};
pub use highlight::Highlight;
pub use input::{InputSequences, KeySeq, StdinRawMode};
pub use mode::Mode;
pub use row::{Row, TAB_STOP};
pub use screen::{Screen, HELP, VERSION};
pub use syntax::{Syntax, HLDB};
pub use text_buffer::{CursorDir, Lines, TextBuffer};
