/// Editing mode of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cursor movement and commands
    Normal,
    /// Reserved. No key enters this mode
    Visual,
    /// Text insertion
    Insert,
    /// Line command prompt (`:w`, `:q`). Always returns to `Normal`
    Cmd,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Visual => "Visual",
            Mode::Insert => "Insert",
            Mode::Cmd => "Cmd",
        }
    }

    // DECSCUSR sequence. Steady block in Normal, steady bar in Insert
    pub fn cursor_shape(self) -> &'static [u8] {
        match self {
            Mode::Insert => b"\x1b[5 q",
            _ => b"\x1b[1 q",
        }
    }
}
