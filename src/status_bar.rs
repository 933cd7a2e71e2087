use crate::mode::Mode;
use crate::text_buffer::TextBuffer;

#[derive(Default)]
pub struct StatusBar {
    pub modified: bool,
    pub filename: String,
    pub filetype: &'static str,
    pub mode: Mode,
    pub line_pos: (usize, usize),
    pub redraw: bool,
}

macro_rules! setter {
    ($method:ident, $field:ident, $t:ty) => {
        pub fn $method(&mut self, $field: $t) {
            if self.$field != $field {
                self.redraw = true;
                self.$field = $field;
            }
        }
    };
    ($method:ident, $field:ident, $t:ty, $conv:expr) => {
        pub fn $method(&mut self, $field: $t) {
            if self.$field != $field {
                self.redraw = true;
                self.$field = $conv;
            }
        }
    };
}

impl StatusBar {
    setter!(set_modified, modified, bool);
    setter!(set_filename, filename, &str, filename.to_string());
    setter!(set_filetype, filetype, &'static str);
    setter!(set_mode, mode, Mode);
    setter!(set_line_pos, line_pos, (usize, usize));

    pub fn from_buffer(buf: &TextBuffer, mode: Mode) -> Self {
        let mut sb = Self::default();
        sb.update(buf, mode);
        sb.redraw = true;
        sb
    }

    // File name is truncated to 20 characters
    pub fn left(&self) -> String {
        let name: String = self.filename.chars().take(20).collect();
        format!(
            "{} - {} lines {}",
            name,
            self.line_pos.1,
            if self.modified { "(modified)" } else { "" }
        )
    }

    pub fn right(&self) -> String {
        let (y, len) = self.line_pos;
        format!("[{}] | {} | {}:{}", self.mode.name(), self.filetype, y, len)
    }

    pub fn update(&mut self, buf: &TextBuffer, mode: Mode) {
        self.set_modified(buf.modified());
        self.set_filetype(buf.filetype());
        self.set_filename(buf.filename());
        self.set_mode(mode);
        self.set_line_pos((buf.cy() + 1, buf.rows().len()));
    }
}
