use crate::highlight::{self, Highlight};
use crate::syntax::Syntax;

pub const TAB_STOP: usize = 4;

// One line of text. `chars` is the raw content and `render` is the content as drawn on screen
// (tabs expanded). `hl` has exactly one class per byte of `render`.
#[derive(Default, Debug)]
pub struct Row {
    pub idx: usize,
    chars: Vec<u8>,
    render: Vec<u8>,
    hl: Vec<Highlight>,
    // Whether this row ends inside an unterminated block comment
    pub hl_open_comment: bool,
    // Carry state this row was last highlighted with. Used to stop propagation early
    starts_in_comment: bool,
}

impl Row {
    pub fn new<B: Into<Vec<u8>>>(idx: usize, chars: B) -> Row {
        let mut row = Row {
            idx,
            chars: chars.into(),
            ..Default::default()
        };
        row.update_render();
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    pub fn highlight_mut(&mut self) -> &mut [Highlight] {
        &mut self.hl
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn starts_in_comment(&self) -> bool {
        self.starts_in_comment
    }

    // Rebuilds `render` from `chars`. Highlight is reset to normal so that both always have the
    // same length; callers run the highlighter afterwards.
    pub fn update_render(&mut self) {
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();
        self.render = Vec::with_capacity(self.chars.len() + tabs * (TAB_STOP - 1));
        for &b in self.chars.iter() {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
        self.hl.clear();
        self.hl.resize(self.render.len(), Highlight::Normal);
    }

    // Returns true when the carry flag at end of this row changed
    pub fn update_syntax(&mut self, syntax: Option<&Syntax>, starts_in_comment: bool) -> bool {
        self.starts_in_comment = starts_in_comment;
        let open = match syntax {
            Some(syntax) => {
                highlight::highlight_line(syntax, &self.render, &mut self.hl, starts_in_comment)
            }
            None => {
                for hl in self.hl.iter_mut() {
                    *hl = Highlight::Normal;
                }
                false
            }
        };
        let changed = self.hl_open_comment != open;
        self.hl_open_comment = open;
        changed
    }

    pub fn rx_from_cx(&self, cx: usize) -> usize {
        self.chars.iter().take(cx).fold(0, |rx, &b| {
            if b == b'\t' {
                // Proceed TAB_STOP spaces then subtract spaces by mod TAB_STOP
                rx + TAB_STOP - (rx % TAB_STOP)
            } else {
                rx + 1
            }
        })
    }

    pub fn cx_from_rx(&self, rx: usize) -> usize {
        let mut current_rx = 0;
        for (cx, &b) in self.chars.iter().enumerate() {
            if b == b'\t' {
                current_rx += TAB_STOP - (current_rx % TAB_STOP);
            } else {
                current_rx += 1;
            }
            if current_rx > rx {
                return cx; // Found
            }
        }
        self.chars.len() // Fall back to end of line
    }

    // Note: 'at' is an index of chars, not render text. Out of range index means end of line
    pub fn insert_char(&mut self, at: usize, c: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update_render();
    }

    // Returns false when nothing was deleted
    pub fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update_render();
        true
    }

    pub fn append(&mut self, s: &[u8]) {
        self.chars.extend_from_slice(s);
        self.update_render();
    }

    // Cuts the row at `at` and returns the removed tail
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update_render();
        tail
    }
}
