use crate::error::{Error, Result};
use crate::highlight::Highlight;
use crate::row::Row;
use crate::syntax::Syntax;
use std::borrow::Cow;
use std::cmp;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::slice;

// Contain both actual path sequence and display string
pub struct FilePath {
    pub path: PathBuf,
    pub display: String,
}

impl FilePath {
    fn from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        FilePath {
            path: PathBuf::from(path),
            display: path.to_string_lossy().to_string(),
        }
    }

    fn from_string<S: Into<String>>(s: S) -> Self {
        let display = s.into();
        FilePath {
            path: PathBuf::from(&display),
            display,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CursorDir {
    Left,
    Right,
    Up,
    Down,
}

pub struct Lines<'a>(slice::Iter<'a, Row>);

impl<'a> Iterator for Lines<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| String::from_utf8_lossy(r.chars()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.as_slice().len();
        (len, Some(len))
    }
}

fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<Vec<u8>>> {
    reader
        .split(b'\n')
        .map(|line| {
            let mut line = line?;
            while let Some(b'\r') | Some(b'\n') = line.last() {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}

pub struct TextBuffer {
    // (x, y) coordinate in internal text buffer of rows
    cx: usize,
    cy: usize,
    // File editor is opening
    file: Option<FilePath>,
    // Lines of text buffer
    rows: Vec<Row>,
    // Number of changes since the buffer was loaded or saved
    dirty: usize,
    syntax: Option<&'static Syntax>,
}

impl TextBuffer {
    pub fn empty() -> Self {
        Self {
            cx: 0,
            cy: 0,
            file: None,
            rows: vec![],
            dirty: 0,
            syntax: None,
        }
    }

    fn with_byte_lines(lines: Vec<Vec<u8>>, file: Option<FilePath>) -> Self {
        let syntax = file.as_ref().and_then(|f| Syntax::for_path(&f.path));
        let mut buf = Self {
            cx: 0,
            cy: 0,
            file,
            rows: lines
                .into_iter()
                .enumerate()
                .map(|(idx, line)| Row::new(idx, line))
                .collect(),
            dirty: 0,
            syntax,
        };
        buf.update_all_syntax();
        buf
    }

    pub fn with_lines<'a, I: Iterator<Item = &'a str>>(lines: I) -> Self {
        Self::with_byte_lines(lines.map(|l| l.as_bytes().to_vec()).collect(), None)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lines = File::open(path)
            .and_then(|f| read_lines(io::BufReader::new(f)))
            .map_err(|err| Error::OpenFile(path.to_path_buf(), err))?;
        log::info!("Opened {:?} ({} lines)", path, lines.len());
        Ok(Self::with_byte_lines(lines, Some(FilePath::from(path))))
    }

    fn renumber_from(&mut self, at: usize) {
        for (idx, row) in self.rows.iter_mut().enumerate().skip(at) {
            row.idx = idx;
        }
    }

    // Highlight the row at `at` and go on downwards while the carry state entering the next row
    // differs from the one it was last highlighted with
    fn update_syntax_from(&mut self, at: usize) {
        let syntax = self.syntax;
        let mut y = at;
        while y < self.rows.len() {
            let carry = y > 0 && self.rows[y - 1].hl_open_comment;
            if y > at && self.rows[y].starts_in_comment() == carry {
                break;
            }
            self.rows[y].update_syntax(syntax, carry);
            y += 1;
        }
    }

    fn update_all_syntax(&mut self) {
        let syntax = self.syntax;
        let mut carry = false;
        for row in self.rows.iter_mut() {
            row.update_syntax(syntax, carry);
            carry = row.hl_open_comment;
        }
    }

    pub fn select_syntax(&mut self) {
        self.syntax = self.file.as_ref().and_then(|f| Syntax::for_path(&f.path));
        log::debug!(
            "Selected syntax {:?}",
            self.syntax.map(|s| s.filetype).unwrap_or("none")
        );
        self.update_all_syntax();
    }

    pub fn insert_row<B: Into<Vec<u8>>>(&mut self, at: usize, chars: B) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(at, chars));
        self.renumber_from(at + 1);
        self.update_syntax_from(at);
        self.dirty += 1;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        self.update_syntax_from(at);
        self.dirty += 1;
    }

    pub fn row_insert_char(&mut self, y: usize, at: usize, c: u8) {
        if let Some(row) = self.rows.get_mut(y) {
            row.insert_char(at, c);
            self.update_syntax_from(y);
            self.dirty += 1;
        }
    }

    pub fn row_delete_char(&mut self, y: usize, at: usize) {
        let deleted = self.rows.get_mut(y).map(|row| row.delete_char(at));
        if deleted == Some(true) {
            self.update_syntax_from(y);
            self.dirty += 1;
        }
    }

    pub fn row_append_string(&mut self, y: usize, s: &[u8]) {
        if let Some(row) = self.rows.get_mut(y) {
            row.append(s);
            self.update_syntax_from(y);
            self.dirty += 1;
        }
    }

    // Tail of row `y` from `x` becomes a new row just below it
    pub fn split_row(&mut self, y: usize, x: usize) {
        let tail = match self.rows.get_mut(y) {
            Some(row) => row.split_off(x),
            None => return,
        };
        self.update_syntax_from(y);
        self.insert_row(y + 1, tail);
    }

    pub fn insert_char(&mut self, c: u8) {
        if self.cy == self.rows.len() {
            self.insert_row(self.rows.len(), "");
        }
        self.row_insert_char(self.cy, self.cx, c);
        self.cx += 1;
    }

    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.insert_row(self.cy, "");
        } else {
            self.split_row(self.cy, self.cx);
        }
        self.cy += 1;
        self.cx = 0;
    }

    pub fn open_line_below(&mut self) {
        let at = cmp::min(self.cy + 1, self.rows.len());
        self.insert_row(at, "");
        self.set_cursor(0, at);
    }

    pub fn open_line_above(&mut self) {
        let at = cmp::min(self.cy, self.rows.len());
        self.insert_row(at, "");
        self.set_cursor(0, at);
    }

    // Delete a character at left of the cursor. At head of line, the line is joined into the
    // previous one
    pub fn delete_char(&mut self) {
        if self.cy == self.rows.len() || self.cx == 0 && self.cy == 0 {
            return;
        }
        if self.cx > 0 {
            self.row_delete_char(self.cy, self.cx - 1);
            self.cx -= 1;
        } else {
            let removed = self.rows[self.cy].chars().to_vec();
            self.cx = self.rows[self.cy - 1].len();
            self.row_append_string(self.cy - 1, &removed);
            self.delete_row(self.cy);
            self.cy -= 1;
        }
    }

    pub fn delete_right_char(&mut self) {
        if self.cy == self.rows.len() {
            return;
        }
        self.move_cursor_one(CursorDir::Right);
        self.delete_char();
    }

    pub fn delete_under_cursor(&mut self) {
        if self.cy < self.rows.len() && self.cx < self.rows[self.cy].len() {
            self.row_delete_char(self.cy, self.cx);
        }
        self.clamp_cursor();
    }

    // Snap cursor to end of line when it is beyond the line
    pub fn clamp_cursor(&mut self) {
        if self.cy > self.rows.len() {
            self.cy = self.rows.len();
        }
        let len = self.rows.get(self.cy).map(Row::len).unwrap_or(0);
        if self.cx > len {
            self.cx = len;
        }
    }

    pub fn move_cursor_one(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Up => self.cy = self.cy.saturating_sub(1),
            CursorDir::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    // When moving to left at top of line, move cursor to end of previous line
                    self.cy -= 1;
                    self.cx = self.rows[self.cy].len();
                }
            }
            CursorDir::Down => {
                // Allow to move cursor until next line to the last line of file to enable to add a
                // new line at the end.
                if self.cy < self.rows.len() {
                    self.cy += 1;
                }
            }
            CursorDir::Right => {
                if self.cy < self.rows.len() {
                    if self.cx < self.rows[self.cy].len() {
                        self.cx += 1;
                    } else {
                        // When moving to right at the end of line, move cursor to top of next line.
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
        };
        self.clamp_cursor();
    }

    pub fn move_cursor_page(&mut self, dir: CursorDir, rowoff: usize, num_rows: usize) {
        self.cy = match dir {
            CursorDir::Up => rowoff, // Top of screen
            CursorDir::Down => {
                cmp::min((rowoff + num_rows).saturating_sub(1), self.rows.len()) // Bottom of screen
            }
            _ => unreachable!(),
        };
        for _ in 0..num_rows {
            self.move_cursor_one(dir);
        }
        self.clamp_cursor();
    }

    pub fn move_cursor_to_line_edge(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Left => self.cx = 0,
            CursorDir::Right => {
                if self.cy < self.rows.len() {
                    self.cx = self.rows[self.cy].len();
                }
            }
            _ => unreachable!(),
        }
    }

    pub fn move_cursor_to_buffer_edge(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Up => self.cy = 0,
            CursorDir::Down => self.cy = self.rows.len().saturating_sub(1),
            _ => unreachable!(),
        }
        self.clamp_cursor();
    }

    // Overlays search match on the render span and returns highlights before overlay
    pub fn overlay_match(&mut self, y: usize, rx: usize, len: usize) -> Vec<Highlight> {
        let hl = self.rows[y].highlight_mut();
        let saved = hl.to_vec();
        let end = cmp::min(rx + len, hl.len());
        for h in hl[cmp::min(rx, end)..end].iter_mut() {
            *h = Highlight::Match;
        }
        saved
    }

    pub fn restore_highlight(&mut self, y: usize, saved: &[Highlight]) {
        if let Some(row) = self.rows.get_mut(y) {
            if row.highlight().len() == saved.len() {
                row.highlight_mut().copy_from_slice(saved);
            }
        }
    }

    pub fn rows_to_bytes(&self) -> Vec<u8> {
        let cap = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut buf = Vec::with_capacity(cap);
        for row in self.rows.iter() {
            buf.extend_from_slice(row.chars());
            buf.push(b'\n');
        }
        buf
    }

    pub fn save(&mut self) -> std::result::Result<String, String> {
        let file = if let Some(file) = &self.file {
            file
        } else {
            return Err("No file name".to_string());
        };

        let buf = self.rows_to_bytes();
        let written = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o644)
            .open(&file.path)
            .and_then(|mut f| {
                f.set_len(buf.len() as u64)?;
                f.write_all(&buf)?;
                f.flush()
            });

        match written {
            Ok(()) => {
                log::info!("Wrote {} bytes to {}", buf.len(), file.display);
                self.dirty = 0;
                Ok(format!("{} bytes written to disk", buf.len()))
            }
            Err(err) => {
                log::warn!("Could not write to {}: {}", file.display, err);
                Err(format!("Failed to save: I/O error: {}", err))
            }
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn filename(&self) -> &str {
        self.file
            .as_ref()
            .map(|f| f.display.as_str())
            .unwrap_or("[No Name]")
    }

    pub fn set_file<S: Into<String>>(&mut self, file_path: S) {
        self.file = Some(FilePath::from_string(file_path));
        self.select_syntax();
    }

    pub fn dirty(&self) -> usize {
        self.dirty
    }

    pub fn modified(&self) -> bool {
        self.dirty > 0
    }

    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    pub fn filetype(&self) -> &'static str {
        self.syntax.map(|s| s.filetype).unwrap_or("no ft")
    }

    pub fn cx(&self) -> usize {
        self.cx
    }

    pub fn cy(&self) -> usize {
        self.cy
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cx, self.cy)
    }

    pub fn set_cursor(&mut self, x: usize, y: usize) {
        self.cx = x;
        self.cy = y;
        self.clamp_cursor();
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines(self.rows.iter())
    }
}
