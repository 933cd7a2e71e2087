use crate::ansi_color::{AnsiColor, ColorSupport};
use crate::error::{Error, Result};
use crate::input::KeySeq;
use crate::row::Row;
use crate::signal::ResizeWatcher;
use crate::status_bar::StatusBar;
use crate::text_buffer::TextBuffer;
use std::cmp;
use std::io::Write;
use std::time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const HELP: &str = "HELP: :w = save | / = find | :q = quit";
// Seconds while status message is displayed
const MESSAGE_EXPIRY_SECS: u64 = 5;

#[derive(PartialEq, Debug)]
enum StatusMessageKind {
    Info,
    Error,
}

struct StatusMessage {
    text: String,
    timestamp: SystemTime,
    kind: StatusMessageKind,
}

impl StatusMessage {
    fn new<S: Into<String>>(message: S, kind: StatusMessageKind) -> StatusMessage {
        StatusMessage {
            text: message.into(),
            timestamp: SystemTime::now(),
            kind,
        }
    }
}

fn get_window_size<I, W>(input: I, mut output: W) -> Result<(usize, usize)>
where
    I: Iterator<Item = Result<KeySeq>>,
    W: Write,
{
    if let Some(s) = term_size::dimensions_stdout() {
        return Ok(s);
    }

    // By moving cursor at the bottom-right corner by 'B' and 'C' commands, get the size of
    // current screen. \x1b[9999;9999H is not available since it does not guarantee cursor
    // stops on the corner. Finaly command 'n' queries cursor position.
    output.write_all(b"\x1b[9999C\x1b[9999B\x1b[6n")?;
    output.flush()?;

    // Wait for response from terminal discarding other sequences
    for seq in input {
        if let KeySeq::Cursor(r, c) = seq? {
            return Ok((c, r));
        }
    }

    Err(Error::UnknownWindowSize) // Give up
}

pub struct Screen<W: Write> {
    output: W,
    // X coordinate in `render` text of rows
    rx: usize,
    // Screen size
    num_cols: usize,
    num_rows: usize,
    message: Option<StatusMessage>,
    resize: ResizeWatcher,
    // Scroll position (row/col offset)
    pub rowoff: usize,
    pub coloff: usize,
    pub color_support: ColorSupport,
}

impl<W: Write> Screen<W> {
    pub fn new<I>(window_size: Option<(usize, usize)>, input: I, mut output: W) -> Result<Self>
    where
        I: Iterator<Item = Result<KeySeq>>,
    {
        let (w, h) = match window_size {
            Some(s) => s,
            None => get_window_size(input, &mut output)?,
        };

        if w == 0 || h < 3 {
            return Err(Error::TooSmallWindow(w, h));
        }

        log::debug!("Window size: {}x{}", w, h);

        Ok(Self {
            output,
            rx: 0,
            num_cols: w,
            // Screen height is 2 lines less than window height due to status bar and message bar
            num_rows: h - 2,
            message: Some(StatusMessage::new(HELP, StatusMessageKind::Info)),
            resize: ResizeWatcher::new()?,
            rowoff: 0,
            coloff: 0,
            color_support: ColorSupport::from_env(),
        })
    }

    fn write_color(&self, buf: &mut Vec<u8>, color: AnsiColor) {
        buf.extend_from_slice(color.sequence(self.color_support));
    }

    fn draw_status_bar(&self, buf: &mut Vec<u8>, status_bar: &StatusBar) -> Result<()> {
        write!(buf, "\x1b[{}H", self.num_rows + 1)?;
        self.write_color(buf, AnsiColor::BoldInvert);

        let left = status_bar.left();
        let left = &left.as_bytes()[..cmp::min(left.len(), self.num_cols)];
        buf.extend_from_slice(left); // Left of status bar

        let rest_len = self.num_cols - left.len();
        let right = status_bar.right();
        if right.len() <= rest_len {
            // Add spaces at center of status bar
            buf.resize(buf.len() + rest_len - right.len(), b' ');
            buf.extend_from_slice(right.as_bytes());
        } else {
            buf.resize(buf.len() + rest_len, b' ');
        }

        self.write_color(buf, AnsiColor::ResetAll);
        Ok(())
    }

    fn draw_message_bar(&self, buf: &mut Vec<u8>) -> Result<()> {
        write!(buf, "\x1b[{}H", self.num_rows + 2)?;
        buf.extend_from_slice(b"\x1b[K");
        let message = match &self.message {
            Some(m) => m,
            None => return Ok(()),
        };
        match SystemTime::now().duration_since(message.timestamp) {
            Ok(d) if d.as_secs() < MESSAGE_EXPIRY_SECS => {}
            _ => return Ok(()),
        }

        let msg = &message.text.as_bytes()[..cmp::min(message.text.len(), self.num_cols)];
        if message.kind == StatusMessageKind::Error {
            self.write_color(buf, AnsiColor::RedBG);
            buf.extend_from_slice(msg);
            self.write_color(buf, AnsiColor::ResetAll);
        } else {
            buf.extend_from_slice(msg);
        }
        Ok(())
    }

    fn draw_welcome_message(&self, buf: &mut Vec<u8>) {
        let msg = format!("Helis editor -- version {}", VERSION);
        let welcome = &msg.as_bytes()[..cmp::min(msg.len(), self.num_cols)];
        let padding = (self.num_cols - welcome.len()) / 2;
        if padding > 0 {
            buf.push(b'~');
            buf.resize(buf.len() + padding - 1, b' ');
        }
        buf.extend_from_slice(welcome);
    }

    fn draw_row(&self, buf: &mut Vec<u8>, row: &Row) {
        let render = row.render();
        let start = cmp::min(self.coloff, render.len());
        let end = cmp::min(self.coloff + self.num_cols, render.len());

        let mut prev_color = AnsiColor::Reset;
        for (&c, &hl) in render[start..end].iter().zip(row.highlight()[start..end].iter()) {
            if c.is_ascii_control() {
                // Show control character as ^@, ^A, ... with inverted color
                let sym = if c <= 26 { b'@' + c } else { b'?' };
                self.write_color(buf, AnsiColor::Invert);
                buf.push(sym);
                self.write_color(buf, AnsiColor::ResetAll);
                if prev_color != AnsiColor::Reset {
                    self.write_color(buf, prev_color); // Restore color reset by the above
                }
                continue;
            }

            let color = hl.color();
            if color != prev_color {
                self.write_color(buf, color);
                prev_color = color;
            }
            buf.push(c);
        }

        self.write_color(buf, AnsiColor::Reset);
    }

    fn draw_rows(&self, buf: &mut Vec<u8>, rows: &[Row]) -> Result<()> {
        for y in 0..self.num_rows {
            let file_row = y + self.rowoff;

            // Move cursor to target line
            write!(buf, "\x1b[{}H", y + 1)?;

            if file_row >= rows.len() {
                if rows.is_empty() && y == self.num_rows / 3 {
                    self.draw_welcome_message(buf);
                } else {
                    buf.push(b'~');
                }
            } else {
                self.draw_row(buf, &rows[file_row]);
            }

            // Erases the part of the line to the right of the cursor. http://vt100.net/docs/vt100-ug/chapter3.html#EL
            buf.extend_from_slice(b"\x1b[K");
        }
        Ok(())
    }

    fn do_scroll(&mut self, rows: &[Row], cx: usize, cy: usize) {
        // Calculate X coordinate to render considering tab stop
        self.rx = rows.get(cy).map(|r| r.rx_from_cx(cx)).unwrap_or(0);

        // Adjust scroll position when cursor is outside screen
        if cy < self.rowoff {
            // Scroll up when cursor is above the top of window
            self.rowoff = cy;
        }
        if cy >= self.rowoff + self.num_rows {
            // Scroll down when cursor is below the bottom of screen
            self.rowoff = cy - self.num_rows + 1;
        }
        if self.rx < self.coloff {
            self.coloff = self.rx;
        }
        if self.rx >= self.coloff + self.num_cols {
            self.coloff = self.rx - self.num_cols + 1;
        }
    }

    pub fn render(&mut self, text: &TextBuffer, status_bar: &StatusBar) -> Result<()> {
        let (cx, cy) = text.cursor();
        self.do_scroll(text.rows(), cx, cy);

        let mut buf = Vec::with_capacity((self.num_rows + 2) * self.num_cols);

        // Hide cursor while updating screen. 'l' is command to set mode http://vt100.net/docs/vt100-ug/chapter3.html#SM
        buf.extend_from_slice(b"\x1b[?25l");
        buf.extend_from_slice(status_bar.mode.cursor_shape());

        self.draw_rows(&mut buf, text.rows())?;
        if status_bar.redraw {
            self.draw_status_bar(&mut buf, status_bar)?;
        }
        self.draw_message_bar(&mut buf)?;

        // Move cursor
        let cursor_row = cy - self.rowoff + 1;
        let cursor_col = self.rx - self.coloff + 1;
        write!(buf, "\x1b[{};{}H", cursor_row, cursor_col)?;

        // Reveal cursor again. 'h' is command to reset mode https://vt100.net/docs/vt100-ug/chapter3.html#RM
        buf.extend_from_slice(b"\x1b[?25h");

        self.output.write_all(&buf)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn force_set_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        write!(self.output, "\x1b[{};{}H", row, col)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        // 2: Argument of 'J' command to reset entire screen
        // J: Command to erase screen http://vt100.net/docs/vt100-ug/chapter3.html#ED
        self.output.write_all(b"\x1b[2J")?;
        // Set cursor position to left-top corner
        self.output.write_all(b"\x1b[H")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn maybe_resize<I>(&mut self, input: I) -> Result<bool>
    where
        I: Iterator<Item = Result<KeySeq>>,
    {
        if !self.resize.take_resized() {
            return Ok(false);
        }

        let (w, h) = get_window_size(input, &mut self.output)?;
        if w == 0 || h < 3 {
            return Err(Error::TooSmallWindow(w, h));
        }
        log::info!("Window resized to {}x{}", w, h);
        self.num_cols = w;
        self.num_rows = h - 2;
        Ok(true)
    }

    pub fn set_info_message<S: Into<String>>(&mut self, message: S) {
        self.message = Some(StatusMessage::new(message, StatusMessageKind::Info));
    }

    pub fn set_error_message<S: Into<String>>(&mut self, message: S) {
        self.message = Some(StatusMessage::new(message, StatusMessageKind::Error));
    }

    pub fn unset_message(&mut self) {
        self.message = None;
    }

    pub fn message_text(&self) -> &str {
        self.message.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }

    pub fn rows(&self) -> usize {
        self.num_rows
    }

    pub fn cols(&self) -> usize {
        self.num_cols
    }

    pub fn rx(&self) -> usize {
        self.rx
    }
}
