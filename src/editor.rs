use crate::error::Result;
use crate::input::KeySeq;
use crate::keymap::{lookup, InsertAction, NormalAction, INSERT_KEYMAP, NORMAL_KEYMAP};
use crate::mode::Mode;
use crate::prompt::{Action, NoAction, Prompt, PromptResult, TextSearch};
use crate::screen::Screen;
use crate::status_bar::StatusBar;
use crate::text_buffer::{CursorDir, Lines, TextBuffer};
use std::io::Write;
use std::mem;
use std::path::Path;

pub struct Editor<I: Iterator<Item = Result<KeySeq>>, W: Write> {
    input: I, // Escape sequences stream represented as Iterator
    mode: Mode,
    pending_g: bool, // After first 'g' of 'gg' in normal mode
    screen: Screen<W>,
    buf: TextBuffer,
    status_bar: StatusBar,
}

impl<I, W> Editor<I, W>
where
    I: Iterator<Item = Result<KeySeq>>,
    W: Write,
{
    fn with_buf(
        buf: TextBuffer,
        mut input: I,
        output: W,
        window_size: Option<(usize, usize)>,
    ) -> Result<Editor<I, W>> {
        let screen = Screen::new(window_size, &mut input, output)?;
        let status_bar = StatusBar::from_buffer(&buf, Mode::Normal);
        Ok(Editor {
            input,
            mode: Mode::Normal,
            pending_g: false,
            screen,
            buf,
            status_bar,
        })
    }

    pub fn new(input: I, output: W, window_size: Option<(usize, usize)>) -> Result<Editor<I, W>> {
        Self::with_buf(TextBuffer::empty(), input, output, window_size)
    }

    pub fn with_lines<'a, L: Iterator<Item = &'a str>>(
        lines: L,
        input: I,
        output: W,
        window_size: Option<(usize, usize)>,
    ) -> Result<Editor<I, W>> {
        Self::with_buf(TextBuffer::with_lines(lines), input, output, window_size)
    }

    pub fn open<P: AsRef<Path>>(
        input: I,
        output: W,
        window_size: Option<(usize, usize)>,
        path: P,
    ) -> Result<Editor<I, W>> {
        let buf = TextBuffer::open(path)?;
        Self::with_buf(buf, input, output, window_size)
    }

    fn render_screen(&mut self) -> Result<()> {
        self.status_bar.update(&self.buf, self.mode);
        self.screen.render(&self.buf, &self.status_bar)?;
        self.status_bar.redraw = false;
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("Mode {} -> {}", self.mode.name(), mode.name());
            self.mode = mode;
        }
    }

    fn prompt<A: Action>(&mut self, prompt: &str) -> Result<PromptResult> {
        // Status bar shows the mode while prompting
        self.status_bar.set_mode(self.mode);
        Prompt::new(&mut self.screen, &mut self.buf, &mut self.status_bar)
            .run::<A, _, _>(prompt, &mut self.input)
    }

    fn save(&mut self) -> Result<()> {
        if !self.buf.has_file() {
            match self.prompt::<NoAction>("Save as: {}")? {
                PromptResult::Input(path) => self.buf.set_file(path),
                PromptResult::Canceled => {
                    self.screen.set_info_message("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.buf.save() {
            Ok(msg) => self.screen.set_info_message(msg),
            Err(msg) => self.screen.set_error_message(msg),
        }
        Ok(())
    }

    fn find(&mut self) -> Result<()> {
        self.prompt::<TextSearch>("Search: {} (Use ESC/Arrow/Enter)")?;
        Ok(())
    }

    // Returns true when the editor should quit
    fn cmd_prompt(&mut self) -> Result<bool> {
        self.set_mode(Mode::Cmd);

        let quit = match self.prompt::<NoAction>("Cmd: {}")? {
            PromptResult::Canceled => false,
            PromptResult::Input(cmd) => {
                log::info!("Command {:?}", cmd);
                match cmd.as_str() {
                    "q" | "quit" => true,
                    "w" | "write" => {
                        self.save()?;
                        false
                    }
                    _ => false,
                }
            }
        };

        self.set_mode(Mode::Normal);
        Ok(quit)
    }

    fn handle_not_mapped(&mut self, seq: KeySeq) {
        self.screen
            .set_error_message(format!("Key '{}' not mapped", seq));
    }

    fn process_normal_keypress(&mut self, seq: KeySeq) -> Result<bool> {
        use NormalAction::*;

        let rowoff = self.screen.rowoff;
        let rows = self.screen.rows();
        let pending_g = mem::take(&mut self.pending_g);

        let action = match lookup(NORMAL_KEYMAP, seq) {
            Some(action) => action,
            None => {
                self.handle_not_mapped(seq);
                return Ok(false);
            }
        };

        match action {
            Move(dir) => self.buf.move_cursor_one(dir),
            LineStart => self.buf.move_cursor_to_line_edge(CursorDir::Left),
            LineEnd => self.buf.move_cursor_to_line_edge(CursorDir::Right),
            BufferEnd => self.buf.move_cursor_to_buffer_edge(CursorDir::Down),
            PendingG if pending_g => self.buf.move_cursor_to_buffer_edge(CursorDir::Up),
            PendingG => self.pending_g = true,
            PageUp => self.buf.move_cursor_page(CursorDir::Up, rowoff, rows),
            PageDown => self.buf.move_cursor_page(CursorDir::Down, rowoff, rows),
            InsertBefore => self.set_mode(Mode::Insert),
            InsertAtLineStart => {
                self.buf.move_cursor_to_line_edge(CursorDir::Left);
                self.set_mode(Mode::Insert);
            }
            InsertAfter => {
                // Cursor stays on the same line even at end of line
                let (cx, cy) = self.buf.cursor();
                self.buf.set_cursor(cx + 1, cy);
                self.set_mode(Mode::Insert);
            }
            AppendAtLineEnd => {
                self.buf.move_cursor_to_line_edge(CursorDir::Right);
                self.set_mode(Mode::Insert);
            }
            OpenLineBelow => {
                self.buf.open_line_below();
                self.set_mode(Mode::Insert);
            }
            OpenLineAbove => {
                self.buf.open_line_above();
                self.set_mode(Mode::Insert);
            }
            DeleteUnderCursor => self.buf.delete_under_cursor(),
            Search => self.find()?,
            CmdPrompt => return self.cmd_prompt(),
            Stay => self.set_mode(Mode::Normal),
        }

        Ok(false)
    }

    fn process_insert_keypress(&mut self, seq: KeySeq) {
        use InsertAction::*;

        let rowoff = self.screen.rowoff;
        let rows = self.screen.rows();

        match lookup(INSERT_KEYMAP, seq) {
            Some(Move(dir)) => self.buf.move_cursor_one(dir),
            Some(LineStart) => self.buf.move_cursor_to_line_edge(CursorDir::Left),
            Some(LineEnd) => self.buf.move_cursor_to_line_edge(CursorDir::Right),
            Some(PageUp) => self.buf.move_cursor_page(CursorDir::Up, rowoff, rows),
            Some(PageDown) => self.buf.move_cursor_page(CursorDir::Down, rowoff, rows),
            Some(Newline) => self.buf.insert_newline(),
            Some(DeleteBack) => self.buf.delete_char(),
            Some(DeleteForward) => self.buf.delete_right_char(),
            Some(LeaveInsert) => self.set_mode(Mode::Normal),
            None => match seq {
                KeySeq::Key(b) => self.buf.insert_char(b),
                _ => self.handle_not_mapped(seq),
            },
        }
    }

    // Returns true when the editor should quit
    fn process_keypress(&mut self, seq: KeySeq) -> Result<bool> {
        if let KeySeq::Unidentified | KeySeq::Cursor(..) = seq {
            return Ok(false);
        }

        match self.mode {
            Mode::Normal => self.process_normal_keypress(seq),
            Mode::Insert => {
                self.process_insert_keypress(seq);
                Ok(false)
            }
            // Cmd mode is left before returning from cmd_prompt() and Visual mode is never entered
            Mode::Cmd | Mode::Visual => {
                self.set_mode(Mode::Normal);
                Ok(false)
            }
        }
    }

    fn edit_loop(&mut self) -> Result<()> {
        self.render_screen()?; // First paint

        while let Some(seq) = self.input.next() {
            if self.screen.maybe_resize(&mut self.input)? {
                self.screen.unset_message();
                self.status_bar.redraw = true;
            }

            if self.process_keypress(seq?)? {
                log::info!("Quit");
                break;
            }

            self.render_screen()?;
        }

        Ok(())
    }

    pub fn edit(&mut self) -> Result<()> {
        let result = self.edit_loop();
        // Clear screen on exit even if editing failed
        let cleared = self.screen.clear();
        result.and(cleared)
    }

    pub fn lines(&self) -> Lines<'_> {
        self.buf.lines()
    }

    pub fn buf(&self) -> &TextBuffer {
        &self.buf
    }

    pub fn screen(&self) -> &'_ Screen<W> {
        &self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}
