use crate::error::Result;
use crate::highlight::Highlight;
use crate::input::KeySeq;
use crate::screen::Screen;
use crate::status_bar::StatusBar;
use crate::text_buffer::TextBuffer;
use std::io::Write;

#[derive(PartialEq, Debug)]
pub enum PromptResult {
    Canceled,
    Input(String),
}

// Sized is necessary to move self
pub trait Action: Sized {
    fn new<W: Write>(prompt: &mut Prompt<'_, W>) -> Self;

    // Returns bool which represents whether screen redraw is necessary
    fn on_seq<W: Write>(
        &mut self,
        _prompt: &mut Prompt<'_, W>,
        _input: &str,
        _seq: KeySeq,
    ) -> Result<bool> {
        Ok(false)
    }

    fn on_end<W: Write>(
        self, // Note: Consumes self
        _prompt: &mut Prompt<'_, W>,
        result: PromptResult,
    ) -> Result<PromptResult> {
        Ok(result)
    }
}

pub struct NoAction;
impl Action for NoAction {
    fn new<W: Write>(_prompt: &mut Prompt<'_, W>) -> Self {
        Self
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum FindDir {
    Back,
    Forward,
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub struct TextSearch {
    // Cursor and scroll offsets before search started
    saved_cursor: (usize, usize),
    saved_scroll: (usize, usize),
    last_match: Option<usize>,
    dir: FindDir,
    // Highlights of the matched row before the match was overlaid
    saved_hl: Option<(usize, Vec<Highlight>)>,
}

impl TextSearch {
    fn cleanup_match_highlight(&mut self, buf: &mut TextBuffer) {
        if let Some((y, hl)) = self.saved_hl.take() {
            buf.restore_highlight(y, &hl);
        }
    }

    fn handle_seq(&mut self, seq: KeySeq) {
        use KeySeq::*;
        match seq {
            RightKey | DownKey => self.dir = FindDir::Forward,
            LeftKey | UpKey => self.dir = FindDir::Back,
            _ => {
                // Query was modified. Search again from the top
                self.last_match = None;
                self.dir = FindDir::Forward;
            }
        }
    }

    fn next_row(&self, current: Option<usize>, num_rows: usize) -> usize {
        match (current, self.dir) {
            (None, FindDir::Forward) => 0,
            (None, FindDir::Back) => num_rows - 1,
            (Some(y), FindDir::Forward) if y + 1 >= num_rows => 0,
            (Some(y), FindDir::Forward) => y + 1,
            (Some(0), FindDir::Back) => num_rows - 1,
            (Some(y), FindDir::Back) => y - 1,
        }
    }

    fn search<W: Write>(&mut self, query: &str, prompt: &mut Prompt<'_, W>) {
        let num_rows = prompt.buf.rows().len();
        if num_rows == 0 {
            return;
        }
        if self.last_match.is_none() {
            self.dir = FindDir::Forward;
        }

        let mut current = self.last_match;
        for _ in 0..num_rows {
            let y = self.next_row(current, num_rows);
            current = Some(y);

            let row = &prompt.buf.rows()[y];
            let rx = match find_bytes(row.render(), query.as_bytes()) {
                Some(rx) => rx,
                None => continue,
            };

            self.last_match = Some(y);
            let cx = row.cx_from_rx(rx);
            prompt.buf.set_cursor(cx, y);
            // Scroll offset beyond the last row makes next render put the matched row at top of screen
            prompt.screen.rowoff = num_rows;
            let saved = prompt.buf.overlay_match(y, rx, query.len());
            self.saved_hl = Some((y, saved));
            log::debug!("Search {:?} matched at ({}, {})", query, cx, y);
            return;
        }
    }
}

impl Action for TextSearch {
    fn new<W: Write>(prompt: &mut Prompt<'_, W>) -> Self {
        Self {
            saved_cursor: prompt.buf.cursor(),
            saved_scroll: (prompt.screen.rowoff, prompt.screen.coloff),
            last_match: None,
            dir: FindDir::Forward,
            saved_hl: None,
        }
    }

    fn on_seq<W: Write>(
        &mut self,
        prompt: &mut Prompt<'_, W>,
        input: &str,
        seq: KeySeq,
    ) -> Result<bool> {
        self.cleanup_match_highlight(prompt.buf);
        self.handle_seq(seq);

        if input.is_empty() {
            return Ok(true);
        }

        self.search(input, prompt);
        Ok(true)
    }

    fn on_end<W: Write>(
        mut self,
        prompt: &mut Prompt<'_, W>,
        result: PromptResult,
    ) -> Result<PromptResult> {
        self.cleanup_match_highlight(prompt.buf);

        if result == PromptResult::Canceled {
            let (cx, cy) = self.saved_cursor;
            prompt.buf.set_cursor(cx, cy);
            let (rowoff, coloff) = self.saved_scroll;
            prompt.screen.rowoff = rowoff;
            prompt.screen.coloff = coloff;
        }

        Ok(result)
    }
}

// Prompt text such as "Search: {}" is split at "{}". User input is never interpreted as template
struct PromptTemplate<'a> {
    prefix: &'a str,
    suffix: &'a str,
}

impl<'a> PromptTemplate<'a> {
    fn parse(template: &'a str) -> Self {
        let (prefix, suffix) = template.split_once("{}").unwrap_or((template, ""));
        Self { prefix, suffix }
    }

    fn build(&self, input: &str) -> String {
        let cap = self.prefix.len() + self.suffix.len() + input.len();
        let mut buf = String::with_capacity(cap);
        buf.push_str(self.prefix);
        buf.push_str(input);
        buf.push_str(self.suffix);
        buf
    }

    fn cursor_col(&self, input: &str) -> usize {
        self.prefix.len() + input.len() + 1 // Just after the input
    }
}

pub struct Prompt<'a, W: Write> {
    screen: &'a mut Screen<W>,
    buf: &'a mut TextBuffer,
    sb: &'a mut StatusBar,
}

impl<'a, W: Write> Prompt<'a, W> {
    pub fn new<'s: 'a, 'tb: 'a, 'sb: 'a>(
        screen: &'s mut Screen<W>,
        buf: &'tb mut TextBuffer,
        sb: &'sb mut StatusBar,
    ) -> Self {
        Self { screen, buf, sb }
    }

    fn render_screen(&mut self, input: &str, template: &PromptTemplate<'_>) -> Result<()> {
        self.screen.set_info_message(template.build(input));
        self.sb.update(self.buf, self.sb.mode);
        self.screen.render(self.buf, self.sb)?;
        self.sb.redraw = false;

        let row = self.screen.rows() + 2;
        let col = template.cursor_col(input);
        self.screen.force_set_cursor(row, col)?;
        Ok(())
    }

    // Reads a line on the message bar. Escape cancels the prompt and Enter confirms non-empty input.
    pub fn run<A, S, I>(&mut self, prompt: S, mut input: I) -> Result<PromptResult>
    where
        A: Action,
        S: AsRef<str>,
        I: Iterator<Item = Result<KeySeq>>,
    {
        let mut action = A::new(self);
        let mut buf = String::new();
        let mut confirmed = false;
        let template = PromptTemplate::parse(prompt.as_ref());

        self.render_screen("", &template)?;

        while let Some(seq) = input.next() {
            use KeySeq::*;

            let seq = seq?;
            if self.screen.maybe_resize(&mut input)? {
                self.sb.redraw = true;
                self.render_screen(&buf, &template)?;
            }

            let prev_len = buf.len();
            match seq {
                Unidentified | Cursor(..) => continue,
                Backspace | DeleteKey | Key(0x08) => {
                    buf.pop();
                }
                Key(0x1b) => break,
                Key(b'\r') if !buf.is_empty() => {
                    confirmed = true;
                    break;
                }
                Key(b) if b == b' ' || b.is_ascii_graphic() => buf.push(b as char),
                _ => {}
            }

            let should_render = action.on_seq(self, buf.as_str(), seq)?;

            if should_render || prev_len != buf.len() {
                self.render_screen(&buf, &template)?;
            }
        }

        self.screen.unset_message();
        let result = if confirmed {
            PromptResult::Input(buf)
        } else {
            PromptResult::Canceled
        };

        action.on_end(self, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ENTER, ESC};
    use crate::mode::Mode;
    use std::io;

    fn keys(s: &str) -> Vec<Result<KeySeq>> {
        s.bytes().map(|b| Ok(KeySeq::Key(b))).collect()
    }

    fn run_prompt<A: Action>(
        buf: &mut TextBuffer,
        seqs: Vec<Result<KeySeq>>,
    ) -> (PromptResult, (usize, usize)) {
        let mut screen = Screen::new(Some((80, 24)), std::iter::empty(), io::sink()).unwrap();
        let mut sb = StatusBar::from_buffer(buf, Mode::Normal);
        let mut prompt = Prompt::new(&mut screen, buf, &mut sb);
        let result = prompt.run::<A, _, _>("Test: {}", seqs.into_iter()).unwrap();
        (result, (screen.rowoff, screen.coloff))
    }

    #[test]
    fn template() {
        let t = PromptTemplate::parse("Search: {} (Use ESC/Arrow/Enter)");
        assert_eq!(t.build("foo"), "Search: foo (Use ESC/Arrow/Enter)");
        assert_eq!(t.cursor_col("foo"), 12);
        let t = PromptTemplate::parse("no placeholder");
        assert_eq!(t.build("x"), "no placeholderx");
    }

    #[test]
    fn user_input_is_not_a_template() {
        let t = PromptTemplate::parse("Cmd: {}");
        assert_eq!(t.build("{}%s"), "Cmd: {}%s");
    }

    #[test]
    fn prompt_input_and_erase() {
        let mut buf = TextBuffer::empty();
        let mut seqs = keys("wq");
        seqs.push(Ok(KeySeq::Backspace));
        seqs.push(Ok(ENTER));
        let (result, _) = run_prompt::<NoAction>(&mut buf, seqs);
        assert_eq!(result, PromptResult::Input("w".to_string()));
    }

    #[test]
    fn empty_enter_is_ignored() {
        let mut buf = TextBuffer::empty();
        let mut seqs = vec![Ok(ENTER), Ok(KeySeq::Key(0x01))];
        seqs.extend(keys("q\r"));
        let (result, _) = run_prompt::<NoAction>(&mut buf, seqs);
        assert_eq!(result, PromptResult::Input("q".to_string()));
    }

    #[test]
    fn escape_cancels() {
        let mut buf = TextBuffer::empty();
        let mut seqs = keys("abc");
        seqs.push(Ok(ESC));
        let (result, _) = run_prompt::<NoAction>(&mut buf, seqs);
        assert_eq!(result, PromptResult::Canceled);
    }

    #[test]
    fn search_forward_wraps() {
        let lines = ["alpha", "beta", "gamma", "beta2", "delta"];
        let mut buf = TextBuffer::with_lines(lines.iter().copied());
        let mut seqs = keys("beta");
        seqs.push(Ok(ENTER));
        let (result, _) = run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(result, PromptResult::Input("beta".to_string()));
        assert_eq!(buf.cursor(), (0, 1));

        let mut seqs = keys("beta");
        seqs.push(Ok(KeySeq::RightKey));
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(buf.cursor(), (0, 3));

        let mut seqs = keys("beta");
        seqs.push(Ok(KeySeq::DownKey));
        seqs.push(Ok(KeySeq::DownKey));
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(buf.cursor(), (0, 1));
    }

    #[test]
    fn search_backward() {
        let lines = ["ab", "xab", "ab"];
        let mut buf = TextBuffer::with_lines(lines.iter().copied());
        let mut seqs = keys("ab");
        seqs.push(Ok(KeySeq::LeftKey));
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        // Found at row 0 first, then going back wraps to the last row
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn search_column_with_tab() {
        let mut buf = TextBuffer::with_lines(["\tfoo"].iter().copied());
        let mut seqs = keys("foo");
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(buf.cursor(), (1, 0));
    }

    #[test]
    fn search_restores_highlight_on_end() {
        let mut buf = TextBuffer::with_lines(["foo bar"].iter().copied());
        let mut seqs = keys("bar");
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        assert!(buf.rows()[0].highlight().iter().all(|h| *h == Highlight::Normal));
    }

    #[test]
    fn search_cancel_restores_cursor() {
        let lines = ["alpha", "beta", "gamma"];
        let mut buf = TextBuffer::with_lines(lines.iter().copied());
        buf.set_cursor(2, 2);
        let mut seqs = keys("beta");
        seqs.push(Ok(ESC));
        let (result, scroll) = run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(result, PromptResult::Canceled);
        assert_eq!(buf.cursor(), (2, 2));
        assert_eq!(scroll, (0, 0));
    }

    #[test]
    fn search_not_found_keeps_cursor() {
        let mut buf = TextBuffer::with_lines(["abc", "def"].iter().copied());
        buf.set_cursor(1, 1);
        let mut seqs = keys("zzz");
        seqs.push(Ok(ENTER));
        run_prompt::<TextSearch>(&mut buf, seqs);
        assert_eq!(buf.cursor(), (1, 1));
    }
}
