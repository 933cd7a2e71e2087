use crate::ansi_color::AnsiColor;
use crate::syntax::{Syntax, SECONDARY_MARKER};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Highlight {
    Normal,
    Comment,
    BlockComment,
    Keyword,
    Type,
    String,
    Number,
    Match,
}

impl Default for Highlight {
    fn default() -> Self {
        Highlight::Normal
    }
}

impl Highlight {
    pub fn color(self) -> AnsiColor {
        use AnsiColor::*;
        use Highlight::*;
        match self {
            Normal => Reset,
            Comment | BlockComment => Cyan,
            Keyword => Yellow,
            Type => Green,
            String => Purple,
            Number => Red,
            Match => Blue,
        }
    }
}

pub fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'\0' || b",.()+-/*=~%<>[];".contains(&b)
}

enum ParseStep {
    Ahead(usize),
    Break,
}

struct Highlighter<'a> {
    syntax: &'a Syntax,
    prev_sep: bool,
    in_string: Option<u8>,
    in_comment: bool,
}

impl<'a> Highlighter<'a> {
    fn new(syntax: &'a Syntax, in_comment: bool) -> Self {
        Self {
            syntax,
            prev_sep: true,
            in_string: None,
            in_comment,
        }
    }

    fn eat_n(&mut self, out: &mut [Highlight], hl: Highlight, len: usize) -> ParseStep {
        debug_assert!(len > 0);
        for out in out.iter_mut().take(len) {
            *out = hl;
        }
        ParseStep::Ahead(len)
    }

    fn highlight_line_comment(
        &mut self,
        leader: &str,
        out: &mut [Highlight],
        input: &[u8],
    ) -> Option<ParseStep> {
        if self.in_string.is_some() || self.in_comment || !input.starts_with(leader.as_bytes()) {
            return None;
        }
        // Highlight as comment until end of line
        for hl in out.iter_mut() {
            *hl = Highlight::Comment;
        }
        Some(ParseStep::Break)
    }

    fn highlight_block_comment(
        &mut self,
        start: &str,
        end: &str,
        out: &mut [Highlight],
        input: &[u8],
    ) -> Option<ParseStep> {
        if self.in_string.is_some() {
            return None;
        }

        if self.in_comment {
            if input.starts_with(end.as_bytes()) {
                self.in_comment = false;
                self.prev_sep = true;
                // Consume whole '*/' here. Otherwise such as '/*/' is wrongly accepted
                Some(self.eat_n(out, Highlight::BlockComment, end.len()))
            } else {
                Some(self.eat_n(out, Highlight::BlockComment, 1))
            }
        } else if input.starts_with(start.as_bytes()) {
            self.in_comment = true;
            Some(self.eat_n(out, Highlight::BlockComment, start.len()))
        } else {
            None
        }
    }

    fn highlight_string(&mut self, c: u8, out: &mut [Highlight], input: &[u8]) -> Option<ParseStep> {
        if let Some(q) = self.in_string {
            self.prev_sep = true;
            if c == b'\\' && input.len() > 1 {
                return Some(self.eat_n(out, Highlight::String, 2));
            }
            if c == q {
                self.in_string = None;
            }
            Some(self.eat_n(out, Highlight::String, 1))
        } else if c == b'"' || c == b'\'' {
            self.in_string = Some(c);
            Some(self.eat_n(out, Highlight::String, 1))
        } else {
            None
        }
    }

    fn highlight_number(
        &mut self,
        c: u8,
        prev_hl: Highlight,
        out: &mut [Highlight],
    ) -> Option<ParseStep> {
        let prev_is_number = prev_hl == Highlight::Number;
        if c.is_ascii_digit() && (self.prev_sep || prev_is_number) || c == b'.' && prev_is_number {
            self.prev_sep = false;
            Some(self.eat_n(out, Highlight::Number, 1))
        } else {
            None
        }
    }

    fn highlight_keyword(&mut self, out: &mut [Highlight], input: &[u8]) -> Option<ParseStep> {
        if !self.prev_sep {
            return None;
        }

        let (len, hl) = self.syntax.keywords.iter().find_map(|keyword| {
            let (word, hl) = match keyword.strip_suffix(SECONDARY_MARKER) {
                Some(word) => (word, Highlight::Type),
                None => (*keyword, Highlight::Keyword),
            };
            let len = word.len();
            // Keyword must be followed by a separator. End of line is considered as '\0'
            let next = input.get(len).copied().unwrap_or(b'\0');
            if input.starts_with(word.as_bytes()) && is_separator(next) {
                Some((len, hl))
            } else {
                None
            }
        })?;

        self.prev_sep = false;
        Some(self.eat_n(out, hl, len))
    }

    fn highlight_one(&mut self, out: &mut [Highlight], input: &[u8], prev_hl: Highlight) -> ParseStep {
        macro_rules! try_highlight {
            ($call:expr) => {
                if let Some(step) = $call {
                    return step;
                }
            };
        }

        let c = input[0];

        if let Some(leader) = self.syntax.line_comment {
            try_highlight!(self.highlight_line_comment(leader, out, input));
        }

        if let Some((start, end)) = self.syntax.block_comment {
            try_highlight!(self.highlight_block_comment(start, end, out, input));
        }

        if self.syntax.strings {
            try_highlight!(self.highlight_string(c, out, input));
        }

        if self.syntax.numbers {
            try_highlight!(self.highlight_number(c, prev_hl, out));
        }

        try_highlight!(self.highlight_keyword(out, input));

        self.prev_sep = is_separator(c);
        self.eat_n(out, Highlight::Normal, 1)
    }
}

// Classifies each byte of `render` into `out`. `in_comment` is the carry from the previous row.
// Returns the carry at the end of this row.
pub fn highlight_line(syntax: &Syntax, render: &[u8], out: &mut [Highlight], in_comment: bool) -> bool {
    debug_assert_eq!(render.len(), out.len());
    for hl in out.iter_mut() {
        *hl = Highlight::Normal;
    }

    let mut highlighter = Highlighter::new(syntax, in_comment);
    let mut i = 0;
    while i < render.len() {
        let prev_hl = if i > 0 { out[i - 1] } else { Highlight::Normal };
        match highlighter.highlight_one(&mut out[i..], &render[i..], prev_hl) {
            ParseStep::Ahead(len) => i += len,
            ParseStep::Break => break,
        }
    }

    highlighter.in_comment
}
