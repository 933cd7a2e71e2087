use crate::error::Result;
use std::fmt;
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::str;

pub struct StdinRawMode {
    stdin: io::Stdin,
    orig: termios::Termios,
}

impl StdinRawMode {
    pub fn new() -> Result<StdinRawMode> {
        use termios::*;

        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        let mut termios = Termios::from_fd(fd)?;
        let orig = termios;

        // Set terminal raw mode. Disable echo back, canonical mode, signals (SIGINT, SIGTSTP) and Ctrl+V.
        termios.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
        // Disable control flow mode (Ctrl+Q/Ctrl+S) and CR-to-NL translation
        termios.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
        // Disable output processing such as \n to \r\n translation
        termios.c_oflag &= !OPOST;
        // Ensure character size is 8bits
        termios.c_cflag |= CS8;
        // Do not wait for next byte with blocking since reading 0 byte is permitted
        termios.c_cc[VMIN] = 0;
        // Set read timeout to 1/10 second it enables 100ms timeout on read()
        termios.c_cc[VTIME] = 1;
        // Apply terminal configurations
        tcsetattr(fd, TCSAFLUSH, &termios)?;

        Ok(StdinRawMode { stdin, orig })
    }

    pub fn input_keys(self) -> InputSequences<StdinRawMode> {
        InputSequences::new(self)
    }
}

impl Drop for StdinRawMode {
    fn drop(&mut self) {
        // Restore original terminal mode
        if let Err(err) = termios::tcsetattr(self.stdin.as_raw_fd(), termios::TCSAFLUSH, &self.orig) {
            log::error!("Could not restore terminal mode: {}", err);
        }
    }
}

impl Read for StdinRawMode {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum KeySeq {
    Unidentified,
    Key(u8), // Ascii code 0x00~0x7e
    Backspace,
    LeftKey,
    RightKey,
    UpKey,
    DownKey,
    PageUpKey,
    PageDownKey,
    HomeKey,
    EndKey,
    DeleteKey,
    Cursor(usize, usize), // Pseudo key (row, col) from cursor position report
}

pub const ESC: KeySeq = KeySeq::Key(0x1b);
pub const ENTER: KeySeq = KeySeq::Key(b'\r');

pub const fn ctrl(b: u8) -> KeySeq {
    KeySeq::Key(b & 0x1f)
}

impl fmt::Display for KeySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use KeySeq::*;
        match self {
            Unidentified => write!(f, "UNKNOWN"),
            Key(b' ') => write!(f, "SPACE"),
            Key(0x1b) => write!(f, "ESC"),
            Key(b) if b.is_ascii_control() => write!(f, "C-{}", (*b | 0x60) as char),
            Key(b) => write!(f, "{}", *b as char),
            Backspace => write!(f, "BACKSPACE"),
            LeftKey => write!(f, "LEFT"),
            RightKey => write!(f, "RIGHT"),
            UpKey => write!(f, "UP"),
            DownKey => write!(f, "DOWN"),
            PageUpKey => write!(f, "PAGEUP"),
            PageDownKey => write!(f, "PAGEDOWN"),
            HomeKey => write!(f, "HOME"),
            EndKey => write!(f, "END"),
            DeleteKey => write!(f, "DELETE"),
            Cursor(r, c) => write!(f, "CURSOR({},{})", r, c),
        }
    }
}

pub struct InputSequences<R: Read> {
    input: R,
}

impl<R: Read> InputSequences<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut one_byte: [u8; 1] = [0];
        Ok(if self.input.read(&mut one_byte)? == 0 {
            None
        } else {
            Some(one_byte[0])
        })
    }

    fn decode_escape_sequence(&mut self) -> Result<KeySeq> {
        use KeySeq::*;

        // Try to read expecting '[' or 'O' as escape sequence header. Note that, if next input
        // does not arrive within next tick, it means that it is not an escape sequence.
        match self.read_byte()? {
            Some(b'[') => { /* fall through */ }
            Some(b'O') => {
                return Ok(match self.read_byte()? {
                    Some(b'H') => HomeKey,
                    Some(b'F') => EndKey,
                    _ => Key(0x1b),
                })
            }
            _ => return Ok(Key(0x1b)),
        };

        // Now confirmed \x1b[ which is a header of escape sequence. Eat it until the end
        // of sequence
        let mut buf = vec![];
        let cmd = loop {
            match self.read_byte()? {
                Some(b @ (b'A' | b'B' | b'C' | b'D' | b'F' | b'H' | b'P' | b'R' | b'~')) => break b,
                Some(b) if b.is_ascii_digit() || b == b';' => buf.push(b),
                // Malformed or incomplete sequence degrades to plain ESC
                _ => return Ok(Key(0x1b)),
            }
        };

        fn parse_bytes_as_usize(b: &[u8]) -> Option<usize> {
            str::from_utf8(b).ok().and_then(|s| s.parse().ok())
        }

        let mut args = buf.split(|b| *b == b';');
        Ok(match cmd {
            b'R' => {
                // https://vt100.net/docs/vt100-ug/chapter3.html#CPR e.g. \x1b[24;80R
                let mut i = args.filter_map(parse_bytes_as_usize);
                match (i.next(), i.next()) {
                    (Some(r), Some(c)) => Cursor(r, c),
                    _ => Key(0x1b),
                }
            }
            b'A' => UpKey,
            b'B' => DownKey,
            b'C' => RightKey,
            b'D' => LeftKey,
            b'H' => HomeKey,
            b'F' => EndKey,
            b'P' => DeleteKey,
            // e.g. \x1b[5~
            _ => match args.next() {
                Some(b"1") | Some(b"7") => HomeKey,
                Some(b"3") => DeleteKey,
                Some(b"4") | Some(b"8") => EndKey,
                Some(b"5") => PageUpKey,
                Some(b"6") => PageDownKey,
                _ => Key(0x1b),
            },
        })
    }

    fn decode(&mut self, b: u8) -> Result<KeySeq> {
        match b {
            // (Maybe) Escape sequence
            0x1b => self.decode_escape_sequence(),
            0x7f => Ok(KeySeq::Backspace),
            0x00..=0x7e => Ok(KeySeq::Key(b)),
            // Multi-byte characters are not supported
            _ => Ok(KeySeq::Unidentified),
        }
    }

    fn read_seq(&mut self) -> Result<KeySeq> {
        if let Some(b) = self.read_byte()? {
            self.decode(b)
        } else {
            Ok(KeySeq::Unidentified)
        }
    }
}

impl<R: Read> Iterator for InputSequences<R> {
    type Item = Result<KeySeq>;

    // Read next byte from stdin with timeout 100ms. If nothing was read, it returns KeySeq::Unidentified.
    // This method never returns None so for loop never ends
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_seq())
    }
}
