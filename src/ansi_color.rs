use std::env;
use term::terminfo::TermInfo;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ColorSupport {
    TrueColor,
    Extended256,
    Only16,
}

impl ColorSupport {
    pub fn from_env() -> ColorSupport {
        env::var("COLORTERM")
            .ok()
            .and_then(|v| {
                if v == "truecolor" || v == "24bit" {
                    Some(ColorSupport::TrueColor)
                } else {
                    None
                }
            })
            .or_else(|| {
                TermInfo::from_env().ok().and_then(|info| {
                    info.numbers.get("colors").map(|colors| {
                        if *colors >= 256 {
                            ColorSupport::Extended256
                        } else {
                            ColorSupport::Only16
                        }
                    })
                })
            })
            .unwrap_or(ColorSupport::Only16)
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum AnsiColor {
    // Resets foreground color only
    Reset,
    // Resets all attributes
    ResetAll,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    RedBG,
    Invert,
    BoldInvert,
}

impl AnsiColor {
    pub fn sequence(self, support: ColorSupport) -> &'static [u8] {
        // 'm' sets attributes to text printed after: https://vt100.net/docs/vt100-ug/chapter3.html#SGR
        // Color table: https://en.wikipedia.org/wiki/ANSI_escape_code#Colors
        //
        // 256 colors sequences are '\x1b[38;5;<n>m' (for fg) or '\x1b[48;5;<n>m (for bg)
        // 24bit colors sequences are '\x1b[38;2;<r>;<g>;<b>m' (for fg) or '\x1b[48;2;<r>;<g>;<b>m' (for bg)

        macro_rules! rgb_color {
            (fg, $r:expr, $g:expr, $b:expr) => {
                concat!("\x1b[38;2;", $r, ';', $g, ';', $b, "m")
            };
            (bg, $r:expr, $g:expr, $b:expr) => {
                concat!("\x1b[48;2;", $r, ';', $g, ';', $b, "m")
            };
        }

        use AnsiColor::*;
        match (self, support) {
            (Reset, _) => b"\x1b[39m",
            (ResetAll, _) => b"\x1b[m",
            (Invert, _) => b"\x1b[7m",
            (BoldInvert, _) => b"\x1b[1;7m",
            (Red, ColorSupport::TrueColor) => rgb_color!(fg, 251, 73, 52).as_bytes(),
            (Green, ColorSupport::TrueColor) => rgb_color!(fg, 184, 187, 38).as_bytes(),
            (Yellow, ColorSupport::TrueColor) => rgb_color!(fg, 250, 189, 47).as_bytes(),
            (Blue, ColorSupport::TrueColor) => rgb_color!(fg, 131, 165, 152).as_bytes(),
            (Purple, ColorSupport::TrueColor) => rgb_color!(fg, 211, 134, 155).as_bytes(),
            (Cyan, ColorSupport::TrueColor) => rgb_color!(fg, 142, 192, 124).as_bytes(),
            (RedBG, ColorSupport::TrueColor) => rgb_color!(bg, 204, 36, 29).as_bytes(),
            (Red, ColorSupport::Extended256) => b"\x1b[38;5;167m",
            (Green, ColorSupport::Extended256) => b"\x1b[38;5;142m",
            (Yellow, ColorSupport::Extended256) => b"\x1b[38;5;214m",
            (Blue, ColorSupport::Extended256) => b"\x1b[38;5;109m",
            (Purple, ColorSupport::Extended256) => b"\x1b[38;5;175m",
            (Cyan, ColorSupport::Extended256) => b"\x1b[38;5;108m",
            (RedBG, ColorSupport::Extended256) => b"\x1b[48;5;124m",
            (Red, ColorSupport::Only16) => b"\x1b[31m",
            (Green, ColorSupport::Only16) => b"\x1b[32m",
            (Yellow, ColorSupport::Only16) => b"\x1b[33m",
            (Blue, ColorSupport::Only16) => b"\x1b[34m",
            (Purple, ColorSupport::Only16) => b"\x1b[35m",
            (Cyan, ColorSupport::Only16) => b"\x1b[36m",
            (RedBG, ColorSupport::Only16) => b"\x1b[41m",
        }
    }
}
