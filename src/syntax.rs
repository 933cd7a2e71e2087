use std::path::Path;

// Keywords ending with this marker are highlighted as secondary keywords (types)
pub const SECONDARY_MARKER: char = '|';

#[derive(Debug, PartialEq)]
pub struct Syntax {
    pub filetype: &'static str,
    // Patterns starting with '.' must match the end of file name. Others match anywhere
    pub filematch: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub numbers: bool,
    pub strings: bool,
}

const C_SYNTAX: Syntax = Syntax {
    filetype: "c",
    filematch: &[".c", ".h", ".cpp"],
    keywords: &[
        "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
        "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|",
        "char|", "unsigned|", "signed|", "void|",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    numbers: true,
    strings: true,
};

const RUST_SYNTAX: Syntax = Syntax {
    filetype: "rust",
    filematch: &[".rs"],
    keywords: &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for", "if",
        "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
        "self", "static", "struct", "super", "trait", "type", "unsafe", "use", "where", "while",
        "i8|", "i16|", "i32|", "i64|", "isize|", "u8|", "u16|", "u32|", "u64|", "usize|", "f32|",
        "f64|", "bool|", "char|", "str|", "String|", "Vec|", "Option|", "Result|", "Self|",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    numbers: true,
    strings: true,
};

const GO_SYNTAX: Syntax = Syntax {
    filetype: "go",
    filematch: &[".go"],
    keywords: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "for", "func",
        "go", "goto", "if", "import", "interface", "map", "package", "range", "return", "select",
        "struct", "switch", "type", "var", "bool|", "byte|", "error|", "float32|", "float64|",
        "int|", "int32|", "int64|", "rune|", "string|", "uint|", "uint32|", "uint64|",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    numbers: true,
    strings: true,
};

const PYTHON_SYNTAX: Syntax = Syntax {
    filetype: "python",
    filematch: &[".py"],
    keywords: &[
        "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
        "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "not",
        "or", "pass", "raise", "return", "try", "while", "with", "yield", "int|", "float|",
        "str|", "list|", "dict|", "tuple|", "set|", "bool|", "None|", "True|", "False|",
    ],
    line_comment: Some("#"),
    block_comment: None,
    numbers: true,
    strings: true,
};

const JAVASCRIPT_SYNTAX: Syntax = Syntax {
    filetype: "javascript",
    filematch: &[".js", ".mjs"],
    keywords: &[
        "break", "case", "catch", "class", "const", "continue", "default", "delete", "do",
        "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "let",
        "new", "return", "switch", "this", "throw", "try", "typeof", "var", "while", "yield",
        "Array|", "Boolean|", "Number|", "Object|", "String|", "Promise|", "null|",
        "undefined|", "true|", "false|",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    numbers: true,
    strings: true,
};

// Rulesets are tried in this order. First match wins
pub const HLDB: &[Syntax] = &[
    C_SYNTAX,
    RUST_SYNTAX,
    GO_SYNTAX,
    PYTHON_SYNTAX,
    JAVASCRIPT_SYNTAX,
];

impl Syntax {
    pub fn matches(&self, filename: &str) -> bool {
        self.filematch.iter().any(|pat| {
            if pat.starts_with('.') {
                filename.ends_with(pat)
            } else {
                filename.contains(pat)
            }
        })
    }

    pub fn for_filename(filename: &str) -> Option<&'static Syntax> {
        HLDB.iter().find(|s| s.matches(filename))
    }

    pub fn for_path<P: AsRef<Path>>(path: P) -> Option<&'static Syntax> {
        Self::for_filename(&path.as_ref().to_string_lossy())
    }
}
