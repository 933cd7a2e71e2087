use crate::input::{ctrl, KeySeq, ENTER, ESC};
use crate::text_buffer::CursorDir;

// Actions bound to keys in normal mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NormalAction {
    Move(CursorDir),
    LineStart,
    LineEnd,
    BufferEnd,
    PageUp,
    PageDown,
    InsertBefore,
    InsertAtLineStart,
    InsertAfter,
    AppendAtLineEnd,
    OpenLineBelow,
    OpenLineAbove,
    DeleteUnderCursor,
    Search,
    CmdPrompt,
    // Prefix of 'gg'
    PendingG,
    Stay,
}

// Actions bound to keys in insert mode. Keys not in the table are inserted as they are.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InsertAction {
    Move(CursorDir),
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    Newline,
    DeleteBack,
    DeleteForward,
    LeaveInsert,
}

pub type Keymap<A> = &'static [(KeySeq, A)];

pub const NORMAL_KEYMAP: Keymap<NormalAction> = {
    use CursorDir::*;
    use KeySeq::*;
    use NormalAction::*;
    &[
        (UpKey, Move(Up)),
        (Key(b'k'), Move(Up)),
        (DownKey, Move(Down)),
        (Key(b'j'), Move(Down)),
        (ENTER, Move(Down)),
        (LeftKey, Move(Left)),
        (Key(b'h'), Move(Left)),
        (Key(b' '), Move(Left)),
        (Backspace, Move(Left)),
        (ctrl(b'h'), Move(Left)),
        (RightKey, Move(Right)),
        (Key(b'l'), Move(Right)),
        (DeleteKey, Move(Right)),
        (Key(b'0'), LineStart),
        (HomeKey, LineStart),
        (Key(b'$'), LineEnd),
        (EndKey, LineEnd),
        (Key(b'G'), BufferEnd),
        (Key(b'g'), PendingG),
        (PageUpKey, PageUp),
        (PageDownKey, PageDown),
        (Key(b'i'), InsertBefore),
        (Key(b'I'), InsertAtLineStart),
        (Key(b'a'), InsertAfter),
        (Key(b'A'), AppendAtLineEnd),
        (Key(b'o'), OpenLineBelow),
        (Key(b'O'), OpenLineAbove),
        (Key(b'x'), DeleteUnderCursor),
        (Key(b'/'), Search),
        (Key(b':'), CmdPrompt),
        (ctrl(b'l'), Stay),
        (ESC, Stay),
    ]
};

pub const INSERT_KEYMAP: Keymap<InsertAction> = {
    use CursorDir::*;
    use InsertAction::*;
    use KeySeq::*;
    &[
        (UpKey, Move(Up)),
        (DownKey, Move(Down)),
        (LeftKey, Move(Left)),
        (RightKey, Move(Right)),
        (HomeKey, LineStart),
        (EndKey, LineEnd),
        (PageUpKey, PageUp),
        (PageDownKey, PageDown),
        (ENTER, Newline),
        (Backspace, DeleteBack),
        (ctrl(b'h'), DeleteBack),
        (DeleteKey, DeleteForward),
        (ctrl(b'l'), LeaveInsert),
        (ESC, LeaveInsert),
    ]
};

pub fn lookup<A: Copy>(keymap: Keymap<A>, seq: KeySeq) -> Option<A> {
    keymap.iter().find(|(k, _)| *k == seq).map(|(_, a)| *a)
}
