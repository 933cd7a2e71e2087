use crate::editor::Editor;
use crate::error::Result;
use crate::input::{KeySeq, ENTER, ESC};
use crate::mode::Mode;
use crate::screen::HELP;
use std::fs;
use std::io::{self, Write};

use KeySeq::*;

struct DummyInputs(Vec<KeySeq>);

impl Iterator for DummyInputs {
    type Item = Result<KeySeq>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            None
        } else {
            Some(Ok(self.0.remove(0)))
        }
    }
}

struct Discard;

impl Write for Discard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn key(c: char) -> KeySeq {
    Key(c as u8)
}

fn keys(s: &str) -> Vec<KeySeq> {
    s.bytes().map(Key).collect()
}

fn sp(k: KeySeq) -> KeySeq {
    if let Key(_) = k {
        assert!(false, "{:?}", k);
    }
    k
}

fn run_with_lines(lines: &[&str], input: Vec<KeySeq>) -> Editor<DummyInputs, Discard> {
    let input = DummyInputs(input);
    let mut editor =
        Editor::with_lines(lines.iter().copied(), input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();
    editor
}

fn lines_of(editor: &Editor<DummyInputs, Discard>) -> Vec<String> {
    editor.lines().map(|l| l.to_string()).collect()
}

#[test]
fn test_empty_buffer() {
    let input = DummyInputs(keys(":q\r"));
    let mut editor = Editor::new(input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();

    assert!(editor.screen().rows() > 0);
    assert!(editor.screen().cols() > 0);
    assert_eq!(editor.lines().count(), 0);
    assert_eq!(editor.mode(), Mode::Normal);
}

#[test]
fn test_help_message_at_start() {
    let editor = run_with_lines(&["abc"], vec![]);
    assert_eq!(editor.screen().message_text(), HELP);
}

#[test]
fn test_quit_stops_reading_input() {
    let mut input = keys(":quit\r");
    input.extend(keys("ixyz"));
    let editor = run_with_lines(&["abc"], input);
    assert_eq!(lines_of(&editor), vec!["abc"]);
    assert!(!editor.buf().modified());
}

#[test]
fn test_end_of_line_key() {
    let editor = run_with_lines(&["abcde"], keys("lll"));
    assert_eq!(editor.buf().cursor(), (3, 0));

    let editor = run_with_lines(&["abcde"], keys("lll$"));
    assert_eq!(editor.buf().cursor(), (5, 0));

    let editor = run_with_lines(&["abcde"], keys("lll$$"));
    assert_eq!(editor.buf().cursor(), (5, 0));

    let editor = run_with_lines(&["abcde"], vec![key('l'), sp(EndKey), sp(HomeKey)]);
    assert_eq!(editor.buf().cursor(), (0, 0));
}

#[test]
fn test_normal_mode_movement() {
    let editor = run_with_lines(&["abc", "de"], keys("$j"));
    // Column is clamped to the length of the shorter line
    assert_eq!(editor.buf().cursor(), (2, 1));

    let editor = run_with_lines(&["abc", "de"], keys("l\r"));
    assert_eq!(editor.buf().cursor(), (1, 1));

    let editor = run_with_lines(&["abc", "de"], vec![key('j'), sp(Backspace), sp(Backspace)]);
    // Moving left at head of line goes to end of previous line
    assert_eq!(editor.buf().cursor(), (2, 0));

    let editor = run_with_lines(&["ab", "cd"], vec![key('l'), sp(DeleteKey), sp(DeleteKey)]);
    assert_eq!(editor.buf().cursor(), (0, 1));

    let editor = run_with_lines(&["abc"], keys("$  0"));
    assert_eq!(editor.buf().cursor(), (0, 0));

    let editor = run_with_lines(&["abc", "def"], vec![sp(DownKey), sp(RightKey), sp(UpKey), sp(LeftKey)]);
    assert_eq!(editor.buf().cursor(), (0, 0));
}

#[test]
fn test_buffer_edges() {
    let editor = run_with_lines(&["1", "2", "3", "4"], keys("G"));
    assert_eq!(editor.buf().cursor(), (0, 3));

    let editor = run_with_lines(&["1", "2", "3", "4"], keys("Ggg"));
    assert_eq!(editor.buf().cursor(), (0, 0));

    // Other key after 'g' cancels the pending 'g'
    let editor = run_with_lines(&["1", "2", "3", "4"], keys("Ggkg"));
    assert_eq!(editor.buf().cursor(), (0, 2));

    let mut input = keys("Gg");
    input.push(sp(Unidentified)); // Input timeout between keys
    input.push(key('g'));
    let editor = run_with_lines(&["1", "2", "3", "4"], input);
    assert_eq!(editor.buf().cursor(), (0, 0));
}

#[test]
fn test_page_keys() {
    let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

    let editor = run_with_lines(&lines, vec![sp(PageDownKey)]);
    // 22 rows on screen: cursor goes to bottom of screen and moves one more page
    assert_eq!(editor.buf().cy(), 43);

    let editor = run_with_lines(&lines, vec![sp(PageDownKey), sp(PageUpKey)]);
    assert_eq!(editor.buf().cy(), 0);
}

#[test]
fn test_insert_text() {
    let mut input = keys("iabc\rd");
    input.push(ESC);
    let input = DummyInputs(input);
    let mut editor = Editor::new(input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();

    assert_eq!(lines_of_any(editor.lines()), vec!["abc", "d"]);
    assert_eq!(editor.buf().cursor(), (1, 1));
    assert_eq!(editor.mode(), Mode::Normal);
    assert!(editor.buf().modified());
}

fn lines_of_any<'a, L: Iterator<Item = std::borrow::Cow<'a, str>>>(lines: L) -> Vec<String> {
    lines.map(|l| l.to_string()).collect()
}

#[test]
fn test_insert_tab_and_control_char() {
    let editor = run_with_lines(&[""], vec![key('i'), key('\t'), key('x'), Key(0x01)]);
    assert_eq!(lines_of(&editor), vec!["\tx\x01"]);
    assert_eq!(editor.mode(), Mode::Insert);
}

#[test]
fn test_backspace_joins_lines() {
    let editor = run_with_lines(&["ab", "cd"], vec![key('j'), key('i'), sp(Backspace)]);
    assert_eq!(lines_of(&editor), vec!["abcd"]);
    assert_eq!(editor.buf().cursor(), (2, 0));

    let editor = run_with_lines(&["ab", "cd"], vec![key('j'), key('i'), ctrl_h()]);
    assert_eq!(lines_of(&editor), vec!["abcd"]);
}

fn ctrl_h() -> KeySeq {
    crate::input::ctrl(b'h')
}

#[test]
fn test_backspace_at_top_is_noop() {
    let editor = run_with_lines(&["ab"], vec![key('i'), sp(Backspace)]);
    assert_eq!(lines_of(&editor), vec!["ab"]);
    assert!(!editor.buf().modified());
}

#[test]
fn test_delete_joins_next_line() {
    let editor = run_with_lines(&["ab", "cd"], vec![key('A'), sp(DeleteKey)]);
    assert_eq!(lines_of(&editor), vec!["abcd"]);
    assert_eq!(editor.buf().cursor(), (2, 0));

    let editor = run_with_lines(&["abc"], vec![key('i'), sp(DeleteKey)]);
    assert_eq!(lines_of(&editor), vec!["bc"]);
}

#[test]
fn test_enter_splits_line() {
    let editor = run_with_lines(&["abcd"], vec![key('l'), key('l'), key('i'), ENTER]);
    assert_eq!(lines_of(&editor), vec!["ab", "cd"]);
    assert_eq!(editor.buf().cursor(), (0, 1));

    let editor = run_with_lines(&["abcd"], vec![key('i'), ENTER]);
    assert_eq!(lines_of(&editor), vec!["", "abcd"]);
    assert_eq!(editor.buf().cursor(), (0, 1));
}

#[test]
fn test_insert_mode_entries() {
    let mut input = keys("aX");
    input.push(ESC);
    assert_eq!(lines_of(&run_with_lines(&["ab"], input)), vec!["aXb"]);

    let mut input = keys("$aY");
    input.push(ESC);
    assert_eq!(lines_of(&run_with_lines(&["ab"], input)), vec!["abY"]);

    let mut input = keys("$IZ");
    input.push(ESC);
    assert_eq!(lines_of(&run_with_lines(&["ab"], input)), vec!["Zab"]);

    let mut input = keys("AW");
    input.push(ESC);
    assert_eq!(lines_of(&run_with_lines(&["ab"], input)), vec!["abW"]);

    let mut input = keys("liV");
    input.push(ESC);
    assert_eq!(lines_of(&run_with_lines(&["ab"], input)), vec!["aVb"]);
}

#[test]
fn test_open_line() {
    let mut input = keys("ox");
    input.push(ESC);
    let editor = run_with_lines(&["a", "b"], input);
    assert_eq!(lines_of(&editor), vec!["a", "x", "b"]);
    assert_eq!(editor.buf().cursor(), (1, 1));

    let mut input = keys("jOy");
    input.push(ESC);
    let editor = run_with_lines(&["a", "b"], input);
    assert_eq!(lines_of(&editor), vec!["a", "y", "b"]);

    let mut input = keys("Oz");
    input.push(ESC);
    let editor = run_with_lines(&["a"], input);
    assert_eq!(lines_of(&editor), vec!["z", "a"]);

    let editor = run_with_lines(&[], keys("o"));
    assert_eq!(lines_of(&editor), vec![""]);
    assert_eq!(editor.mode(), Mode::Insert);
}

#[test]
fn test_delete_under_cursor() {
    let editor = run_with_lines(&["abc"], keys("x"));
    assert_eq!(lines_of(&editor), vec!["bc"]);

    // No-op at end of line
    let editor = run_with_lines(&["abc", "d"], keys("$x"));
    assert_eq!(lines_of(&editor), vec!["abc", "d"]);
    assert_eq!(editor.buf().cursor(), (3, 0));

    let editor = run_with_lines(&["abc"], keys("llx"));
    assert_eq!(lines_of(&editor), vec!["ab"]);
    assert_eq!(editor.buf().cursor(), (2, 0));
}

#[test]
fn test_escape_in_normal_mode() {
    let editor = run_with_lines(&["abc"], vec![ESC, crate::input::ctrl(b'l'), key('l')]);
    assert_eq!(editor.mode(), Mode::Normal);
    assert_eq!(editor.buf().cursor(), (1, 0));
}

#[test]
fn test_key_not_mapped() {
    let editor = run_with_lines(&["abc"], keys("z"));
    assert_eq!(editor.screen().message_text(), "Key 'z' not mapped");
    assert_eq!(lines_of(&editor), vec!["abc"]);
}

#[test]
fn test_search_forward_and_wrap() {
    let lines = ["alpha", "beta", "gamma", "beta2", "delta"];

    let mut input = keys("/beta");
    input.push(ENTER);
    let editor = run_with_lines(&lines, input);
    assert_eq!(editor.buf().cursor(), (0, 1));

    let mut input = keys("/beta");
    input.push(sp(RightKey));
    input.push(ENTER);
    let editor = run_with_lines(&lines, input);
    assert_eq!(editor.buf().cursor(), (0, 3));

    let mut input = keys("/beta");
    input.push(sp(RightKey));
    input.push(sp(RightKey));
    input.push(ENTER);
    let editor = run_with_lines(&lines, input);
    assert_eq!(editor.buf().cursor(), (0, 1));
}

#[test]
fn test_search_backward() {
    let lines = ["alpha", "beta", "gamma", "beta2", "delta"];
    let mut input = keys("/beta");
    input.push(sp(LeftKey));
    input.push(ENTER);
    let editor = run_with_lines(&lines, input);
    assert_eq!(editor.buf().cursor(), (0, 3));
}

#[test]
fn test_search_match_in_middle_of_line() {
    let mut input = keys("/ta");
    input.push(ENTER);
    let editor = run_with_lines(&["alpha", "beta"], input);
    assert_eq!(editor.buf().cursor(), (2, 1));
    // Match highlight is removed after search
    assert!(editor.buf().rows()[1]
        .highlight()
        .iter()
        .all(|h| *h == crate::highlight::Highlight::Normal));
}

#[test]
fn test_search_cancel_restores_cursor() {
    let lines = ["alpha", "beta", "gamma"];
    let mut input = keys("jjll/beta");
    input.push(ESC);
    let editor = run_with_lines(&lines, input);
    assert_eq!(editor.buf().cursor(), (2, 2));
    assert_eq!(editor.mode(), Mode::Normal);
}

#[test]
fn test_search_not_found() {
    let mut input = keys("j/nothing");
    input.push(ENTER);
    let editor = run_with_lines(&["abc", "def"], input);
    assert_eq!(editor.buf().cursor(), (0, 1));
}

#[test]
fn test_unknown_command() {
    let mut input = keys(":foo\r");
    input.extend(keys("ix"));
    let editor = run_with_lines(&["abc"], input);
    assert_eq!(lines_of(&editor), vec!["xabc"]);
    assert_eq!(editor.mode(), Mode::Insert);
}

#[test]
fn test_cmd_prompt_cancel() {
    let mut input = keys(":q");
    input.push(ESC);
    input.extend(keys("x"));
    let editor = run_with_lines(&["abc"], input);
    assert_eq!(lines_of(&editor), vec!["bc"]);
    assert_eq!(editor.mode(), Mode::Normal);
}

#[test]
fn test_quit_with_unsaved_changes() {
    let mut input = keys("x:q\r");
    input.extend(keys("x"));
    let editor = run_with_lines(&["abc"], input);
    // Quit is unconditional
    assert_eq!(lines_of(&editor), vec!["bc"]);
}

#[test]
fn test_write_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "hello\nworld\n").unwrap();

    let input = DummyInputs(keys("x:w\r"));
    let mut editor = Editor::open(input, Discard, Some((80, 24)), &path).unwrap();
    editor.edit().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "ello\nworld\n");
    assert_eq!(editor.screen().message_text(), "11 bytes written to disk");
    assert!(!editor.buf().modified());
    assert_eq!(editor.mode(), Mode::Normal);
}

#[test]
fn test_write_long_verb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "abc\n").unwrap();

    let mut input = keys("Aa");
    input.push(ESC);
    input.extend(keys(":write\r"));
    let input = DummyInputs(input);
    let mut editor = Editor::open(input, Discard, Some((80, 24)), &path).unwrap();
    editor.edit().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "abca\n");
}

#[test]
fn test_save_as() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.c");
    let path_str = path.to_str().unwrap();

    let mut input = keys("ia");
    input.push(ESC);
    input.extend(keys(":w\r"));
    input.extend(keys(path_str));
    input.push(ENTER);
    let input = DummyInputs(input);
    let mut editor = Editor::new(input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a\n");
    assert_eq!(editor.screen().message_text(), "2 bytes written to disk");
    assert_eq!(editor.buf().filename(), path_str);
    // Syntax is selected by the new file name
    assert_eq!(editor.buf().filetype(), "c");
}

#[test]
fn test_save_aborted() {
    let mut input = keys("ia");
    input.push(ESC);
    input.extend(keys(":w\r"));
    input.push(ESC);
    let input = DummyInputs(input);
    let mut editor = Editor::new(input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();

    assert_eq!(editor.screen().message_text(), "Save aborted");
    assert!(editor.buf().modified());
    assert!(!editor.buf().has_file());
}

#[test]
fn test_save_failure_keeps_buffer_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("file.txt");
    let path_str = path.to_str().unwrap();

    let mut input = keys("ia");
    input.push(ESC);
    input.extend(keys(":w\r"));
    input.extend(keys(path_str));
    input.push(ENTER);
    let input = DummyInputs(input);
    let mut editor = Editor::new(input, Discard, Some((80, 24))).unwrap();
    editor.edit().unwrap();

    assert!(editor
        .screen()
        .message_text()
        .starts_with("Failed to save: I/O error: "));
    assert!(editor.buf().modified());
    assert_eq!(lines_of_any(editor.lines()), vec!["a"]);
}

#[test]
fn test_open_file_selects_syntax() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.c");
    fs::write(&path, "int main() {\r\n\treturn 0;\r\n}\r\n").unwrap();

    let input = DummyInputs(vec![]);
    let mut editor = Editor::open(input, Discard, Some((80, 24)), &path).unwrap();
    editor.edit().unwrap();

    assert_eq!(editor.buf().filetype(), "c");
    assert_eq!(
        lines_of_any(editor.lines()),
        vec!["int main() {", "\treturn 0;", "}"]
    );
}

#[test]
fn test_open_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let input = DummyInputs(vec![]);
    assert!(Editor::open(input, Discard, Some((80, 24)), &path).is_err());
}

#[test]
fn test_too_small_window() {
    let input = DummyInputs(vec![]);
    assert!(Editor::new(input, Discard, Some((80, 2))).is_err());
}

#[test]
fn test_window_size_from_cursor_report() {
    let input = DummyInputs(vec![sp(Cursor(30, 100))]);
    // Size is queried via cursor position report only when stdout is not a terminal
    let editor = Editor::new(input, Discard, None).unwrap();
    assert!(editor.screen().rows() > 0);
    assert!(editor.screen().cols() > 0);
}

#[test]
fn test_render_output() {
    let mut out = vec![];
    {
        let input = DummyInputs(keys("i"));
        let mut editor = Editor::new(input, &mut out, Some((80, 24))).unwrap();
        editor.edit().unwrap();
    }
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Helis editor -- version"), "{:?}", out);
    assert!(out.contains("[No Name] - 0 lines"), "{:?}", out);
    assert!(out.contains("[Normal] | no ft | 1:0"), "{:?}", out);
    assert!(out.contains("[Insert] | no ft | 1:0"), "{:?}", out);
    // Bar cursor in insert mode
    assert!(out.contains("\x1b[5 q"), "{:?}", out);
    // Screen is cleared on exit
    assert!(out.ends_with("\x1b[2J\x1b[H"), "{:?}", out);
}

#[test]
fn test_render_modified_and_prompt() {
    let mut out = vec![];
    {
        let mut input = keys("x:");
        input.push(ESC);
        let input = DummyInputs(input);
        let mut editor =
            Editor::with_lines(["abc"].iter().copied(), input, &mut out, Some((80, 24))).unwrap();
        editor.edit().unwrap();
    }
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("[No Name] - 1 lines (modified)"), "{:?}", out);
    assert!(out.contains("Cmd: "), "{:?}", out);
    assert!(out.contains("[Cmd] | no ft | 1:1"), "{:?}", out);
}
