//! End-to-end scenarios for the line reconstruction pipeline
//!
//! Each test feeds a sequence of chunks the way a child process would
//! produce them and checks the finalized lines coming out the other end:
//! progress-bar overwrites, sequences split across chunk boundaries,
//! cursor and erase games, and the timing behavior of the strategies.

use std::time::{Duration, Instant};

use soba_stream::{EmitStrategyKind, LineStream, StreamOptions};

fn immediate() -> LineStream {
    LineStream::with_options(StreamOptions {
        strategy: EmitStrategyKind::Immediate,
        ..StreamOptions::default()
    })
    .unwrap()
}

fn run(chunks: &[&[u8]]) -> Vec<String> {
    let mut stream = immediate();
    for chunk in chunks {
        stream.feed(chunk).unwrap();
    }
    stream.finish().unwrap();
    stream.consume_pending_lines()
}

#[test]
fn progress_bar_collapse() {
    let lines = run(&[
        b"Progress: 10%\r",
        b"Progress: 50%\r",
        b"Progress: 100%\n",
    ]);
    assert_eq!(lines, vec!["Progress: 100%"]);
}

#[test]
fn split_csi_across_chunks() {
    let lines = run(&[b"text\x1b[3", b"1mred\n"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\x1b[31m"), "line was {:?}", lines[0]);
    assert!(lines[0].contains("red"));
}

#[test]
fn cursor_save_restore() {
    let lines = run(&[b"ABC\x1b[sDEF\x1b[uXYZ\n"]);
    assert_eq!(lines, vec!["ABCXYZ"]);
}

#[test]
fn horizontal_erase_to_end() {
    let lines = run(&[b"ABCDEFGH", b"\x1b[4G", b"\x1b[K\n"]);
    assert_eq!(lines, vec!["ABC"]);
}

#[test]
fn erase_start_to_cursor() {
    let lines = run(&[b"ABCDEFGH", b"\x1b[5G", b"\x1b[1K\n"]);
    assert_eq!(lines, vec!["     FGH"]);
    assert_eq!(lines[0].len(), 8);
}

#[test]
fn tab_alignment() {
    let lines = run(&[b"A\tB\n"]);
    assert_eq!(lines, vec!["A       B"]);
    let chars: Vec<char> = lines[0].chars().collect();
    assert_eq!(chars.len(), 9);
    assert_eq!(chars[0], 'A');
    assert_eq!(chars[8], 'B');
}

#[test]
fn color_carries_across_lines() {
    let mut stream = immediate();
    stream.feed(b"\x1b[31mred\n").unwrap();
    stream.feed(b"still red\n").unwrap();
    stream.finish().unwrap();

    let lines = stream.consume_pending_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\x1b[31m"));
    assert!(lines[1].contains("\x1b[31m"));
    assert!(lines[1].contains("still red"));
}

#[test]
fn volatile_vs_stable_timing() {
    let mut stream = LineStream::with_options(StreamOptions {
        strategy: EmitStrategyKind::StatefulTimeout {
            volatile_timeout_ms: 50,
            stable_timeout_ms: 200,
        },
        ..StreamOptions::default()
    })
    .unwrap();

    // A carriage-return write schedules the short window.
    let armed_at = Instant::now();
    stream.feed(b"spin\r").unwrap();
    let deadline = stream.next_deadline().unwrap();
    assert!(deadline - armed_at >= Duration::from_millis(50));
    assert!(deadline - armed_at < Duration::from_millis(200));

    // Plain text schedules the long window.
    let armed_at = Instant::now();
    stream.feed(b"steady").unwrap();
    let deadline = stream.next_deadline().unwrap();
    assert!(deadline - armed_at >= Duration::from_millis(200) - Duration::from_millis(1));

    // A newline cancels the pending window and flushes exactly once.
    stream.feed(b" on\n").unwrap();
    assert!(stream.next_deadline().is_none());
    assert!(!stream.poll(Instant::now() + Duration::from_secs(10)).unwrap());
    assert_eq!(stream.consume_pending_lines(), vec!["steady on"]);
}

#[test]
fn multiple_newlines_in_one_chunk_stay_ordered() {
    let lines = run(&[b"first\nsecond\nthird\n"]);
    assert_eq!(lines, vec!["first", "second", "third"]);
}

#[test]
fn finish_flushes_last_partial_line() {
    let lines = run(&[b"complete\n", b"dangling tail"]);
    assert_eq!(lines, vec!["complete", "dangling tail"]);
}

#[test]
fn osc_title_sequences_are_invisible() {
    let lines = run(&[b"\x1b]0;window title\x07hello\n"]);
    assert_eq!(lines, vec!["hello"]);
}

#[test]
fn full_screen_clears_are_ignored() {
    let lines = run(&[b"\x1b[2J\x1b[1;1Hprompt$ ls\n"]);
    assert_eq!(lines, vec!["prompt$ ls"]);
}

#[test]
fn styled_progress_bar_renders_minimal_ansi() {
    let lines = run(&[
        b"\x1b[32m[=>    ]\x1b[0m 20%\r",
        b"\x1b[32m[====> ]\x1b[0m 80%\r",
        b"\x1b[32m[======]\x1b[0m done\n",
    ]);
    assert_eq!(lines, vec!["\x1b[32m[======]\x1b[0m done"]);
}

#[test]
fn chunked_byte_by_byte_feed_matches_whole() {
    let input: &[u8] = b"mix \x1b[1;35mof\x1b[0m text\r\nand \x1b[36mcolor\n";

    let whole = run(&[input]);

    let mut stream = immediate();
    for byte in input {
        stream.feed(std::slice::from_ref(byte)).unwrap();
    }
    stream.finish().unwrap();
    let bytewise = stream.consume_pending_lines();

    assert_eq!(bytewise, whole);
}
