#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;

#[test]
fn buffer_handler_println_captures_with_newline() {
    let handler = BufferPrintHandler::new();
    handler.println("hello");
    handler.println("world");
    assert_eq!(handler.get_output(), "hello\nworld\n");
}

#[test]
fn buffer_handler_clear_empties_buffer() {
    let handler = buffer_handler();
    handler.println("hello");
    assert!(!handler.get_output().is_empty());
    handler.clear();
    assert!(handler.get_output().is_empty());
}

#[test]
fn stdout_handler_captures_nothing() {
    let handler = stdout_handler();
    handler.clear();
    assert_eq!(handler.get_output(), "");
}

#[test]
fn silent_handler_discards_output() {
    let handler = silent_handler();
    handler.println("hello");
    assert_eq!(handler.get_output(), "");
}

#[test]
fn buffer_handler_is_shareable_across_threads() {
    let handler = buffer_handler();
    let other = Arc::clone(&handler);
    let worker = std::thread::spawn(move || {
        for _ in 0..50 {
            other.println("a");
        }
    });
    for _ in 0..50 {
        handler.println("b");
    }
    worker.join().unwrap();
    assert_eq!(handler.get_output().lines().count(), 100);
}
