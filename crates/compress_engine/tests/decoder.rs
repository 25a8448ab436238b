use compress_core::ProgressEvent;
use compress_engine::{DecodeError, EventDecoder, LineDecoder, MalformedLinePolicy};
use pretty_assertions::assert_eq;

fn progress(pct: u8) -> ProgressEvent {
    ProgressEvent {
        progress: Some(pct),
        ..ProgressEvent::default()
    }
}

#[test]
fn lines_are_reassembled_across_chunk_boundaries() {
    let mut decoder = EventDecoder::default();

    let first = decoder.feed(br#"{"progress":1}
{"prog"#).unwrap();
    assert_eq!(first, vec![progress(1)]);
    assert_eq!(decoder.residual(), r#"{"prog"#);

    let second = decoder.feed(br#"ress":2}
"#).unwrap();
    assert_eq!(second, vec![progress(2)]);
    assert_eq!(decoder.residual(), "");
}

#[test]
fn multibyte_character_split_between_chunks_survives() {
    let line = "{\"status\":\"Komprimiere … ✓\"}\n".as_bytes();
    let split = line
        .iter()
        .position(|b| *b == 0xE2)
        .expect("ellipsis lead byte")
        + 1;

    let mut decoder = EventDecoder::default();
    assert!(decoder.feed(&line[..split]).unwrap().is_empty());
    let events = decoder.feed(&line[split..]).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status.as_deref(), Some("Komprimiere … ✓"));
    assert!(!events[0].status.as_deref().unwrap().contains('\u{FFFD}'));
}

#[test]
fn byte_by_byte_feeding_yields_the_same_records() {
    let body = "{\"progress\":5,\"status\":\"Analyse läuft…\"}\n{\"progress\":60}\n".as_bytes();
    let mut decoder = EventDecoder::default();
    let mut events = Vec::new();
    for byte in body {
        events.extend(decoder.feed(std::slice::from_ref(byte)).unwrap());
    }

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status.as_deref(), Some("Analyse läuft…"));
    assert_eq!(events[1], progress(60));
}

#[test]
fn malformed_line_is_skipped_without_stopping() {
    let mut decoder = EventDecoder::new(MalformedLinePolicy::Ignore);

    let events = decoder
        .feed(b"{\"progress\":10}\nnot json at all\n{\"progress\":20}\n")
        .unwrap();

    assert_eq!(events, vec![progress(10), progress(20)]);
    assert_eq!(decoder.discarded(), 1);
}

#[test]
fn malformed_line_fails_under_strict_policy() {
    let mut decoder = EventDecoder::new(MalformedLinePolicy::Fail);

    let err = decoder.feed(b"{\"progress\":10\n").unwrap_err();

    let DecodeError::MalformedLine { line, .. } = err;
    assert_eq!(line, "{\"progress\":10");
}

#[test]
fn empty_and_blank_lines_are_not_counted_as_malformed() {
    let mut decoder = EventDecoder::default();

    let events = decoder.feed(b"\n\n   \r\n{\"progress\":3}\r\n").unwrap();

    assert_eq!(events, vec![progress(3)]);
    assert_eq!(decoder.discarded(), 0);
}

#[test]
fn unterminated_final_line_is_emitted_on_finish() {
    let mut decoder = EventDecoder::default();
    assert!(decoder.feed(br#"{"progress":99}"#).unwrap().is_empty());

    assert_eq!(decoder.finish().unwrap(), Some(progress(99)));
    assert_eq!(decoder.finish().unwrap(), None);
}

#[test]
fn line_decoder_keeps_empty_segments_and_exposes_residual() {
    let mut lines = LineDecoder::new();

    assert_eq!(lines.feed(b"a\n\nb"), vec!["a".to_string(), String::new()]);
    assert_eq!(lines.residual(), "b");
    assert_eq!(lines.flush(), Some("b".to_string()));
    assert_eq!(lines.residual(), "");
    assert_eq!(lines.flush(), None);
}

#[test]
fn line_decoder_flush_replaces_truncated_character() {
    let mut lines = LineDecoder::new();
    // First two bytes of a three-byte character, then end of stream.
    assert!(lines.feed(&[b'x', 0xE2, 0x80]).is_empty());

    assert_eq!(lines.flush(), Some("x\u{FFFD}".to_string()));
}
