use compress_engine::{decode_data_url, safe_filename, FailureKind, FALLBACK_FILENAME};

#[test]
fn filename_keeps_last_component_and_replaces_forbidden_chars() {
    assert_eq!(safe_filename(Some("report_compressed.pdf")), "report_compressed.pdf");
    assert_eq!(safe_filename(Some("/tmp/tmpab12cd.pdf")), "tmpab12cd.pdf");
    assert_eq!(safe_filename(Some("..\\..\\evil.exe")), "evil.exe");
    assert_eq!(safe_filename(Some("my: file??.png")), "my_ file_.png");
}

#[test]
fn filename_falls_back_when_missing_or_empty() {
    assert_eq!(safe_filename(None), FALLBACK_FILENAME);
    assert_eq!(safe_filename(Some("")), "compressed");
    assert_eq!(safe_filename(Some("...")), "compressed");
    assert_eq!(safe_filename(Some("dir/")), "compressed");
}

#[test]
fn filename_patches_windows_reserved_names() {
    assert_eq!(safe_filename(Some("CON")), "CON_");
    assert_eq!(safe_filename(Some("nul.pdf")), "nul_.pdf");
    assert_eq!(safe_filename(Some("console.pdf")), "console.pdf");
}

#[test]
fn filename_is_bounded_on_char_boundaries() {
    let long = "ä".repeat(300);
    let name = safe_filename(Some(&long));
    assert_eq!(name.chars().count(), 120);
}

#[test]
fn data_url_payload_is_decoded() {
    let bytes = decode_data_url("data:application/octet-stream;base64,aGVsbG8=").unwrap();
    assert_eq!(bytes, b"hello");

    let bytes = decode_data_url("data:;BASE64,AAEC").unwrap();
    assert_eq!(bytes, vec![0, 1, 2]);
}

#[test]
fn unusable_data_urls_are_rejected() {
    for locator in [
        "data:text/plain,hello",
        "data:application/octet-stream;base64",
        "data:;base64,@@@",
        "https://example.com/a.pdf",
    ] {
        let err = decode_data_url(locator).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidLocator, "{locator}");
    }
}
