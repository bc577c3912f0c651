use super::*;

fn png(name: &str) -> FileCandidate {
    FileCandidate::new(name, Some("image/png"), vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn accepts_image_and_exposes_bytes_for_preview() {
    let mut intake = FileIntake::default();
    let selected = intake.select_file(png("mockup.png")).expect("accepted");

    assert_eq!(selected.name(), "mockup.png");
    assert_eq!(selected.content_type(), "image/png");
    assert_eq!(selected.bytes(), &[0x89, b'P', b'N', b'G']);
}

#[test]
fn rejection_keeps_previous_selection() {
    let mut intake = FileIntake::default();
    intake.select_file(png("first.png")).expect("accepted");

    for (content_type, name) in [
        (Some("application/pdf"), "brief.pdf"),
        (Some("text/plain"), "notes.txt"),
        (Some("video/mp4"), "clip.mp4"),
        (None, "unknown"),
        (Some(""), "blank"),
    ] {
        let err = intake
            .select_file(FileCandidate::new(name, content_type, vec![1, 2, 3]))
            .expect_err("rejected");
        assert!(matches!(err, ClientError::InvalidFileType { .. }));
        assert_eq!(intake.selected().map(SelectedFile::name), Some("first.png"));
    }
}

#[test]
fn new_selection_replaces_previous_one() {
    let mut intake = FileIntake::default();
    intake.select_file(png("first.png")).expect("accepted");
    intake
        .select_file(FileCandidate::new("second.jpg", Some("IMAGE/JPEG"), vec![9]))
        .expect("accepted");

    let selected = intake.selected().expect("selected");
    assert_eq!(selected.name(), "second.jpg");
    assert_eq!(selected.content_type(), "image/jpeg");
    assert_eq!(selected.bytes(), &[9]);
}

#[test]
fn drop_clears_highlight_regardless_of_outcome() {
    let mut intake = FileIntake::default();

    intake.drag_over();
    assert!(intake.is_drag_active());
    intake
        .drop_file(FileCandidate::new("a.txt", Some("text/plain"), Vec::new()))
        .expect_err("rejected");
    assert!(!intake.is_drag_active());
    assert!(intake.selected().is_none());

    intake.drag_over();
    intake.drop_file(png("b.png")).expect("accepted");
    assert!(!intake.is_drag_active());

    intake.drag_over();
    intake.drag_leave();
    assert!(!intake.is_drag_active());
    assert_eq!(intake.selected().map(SelectedFile::name), Some("b.png"));
}

#[test]
fn candidate_from_path_guesses_content_type() {
    let path = std::env::temp_dir().join(format!("pixeltype_intake_{}.jpg", std::process::id()));
    fs::write(&path, [0xff, 0xd8, 0xff]).expect("write");

    let candidate = FileCandidate::from_path(&path).expect("read");
    assert_eq!(candidate.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(candidate.bytes, vec![0xff, 0xd8, 0xff]);

    fs::remove_file(path).expect("cleanup");
}
