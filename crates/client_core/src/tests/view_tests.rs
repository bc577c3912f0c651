use super::*;

fn active_views(controller: &ViewController) -> Vec<(ViewKind, bool, bool)> {
    controller
        .indicators()
        .iter()
        .filter(|indicator| indicator.tab_active || indicator.content_active)
        .map(|indicator| (indicator.view, indicator.tab_active, indicator.content_active))
        .collect()
}

#[test]
fn starts_on_normalized_view() {
    let controller = ViewController::default();
    assert_eq!(controller.active_view(), ViewKind::Normalized);
    assert_eq!(
        active_views(&controller),
        vec![(ViewKind::Normalized, true, true)]
    );
}

#[test]
fn selection_is_exclusive_for_every_sequence() {
    let mut controller = ViewController::default();
    let sequence = [
        ViewKind::Overlay,
        ViewKind::Overlay,
        ViewKind::Annotated,
        ViewKind::OcrDetection,
        ViewKind::Normalized,
        ViewKind::Annotated,
    ];

    for view in sequence {
        controller.select_view(view);
        assert_eq!(controller.active_view(), view);
        assert_eq!(active_views(&controller), vec![(view, true, true)]);
        for other in ViewKind::ALL.into_iter().filter(|other| *other != view) {
            assert!(!controller.is_active(other));
        }
    }
}

#[test]
fn reset_returns_to_first_view() {
    let mut controller = ViewController::default();
    controller.select_view(ViewKind::Annotated);
    controller.reset();
    assert_eq!(controller.active_view(), ViewKind::Normalized);
}

#[test]
fn message_slot_holds_only_latest_message() {
    let mut controller = ViewController::default();
    controller.show_message("first", MessageKind::Info);
    controller.show_message("broken", MessageKind::Error);

    assert_eq!(
        controller.message(),
        Some(&UserMessage {
            text: "broken".to_string(),
            kind: MessageKind::Error,
        })
    );

    controller.clear_message();
    assert!(controller.message().is_none());
}

#[test]
fn selecting_view_leaves_message_untouched() {
    let mut controller = ViewController::default();
    controller.show_message("done", MessageKind::Success);
    controller.select_view(ViewKind::Overlay);
    assert_eq!(
        controller.message().map(|message| message.kind),
        Some(MessageKind::Success)
    );
}
