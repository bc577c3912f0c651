use super::*;

#[test]
fn checkpoint_percentages_strictly_increase() {
    let percents: Vec<u8> = Checkpoint::SEQUENCE.iter().map(|c| c.percent()).collect();
    assert!(percents.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(percents.last(), Some(&100));
}

#[test]
fn advance_requires_a_submission_in_flight() {
    let mut state = ProcessingState::Idle;
    assert!(!state.advance(Checkpoint::Normalizing));
    assert_eq!(state, ProcessingState::Idle);

    let mut state = ProcessingState::Failed("HTTP error: 500".to_string());
    assert!(!state.advance(Checkpoint::Recognizing));
    assert_eq!(state.failure(), Some("HTTP error: 500"));
}

#[test]
fn advance_never_moves_backwards() {
    let mut state = ProcessingState::Uploading;
    assert!(state.advance(Checkpoint::Normalizing));
    assert!(state.advance(Checkpoint::Fitting));
    assert!(!state.advance(Checkpoint::Recognizing));
    assert!(!state.advance(Checkpoint::Fitting));
    assert_eq!(state.percent(), Some(60));
    assert_eq!(state.label(), Some(Checkpoint::Fitting.label()));
    assert!(state.is_in_flight());
}

#[test]
fn terminal_states_release_the_request_slot() {
    assert!(!ProcessingState::Idle.is_in_flight());
    assert!(!ProcessingState::Failed(String::new()).is_in_flight());
    assert!(ProcessingState::Uploading.is_in_flight());
}
