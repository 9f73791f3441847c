use beca_link::midi::output::DEFAULT_VIRTUAL_NAME;
use beca_link::midi::{
    acquire_output, MidiError, MidiMessage, MidiSink, MockMidiProvider, OutputStrategy, PortMode,
};

#[test]
fn test_virtual_port_is_preferred_when_supported() {
    let provider = MockMidiProvider::new(&["loopMIDI Port"], true);
    let (sink, mode) = acquire_output(&provider, "BECA Out", OutputStrategy::VirtualThenExisting)
        .expect("virtual port should be created");

    assert_eq!(mode, PortMode::Virtual);
    assert_eq!(sink.name(), "BECA Out");
    assert_eq!(provider.opened(), vec!["virtual:BECA Out"]);
}

#[test]
fn test_auto_virtual_port_gets_default_name() {
    let provider = MockMidiProvider::new(&[], true);
    let (sink, mode) = acquire_output(&provider, "auto", OutputStrategy::VirtualThenExisting)
        .expect("virtual port should be created");

    assert_eq!(mode, PortMode::Virtual);
    assert_eq!(sink.name(), DEFAULT_VIRTUAL_NAME);
}

#[test]
fn test_virtual_failure_falls_back_to_existing() {
    let provider = MockMidiProvider::new(&["Midi Through:Port-0", "loopMIDI Port"], false);
    let (sink, mode) = acquire_output(&provider, "auto", OutputStrategy::VirtualThenExisting)
        .expect("existing port should be used");

    assert_eq!(mode, PortMode::Existing);
    assert_eq!(sink.name(), "loopMIDI Port");
}

#[test]
fn test_existing_only_never_creates_virtual_ports() {
    let provider = MockMidiProvider::new(&["Microsoft GS Wavetable Synth", "loopMIDI Port"], true);
    let (sink, mode) = acquire_output(&provider, "LOOPMIDI PORT", OutputStrategy::ExistingOnly)
        .expect("existing port should be used");

    assert_eq!(mode, PortMode::Existing);
    assert_eq!(sink.name(), "loopMIDI Port");
    assert_eq!(provider.opened(), vec!["loopMIDI Port"]);
}

#[test]
fn test_missing_output_lists_available_ports() {
    let provider = MockMidiProvider::new(&["Microsoft GS Wavetable Synth"], false);
    let err = match acquire_output(&provider, "BECA Serial MIDI", OutputStrategy::ExistingOnly) {
        Ok(_) => panic!("acquisition should fail"),
        Err(e) => e,
    };

    assert!(matches!(err, MidiError::OutputUnavailable(_)));
    let message = err.to_string();
    assert!(message.contains("'BECA Serial MIDI'"), "{}", message);
    assert!(message.contains("Microsoft GS Wavetable Synth"), "{}", message);
    assert!(message.contains("loopMIDI"), "{}", message);
}

#[test]
fn test_no_outputs_at_all_is_fatal() {
    let provider = MockMidiProvider::new(&[], false);
    let result = acquire_output(&provider, "auto", OutputStrategy::VirtualThenExisting);
    assert!(matches!(result, Err(MidiError::OutputUnavailable(_))));
}

#[test]
fn test_acquired_sink_forwards_messages() {
    let provider = MockMidiProvider::new(&["loopMIDI Port"], false);
    let (mut sink, _) = acquire_output(&provider, "auto", OutputStrategy::ExistingOnly)
        .expect("existing port should be used");

    let msg = MidiMessage::note_on(0, 60, 100);
    sink.send(&msg).expect("send should succeed");
    assert_eq!(sink.sent(), vec![msg]);

    sink.close();
    assert!(sink.send(&msg).is_err());
}
