use beca_link::connection::{ReadOutcome, Readiness};
use beca_link::serial::{MockEvent, MockSerial, PortCandidate};
use beca_link::{ConnectionManager, ConnectionSettings, ConnectionState};
use std::time::Duration;

fn settings(device: Option<&str>) -> ConnectionSettings {
    ConnectionSettings {
        device: device.map(str::to_string),
        baud: 115_200,
        read_timeout: Duration::from_millis(1),
    }
}

#[test]
fn test_repeated_open_failures_never_connect() {
    let backend = MockSerial::new(vec![PortCandidate::new("COM5", "USB Serial Device", None)]);
    for _ in 0..6 {
        backend.push_open_err("Access is denied.");
    }
    backend.push_open_ok(vec![]);
    let mut manager = ConnectionManager::new(backend.clone(), settings(None));

    for attempt in 1..=6 {
        assert_eq!(manager.ensure_connected(), Readiness::Wait);
        assert_ne!(manager.state(), ConnectionState::Connected);
        assert!(!manager.is_connected());
        assert_eq!(manager.open_failures(), attempt);
    }

    assert_eq!(manager.ensure_connected(), Readiness::Ready);
    assert_eq!(manager.state(), ConnectionState::Connected);
    let opens = backend
        .journal()
        .iter()
        .filter(|e| e.starts_with("open:"))
        .count();
    assert_eq!(opens, 1);
}

#[test]
fn test_read_failure_closes_before_next_open() {
    let backend = MockSerial::new(vec![]);
    backend.push_open_ok(vec![MockEvent::ReadError("I/O error".to_string())]);
    backend.push_open_ok(vec![MockEvent::line("@I back")]);
    let mut manager = ConnectionManager::new(backend.clone(), settings(Some("/dev/ttyUSB0")));

    assert_eq!(manager.ensure_connected(), Readiness::Ready);
    assert_eq!(manager.read(), ReadOutcome::Lost);
    assert_eq!(manager.state(), ConnectionState::Failing);
    assert!(!manager.is_connected());

    assert_eq!(manager.ensure_connected(), Readiness::Ready);
    assert_eq!(manager.read(), ReadOutcome::Line("@I back".to_string()));
    assert_eq!(
        backend.journal(),
        vec!["open:/dev/ttyUSB0", "close:/dev/ttyUSB0", "open:/dev/ttyUSB0"]
    );
}

#[test]
fn test_device_list_change_is_picked_up_on_reconnect() {
    let backend = MockSerial::new(vec![]);
    let mut manager = ConnectionManager::new(backend.clone(), settings(None));
    assert_eq!(manager.ensure_connected(), Readiness::Wait);

    backend.set_ports(vec![PortCandidate::new("/dev/ttyACM1", "BECA", None)]);
    backend.push_open_ok(vec![]);
    assert_eq!(manager.ensure_connected(), Readiness::Ready);
    assert_eq!(manager.device(), Some("/dev/ttyACM1"));
}

#[test]
fn test_close_releases_link() {
    let backend = MockSerial::new(vec![]);
    backend.push_open_ok(vec![MockEvent::Idle]);
    let mut manager = ConnectionManager::new(backend.clone(), settings(Some("COM3")));
    manager.ensure_connected();
    manager.close();

    assert_eq!(manager.state(), ConnectionState::Disconnected);
    assert_eq!(backend.journal(), vec!["open:COM3", "close:COM3"]);

    // A second close does not touch the backend again.
    manager.close();
    assert_eq!(backend.journal().len(), 2);
}
