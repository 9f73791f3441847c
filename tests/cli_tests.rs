#[cfg(test)]
mod tests {
    use beca_link::config::BridgeConfig;
    use beca_link::Args;
    use clap::Parser;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["beca-link"]);
        assert_eq!(args.port, None);
        assert_eq!(args.baud, None);
        assert_eq!(args.midi_port, None);
        assert_eq!(args.retry_seconds, None);
        assert!(!args.list);
        assert!(!args.midi_list);
    }

    #[test]
    fn test_args_all_options() {
        let args = Args::parse_from([
            "beca-link",
            "--port",
            "COM5",
            "--baud",
            "57600",
            "--midi-port",
            "loopMIDI Port",
            "--retry-seconds",
            "0.5",
        ]);
        assert_eq!(args.port.as_deref(), Some("COM5"));
        assert_eq!(args.baud, Some(57600));
        assert_eq!(args.midi_port.as_deref(), Some("loopMIDI Port"));
        assert_eq!(args.retry_seconds, Some(0.5));
    }

    #[test]
    fn test_listing_flags() {
        let args = Args::parse_from(["beca-link", "--list"]);
        assert!(args.list);
        let args = Args::parse_from(["beca-link", "--midi-list"]);
        assert!(args.midi_list);
    }

    #[test]
    fn test_invalid_baud_rejected() {
        assert!(Args::try_parse_from(["beca-link", "--baud", "fast"]).is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::parse_from(["beca-link", "--port", "/dev/ttyUSB1", "--midi-port", "Synth"]);
        let config = BridgeConfig::load(&args).expect("settings should load");
        assert_eq!(config.serial_device().as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.midi_port, "Synth");
        assert_eq!(config.baud, 115_200);
    }
}
