use beca_link::{
    cli::Args,
    config::{BridgeConfig, READ_TIMEOUT, REPORT_INTERVAL},
    logging,
    midi::{acquire_output, DefaultMidiProvider, MidiOutputProvider, MidiSink, OutputStrategy},
    serial::{NativeSerial, SerialBackend},
    stop::install_signal_handler,
    Bridge, BridgeSettings, ConnectionManager, ConnectionSettings, StopToken,
};
use clap::Parser;
use std::process;

const EXIT_OK: i32 = 0;
const EXIT_CONFIG: i32 = 1;
const EXIT_NO_MIDI_OUTPUT: i32 = 2;

fn main() {
    let args = Args::parse();
    initialize_logging(args.verbose);

    if args.list {
        list_serial_ports();
        process::exit(EXIT_OK);
    }
    if args.midi_list {
        list_midi_ports();
        process::exit(EXIT_OK);
    }

    let config = match BridgeConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    process::exit(run(config));
}

fn initialize_logging(verbose: bool) {
    if let Err(e) = logging::init_logger(verbose) {
        eprintln!("{}", e);
    }
    log::debug!("Application starting");
}

fn list_serial_ports() {
    match NativeSerial::new().enumerate() {
        Ok(ports) if ports.is_empty() => println!("No serial ports found."),
        Ok(ports) => {
            println!("Available serial ports:");
            for port in ports {
                println!("  {:12}  {}", port.device, port.description);
            }
        }
        Err(e) => log::error!("{}", e),
    }
}

fn list_midi_ports() {
    let provider = DefaultMidiProvider::new();
    match provider.output_names() {
        Ok(outputs) => println!("MIDI outputs: {:?}", outputs),
        Err(e) => log::error!("{}", e),
    }
    match provider.input_names() {
        Ok(inputs) => println!("MIDI inputs : {:?}", inputs),
        Err(e) => log::error!("{}", e),
    }
}

fn run(config: BridgeConfig) -> i32 {
    let stop = StopToken::new();
    if let Err(e) = install_signal_handler(&stop) {
        log::warn!("Could not install signal handler: {}", e);
    }

    let provider = DefaultMidiProvider::new();
    let (sink, mode) =
        match acquire_output(&provider, &config.midi_port, OutputStrategy::for_platform()) {
            Ok(acquired) => acquired,
            Err(e) => {
                log::error!("{}", e);
                log::error!("Tip: run with --midi-list to see the ports visible right now.");
                return EXIT_NO_MIDI_OUTPUT;
            }
        };
    log::info!("MIDI output ready ({}): {}", mode, sink.name());

    let connection = ConnectionManager::new(
        NativeSerial::new(),
        ConnectionSettings {
            device: config.serial_device(),
            baud: config.baud,
            read_timeout: READ_TIMEOUT,
        },
    );
    let settings = BridgeSettings {
        retry_interval: config.retry_interval(),
        report_interval: REPORT_INTERVAL,
    };

    let stats = Bridge::new(connection, sink, stop, settings).run();
    log::info!("Stopped. Sent {} MIDI messages in total.", stats.sent);
    EXIT_OK
}
