// Connect to an analyzer and print what it is
//
// This example opens a resource string, validates the instrument from its
// *IDN? response and lists the modes and measurements it was built with.

use clap::Parser;
use std::time::Duration;
use xsa_scpi::{ConnectionSettings, Connector};

#[derive(Parser)]
#[command(name = "identify")]
#[command(version = "0.1")]
#[command(about = "Identify an X-Series signal analyzer")]
#[command(long_about = "Connect to an X-Series signal analyzer, print its identity and options, and list the modes and measurements available through this client.")]
struct Args {
    /// Resource string, e.g. TCPIP0::192.168.1.20::SOCKET or ASRL/dev/ttyUSB0::INSTR
    resource: String,

    /// Response timeout in milliseconds
    #[arg(short, long, default_value_t = 5000)]
    timeout: u64,

    /// Ask the instrument which modes it has instead of assuming all of them
    #[arg(short, long, help = "Discover modes with INST:CAT?")]
    discover: bool,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Show every SCPI command and response")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Trace)
            .init();
    } else {
        env_logger::init();
    }

    if args.list_ports {
        for port in Connector::available_serial_ports()? {
            println!("ASRL{}::INSTR", port);
        }
        return Ok(());
    }

    let settings = ConnectionSettings {
        timeout: Duration::from_millis(args.timeout),
        discover_modes: args.discover,
        ..ConnectionSettings::new(args.resource)
    };

    let analyzer = Connector::connect(&settings)?;
    let identity = analyzer.identify()?;

    println!("Instrument: {}", identity);
    if let Some(model) = analyzer.model() {
        println!("Model:      {}", model);
    }
    println!("Options:    {}", analyzer.options()?.join(", "));

    println!("\nModes:");
    for (id, mode) in analyzer.modes().iter() {
        let measurements: Vec<String> = mode
            .core()
            .measurements()
            .keys()
            .map(ToString::to_string)
            .collect();
        println!("  {} ({}): {}", id, mode.scpi_name(), measurements.join(", "));
    }

    let errors = analyzer.drain_errors()?;
    if !errors.is_empty() {
        println!("\nPending errors:");
        for entry in errors {
            println!("  {}: {}", entry.code, entry.message);
        }
    }

    Ok(())
}
