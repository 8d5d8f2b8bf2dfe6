// Adjacent channel power measurement in WCDMA mode
//
// This example switches the analyzer to WCDMA, configures an ACP measurement
// at the given carrier frequency and prints the fetched results.

use clap::Parser;
use std::time::Duration;
use xsa_scpi::{
    Acp, ConnectionSettings, Connector, MeasurementCapability, ModeCapability, TriggerSource,
    Wcdma,
};

#[derive(Parser)]
#[command(name = "acp_measurement")]
#[command(version = "0.1")]
#[command(about = "Run a WCDMA ACP measurement")]
struct Args {
    /// Resource string, e.g. TCPIP0::192.168.1.20::SOCKET
    resource: String,

    /// Carrier frequency in Hz
    #[arg(short, long, default_value_t = 1.9e9)]
    frequency: f64,

    /// Number of averages, 0 disables averaging
    #[arg(short, long, default_value_t = 10)]
    averages: u32,

    /// Trigger on an RF burst at this level (dBm) instead of free run
    #[arg(long, allow_negative_numbers = true)]
    burst_level: Option<f64>,

    /// Measurement timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, help = "Show every SCPI command and response")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let settings = ConnectionSettings {
        timeout: Duration::from_secs(args.timeout),
        ..ConnectionSettings::new(args.resource)
    };
    let mut analyzer = Connector::connect(&settings)?;
    analyzer.reset()?;

    println!("Connected to {}", analyzer.identify()?);

    {
        let wcdma = analyzer.mode_mut::<Wcdma>()?;
        wcdma.load()?;
        if let Some(level) = args.burst_level {
            wcdma.trigger_mut().set_rf_burst_level(level)?;
        }
    }

    analyzer.set_center_frequency(args.frequency)?;
    analyzer.set_continuous_sweep(false)?;

    let acp = analyzer.mode::<Wcdma>()?.measurement::<Acp>()?;
    acp.configure()?;
    acp.set_trigger_source(if args.burst_level.is_some() {
        TriggerSource::RfBurst
    } else {
        TriggerSource::Immediate
    })?;
    acp.set_averaging(args.averages > 0)?;
    if args.averages > 0 {
        acp.set_averaging_count(args.averages)?;
    }

    acp.initiate()?;
    analyzer.wait_for_completion()?;

    let results = acp.fetch()?;
    println!("ACP results ({} values):", results.len());
    for (i, value) in results.iter().enumerate() {
        println!("  [{:2}] {:10.3}", i, value);
    }

    for entry in analyzer.drain_errors()? {
        eprintln!("Instrument error {}: {}", entry.code, entry.message);
    }

    Ok(())
}
