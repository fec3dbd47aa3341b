//! Command-line front end for a Keithley 6514 on a serial port.
//!
//! ```text
//! electrometer --port /dev/ttyUSB0 mode current
//! electrometer range "2 nA"
//! electrometer read
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use electrometer_daq::config::ElectrometerConfig;
use electrometer_daq::instrument::keithley6514::{ArmSource, Keithley6514, Mode, TriggerMode};
use electrometer_daq::instrument::read_quantity;
use electrometer_daq::transport::SerialTransport;
use electrometer_daq::units::Quantity;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "electrometer", version, about = "Control a Keithley 6514 electrometer")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port, overriding the configuration
    #[arg(short, long)]
    port: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print mode, range and the other settings
    Status,
    /// Get or set the measurement mode
    Mode { value: Option<Mode> },
    /// Get or set the trigger source
    TriggerSource { value: Option<TriggerMode> },
    /// Get or set the arm source
    ArmSource { value: Option<ArmSource> },
    /// Get or set zero check
    ZeroCheck { value: Option<Switch> },
    /// Get or set zero correct
    ZeroCorrect { value: Option<Switch> },
    /// Get or set the full-scale range, e.g. "2 nA"
    Range { value: Option<Quantity> },
    /// Get or set auto-ranging
    AutoRange { value: Option<Switch> },
    /// Switch mode and reset related controls to defaults
    AutoConfig { mode: Mode },
    /// Print the latest reading without triggering
    Fetch,
    /// Trigger and print a new reading
    Read,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> bool {
        matches!(switch, Switch::On)
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ElectrometerConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ElectrometerConfig::from_env().context("Failed to load configuration")?,
    };
    if let Some(port) = cli.port {
        config.connection.port = port;
    }

    env_logger::Builder::new()
        .format_timestamp_micros()
        .parse_filters(&config.application.log_level)
        .parse_default_env()
        .init();

    let mut transport = SerialTransport::open_serial(&config.connection)
        .with_context(|| format!("Failed to open serial port '{}'", config.connection.port))?;
    info!("Connected to Keithley 6514 on {}", config.connection.port);

    let mut meter = Keithley6514::new(&mut transport);
    run(&mut meter, cli.command)
}

fn run(meter: &mut Keithley6514<'_, SerialTransport>, command: Command) -> Result<()> {
    match command {
        Command::Status => {
            let mode = meter.mode()?;
            println!("mode:           {}", mode);
            println!("range:          {}", meter.input_range()?);
            println!("auto range:     {}", on_off(meter.auto_range()?));
            println!("trigger source: {}", meter.trigger_source()?);
            println!("arm source:     {}", meter.arm_source()?);
            println!("zero check:     {}", on_off(meter.zero_check()?));
            println!("zero correct:   {}", on_off(meter.zero_correct()?));
        }
        Command::Mode { value: Some(mode) } => meter.set_mode(mode)?,
        Command::Mode { value: None } => println!("{}", meter.mode()?),
        Command::TriggerSource { value: Some(source) } => meter.set_trigger_source(source)?,
        Command::TriggerSource { value: None } => println!("{}", meter.trigger_source()?),
        Command::ArmSource { value: Some(source) } => meter.set_arm_source(source)?,
        Command::ArmSource { value: None } => println!("{}", meter.arm_source()?),
        Command::ZeroCheck { value: Some(switch) } => meter.set_zero_check(switch.into())?,
        Command::ZeroCheck { value: None } => println!("{}", on_off(meter.zero_check()?)),
        Command::ZeroCorrect { value: Some(switch) } => meter.set_zero_correct(switch.into())?,
        Command::ZeroCorrect { value: None } => println!("{}", on_off(meter.zero_correct()?)),
        Command::Range { value: Some(range) } => meter
            .set_input_range(range)
            .with_context(|| format!("Cannot select range {}", range))?,
        Command::Range { value: None } => println!("{}", meter.input_range()?),
        Command::AutoRange { value: Some(switch) } => meter.set_auto_range(switch.into())?,
        Command::AutoRange { value: None } => println!("{}", on_off(meter.auto_range()?)),
        Command::AutoConfig { mode } => meter.auto_config(mode)?,
        Command::Fetch => {
            let reading = meter.fetch()?;
            println!("{}", reading.raw);
        }
        Command::Read => println!("{}", read_quantity(meter)?),
    }
    Ok(())
}
