//! midikey - play MIDI from a raw keyboard device
//!
//! Opens an evdev keyboard and a MIDI output port, then translates key
//! events into Note On/Off messages until the device goes away.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use midikey::{
    config::{parse_channel, parse_transpose, Config},
    error::Error,
    input, midi,
    midi::PortSelection,
    translate::Translator,
    KeyMap,
};

#[derive(Parser)]
#[command(name = "midikey")]
#[command(author, version, about = "Virtual MIDI keyboard for evdev devices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Evdev input device (e.g. /dev/input/event3)
    device: Option<PathBuf>,

    /// List MIDI output ports and input devices, then quit
    #[arg(short, long)]
    list: bool,

    /// Config file path (default: ~/.config/midikey/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// MIDI output port name to create
    #[arg(short = 'n', long = "port-name")]
    port_name: Option<String>,

    /// Connect to the first MIDI output port starting with this prefix
    #[arg(short = 'o', long = "connect")]
    connect: Option<String>,

    /// MIDI channel number (1-16)
    #[arg(short, long, value_parser = parse_channel)]
    channel: Option<u8>,

    /// Transpose MIDI notes by amount (+/- 0-126)
    #[arg(short, long, value_parser = parse_transpose, allow_hyphen_values = true)]
    transpose: Option<i32>,

    /// Grab the input device, swallowing its key events
    #[arg(short, long)]
    grab: bool,

    /// Print MIDI messages as they are sent
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// Show the configuration file path
    ConfigPath,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        let code = match e.downcast_ref::<Error>() {
            Some(Error::NoPortMatch { .. }) => 3,
            _ => 1,
        };
        process::exit(code);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => {
            let path = Config::create_default_config_file()?;
            println!("Created default config at: {}", path.display());
            return Ok(());
        }
        Some(Commands::ConfigPath) => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            return Ok(());
        }
        None => {}
    }

    if cli.list {
        list_ports_and_devices()?;
        return Ok(());
    }

    let Some(device_path) = cli.device else {
        Cli::command().print_help()?;
        process::exit(1);
    };

    // Load config
    let mut config = if let Some(path) = &cli.config {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        Config::load_or_default()
    };

    // Apply CLI overrides
    if let Some(name) = cli.port_name {
        config.midi.port_name = name;
    }
    if let Some(prefix) = cli.connect {
        config.midi.connect = Some(prefix);
    }
    if let Some(channel) = cli.channel {
        config.keys.channel = channel;
    }
    if let Some(transpose) = cli.transpose {
        config.keys.transpose = transpose;
    }
    if cli.grab {
        config.keys.grab = true;
    }
    config.validate()?;

    let selection = config.port_selection();
    let (mut conn, port) = midi::open_output(&selection)?;
    match &selection {
        PortSelection::Virtual(_) => println!("Opened virtual port \"{port}\""),
        PortSelection::ConnectPrefix(_) => println!("Connected to port \"{port}\""),
    }

    let translator = Translator::new(KeyMap::standard(), config.keys.channel, config.keys.transpose);
    let mut device = input::open_device(&device_path)?;

    input::run_device(&mut device, &translator, &mut conn, config.keys.grab)?;
    Ok(())
}

fn list_ports_and_devices() -> Result<()> {
    println!("MIDI output ports:");
    for name in midi::list_output_ports()? {
        println!("    {name}");
    }

    println!("Devices:");
    for (path, name) in input::list_devices() {
        println!("    {path} {name}");
    }
    Ok(())
}
