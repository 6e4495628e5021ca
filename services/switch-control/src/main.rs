//! Switch Control CLI
//!
//! Command-line front-end for the cryogenic relay switch tree.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switch_control::types::{CleanupResponse, CHANNEL_COUNT};
use switch_control::{load_config, Config, ControlPanel, DeploymentContext, Verification};
use tracing::Level;

#[derive(Parser)]
#[command(name = "switch-control")]
#[command(about = "Control panel for a cryogenic relay switch tree")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Talk to the embedded shell's loopback server (overrides config file)
    #[arg(long)]
    embedded: bool,

    /// Backend origin for browser deployments (overrides config file)
    #[arg(long)]
    origin: Option<String>,

    /// Confirm hardware-affecting commands
    #[arg(long)]
    confirm: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current tree, channel and settings
    Status,
    /// Flip one relay (R1..R7)
    Toggle { key: String },
    /// Route the tree to a channel (1..8)
    Channel {
        #[arg(value_parser = clap::value_parser!(i64).range(1..=CHANNEL_COUNT as i64))]
        number: i64,
    },
    /// Drive every relay to its rest position
    Reset,
    /// Re-send the current path to the hardware
    ReAssert,
    /// Shut the amplifiers off ahead of switching
    AmpShutoff,
    /// List the channel button labels
    Labels,
    /// Rename one channel button (1..8)
    SetLabel {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=CHANNEL_COUNT as i64))]
        channel: u8,
        text: String,
    },
    /// Rename the panel
    SetTitle { title: String },
    /// Edit and save device settings
    Settings {
        #[arg(long)]
        cryo_mode: Option<bool>,
        #[arg(long)]
        cryo_voltage: Option<f64>,
        #[arg(long)]
        regular_voltage: Option<f64>,
        #[arg(long)]
        tree_memory_mode: Option<bool>,
    },
    /// Ask the backend to release the hardware
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, embedded={}, origin={:?}, log_level={:?}",
        args.config,
        args.embedded,
        args.origin,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if args.embedded {
        config.deployment = DeploymentContext::Embedded;
    }
    if let Some(origin) = args.origin {
        config.origin = origin;
    }

    let panel = ControlPanel::new(&config);
    panel.init().await?;

    let verification = Verification::now(args.confirm);
    let tree = panel.tree();

    match args.command {
        Command::Status => {}
        Command::Toggle { key } => tree.toggle(&key, verification).await?,
        Command::Channel { number } => tree.to_channel(number - 1, verification).await?,
        Command::Reset => tree.reset_tree(verification).await?,
        Command::ReAssert => tree.re_assert_tree(verification).await?,
        Command::AmpShutoff => tree.preemptive_amp_shutoff().await?,
        Command::Labels => {
            print_labels(&panel);
            return Ok(());
        }
        Command::SetLabel { channel, text } => {
            let mut labels = panel.config().button_labels();
            if let Some(slot) = labels.get_mut(usize::from(channel) - 1) {
                *slot = text;
            }
            panel.config().save_labels(labels).await?;
            print_labels(&panel);
            return Ok(());
        }
        Command::SetTitle { title } => {
            panel.config().set_title(title);
            panel.config().save_title().await?;
        }
        Command::Settings {
            cryo_mode,
            cryo_voltage,
            regular_voltage,
            tree_memory_mode,
        } => {
            tree.edit_settings(|s| {
                if let Some(v) = cryo_mode {
                    s.cryo_mode = v;
                }
                if let Some(v) = cryo_voltage {
                    s.cryo_voltage = v;
                }
                if let Some(v) = regular_voltage {
                    s.regular_voltage = v;
                }
                if let Some(v) = tree_memory_mode {
                    s.tree_memory_mode = v;
                }
            });
            tree.save_settings().await;
            if !tree.settings_saved().await? {
                print_status(&panel);
                return Err(
                    "settings were not saved; the backend still holds different values".into(),
                );
            }
        }
        Command::Cleanup => {
            let CleanupResponse { ok } = panel.api().cleanup().await?;
            println!("cleanup: {}", if ok { "ok" } else { "failed" });
            return Ok(());
        }
    }

    print_status(&panel);
    Ok(())
}

fn print_status(panel: &ControlPanel) {
    let snap = panel.tree().snapshot();
    let labels = panel.config().button_labels();

    let transport = panel.api().transport();
    println!(
        "{} ({:?} backend at {})",
        panel.config().title(),
        transport.context(),
        transport.url("")
    );
    for (key, switch) in snap.st.switches() {
        println!(
            "  {}  {:<5} {}",
            key,
            if switch.pos { "left" } else { "right" },
            if switch.color { "in use" } else { "" }
        );
    }
    for (idx, label) in labels.iter().enumerate() {
        let marker = if snap.button_colors[idx] { "*" } else { " " };
        println!("  [{}] {} {}", marker, idx + 1, label);
    }
    println!(
        "  cryo mode: {}  cryo voltage: {} V  regular voltage: {} V  tree memory: {}",
        snap.settings.cryo_mode,
        snap.settings.cryo_voltage,
        snap.settings.regular_voltage,
        snap.settings.tree_memory_mode
    );
}

fn print_labels(panel: &ControlPanel) {
    for (idx, label) in panel.config().button_labels().iter().enumerate() {
        println!("{} {}", idx + 1, label);
    }
}
