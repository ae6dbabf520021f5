//! OTM3201A Panel Tool
//!
//! Inspects the panel's mode and init table, and dry-runs the bring-up
//! sequence against a recording DSI transport.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use embedded_hal::delay::DelayNs;
use otm3201a_hw::backlight::BacklightProperties;
use otm3201a_hw::panel::{INIT_SEQUENCE, PANEL_NAMES};
use otm3201a_hw::{find_panel, CaptureTransport, NoDelay, PanelDriver, StdDelay};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "otm3201actl")]
#[command(about = "Inspect and dry-run the OTM3201A panel bring-up")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the video mode and DSI link configuration
    Mode,
    /// List the init register writes
    Sequence,
    /// Run the init sequence against a recording transport
    Setup {
        /// Reject this write (1-indexed)
        #[arg(long)]
        fail_at: Option<usize>,

        /// Status code for the rejected write
        #[arg(long, allow_hyphen_values = true)]
        code: Option<i32>,

        /// Skip the power-on delays
        #[arg(long)]
        no_delay: bool,
    },
    /// List known panels
    Panels,
    /// Show backlight callback results
    Backlight {
        /// Brightness to request
        #[arg(long, default_value = "255")]
        brightness: u32,
    },
    /// Print the effective configuration
    Config {
        /// Write it to this path instead of stdout
        #[arg(long)]
        write: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli, &config)
}

/// Dispatches a parsed command line against a loaded configuration.
fn run(cli: Cli, config: &Config) -> Result<()> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    match cli.command {
        Commands::Mode => handle_mode(&*configured_panel(config)?, format),
        Commands::Sequence => handle_sequence(format),
        Commands::Setup {
            fail_at,
            code,
            no_delay,
        } => {
            let fail_at = fail_at.or(config.setup.fail_at);
            let code = code.unwrap_or(config.setup.fail_code);
            let settle = config.setup.settle_delays && !no_delay;
            handle_setup(&*configured_panel(config)?, fail_at, code, settle, format)
        }
        Commands::Panels => handle_panels(format),
        Commands::Backlight { brightness } => {
            handle_backlight(&*configured_panel(config)?, brightness, format)
        }
        Commands::Config { write } => handle_config(config, write.as_deref()),
    }
}

/// Looks up the driver named in `[setup] panel`.
fn configured_panel(config: &Config) -> Result<Box<dyn PanelDriver>> {
    find_panel(&config.setup.panel)
        .with_context(|| format!("No driver for panel '{}'", config.setup.panel))
}

fn handle_mode(panel: &dyn PanelDriver, format: OutputFormat) -> Result<()> {
    let (modes, lcd) = panel.lcd_videomode();

    match format {
        OutputFormat::Json => {
            let modes: Vec<_> = modes
                .iter()
                .map(|m| {
                    json!({
                        "name": m.name,
                        "refresh": m.refresh,
                        "xres": m.xres,
                        "yres": m.yres,
                        "pixclock_ps": m.pixclock,
                        "left_margin": m.left_margin,
                        "right_margin": m.right_margin,
                        "upper_margin": m.upper_margin,
                        "lower_margin": m.lower_margin,
                        "hsync_len": m.hsync_len,
                        "vsync_len": m.vsync_len,
                        "sync": m.sync.bits(),
                        "vmode": m.vmode.to_string(),
                    })
                })
                .collect();
            let out = json!({
                "modes": modes,
                "lcd_config": {
                    "virtual_channel": lcd.virtual_channel,
                    "data_lanes": lcd.data_lanes,
                    "max_phy_clk_mhz": lcd.max_phy_clk_mhz,
                    "dpi_format": lcd.dpi_format.to_string(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for m in modes {
                println!("Mode {}:", m.name);
                println!("  Resolution: {}x{} @ {}Hz", m.xres, m.yres, m.refresh);
                println!(
                    "  Pixel clock: {}ps ({}Hz)",
                    m.pixclock,
                    m.pixel_clock_hz()
                );
                println!(
                    "  Margins: left {} right {} upper {} lower {}",
                    m.left_margin, m.right_margin, m.upper_margin, m.lower_margin
                );
                println!("  Sync length: h {} v {}", m.hsync_len, m.vsync_len);
                println!("  Sync flags: 0x{:08X}", m.sync.bits());
                println!("  Scan: {}", m.vmode);
            }
            println!("DSI link:");
            println!("  Virtual channel: {}", lcd.virtual_channel);
            println!("  Data lanes: {}", lcd.data_lanes);
            println!("  Max PHY clock: {}MHz", lcd.max_phy_clk_mhz);
            println!("  DPI format: {}", lcd.dpi_format);
        }
    }

    Ok(())
}

fn handle_sequence(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let steps: Vec<_> = INIT_SEQUENCE
                .iter()
                .map(|s| {
                    json!({
                        "register": s.command.address(),
                        "params": s.command.params(),
                        "delay_ms": s.delay_ms,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
        OutputFormat::Text => {
            for (i, s) in INIT_SEQUENCE.iter().enumerate() {
                let params: Vec<String> =
                    s.command.params().iter().map(|b| format!("{:02X}", b)).collect();
                let wait = s
                    .delay_ms
                    .map(|ms| format!("  (wait {}ms)", ms))
                    .unwrap_or_default();
                println!(
                    "{:>2}: {:02X} [{}]{}",
                    i + 1,
                    s.command.address(),
                    params.join(" "),
                    wait
                );
            }
        }
    }

    Ok(())
}

fn handle_setup(
    panel: &dyn PanelDriver,
    fail_at: Option<usize>,
    code: i32,
    settle: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut transport = match fail_at {
        Some(k) => CaptureTransport::new().fail_at(k, code),
        None => CaptureTransport::new(),
    };
    let mut std_delay = StdDelay;
    let mut no_delay = NoDelay;
    let delay: &mut dyn DelayNs = if settle {
        &mut std_delay
    } else {
        &mut no_delay
    };

    let start = std::time::Instant::now();
    let result = panel.lcd_setup(&mut transport, delay);
    let elapsed = start.elapsed();
    info!("Setup attempted {} writes in {:?}", transport.calls(), elapsed);

    match format {
        OutputFormat::Json => {
            let packets: Vec<_> = transport
                .packets()
                .iter()
                .map(|p| json!({ "kind": p.kind.to_string(), "payload": p.hex() }))
                .collect();
            let out = json!({
                "panel": panel.name(),
                "calls": transport.calls(),
                "elapsed_ms": elapsed.as_millis() as u64,
                "status": result.as_ref().err().and_then(|e| e.code()).unwrap_or(0),
                "packets": packets,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for (i, p) in transport.packets().iter().enumerate() {
                println!("{:>2}: {} {}", i + 1, p.kind, p.hex());
            }
            println!(
                "{} write(s) attempted in {}ms",
                transport.calls(),
                elapsed.as_millis()
            );
        }
    }

    result.with_context(|| format!("{} setup failed", panel.name()))?;
    Ok(())
}

fn handle_panels(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(PANEL_NAMES)?),
        OutputFormat::Text => {
            println!("Known panels:");
            for name in PANEL_NAMES {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}

fn handle_backlight(panel: &dyn PanelDriver, brightness: u32, format: OutputFormat) -> Result<()> {
    let bl = panel.backlight();
    let props = BacklightProperties {
        brightness,
        max_brightness: 255,
    };
    bl.update_status(&props)?;
    let current = bl.get_brightness();

    match format {
        OutputFormat::Json => {
            let out = json!({ "requested": brightness, "brightness": current });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Backlight:");
            println!("  Requested: {}", brightness);
            println!("  Reported: {}", current);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, write: Option<&str>) -> Result<()> {
    match write {
        Some(path) => {
            config.save(path)?;
            println!("Configuration written to: {}", path);
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_panel_config() -> Config {
        let mut config = Config::default();
        config.setup.panel = "BOGUS".to_string();
        config.setup.settle_delays = false;
        config
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["otm3201actl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_panel_free_commands_ignore_unknown_panel() {
        let config = unknown_panel_config();
        assert!(run(parse(&["panels"]), &config).is_ok());
        assert!(run(parse(&["sequence"]), &config).is_ok());
        assert!(run(parse(&["config"]), &config).is_ok());
    }

    #[test]
    fn test_config_write_with_unknown_panel() {
        let config = unknown_panel_config();
        let path = std::env::temp_dir().join(format!("otm3201actl-{}.toml", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        assert!(run(parse(&["config", "--write", &path_str]), &config).is_ok());
        assert_eq!(Config::load(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_panel_commands_report_unknown_panel() {
        let config = unknown_panel_config();
        for args in [&["mode"][..], &["setup", "--no-delay"][..], &["backlight"][..]] {
            let err = run(parse(args), &config).unwrap_err();
            assert!(err.to_string().contains("BOGUS"), "{:?}: {}", args, err);
        }
    }

    #[test]
    fn test_setup_dry_run() {
        let mut config = Config::default();
        config.setup.settle_delays = false;
        assert!(run(parse(&["setup"]), &config).is_ok());
        assert!(run(parse(&["setup", "--fail-at", "3", "--code", "-110"]), &config).is_err());
    }
}
