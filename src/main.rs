// labbench: keyboard-driven physics labs in the terminal

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use labbench::config::{LabConfig, DEFAULT_FPS, DEFAULT_HOLD_FRAMES};
use labbench::controls::Control;
use labbench::labs::LabKind;
use labbench::ui::App;

#[derive(Parser, Debug)]
#[command(name = "labbench")]
#[command(about = "Keyboard-driven physics labs in the terminal", long_about = None)]
struct Cli {
    /// Lab to open
    #[arg(value_enum, default_value_t = LabKind::Radiation)]
    lab: LabKind,

    /// Display frames per second
    #[arg(long, env = "LABBENCH_FPS", default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Frames a held key survives without a repeat event
    #[arg(long, env = "LABBENCH_HOLD_FRAMES", default_value_t = DEFAULT_HOLD_FRAMES)]
    hold_frames: u32,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, env = "LABBENCH_LOG")]
    log_file: Option<PathBuf>,

    /// Print the labs and their controls, then exit
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    if cli.list {
        print_labs()?;
        return Ok(());
    }

    let config = LabConfig {
        fps: cli.fps,
        hold_frames: cli.hold_frames,
        ..LabConfig::default()
    };
    info!(lab = ?cli.lab, fps = config.fps, hold_frames = config.hold_frames, "starting");

    let mut app = App::new(cli.lab.build(), config).context("failed to mount lab")?;

    // Set up terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        // Release events drive momentary controls
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("terminal reports no key releases; holds end by timeout");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    if enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("event loop failed")?;
    info!("clean exit");
    Ok(())
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }
    Ok(())
}

fn print_labs() -> Result<()> {
    for kind in LabKind::ALL {
        let model = kind.build();
        println!("{:<10} {}", model.name(), kind.summary());
        for spec in model.controls() {
            let id = spec.id.clone();
            let control = Control::from_spec(spec)
                .with_context(|| format!("bad control '{}' in {}", id, model.name()))?;
            println!(
                "    {:<10} {:<24} {} .. {} step {}{}",
                control.id(),
                control.label(),
                control.min(),
                control.max(),
                control.step(),
                if control.is_momentary() { " (momentary)" } else { "" },
            );
        }
    }
    Ok(())
}
