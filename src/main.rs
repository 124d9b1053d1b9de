//! JoyCursor - use a gamepad as a mouse
//!
//! The left stick moves the cursor, button 1 clicks left and button 2 clicks
//! right. Control pauses while a fullscreen game has focus.

use clap::Parser;
use joycursor::config::{Cli, ABOUT_TEXT};
use joycursor::focus_detector::X11WindowSystem;
use joycursor::host::Host;
use joycursor::input_simulator::X11Pointer;
use joycursor::joystick::GilrsJoystick;
use joycursor::x11::X11Connection;
use joycursor::{Config, JoyCursorError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), JoyCursorError> {
    let cli = Cli::parse();
    if cli.about {
        println!("{}", ABOUT_TEXT);
        return Ok(());
    }

    let config = Config::default().with_verbose(cli.verbose);
    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    for line in ABOUT_TEXT.lines() {
        info!("{}", line);
    }
    info!(
        "Config: joystick every {:?}, game check every {:?}, device {}",
        config.joystick_period, config.game_check_period, config.device_index
    );

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        info!("Shutdown signal received");
        running_clone.store(false, Ordering::SeqCst);
    })
    .map_err(|e| JoyCursorError::Signal(e.to_string()))?;

    let x11 = X11Connection::connect()?;
    let pointer = X11Pointer::new(x11.clone())?;
    let windows = X11WindowSystem::new(x11);
    let joystick = GilrsJoystick::new(config.device_index)?;

    info!("Press Ctrl+C to exit");

    let host = Host::new(&config, joystick, pointer, windows);
    host.run(&running);

    info!("JoyCursor shutting down...");
    Ok(())
}
