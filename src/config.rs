//! Configuration for JoyCursor

use std::time::Duration;

use clap::Parser;

/// Joystick tick period (~60 Hz)
pub const JOYSTICK_PERIOD: Duration = Duration::from_millis(1000 / 60);

/// Game-check tick period
pub const GAME_CHECK_PERIOD: Duration = Duration::from_millis(500);

/// The single supported joystick
pub const JOYSTICK_DEVICE_INDEX: usize = 0;

/// Text shown for the "About" action
pub const ABOUT_TEXT: &str = concat!(
    "JoyCursor ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Left stick moves the cursor, button 1 is the left click, button 2 is the right click.\n",
    "Control pauses automatically while a fullscreen game is in the foreground."
);

/// Gamepad-driven mouse cursor that pauses while a fullscreen game is focused
#[derive(Parser, Debug)]
#[command(name = "joycursor", version)]
pub struct Cli {
    /// Print the about text and exit
    #[arg(long, default_value_t = false)]
    pub about: bool,

    /// Log every tick at debug level
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Period between joystick samples
    pub joystick_period: Duration,

    /// Period between foreground window checks
    pub game_check_period: Duration,

    /// Gamepad to read from
    pub device_index: usize,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            joystick_period: JOYSTICK_PERIOD,
            game_check_period: GAME_CHECK_PERIOD,
            device_index: JOYSTICK_DEVICE_INDEX,
            verbose: false,
        }
    }
}

impl Config {
    /// Enable verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let config = Config::default();
        assert_eq!(config.joystick_period, Duration::from_millis(16));
        assert_eq!(config.game_check_period, Duration::from_millis(500));
        assert_eq!(config.device_index, 0);
        assert!(!config.verbose);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["joycursor"]).unwrap();
        assert!(!cli.about);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["joycursor", "-v"]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["joycursor", "--about", "--verbose"]).unwrap();
        assert!(cli.about);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        let err = Cli::try_parse_from(["joycursor", "--verbos"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_help() {
        let err = Cli::try_parse_from(["joycursor", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_with_verbose() {
        assert!(Config::default().with_verbose(true).verbose);
    }
}
