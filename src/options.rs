//! Options persistence.
//!
//! A flat, forgiving text format: `[section]` headers, `key = value` lines
//! and `;` comments. Unknown keys, malformed lines and out-of-range values
//! are skipped rather than failing the load, so a hand-edited file never
//! locks the game out. A missing file is replaced with defaults.

use std::fs;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

/// How the game window occupies the screen. The integer values are part of
/// the on-disk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullscreenMode {
    /// Exclusive fullscreen.
    Exclusive = 0,
    /// Borderless fullscreen window.
    Borderless = 1,
    /// Maximised window.
    Maximised = 2,
    /// Plain window.
    #[default]
    Windowed = 3,
}

impl FullscreenMode {
    /// Maps an on-disk integer back to a mode; out-of-range values are
    /// rejected so the caller can keep its current setting.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Exclusive),
            1 => Some(Self::Borderless),
            2 => Some(Self::Maximised),
            3 => Some(Self::Windowed),
            _ => None,
        }
    }

    /// The integer written to disk.
    pub fn index(self) -> i64 {
        self as i64
    }
}

/// Persisted display and control options.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Render resolution scale factor.
    pub resolution_scale: f32,
    /// Window mode.
    pub fullscreen_mode: FullscreenMode,
    /// Invert the horizontal look axis.
    pub invert_look_x: bool,
    /// Invert the vertical look axis.
    pub invert_look_y: bool,
    /// Horizontal look sensitivity.
    pub look_sensitivity_x: f32,
    /// Vertical look sensitivity.
    pub look_sensitivity_y: f32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            resolution_scale: 1.0,
            fullscreen_mode: FullscreenMode::Windowed,
            invert_look_x: false,
            invert_look_y: false,
            look_sensitivity_x: 1.0,
            look_sensitivity_y: 1.0,
        }
    }
}

/// Failure while reading or writing the options file.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Underlying filesystem failure.
    #[error("options file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts `true`/`false` as well as integers, where any non-zero integer
/// means true.
fn parse_bool(value: &str) -> Option<bool> {
    value
        .parse::<bool>()
        .ok()
        .or_else(|| value.parse::<i64>().ok().map(|v| v != 0))
}

impl GameOptions {
    /// Parses options text, starting from defaults and keeping whatever
    /// each well-formed line overrides. Everything else is skipped.
    pub fn parse(text: &str) -> Self {
        let mut options = Self::default();
        for line in text.lines() {
            let mut words = line.split_whitespace();
            let (Some(key), Some(eq), Some(value), None) =
                (words.next(), words.next(), words.next(), words.next())
            else {
                continue;
            };
            if eq != "=" {
                continue;
            }
            match key {
                "width" => {
                    if let Ok(width) = value.parse() {
                        options.window_width = width;
                    }
                }
                "height" => {
                    if let Ok(height) = value.parse() {
                        options.window_height = height;
                    }
                }
                "resolution_scale" => {
                    if let Ok(scale) = value.parse() {
                        options.resolution_scale = scale;
                    }
                }
                "fullscreen_mode" => {
                    if let Some(mode) = value.parse().ok().and_then(FullscreenMode::from_index) {
                        options.fullscreen_mode = mode;
                    }
                }
                "invert_look_x" => {
                    if let Some(invert) = parse_bool(value) {
                        options.invert_look_x = invert;
                    }
                }
                "invert_look_y" => {
                    if let Some(invert) = parse_bool(value) {
                        options.invert_look_y = invert;
                    }
                }
                "look_sensitivity_x" => {
                    if let Ok(sensitivity) = value.parse() {
                        options.look_sensitivity_x = sensitivity;
                    }
                }
                "look_sensitivity_y" => {
                    if let Ok(sensitivity) = value.parse() {
                        options.look_sensitivity_y = sensitivity;
                    }
                }
                _ => {
                    debug!("skipping unknown options key {key:?}");
                }
            }
        }
        options
    }

    /// Renders the options in the on-disk format.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        out.push_str("[graphics]\n");
        out.push_str(&format!("width = {}\n", self.window_width));
        out.push_str(&format!("height = {}\n", self.window_height));
        out.push_str(&format!("resolution_scale = {}\n", self.resolution_scale));
        out.push_str("; Exclusive  = 0\n");
        out.push_str("; Borderless = 1\n");
        out.push_str("; Maximised  = 2\n");
        out.push_str("; Windowed   = 3\n");
        out.push_str(&format!(
            "fullscreen_mode = {}\n",
            self.fullscreen_mode.index()
        ));
        out.push('\n');
        out.push_str("[controls]\n");
        out.push_str(&format!("invert_look_x = {}\n", self.invert_look_x));
        out.push_str(&format!("invert_look_y = {}\n", self.invert_look_y));
        out.push_str(&format!("look_sensitivity_x = {}\n", self.look_sensitivity_x));
        out.push_str(&format!("look_sensitivity_y = {}\n", self.look_sensitivity_y));
        out
    }

    /// Writes the options file.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), OptionsError> {
        fs::write(path, self.to_ini_string())?;
        Ok(())
    }

    /// Loads the options file, or generates and persists defaults when it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Io`] when the file exists but cannot be
    /// read, or when defaults cannot be written.
    pub fn load_or_default(path: &Path) -> Result<Self, OptionsError> {
        if path.exists() {
            let text = fs::read_to_string(path)?;
            Ok(Self::parse(&text))
        } else {
            info!("no options file at {}, writing defaults", path.display());
            let options = Self::default();
            options.save(path)?;
            Ok(options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn round_trips_through_the_text_format() {
        let options = GameOptions {
            window_width: 1920,
            window_height: 1080,
            resolution_scale: 0.5,
            fullscreen_mode: FullscreenMode::Borderless,
            invert_look_x: true,
            invert_look_y: false,
            look_sensitivity_x: 2.5,
            look_sensitivity_y: 0.75,
        };
        let parsed = GameOptions::parse(&options.to_ini_string());
        assert_eq!(parsed, options);
    }

    #[rstest]
    fn malformed_lines_are_skipped() {
        let text = "\
[graphics]
width = 1920
height 1080
resolution_scale = = 2.0
width = not_a_number
; a comment line
mystery_key = 42
";
        let parsed = GameOptions::parse(text);
        assert_eq!(parsed.window_width, 1920);
        // Malformed overrides leave the defaults in place.
        assert_eq!(parsed.window_height, 720);
        assert_relative_eq!(parsed.resolution_scale, 1.0);
    }

    #[rstest]
    #[case("-1")]
    #[case("4")]
    #[case("banana")]
    fn out_of_range_fullscreen_mode_is_ignored(#[case] value: &str) {
        let parsed = GameOptions::parse(&format!("fullscreen_mode = {value}\n"));
        assert_eq!(parsed.fullscreen_mode, FullscreenMode::Windowed);
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    #[case("1", true)]
    #[case("0", false)]
    #[case("7", true)]
    fn inversion_flags_accept_bools_and_integers(#[case] value: &str, #[case] expected: bool) {
        let parsed = GameOptions::parse(&format!("invert_look_y = {value}\n"));
        assert_eq!(parsed.invert_look_y, expected);
    }

    #[rstest]
    fn empty_text_yields_defaults() {
        assert_eq!(GameOptions::parse(""), GameOptions::default());
    }

    #[rstest]
    fn missing_file_writes_and_returns_defaults() {
        let path = std::env::temp_dir().join(format!("strider_options_{}.ini", std::process::id()));
        let _ = fs::remove_file(&path);

        let loaded = GameOptions::load_or_default(&path).expect("defaults should be written");
        assert_eq!(loaded, GameOptions::default());
        assert!(path.exists());

        // A second load reads the file we just wrote.
        let reloaded = GameOptions::load_or_default(&path).expect("file should be readable");
        assert_eq!(reloaded, loaded);
        let _ = fs::remove_file(&path);
    }
}
