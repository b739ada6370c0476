//! Terminal output shared by the commands: ANSI colours and status-tagged
//! messages, plus logger setup.

use std::io::IsTerminal;

const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[1;33m";
const BLUE: &str = "\x1b[0;34m";
const CYAN: &str = "\x1b[0;36m";
const RED: &str = "\x1b[0;31m";
const RESET: &str = "\x1b[0m";

/// Colour switch. Holds no other state, so it is passed around by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Colours on for an interactive stdout unless `NO_COLOR` is set.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self {
            enabled: !no_color && std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn colored() -> Self {
        Self { enabled: true }
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn green(self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    pub fn yellow(self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    pub fn blue(self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    pub fn cyan(self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    pub fn red(self, text: &str) -> String {
        self.paint(RED, text)
    }
}

/// Status-tagged messages. Errors go to stderr, everything else to stdout.
#[derive(Clone, Copy, Debug)]
pub struct Console {
    pub palette: Palette,
}

impl Console {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn detect() -> Self {
        Self::new(Palette::detect())
    }

    pub fn error_line(&self, message: &str) -> String {
        format!("{} {message}", self.palette.red("[ERROR]"))
    }

    pub fn info_line(&self, message: &str) -> String {
        format!("{} {message}", self.palette.blue("[INFO]"))
    }

    pub fn success_line(&self, message: &str) -> String {
        format!("{} {message}", self.palette.green("[SUCCESS]"))
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.info_line(message));
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.success_line(message));
    }
}

/// Install the `env_logger` backend. `verbose` raises the default level to
/// `debug`; `RUST_LOG` still wins when set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_emits_no_escape_codes() {
        let console = Console::new(Palette::plain());
        assert_eq!(console.error_line("boom"), "[ERROR] boom");
        assert_eq!(console.success_line("done"), "[SUCCESS] done");
        assert_eq!(console.info_line("parsing"), "[INFO] parsing");
    }

    #[test]
    fn colored_palette_wraps_and_resets() {
        let palette = Palette::colored();
        assert_eq!(palette.green("ok"), "\x1b[0;32mok\x1b[0m");
        assert!(Console::new(palette).info_line("i").starts_with(BLUE));
    }

    #[test]
    fn logging_init_is_repeatable() {
        init_logging(false);
        init_logging(true);
    }
}
