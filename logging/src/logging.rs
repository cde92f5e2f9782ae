use colored::*;
use std::process::exit;

/// Severity of a diagnostic line, from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info = 1,
    Completed = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    fn from_i8(level: i8) -> Option<Level> {
        match level {
            1 => Some(Level::Info),
            2 => Some(Level::Completed),
            3 => Some(Level::Warning),
            4 => Some(Level::Error),
            5 => Some(Level::Fatal),
            _ => None,
        }
    }
}

/// Coloured status printer for the command line.
///
/// Messages below `level`, or any message while `debug` is off, are dropped
/// by [`Logger::log`]. Errors are always written to stderr.
#[derive(Clone, Debug)]
pub struct Logger {
    level: i8,
    debug: bool,
    name: Option<String>,
}

impl Logger {
    pub fn new(debug: bool, level: i32) -> Logger {
        Logger {
            level: level.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
            debug,
            name: None,
        }
    }

    /// Same logger, but every line is prefixed with `[name]`.
    pub fn with_name(mut self, name: &str) -> Logger {
        self.name = Some(name.to_owned());
        self
    }

    fn prefixed(&self, message: &str) -> String {
        match &self.name {
            Some(name) => format!("[{}] {}", name, message),
            None => message.to_owned(),
        }
    }

    /// Applies the formatting to the string based on the level
    fn apply_level(&self, string: &str, level: i8) -> ColoredString {
        let string = self.prefixed(string);
        match Level::from_i8(level) {
            Some(Level::Info) => ("info: ".to_owned() + &string).bright_cyan(),
            Some(Level::Completed) => ("completed: ".to_owned() + &string).bright_green(),
            Some(Level::Warning) => ("warning: ".to_owned() + &string).bright_yellow(),
            Some(Level::Error) => ("error: ".to_owned() + &string).bright_red(),
            Some(Level::Fatal) => ("fatal error: ".to_owned() + &string).red().bold(),
            None => string.red().bold().italic(),
        }
    }

    /// Prints an error to stderr, exiting the process for levels above warning.
    ///
    /// # Arguments
    ///
    /// * `error` - The error message
    /// * `level` - The error level, higher means more severe
    pub fn raise_error(&self, error: &str, level: i8) {
        eprintln!("{}", self.apply_level(error, level));
        if level > Level::Warning as i8 {
            exit(1);
        }
    }

    pub fn log(&self, message: &str, level: i8) {
        if level > Level::Warning as i8 {
            self.raise_error(message, level);
        }
        if level >= self.level && self.debug {
            println!("{}", self.apply_level(message, level));
        }
    }

    /// Unconditional output, used for the final verdict.
    pub fn report(&self, message: &str) {
        println!("{}", self.apply_level(message, Level::Completed as i8));
    }

    /// Returns true when the logger prints debug output
    pub fn get_mode(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert!(Level::Info < Level::Fatal);
        assert_eq!(Level::from_i8(3), Some(Level::Warning));
        assert_eq!(Level::from_i8(9), None);
    }

    #[test]
    fn test_prefix() {
        let logger = Logger::new(true, 1).with_name("arbiter");
        assert_eq!(logger.prefixed("hello"), "[arbiter] hello");
        assert!(logger.get_mode());
        let plain = Logger::new(false, 1);
        assert_eq!(plain.prefixed("hello"), "hello");
        assert!(!plain.get_mode());
    }
}
