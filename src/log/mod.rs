use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

use crate::utils::hash::{self, StringHash};

// ----------------------------------------------
// Log Levels
// ----------------------------------------------

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Silent,
    Verbose,
    Info,
    Warn,
    Error,
}

impl Level {
    #[inline]
    pub fn is_enabled(self) -> bool {
        (self as u32) >= MIN_LOG_LEVEL.load(Ordering::Relaxed)
    }

    fn tty_color(self) -> (&'static str, &'static str) {
        match self {
            Self::Silent  => ("", ""),
            Self::Verbose => ("\x1b[90m", "\x1b[0m"), // gray
            Self::Info    => ("\x1b[32m", "\x1b[0m"), // green
            Self::Warn    => ("\x1b[33m", "\x1b[0m"), // yellow
            Self::Error   => ("\x1b[31m", "\x1b[0m"), // red
        }
    }
}

// ----------------------------------------------
// Log Channel
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub name: &'static str,
    pub hash: StringHash,
}

impl Channel {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            hash: hash::fnv1a_from_str(name),
        }
    }

    // Channel names are stored decorated, e.g. " [minimap]".
    #[inline]
    pub fn is(&self, plain_name: &str) -> bool {
        self.name
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .is_some_and(|s| s == plain_name)
    }
}

impl Hash for Channel {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

#[macro_export]
macro_rules! channel {
    ($name:literal) => { $crate::log::Channel::new(concat!(" [", $name, "]")) };
}

// ----------------------------------------------
// Log Listener
// ----------------------------------------------

#[derive(Clone, Debug)]
pub struct Record {
    pub level: Level,
    pub channel: Option<Channel>,
    pub location: Location,
    pub message: String,
}

// One global listener, set once.
static LISTENER: OnceLock<Box<dyn Fn(Record) + Send + Sync>> = OnceLock::new();

// Returns false if a listener was already installed.
pub fn set_listener<F>(listener_fn: F) -> bool
    where F: Fn(Record) + Send + Sync + 'static
{
    LISTENER.set(Box::new(listener_fn)).is_ok()
}

// ----------------------------------------------
// Global Configs
// ----------------------------------------------

static MIN_LOG_LEVEL: AtomicU32 = AtomicU32::new(Level::Verbose as u32);
static ENABLE_SRC_LOCATION: AtomicBool = AtomicBool::new(false);
static ENABLE_TTY_COLORS: AtomicBool = AtomicBool::new(true);

// `Level::Silent` turns all logging off.
pub fn set_level(level: Level) {
    let min_level = if level == Level::Silent { u32::MAX } else { level as u32 };
    MIN_LOG_LEVEL.store(min_level, Ordering::Relaxed);
}

pub fn enable_source_location(enable: bool) {
    ENABLE_SRC_LOCATION.store(enable, Ordering::Relaxed);
}

pub fn enable_tty_colors(enable: bool) {
    ENABLE_TTY_COLORS.store(enable, Ordering::Relaxed);
}

// ----------------------------------------------
// Output
// ----------------------------------------------

#[derive(Copy, Clone, Debug)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

// Writes one line to stdout: "[Level] [channel] message", with the source
// location inserted after the channel when enabled. The listener sees the
// record even when stdout is gone.
pub fn print_internal(level: Level, channel: Option<Channel>, location: &Location, args: fmt::Arguments) {
    if !level.is_enabled() {
        return;
    }

    let chan_name = channel.map_or("", |chan| chan.name);
    let (color_start, color_end) = if ENABLE_TTY_COLORS.load(Ordering::Relaxed) {
        level.tty_color()
    } else {
        ("", "")
    };

    let mut out = std::io::stdout().lock();
    let _ = write!(&mut out, "{color_start}[{level:?}]{chan_name}{color_end}");
    let _ = if ENABLE_SRC_LOCATION.load(Ordering::Relaxed) {
        writeln!(&mut out, " {}:{} {} - {args}", location.file, location.line, location.module)
    } else {
        writeln!(&mut out, " {args}")
    };

    if let Some(listener) = LISTENER.get() {
        listener(Record {
            level,
            channel,
            location: *location,
            message: args.to_string(),
        });
    }
}

// Common body of the level macros. An optional channel expression comes
// first, separated from the format string by a comma.
#[macro_export]
macro_rules! log_at {
    ($level:ident; $fmt:literal $(, $($arg:tt)+)?) => {
        $crate::log_at!(@emit $level, None, $fmt $(, $($arg)+)?)
    };
    ($level:ident; $chan:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        $crate::log_at!(@emit $level, Some($chan), $fmt $(, $($arg)+)?)
    };
    (@emit $level:ident, $chan:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        if $crate::log::Level::$level.is_enabled() {
            $crate::log::print_internal(
                $crate::log::Level::$level,
                $chan,
                &$crate::log::Location { file: file!(), line: line!(), module: module_path!() },
                format_args!($fmt $(, $($arg)+)?)
            );
        }
    };
}

// ----------------------------------------------
// Public API
// ----------------------------------------------

#[macro_export]
macro_rules! verbose {
    ($($args:tt)+) => { $crate::log_at!(Verbose; $($args)+) };
}

#[macro_export]
macro_rules! info {
    ($($args:tt)+) => { $crate::log_at!(Info; $($args)+) };
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)+) => { $crate::log_at!(Warn; $($args)+) };
}

#[macro_export]
macro_rules! error {
    ($($args:tt)+) => { $crate::log_at!(Error; $($args)+) };
}

// Scoped usage: log::info!(log::MINIMAP, ...).
#[allow(unused_imports)]
pub use crate::{channel, verbose, info, warn, error};

// Channels shared across the crate.
pub const MINIMAP: Channel = channel!("minimap");
pub const CONFIG:  Channel = channel!("config");
