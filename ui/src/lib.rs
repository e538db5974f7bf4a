pub mod app;
pub mod logging;

use iced::Application;

pub use app::{Flags, ImsApp};
pub use logging::{LogEntry, LogStore, ReloadHandle, apply_log_level, init_logging};

pub type UiResult = iced::Result;

pub fn run(flags: Flags) -> UiResult {
    ImsApp::run(iced::Settings::with_flags(flags))
}
