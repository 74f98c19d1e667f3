use colog::format::CologStyle;
use colored::Colorize;
use log::Level;

/// Prefix every line with the local time, then the coloured level.
pub struct LogTimePrefix;

impl CologStyle for LogTimePrefix {
    fn prefix_token(&self, level: &Level) -> String {
        format!(
            "[{}] {}",
            chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .blue()
                .bold(),
            self.level_color(level, self.level_token(level))
        )
    }
}

/// Install the logger. Level comes from `RUST_LOG`, `info` if unset.
pub fn init() {
    let mut builder: env_logger::Builder = colog::default_builder();
    builder.format(colog::formatter(LogTimePrefix));
    builder.init();
}
