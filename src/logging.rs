use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::errors::LogError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

fn file_appender(path: &str) -> Result<FileAppender, LogError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(path)?;
    Ok(file)
}

/// Routes the `log` macros to a file; the terminal itself is the UI.
pub fn init(path: &str, level: LevelFilter) -> Result<(), LogError> {
    let file = file_appender(path)?;
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}
