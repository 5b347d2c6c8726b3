// MFont
// copyright zipxing@hotmail.com 2022～2025


//! Log module, reference
//! https://docs.rs/log4rs


use crate::error::{FontError, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use std::path::Path;

/// init logs system: stderr always, plus a log file when `file_path` is given
pub fn init_log(level: LevelFilter, file_path: Option<&Path>) -> Result<()> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");

    if let Some(fpath) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
            )))
            .build(fpath)
            .map_err(FontError::Io)?;
        config = config.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        );
        root = root.appender("logfile");
    }

    let config = config
        .build(root.build(level))
        .map_err(|e| FontError::Config(format!("log config: {}", e)))?;
    log4rs::init_config(config)
        .map_err(|e| FontError::Config(format!("log init: {}", e)))?;
    Ok(())
}
