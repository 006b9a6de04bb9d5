use std::path::PathBuf;

use encoding_rs::{Encoding, SHIFT_JIS};

pub const LOG_FILE: &str = "./log.txt";
pub const OUTPUT_PREFIX: &str = "眼底ノートPC用受診者名簿";
pub const OUTPUT_EXTENSION: &str = ".csv";
pub const FUNDUS_MARKER: &str = "●";

/// Fixed settings for a single conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub output_extension: String,
    /// Used for both the dropped file and the written roster.
    pub encoding: &'static Encoding,
    pub marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(LOG_FILE),
            output_dir: PathBuf::from("."),
            output_prefix: OUTPUT_PREFIX.to_owned(),
            output_extension: OUTPUT_EXTENSION.to_owned(),
            encoding: SHIFT_JIS,
            marker: FUNDUS_MARKER.to_owned(),
        }
    }
}
