use chrono::{Local, NaiveDate};
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info, Level};

mod columns;
mod config;
mod encoding;
mod error;
mod logging;
mod output;
mod records;
mod roster;

use columns::ColumnMap;
use config::Config;
use error::{Error, Result};
use logging::init_logging;
use output::{roster_path, write_roster};
use records::read_table;
use roster::build_roster;

fn main() -> ExitCode {
    ExitCode::from(launch(env::args_os().skip(1), &Config::default()))
}

/// Runs one conversion for the dropped-file `args` and returns the exit status.
///
/// The log file stays open until this returns.
fn launch<I>(args: I, config: &Config) -> u8
where
    I: IntoIterator<Item = OsString>,
{
    let _log = match init_logging(&config.log_file, Level::INFO) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: failed to open {}: {err}", config.log_file.display());
            return 1;
        }
    };
    info!("Start");

    let input = match get_file_path_from_args(args) {
        Ok(path) => path,
        Err(err) => {
            error!("{err}");
            return 1;
        }
    };

    match run(config, &input, Local::now().date_naive()) {
        Ok(output) => {
            info!(output = %output.display(), "Finish");
            0
        }
        Err(err) => {
            error!("Error: {err}");
            1
        }
    }
}

fn get_file_path_from_args<I>(args: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<OsString> = args.into_iter().collect();
    match <[OsString; 1]>::try_from(args) {
        Ok([path]) => Ok(PathBuf::from(path)),
        Err(args) => Err(Error::Usage { count: args.len() }),
    }
}

/// Converts the dropped checkup export into the dated fundus roster.
///
/// Returns the path of the written roster. Nothing is written unless the
/// whole input was read and every required column was found.
fn run(config: &Config, input: &Path, today: NaiveDate) -> Result<PathBuf> {
    let rows = read_table(input, config.encoding)?;
    let header = rows.first().ok_or_else(|| Error::EmptyInput {
        path: input.to_path_buf(),
    })?;
    let columns = ColumnMap::resolve(header)?;
    let roster = build_roster(&rows, &columns, &config.marker)?;

    let path = roster_path(config, today);
    write_roster(&path, &roster, config.encoding)?;
    Ok(path)
}
