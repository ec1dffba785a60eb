use camino::Utf8PathBuf;
use clap::Parser;
use clap::builder::{NonEmptyStringValueParser, TypedValueParser};

/// Command line for `makit`.
#[derive(Parser, Debug)]
#[command(
    name = "makit",
    version,
    about = "Create files and directories with optional mode and timestamp",
    long_about = "makit creates directories and files with optional permissions, \
                  timestamps, and parent creation. A final path segment containing \
                  a `.` is treated as a file, anything else as a directory."
)]
pub struct Cli {
    /// Set file/directory mode (e.g. 755).
    #[arg(short = 'm', long = "mode", value_name = "OCTAL")]
    pub mode: Option<String>,
    /// Set access and modification time (e.g. 202504181200).
    #[arg(short = 'd', long = "date", value_name = "YYYYMMDDhhmm")]
    pub date: Option<String>,
    /// Do not create paths that do not exist.
    #[arg(short = 'c', long = "no-create")]
    pub no_create: bool,
    /// Print progress messages.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
    /// Read defaults from this TOML file instead of the user config directory.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
    /// Ignore the defaults file in the user config directory.
    #[arg(long = "no-config", conflicts_with = "config")]
    pub no_config: bool,
    #[arg(
        value_name = "PATHS",
        required = true,
        num_args = 1..,
        value_parser = NonEmptyStringValueParser::new().map(Utf8PathBuf::from)
    )]
    pub paths: Vec<Utf8PathBuf>,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
