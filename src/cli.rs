use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::NoticeError;

pub const USAGE: &str = "Usage: third-party-notice <licenses.json> [--include <include.md>]";

const INCLUDE_FLAG: &str = "--include";

/// Collects third-party license files and writes THIRD_PARTY_LICENSES.md
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// path to the licenses JSON output by license-checker
    #[clap(value_parser)]
    pub(crate) manifest: PathBuf,
    /// markdown file appended verbatim to the end of the notice
    #[clap(value_parser, long)]
    pub(crate) include: Option<PathBuf>,
}

/// Validated command line inputs, with paths resolved against the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// the license-checker manifest
    pub manifest: PathBuf,
    /// optional markdown appended after the dependency listing
    pub include: Option<PathBuf>,
}

/// Validate the process arguments, including the program name in the first position.
///
/// `--help` and `--version` come back as [`NoticeError::HelpOrVersion`] for the caller to print.
pub fn parse_args<I, T>(args: I) -> Result<Args, NoticeError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    // the manifest is positional and must come first
    match args.get(1) {
        None => return Err(NoticeError::MissingManifestArg),
        Some(first) if is_include_flag(first) => return Err(NoticeError::IncludeBeforeManifest),
        Some(_) => {}
    }
    if args.last().is_some_and(|last| last == INCLUDE_FLAG) {
        return Err(NoticeError::MissingIncludeValue);
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                return Err(NoticeError::HelpOrVersion(err))
            }
            ErrorKind::MissingRequiredArgument => return Err(NoticeError::MissingManifestArg),
            _ => return Err(NoticeError::Usage(first_line(&err.to_string()))),
        },
    };

    let include = match cli.include {
        None => None,
        Some(path) => {
            let path = resolve(&path);
            if !path.exists() {
                return Err(NoticeError::NotFound(path));
            }
            Some(path)
        }
    };

    Ok(Args {
        manifest: resolve(&cli.manifest),
        include,
    })
}

/// `--include` or `--include=<path>`
fn is_include_flag(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|x| {
        x.strip_prefix(INCLUDE_FLAG)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('='))
    })
}

/// Make a path absolute against the working directory, leaving it untouched if that fails
pub(crate) fn resolve(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
