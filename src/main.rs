use std::process::ExitCode;

use anyhow::Context;
use third_party_notice::cli::{parse_args, Args, USAGE};
use third_party_notice::error::NoticeError;
use third_party_notice::notice::{gen_notice, OutputPaths};

fn run(args: &Args) -> Result<(), anyhow::Error> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;

    gen_notice(args, &OutputPaths::in_dir(&cwd))?;
    Ok(())
}

fn fail(err: anyhow::Error) -> ExitCode {
    eprintln!("Error: {err:#}");
    if err
        .downcast_ref::<NoticeError>()
        .is_some_and(NoticeError::is_usage)
    {
        eprintln!("{USAGE}");
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(NoticeError::HelpOrVersion(info)) => {
            return match info.print() {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Err(err) => return fail(err.into()),
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(err),
    }
}
