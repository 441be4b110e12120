#![allow(clippy::print_stderr)]
#![allow(clippy::exit)]
#![allow(clippy::implicit_return)]
#![allow(clippy::absolute_paths)]
#![allow(clippy::min_ident_chars)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{ArgAction, CommandFactory, Parser, ValueHint, value_parser};
use clap_complete::aot::{Shell, generate};
use core::num::NonZeroUsize;
use mdu::DiskUsage;
use std::ffi::OsString;
use std::io::stdout;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
///generate our arguments and parse them.
pub struct Args {
    #[arg(
        value_name = "PATH",
        help = "Paths to measure, one output line each",
        value_hint = ValueHint::AnyPath,
        required_unless_present = "generate",
        num_args = 1..,
    )]
    paths: Vec<OsString>,

    #[arg(
        short = 'j',
        long = "threads",
        value_name = "N",
        default_value_t = NonZeroUsize::MIN,
        help = "Number of worker threads; without this flag the walk is single-threaded recursion",
    )]
    thread_num: NonZeroUsize,

    #[arg(
        long = "generate",
        action = ArgAction::Set,
        value_parser = value_parser!(Shell),
        help = "Generate shell completions"
    )]
    generate: Option<Shell>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(generator) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_owned();
        generate(generator, &mut cmd, name, &mut stdout());
        return ExitCode::SUCCESS;
    }

    let du = DiskUsage::new(args.thread_num.get());
    let out = stdout();
    match du.report(&args.paths, &mut out.lock()) {
        Ok(()) if du.permission_ok() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("mdu: {error}");
            ExitCode::FAILURE
        }
    }
}
