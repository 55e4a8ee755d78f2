// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: app.rs

use crate::rgf::digest::{digest_file, DigestSet};
use crate::rgf::error::{GenError, GenErrorKind};
use crate::rgf::random::{
	write_random_file, GetRandomSource, RandomSource,
};
use clap::builder::PathBufValueParser;
use clap::error::ErrorKind;
use clap::{crate_name, Arg, ArgAction, ArgMatches};
use colored::*;
use std::error::Error;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
{about-with-newline}
Writes <BYTES> random bytes to <PATH>, then prints:
  SHA512:<hex>
  BLAKE2B:<hex>
{usage-heading} {usage}

{all-args}{after-help}
";

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
	pub byte_count: u64,
	pub output: PathBuf,
}

impl Invocation {
	pub fn from_matches(m: &ArgMatches) -> Result<Self, GenError> {
		let byte_count = *m.get_one::<u64>("bytes").ok_or_else(|| {
			GenError::configuration("missing required option -n <BYTES>")
		})?;
		let output = m
			.get_one::<PathBuf>("output")
			.cloned()
			.ok_or_else(|| {
				GenError::configuration(
					"missing required option -o <PATH>",
				)
			})?;
		Ok(Self { byte_count, output })
	}
}

pub fn build_cli() -> clap::Command {
	clap::Command::new(crate_name!())
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name("rgf")
		.version(clap::crate_version!())
		.about("Generate a file of random bytes and digest it")
		.arg(
			Arg::new("bytes")
				.short('n')
				.long("bytes")
				.value_name("BYTES")
				.help("Number of random bytes to write")
				.value_parser(clap::value_parser!(u64))
				.action(ArgAction::Set)
				.required(true),
		)
		.arg(
			Arg::new("output")
				.short('o')
				.long("output")
				.value_name("PATH")
				.help("File to create or overwrite")
				.value_parser(PathBufValueParser::new())
				.action(ArgAction::Set)
				.required(true),
		)
}

/// Parse without touching the filesystem or exiting the process.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, clap::Error>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	let mut cmd = build_cli();
	let m = cmd.try_get_matches_from_mut(args)?;
	Invocation::from_matches(&m).map_err(|err| {
		cmd.error(ErrorKind::MissingRequiredArgument, err.message())
	})
}

/// Write the random file, digest it, and print both lines to `out`.
pub fn execute<W: Write>(
	invocation: &Invocation,
	source: &mut dyn RandomSource,
	out: &mut W,
) -> Result<DigestSet, GenError> {
	write_random_file(&invocation.output, invocation.byte_count, source)?;
	let digests = digest_file(&invocation.output)?;
	for line in digests.lines() {
		writeln!(out, "{}", line).map_err(stdout_error)?;
	}
	out.flush().map_err(stdout_error)?;
	Ok(digests)
}

fn stdout_error(err: io::Error) -> GenError {
	GenError::new(
		GenErrorKind::Write,
		format!("failed to print digests: {}", err),
	)
}

/// Print a clap outcome and return the exit code for it. Help and
/// version exit 0 only if they actually reached the terminal.
fn report_parse_error(err: &clap::Error) -> i32 {
	let printed = err.print().and_then(|_| io::stdout().flush()).is_ok();
	match err.kind() {
		ErrorKind::DisplayHelp | ErrorKind::DisplayVersion if printed => 0,
		_ => 1,
	}
}

pub fn run() -> Result<(), Box<dyn Error>> {
	let invocation = match parse_invocation(std::env::args_os()) {
		Ok(invocation) => invocation,
		Err(err) => std::process::exit(report_parse_error(&err)),
	};

	let stdout = io::stdout();
	let mut out = stdout.lock();
	if let Err(err) = execute(&invocation, &mut GetRandomSource, &mut out)
	{
		eprintln!("{} {}", "error:".red().bold(), err);
		std::process::exit(err.exit_code());
	}
	Ok(())
}
