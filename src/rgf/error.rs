// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: error.rs

//! Error type shared by the argument parser, the random file writer and the
//! digest calculator.

use std::borrow::Cow;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenErrorKind {
	Configuration,
	Write,
	Read,
}

#[derive(Debug)]
pub struct GenError {
	kind: GenErrorKind,
	message: Cow<'static, str>,
}

impl GenError {
	pub fn new(
		kind: GenErrorKind,
		message: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
		Self::new(GenErrorKind::Configuration, message)
	}

	pub fn write(path: &Path, err: io::Error) -> Self {
		Self::new(
			GenErrorKind::Write,
			format!("failed to write `{}`: {}", path.display(), err),
		)
	}

	pub fn read(path: &Path, err: io::Error) -> Self {
		Self::new(
			GenErrorKind::Read,
			format!("failed to read `{}`: {}", path.display(), err),
		)
	}

	pub fn kind(&self) -> GenErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		self.message.as_ref()
	}

	/// Every failure is terminal for this tool.
	pub fn exit_code(&self) -> i32 {
		1
	}
}

impl std::fmt::Display for GenError {
	fn fmt(
		&self,
		f: &mut std::fmt::Formatter<'_>,
	) -> std::fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for GenError {}
