// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: random.rs

use crate::rgf::error::{GenError, GenErrorKind};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Largest slice requested from a random source in one call.
pub const WRITE_CHUNK_SIZE: usize = 1_048_576;

/// Something that can fill a buffer with random bytes.
pub trait RandomSource {
	fn fill(&mut self, buffer: &mut [u8]) -> io::Result<()>;
}

/// Operating system CSPRNG via `getrandom`.
pub struct GetRandomSource;

impl RandomSource for GetRandomSource {
	fn fill(&mut self, buffer: &mut [u8]) -> io::Result<()> {
		getrandom::getrandom(buffer)
			.map_err(|err| io::Error::other(err.to_string()))
	}
}

/// Create or truncate `path` and fill it with exactly `byte_count` bytes
/// drawn from `source`, one independent request per chunk.
///
/// On error the file is left in whatever state the failed write produced.
pub fn write_random_file(
	path: &Path,
	byte_count: u64,
	source: &mut dyn RandomSource,
) -> Result<u64, GenError> {
	let mut file =
		File::create(path).map_err(|err| GenError::write(path, err))?;
	let chunk = usize::try_from(byte_count)
		.unwrap_or(WRITE_CHUNK_SIZE)
		.min(WRITE_CHUNK_SIZE);
	let mut buffer = vec![0u8; chunk];
	let mut remaining = byte_count;
	while remaining > 0 {
		let n = remaining.min(buffer.len() as u64) as usize;
		source.fill(&mut buffer[..n]).map_err(|err| {
			GenError::new(
				GenErrorKind::Write,
				format!("random source failed: {}", err),
			)
		})?;
		file.write_all(&buffer[..n])
			.map_err(|err| GenError::write(path, err))?;
		remaining -= n as u64;
	}
	file.flush().map_err(|err| GenError::write(path, err))?;
	file.sync_all().map_err(|err| GenError::write(path, err))?;
	Ok(byte_count)
}
