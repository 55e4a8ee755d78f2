// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: digest.rs

//! Streaming digest computation over a file on disk.
//!
//! The file is read sequentially in fixed-size chunks and every chunk is fed,
//! in file order, to each accumulator. Accumulators live on the stack of the
//! read loop and are finalized exactly once.

use crate::rgf::error::GenError;
use blake2::Blake2b512;
use digest::Digest;
use sha2::Sha512;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

pub const READ_CHUNK_SIZE: usize = 1_048_576;

pub const SHA512_LABEL: &str = "SHA512";
pub const BLAKE2B_LABEL: &str = "BLAKE2B";

/// Incremental hash state: update with bytes, finalize to hex.
pub trait DigestAccumulator {
	fn label(&self) -> &'static str;
	fn update(&mut self, data: &[u8]);
	fn finalize(self: Box<Self>) -> String;
}

pub struct HashAccumulator<D: Digest> {
	label: &'static str,
	hasher: D,
}

impl<D: Digest> HashAccumulator<D> {
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			hasher: D::new(),
		}
	}
}

impl<D: Digest> DigestAccumulator for HashAccumulator<D> {
	fn label(&self) -> &'static str {
		self.label
	}

	fn update(&mut self, data: &[u8]) {
		Digest::update(&mut self.hasher, data);
	}

	fn finalize(self: Box<Self>) -> String {
		hex::encode(self.hasher.finalize())
	}
}

pub fn sha512() -> Box<dyn DigestAccumulator> {
	Box::new(HashAccumulator::<Sha512>::new(SHA512_LABEL))
}

pub fn blake2b() -> Box<dyn DigestAccumulator> {
	Box::new(HashAccumulator::<Blake2b512>::new(BLAKE2B_LABEL))
}

/// Feed `reader` to every accumulator until a zero-byte read, then
/// finalize them in the order given.
pub fn consume_reader<R: Read>(
	mut reader: R,
	mut accumulators: Vec<Box<dyn DigestAccumulator>>,
	buffer_size: usize,
) -> io::Result<Vec<(&'static str, String)>> {
	let mut buffer = vec![0u8; buffer_size.max(1)];
	loop {
		let n = match reader.read(&mut buffer) {
			Ok(0) => break,
			Ok(n) => n,
			Err(err) if err.kind() == ErrorKind::Interrupted => continue,
			Err(err) => return Err(err),
		};
		for accumulator in accumulators.iter_mut() {
			accumulator.update(&buffer[..n]);
		}
	}
	Ok(accumulators
		.into_iter()
		.map(|accumulator| {
			let label = accumulator.label();
			(label, accumulator.finalize())
		})
		.collect())
}

/// Hex digests of one file, wide digest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestSet {
	pub sha512: String,
	pub blake2b: String,
}

impl DigestSet {
	/// Pick both digests out of `consume_reader` results by label.
	pub fn from_results(
		results: Vec<(&'static str, String)>,
	) -> io::Result<Self> {
		let mut sha512 = None;
		let mut blake2b = None;
		for (label, hex) in results {
			let slot = match label {
				SHA512_LABEL => &mut sha512,
				BLAKE2B_LABEL => &mut blake2b,
				other => {
					return Err(io::Error::other(format!(
						"unexpected digest `{}`",
						other
					)))
				}
			};
			if slot.replace(hex).is_some() {
				return Err(io::Error::other(format!(
					"duplicate digest `{}`",
					label
				)));
			}
		}
		match (sha512, blake2b) {
			(Some(sha512), Some(blake2b)) => Ok(Self { sha512, blake2b }),
			(None, _) => Err(io::Error::other(format!(
				"missing digest `{}`",
				SHA512_LABEL
			))),
			(_, None) => Err(io::Error::other(format!(
				"missing digest `{}`",
				BLAKE2B_LABEL
			))),
		}
	}

	pub fn lines(&self) -> [String; 2] {
		[
			format!("{}:{}", SHA512_LABEL, self.sha512),
			format!("{}:{}", BLAKE2B_LABEL, self.blake2b),
		]
	}
}

pub fn digest_reader<R: Read>(
	reader: R,
	buffer_size: usize,
) -> io::Result<DigestSet> {
	let results =
		consume_reader(reader, vec![sha512(), blake2b()], buffer_size)?;
	DigestSet::from_results(results)
}

pub fn digest_file(path: &Path) -> Result<DigestSet, GenError> {
	let file = File::open(path).map_err(|err| GenError::read(path, err))?;
	digest_reader(file, READ_CHUNK_SIZE)
		.map_err(|err| GenError::read(path, err))
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;
	use std::io::Cursor;

	const EMPTY_SHA512: &str = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";
	const EMPTY_BLAKE2B: &str = "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce";

	/// Returns at most `limit` bytes per read, with an interrupt first.
	struct TrickleReader<'a> {
		data: &'a [u8],
		limit: usize,
		interrupted: bool,
	}

	impl Read for TrickleReader<'_> {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if !self.interrupted {
				self.interrupted = true;
				return Err(io::Error::from(ErrorKind::Interrupted));
			}
			let n = self.limit.min(buf.len()).min(self.data.len());
			buf[..n].copy_from_slice(&self.data[..n]);
			self.data = &self.data[n..];
			Ok(n)
		}
	}

	struct BrokenReader;

	impl Read for BrokenReader {
		fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::new(ErrorKind::Other, "device gone"))
		}
	}

	fn patterned(len: usize) -> Vec<u8> {
		(0..len).map(|i| (i * 31 % 251) as u8).collect()
	}

	#[test]
	fn empty_input_matches_known_digests() {
		let set = digest_reader(Cursor::new(Vec::new()), 64).unwrap();
		assert_eq!(set.sha512, EMPTY_SHA512);
		assert_eq!(set.blake2b, EMPTY_BLAKE2B);
	}

	#[test]
	fn abc_matches_known_digests() {
		let set = digest_reader(Cursor::new(b"abc"), 64).unwrap();
		assert_eq!(
			hex::decode(&set.sha512).unwrap()[..],
			hex!("ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f")
		);
		assert_eq!(
			hex::decode(&set.blake2b).unwrap()[..],
			hex!("ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923")
		);
	}

	#[test]
	fn chunk_boundaries_do_not_change_result() {
		let data = patterned(2_500_000);
		let chunked =
			digest_reader(Cursor::new(&data), READ_CHUNK_SIZE).unwrap();
		assert_eq!(chunked.sha512, hex::encode(Sha512::digest(&data)));
		assert_eq!(
			chunked.blake2b,
			hex::encode(Blake2b512::digest(&data))
		);

		let trickled = digest_reader(
			TrickleReader {
				data: &data[..100_003],
				limit: 7,
				interrupted: false,
			},
			READ_CHUNK_SIZE,
		)
		.unwrap();
		let whole =
			digest_reader(Cursor::new(&data[..100_003]), 100_003)
				.unwrap();
		assert_eq!(trickled, whole);
	}

	#[test]
	fn digests_are_fixed_width_hex() {
		let set = digest_reader(Cursor::new(patterned(999)), 128).unwrap();
		for digest in [&set.sha512, &set.blake2b] {
			assert_eq!(digest.len(), 128);
			assert!(digest
				.chars()
				.all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		}
	}

	#[test]
	fn lines_keep_wide_digest_first() {
		let set = digest_reader(Cursor::new(Vec::new()), 16).unwrap();
		let [first, second] = set.lines();
		assert_eq!(first, format!("SHA512:{}", EMPTY_SHA512));
		assert_eq!(second, format!("BLAKE2B:{}", EMPTY_BLAKE2B));
	}

	#[test]
	fn consume_reader_preserves_accumulator_order() {
		let results = consume_reader(
			Cursor::new(b"abc"),
			vec![blake2b(), sha512()],
			2,
		)
		.unwrap();
		let labels: Vec<_> = results.iter().map(|(l, _)| *l).collect();
		assert_eq!(labels, vec![BLAKE2B_LABEL, SHA512_LABEL]);
	}

	#[test]
	fn incomplete_results_are_rejected() {
		let only_sha =
			consume_reader(Cursor::new(b"abc"), vec![sha512()], 8)
				.unwrap();
		let err = DigestSet::from_results(only_sha).unwrap_err();
		assert!(err.to_string().contains("BLAKE2B"));

		let doubled = consume_reader(
			Cursor::new(b"abc"),
			vec![sha512(), sha512(), blake2b()],
			8,
		)
		.unwrap();
		assert!(DigestSet::from_results(doubled).is_err());

		assert!(DigestSet::from_results(Vec::new()).is_err());
	}

	#[test]
	fn results_are_matched_by_label_not_position() {
		let swapped = consume_reader(
			Cursor::new(Vec::new()),
			vec![blake2b(), sha512()],
			8,
		)
		.unwrap();
		let set = DigestSet::from_results(swapped).unwrap();
		assert_eq!(set.sha512, EMPTY_SHA512);
		assert_eq!(set.blake2b, EMPTY_BLAKE2B);
	}

	#[test]
	fn read_error_yields_no_digest() {
		let err = digest_reader(BrokenReader, 16).unwrap_err();
		assert_eq!(err.to_string(), "device gone");
	}

	#[test]
	fn repeated_file_digests_agree() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("data.bin");
		std::fs::write(&path, patterned(3 * READ_CHUNK_SIZE + 5)).unwrap();
		assert_eq!(
			digest_file(&path).unwrap(),
			digest_file(&path).unwrap()
		);
	}

	#[test]
	fn missing_file_is_a_read_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = digest_file(&dir.path().join("absent.bin")).unwrap_err();
		assert_eq!(err.kind(), crate::rgf::error::GenErrorKind::Read);
	}
}
