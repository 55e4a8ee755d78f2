// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: lib.rs

pub mod rgf {
	pub mod app;
	pub mod digest;
	pub mod error;
	pub mod random;
}
