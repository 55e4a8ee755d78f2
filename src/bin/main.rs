// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustgenfile
// File: main.rs

use rustgenfile::rgf::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	app::run()?;
	Ok(())
}
