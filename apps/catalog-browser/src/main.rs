//! # Catalog Browser Entry Point
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    catalog_browser_lib::run()
}
