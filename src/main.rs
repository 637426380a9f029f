//! # dupe-sort CLI
//!
//! Command-line interface for the near-duplicate mover.
//!
//! ## Usage
//! ```bash
//! dupe-sort scan ~/Photos ~/Photos-duplicates --threshold 10
//! dupe-sort scan ~/Photos ~/Photos-duplicates --policy keep --output json
//! ```

mod cli;

use near_duplicate_mover::Result;

fn main() -> Result<()> {
    near_duplicate_mover::init_tracing();
    cli::run()
}
