//! Fuzz target for the tolerant filter-text front-end.
//!
//! Feeds arbitrary input strings to the parser to find:
//! - Panics on malformed input
//! - Diagnostics pointing outside the input text
//! - Infinite loops in the comment/comma scanners
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_filter_text
//! ```

#![no_main]

use filterboard_core::text::parse_filter_text;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (UTF-8 validation)
    if let Ok(input) = std::str::from_utf8(data) {
        // The front-end should never panic, and every diagnostic must point
        // into the input.
        if let Err(diagnostic) = parse_filter_text(input) {
            assert!(diagnostic.offset <= input.len());
            assert!(diagnostic.line >= 1);
        }
    }
});
