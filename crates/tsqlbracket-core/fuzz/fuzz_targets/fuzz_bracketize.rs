//! Fuzz target for whole-script bracketing.
//!
//! Checks that `bracketize_script()` never panics, including when fed its own output.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tsqlbracket_core::{bracketize_script, BracketizeOptions};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    script: String,
    strip_comments: bool,
}

fuzz_target!(|input: FuzzInput| {
    let options = BracketizeOptions {
        strip_comments: input.strip_comments,
    };
    let once = bracketize_script(&input.script, &options);
    let _ = bracketize_script(&once.sql, &options);
});
