//! Fuzz target for the markup parser.
//!
//! The parser accepts arbitrary host-supplied markup at mount time, so it
//! must never panic, and the writer must serialize whatever the parser
//! produced. Canonical output must also be a fixed point.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_core::markup;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let (blocks, hrefs) = markup::parse(input);
    let written = markup::write(&blocks, &hrefs);

    // One canonicalizing pass must reach a fixed point
    let (reparsed, repool) = markup::parse(&written);
    assert_eq!(markup::write(&reparsed, &repool), written);
});
