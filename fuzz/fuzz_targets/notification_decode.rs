//! Fuzz target for notification and frame metadata decoding
//!
//! Arbitrary bytes reach the decoders straight from transport callbacks, so
//! they must reject malformed input without panicking:
//! - Malformed or truncated JSON envelopes
//! - Payloads that do not match their kind
//! - Out-of-range timestamps and dimensions
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use confer_proto::{decode_frame_metadata, decode_notification};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = decode_notification(text);
    if let Ok(metadata) = decode_frame_metadata(text) {
        let _ = metadata.expected_len();
    }
});
