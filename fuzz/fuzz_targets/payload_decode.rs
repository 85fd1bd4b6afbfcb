#![no_main]

use libfuzzer_sys::fuzz_target;
use pathwire_codec::{decode_payload, describe_raw, encode_payload};

fuzz_target!(|data: &[u8]| {
    let _ = describe_raw(data);
    if let Ok(payload) = decode_payload(data) {
        let _ = payload.describe();
        let _ = encode_payload(&payload);
    }
});
