#![no_main]

use libfuzzer_sys::fuzz_target;
use pathwire_crypto::SignedBlobS;

fuzz_target!(|data: &[u8]| {
    if let Ok(signed) = ciborium::from_reader::<SignedBlobS, _>(data) {
        let _ = signed.to_string();
        let _ = signed.pack();
        let _ = signed.verify(&[0_u8; 32]);
    }
});
