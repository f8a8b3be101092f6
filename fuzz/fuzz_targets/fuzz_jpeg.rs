#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = jpegmeta::parse_raw_bytes(data, jpegmeta::ParseConfig::default());
});
