#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::error::ErrorKind;
use nbtree::{from_bytes, to_bytes, Compression, ReadOpts, WriteOpts};

fuzz_target!(|data: &[u8]| {
    let opts = ReadOpts::new()
        .compression(Compression::Uncompressed)
        .ensure_compound(false);

    if let Ok((name, tag)) = from_bytes(data, &opts) {
        // A decoded zero byte re-encodes as two bytes, which can push a
        // string past the length limit. Nothing else may fail.
        let write = WriteOpts::new(Compression::Uncompressed).ensure_compound(false);
        if let Err(e) = to_bytes(&name, &tag, &write) {
            assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        }
    }
});
