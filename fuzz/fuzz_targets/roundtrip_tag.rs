#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::{from_bytes, to_bytes, Compound, Compression, ReadOpts, Tag, WriteOpts};

fuzz_target!(|v: Tag| {
    let mut root = Compound::new();
    root.set("", v);
    let root = Tag::Compound(root);

    let write = WriteOpts::new(Compression::Uncompressed);
    // Strings can be too long to encode.
    if let Ok(bs) = to_bytes("", &root, &write) {
        let (_, back) = from_bytes(&bs, &ReadOpts::new()).unwrap();

        // Compare bytes rather than trees, NaN floats are not equal to
        // themselves.
        assert_eq!(to_bytes("", &back, &write).unwrap(), bs);
    }
});
