#![no_main]

use libfuzzer_sys::fuzz_target;
use tform_core::{DEFAULT_FIELD_PREFIX, format_field_name, parse_field_index};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };
    // Leading zeros are accepted, so the canonical name is never longer.
    if let Ok(index) = parse_field_index(DEFAULT_FIELD_PREFIX, name) {
        let formatted = format_field_name(DEFAULT_FIELD_PREFIX, index);
        assert_eq!(
            parse_field_index(DEFAULT_FIELD_PREFIX, &formatted),
            Ok(index)
        );
        assert!(name.len() >= formatted.len(), "parse accepted a shorter name");
    }
});
