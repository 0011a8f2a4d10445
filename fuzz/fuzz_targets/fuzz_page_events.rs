#![no_main]

use libfuzzer_sys::fuzz_target;
use tform_web::{PageConfig, PageModel};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut page) = PageModel::new(
        PageConfig::default(),
        ["track_image_0", "track_image_1"],
        vec!["alice".to_owned(), "bob".to_owned()],
    ) else {
        return;
    };

    // One event per line, like a host replaying a recorded session.
    for line in text.lines() {
        let _ = page.dispatch_encoded(line);
        let _ = page.drain_patches();

        // Post-conditions that must always hold:
        let names = page.registry().names();
        assert_eq!(names.as_slice(), page.field_names(), "surface drifted");
        assert_eq!(page.row_visibility().len(), 2, "row count changed");
    }
});
