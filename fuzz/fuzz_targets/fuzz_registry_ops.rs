#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tform_core::{FieldGroupConfig, FieldIndexManager, MemorySurface};

#[derive(Debug, Arbitrary)]
enum Op {
    Add,
    Remove(u8),
    Renumber,
}

#[derive(Debug, Arbitrary)]
struct Input {
    initial: Vec<u32>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = FieldGroupConfig::default();
    let names: Vec<String> = input
        .initial
        .iter()
        .take(64)
        .map(|&i| config.field_name(i))
        .collect();
    let Ok(mut manager) = FieldIndexManager::initialize(config, MemorySurface::with_names(names))
    else {
        return;
    };

    for op in input.ops.iter().take(256) {
        match op {
            Op::Add => {
                let _ = manager.add();
            }
            Op::Remove(position) => {
                let _ = manager.remove(usize::from(*position));
            }
            Op::Renumber => {
                assert_eq!(manager.renumber(), Ok(0), "renumber found stale names");
            }
        }

        // Post-conditions that must always hold:
        let indices = manager.registry().indices();
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), indices.len(), "duplicate index");
        assert_eq!(
            manager.registry().names().as_slice(),
            manager.surface().names(),
            "surface drifted"
        );
    }
});
