#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use touchslate_core::{Rect, TouchPointer, TouchSurface};

#[derive(Debug, Arbitrary)]
struct RawEvent {
    code: u16,
    pointers: Vec<(u8, i16, i16)>,
}

fuzz_target!(|events: Vec<RawEvent>| {
    let mut surface = TouchSurface::default();
    let ids = [
        surface.add_entity(Rect::new(0, 0, 300, 200)).expect("valid entity"),
        surface.add_entity(Rect::new(150, 100, 300, 200)).expect("valid entity"),
    ];

    for event in events.iter().take(256) {
        let pointers: Vec<TouchPointer> = event
            .pointers
            .iter()
            .take(10)
            .map(|&(id, x, y)| TouchPointer::new(i32::from(id % 8), i32::from(x), i32::from(y)))
            .collect();
        let _ = surface.dispatch_raw(u32::from(event.code), &pointers);

        // Every contact agrees with the pointer table, and no pointer is a
        // contact of two entities.
        let mut seen = Vec::new();
        for id in ids {
            let entity = surface.entity(id).expect("entity still present");
            let state = entity.state();
            assert!(state.sx > entity.min_scale() && state.sy > entity.min_scale());
            for contact in entity.contacts().iter() {
                assert!(!seen.contains(&contact.pointer_id), "pointer bound twice");
                seen.push(contact.pointer_id);
                assert_eq!(surface.tracker().binding_of(contact.pointer_id), Some(id));
            }
        }
    }
});
