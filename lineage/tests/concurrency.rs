//! Readers racing writers: a lookup sees a registration either completely
//! or not at all.

use lineage::testing::Tag;
use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

mod common;
use common::{Circle, Drawable, Figure, Named, Ring, Shape, Square, key, registry};

const READERS: usize = 4;

#[test]
fn test_readers_never_see_partial_propagation() {
    let registry = registry::<Tag>();
    let done = AtomicBool::new(false);
    let start = Barrier::new(READERS + 1);

    thread::scope(|s| {
        for _ in 0..READERS {
            s.spawn(|| {
                start.wait();
                while !done.load(Ordering::Acquire) {
                    let snapshot = registry.entries();
                    let ring = snapshot.iter().any(|(k, _)| *k == key::<Ring>());
                    if ring {
                        // Everything above Ring must already be there.
                        for ancestor in [
                            key::<Circle>(),
                            key::<Figure>(),
                            key::<dyn Shape>(),
                            key::<dyn Drawable>(),
                            key::<dyn Named>(),
                        ] {
                            assert!(snapshot.iter().any(|(k, _)| *k == ancestor));
                        }
                    }

                    // Old (nothing) or new (ring), never anything else.
                    match registry.resolve_fuzzy(key::<Square>()) {
                        None | Some(Tag("ring")) => {}
                        other => panic!("unexpected behavior: {other:?}"),
                    }
                }
            });
        }

        start.wait();
        registry.register_type::<Ring>(Tag("ring")).unwrap();
        done.store(true, Ordering::Release);
    });

    assert_eq!(registry.resolve_fuzzy(key::<Square>()), Some(Tag("ring")));
}

#[test]
fn test_concurrent_registrations_keep_one_writer_per_slot() {
    let registry = Arc::new(registry::<Tag>());
    let start = Arc::new(Barrier::new(2));

    let handles: Vec<_> = [(key::<Circle>(), Tag("circle")), (key::<Square>(), Tag("square"))]
        .into_iter()
        .map(|(ty, tag)| {
            let registry = registry.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                registry.register(ty, tag).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Shared ancestors went to whichever registration committed first, and
    // all of them to the same one.
    let shared = [
        registry.resolve_exact(key::<Figure>()),
        registry.resolve_exact(key::<dyn Shape>()),
        registry.resolve_exact(key::<dyn Drawable>()),
        registry.resolve_exact(key::<dyn Named>()),
    ];
    assert!(shared[0] == Some(Tag("circle")) || shared[0] == Some(Tag("square")));
    assert!(shared.iter().all(|slot| *slot == shared[0]));

    assert_eq!(registry.resolve_exact(key::<Circle>()), Some(Tag("circle")));
    assert_eq!(registry.resolve_exact(key::<Square>()), Some(Tag("square")));
}

#[test]
fn test_duplicate_race_has_single_winner() {
    let registry = registry::<Tag>();
    let start = Barrier::new(8);

    let wins: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    start.wait();
                    registry.register_type::<Circle>(Tag("circle")).is_ok() as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(wins, 1);
    assert_eq!(registry.len(), 1);
}
