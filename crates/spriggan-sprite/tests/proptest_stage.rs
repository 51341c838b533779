//! Property tests for stage invariants.
//!
//! Random register/unregister sequences must keep slots contiguous and
//! 1-based, never reuse a stable id, and keep collision queries symmetric
//! and irreflexive.

use proptest::prelude::*;
use spriggan_sprite::prelude::*;

#[derive(Debug, Clone)]
enum StageOp {
    Register { x: i32, y: i32, w: u32, h: u32, z: i32 },
    Unregister(usize),
}

fn stage_op_strategy() -> impl Strategy<Value = StageOp> {
    prop_oneof![
        (-20..40i32, -20..40i32, 1..6u32, 1..6u32, -5..5i32)
            .prop_map(|(x, y, w, h, z)| StageOp::Register { x, y, w, h, z }),
        (0..100usize).prop_map(StageOp::Unregister),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    #[test]
    fn random_ops_preserve_stage_invariants(
        ops in prop::collection::vec(stage_op_strategy(), 1..60)
    ) {
        let mut stage = Stage::new();
        let mut displayed: Vec<SpriteId> = Vec::new();
        let mut ever_issued: Vec<SpriteId> = Vec::new();

        for op in ops {
            match op {
                StageOp::Register { x, y, w, h, z } => {
                    let sprite = Sprite::new(x, y, z, CharGrid::new(w, h, '#').unwrap());
                    let slot = stage.register(sprite).unwrap();
                    let id = stage.get_by_slot(slot).unwrap().stable_id().unwrap();
                    prop_assert!(!ever_issued.contains(&id), "stable id reused");
                    ever_issued.push(id);
                    displayed.push(id);
                }
                StageOp::Unregister(i) => {
                    if !displayed.is_empty() {
                        let id = displayed.remove(i % displayed.len());
                        stage.unregister(id).unwrap();
                    }
                }
            }

            // Slots are contiguous 1..=N in registration order.
            let slots: Vec<u32> = stage.all_displayed().map(|(s, _)| s.get()).collect();
            prop_assert_eq!(&slots, &(1..=stage.len() as u32).collect::<Vec<_>>());
            prop_assert_eq!(stage.len(), displayed.len());

            // Every displayed id resolves to the slot that holds it.
            for &id in &displayed {
                let slot = stage.slot_of(id);
                prop_assert!(slot.is_some());
                let s = stage.get_by_slot(slot.unwrap()).unwrap();
                prop_assert_eq!(s.stable_id(), Some(id));
            }
        }
    }

    #[test]
    fn collision_symmetric_and_irreflexive(
        rects in prop::collection::vec((-10..20i32, -10..20i32, 1..8u32, 1..8u32), 2..12)
    ) {
        let mut stage = Stage::new();
        let mut ids = Vec::new();
        for (x, y, w, h) in rects {
            let sprite = Sprite::new(x, y, 0, CharGrid::new(w, h, '#').unwrap());
            let slot = stage.register(sprite).unwrap();
            ids.push(stage.get_by_slot(slot).unwrap().stable_id().unwrap());
        }

        for &a in &ids {
            prop_assert!(!stage.is_colliding(a, a));
            for &b in &ids {
                prop_assert_eq!(stage.is_colliding(a, b), stage.is_colliding(b, a));
            }
        }

        // Unregistered sprites collide with nothing.
        let gone = ids[0];
        stage.unregister(gone).unwrap();
        for &b in &ids {
            prop_assert!(!stage.is_colliding(gone, b));
            prop_assert!(!stage.is_colliding(b, gone));
        }
    }
}
