//! End-to-end engine behavior against an in-memory display.

use spriggan_physics::prelude::*;
use spriggan_sprite::prelude::*;

fn engine() -> PhysicsEngine {
    PhysicsEngine::new(PhysicsConfig::default())
}

fn block(x: i32, y: i32, rows: &[&str]) -> Sprite {
    Sprite::new(x, y, 0, CharGrid::from_rows(rows).unwrap())
}

#[test]
fn falling_sprite_repaints_the_canvas() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(20, 10);
    let id = eng.display_sprite(block(5, 0, &["@@"]), &mut d).unwrap();
    eng.set_acceleration(id, 0.0, -1.0).unwrap();

    eng.tick(&mut d);
    eng.tick(&mut d);
    // After two ticks of dv = 1/tick: rows moved are 1 then 2.
    let sprite = eng.stage().get(id).unwrap();
    assert_eq!(sprite.y(), 3);
    assert_eq!(d.char_at(5, 3), Some('@'));
    assert_eq!(d.char_at(6, 3), Some('@'));
    assert_eq!(d.char_at(5, 0), Some(' '));
}

#[test]
fn sprite_settles_on_configured_ground() {
    let mut eng = engine();
    eng.config_mut().ground = Some(6);
    let mut d = MemoryDisplay::new(20, 10);
    let id = eng.display_sprite(block(5, 0, &["#", "#"]), &mut d).unwrap();
    eng.set_acceleration(id, 0.0, -1.0).unwrap();
    for _ in 0..20 {
        eng.tick(&mut d);
    }
    // Ground row 6, height 2: the sprite's top row rests at 4.
    assert_eq!(eng.stage().get(id).unwrap().y(), 4);
    assert_eq!(d.char_at(5, 4), Some('#'));
    assert_eq!(d.char_at(5, 5), Some('#'));
    assert_eq!(d.char_at(5, 6), Some(' '));
    // Vertical velocity died against the ground.
    assert_eq!(eng.velocity(id).unwrap().1, 0.0);
}

#[test]
fn slow_sprite_crosses_a_cell_every_fourth_tick() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(40, 5);
    let id = eng.display_sprite(block(10, 2, &["o"]), &mut d).unwrap();
    eng.set_velocity(id, 0.25, 0.0).unwrap();

    let mut xs = Vec::new();
    for _ in 0..8 {
        eng.tick(&mut d);
        xs.push(eng.stage().get(id).unwrap().x());
    }
    assert_eq!(xs, vec![10, 10, 10, 11, 11, 11, 11, 12]);
}

#[test]
fn terminal_velocity_limits_fall_rate() {
    let mut eng = engine();
    eng.config_mut().terminal_velocity = 3.0;
    let mut d = MemoryDisplay::new(10, 200);
    let id = eng.display_sprite(block(2, 0, &["v"]), &mut d).unwrap();
    eng.set_acceleration(id, 0.0, -2.0).unwrap();

    let mut last_y = 0;
    for tick in 0..10 {
        eng.tick(&mut d);
        let y = eng.stage().get(id).unwrap().y();
        let dropped = y - last_y;
        assert!(dropped <= 3, "tick {tick} dropped {dropped} rows");
        last_y = y;
    }
    assert_eq!(eng.velocity(id).unwrap().1, -3.0);
}

#[test]
fn walls_stop_horizontal_motion() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(10, 5);
    let id = eng.display_sprite(block(7, 2, &["ab"]), &mut d).unwrap();
    eng.set_velocity(id, 5.0, 0.0).unwrap();
    eng.tick(&mut d);
    // Width 2 on a 10-wide canvas: x clamps to 8, velocity to the 1 cell
    // actually travelled.
    assert_eq!(eng.stage().get(id).unwrap().x(), 8);
    assert_eq!(eng.velocity(id).unwrap().0, 1.0);
    eng.tick(&mut d);
    assert_eq!(eng.stage().get(id).unwrap().x(), 8);
    assert_eq!(eng.velocity(id).unwrap().0, 0.0);
}

#[test]
fn undisplay_mid_flight_keeps_other_motion_rows() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(40, 20);
    let a = eng.display_sprite(block(0, 0, &["a"]), &mut d).unwrap();
    let b = eng.display_sprite(block(10, 0, &["b"]), &mut d).unwrap();
    let c = eng.display_sprite(block(20, 0, &["c"]), &mut d).unwrap();
    eng.set_velocity(a, 1.0, 0.0).unwrap();
    eng.set_velocity(b, 2.0, 0.0).unwrap();
    eng.set_velocity(c, 3.0, 0.0).unwrap();

    eng.undisplay_sprite(b, &mut d).unwrap();
    eng.tick(&mut d);

    assert_eq!(eng.stage().get(a).unwrap().x(), 1);
    assert_eq!(eng.stage().get(c).unwrap().x(), 23);
    assert!(eng.stage().get(b).is_none());
    assert_eq!(d.char_at(10, 0), Some(' '));
}

#[test]
fn redisplayed_sprite_starts_at_rest_with_old_identity() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(20, 10);
    let id = eng.display_sprite(block(5, 5, &["x"]), &mut d).unwrap();
    eng.set_velocity(id, 3.0, 0.0).unwrap();
    let sprite = eng.undisplay_sprite(id, &mut d).unwrap();

    let again = eng.display_sprite(sprite, &mut d).unwrap();
    assert_eq!(again, id);
    // The motion row is slot-keyed and was compacted away; redisplay gets a
    // fresh at-rest row.
    assert!(eng.motion(id).unwrap().is_at_rest());
}

#[test]
fn mass_divides_force_acceleration() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(80, 10);
    // Four cells of default weight: mass 4.
    let heavy = eng.display_sprite(block(0, 0, &["##", "##"]), &mut d).unwrap();
    let light = eng.display_sprite(block(0, 5, &["#"]), &mut d).unwrap();
    eng.add_force(heavy, Vec2::new(4, 0)).unwrap();
    eng.add_force(light, Vec2::new(4, 0)).unwrap();

    eng.tick(&mut d);
    assert_eq!(eng.velocity(heavy).unwrap().0, 1.0);
    assert_eq!(eng.velocity(light).unwrap().0, 4.0);

    // Overriding mass changes the next tick's acceleration.
    eng.set_mass(light, 8.0).unwrap();
    eng.tick(&mut d);
    assert_eq!(eng.velocity(light).unwrap().0, 4.5);
}

#[test]
fn char_weights_change_default_mass() {
    let mut eng = engine();
    eng.config_mut().char_weights.set('&', 3.0);
    let mut d = MemoryDisplay::new(20, 10);
    let id = eng.display_sprite(block(0, 0, &["&#"]), &mut d).unwrap();
    assert_eq!(eng.default_mass(id).unwrap(), 4.0);
    assert_eq!(eng.mass(id).unwrap(), 4.0);
}

#[test]
fn about_to_collide_respects_clamped_displacement() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(12, 5);
    let mover = eng.display_sprite(block(8, 1, &["m"]), &mut d).unwrap();
    let wall = eng.display_sprite(block(0, 1, &["w"]), &mut d).unwrap();
    let bounds = eng.tick_bounds(&d);

    // Huge velocity, but the right edge clamps it to 3 cells; the sprite
    // never reaches the far column.
    eng.set_velocity(mover, 50.0, 0.0).unwrap();
    assert!(!eng.is_about_to_collide(mover, wall, bounds));

    eng.set_velocity(mover, -8.0, 0.0).unwrap();
    assert!(eng.is_about_to_collide(mover, wall, bounds));
}

#[test]
fn sprite_taller_than_canvas_stays_at_rest() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(10, 10);
    // Drawing clips; registration accepts it; the tick must not invent
    // motion out of the conflicting ground and ceiling clamps.
    let tall = Sprite::new(3, 0, 0, CharGrid::new(1, 12, '#').unwrap());
    let id = eng.display_sprite(tall, &mut d).unwrap();
    for _ in 0..3 {
        let modified = eng.tick(&mut d);
        assert!(modified.is_empty());
        assert_eq!(eng.stage().get(id).unwrap().y(), 0);
        assert!(eng.motion(id).unwrap().is_at_rest());
    }
}

#[test]
fn tick_plans_ignore_same_tick_moves() {
    use spriggan_physics::tick::plan_step;

    let mut eng = engine();
    let mut d = MemoryDisplay::new(40, 5);
    let a = eng.display_sprite(block(0, 2, &["a"]), &mut d).unwrap();
    let b = eng.display_sprite(block(12, 2, &["b"]), &mut d).unwrap();
    eng.set_velocity(a, 3.0, 0.0).unwrap();
    eng.set_velocity(b, -3.0, 0.0).unwrap();

    // Expected displacements from the pre-tick state alone.
    let bounds = eng.tick_bounds(&d);
    let plan_a = plan_step(
        eng.stage().get(a).unwrap().bounds(),
        eng.motion(a).unwrap(),
        (0.0, 0.0),
        eng.config().terminal_velocity,
        bounds,
    );
    let plan_b = plan_step(
        eng.stage().get(b).unwrap().bounds(),
        eng.motion(b).unwrap(),
        (0.0, 0.0),
        eng.config().terminal_velocity,
        bounds,
    );

    eng.tick(&mut d);

    // Each sprite moved exactly as planned from the snapshot: neither plan
    // observed the other's same-tick reposition, regardless of slot order.
    assert_eq!(eng.stage().get(a).unwrap().x(), plan_a.dx_cells);
    assert_eq!(eng.stage().get(b).unwrap().x(), 12 + plan_b.dx_cells);
    assert_eq!(eng.motion(a).unwrap(), plan_a.next);
    assert_eq!(eng.motion(b).unwrap(), plan_b.next);
}

#[test]
fn friction_is_tracked_but_does_not_slow_motion() {
    let mut eng = engine();
    let mut d = MemoryDisplay::new(40, 5);
    let id = eng.display_sprite(block(0, 2, &["f"]), &mut d).unwrap();
    eng.set_friction(id, 1.0).unwrap();
    assert_eq!(eng.friction(id).unwrap(), 1.0);

    eng.set_velocity(id, 2.0, 0.0).unwrap();
    eng.tick(&mut d);
    // Full friction, yet velocity is untouched.
    assert_eq!(eng.velocity(id).unwrap().0, 2.0);
}
