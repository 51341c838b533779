//! A ball lobbed across the canvas under gravity, bouncing off the ground,
//! printed frame by frame.
//!
//! ```text
//! cargo run --example bouncing
//! ```

use anyhow::Result;
use spriggan_physics::prelude::*;
use spriggan_sprite::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = PhysicsConfig::default();
    config.terminal_velocity = 6.0;
    let mut engine = PhysicsEngine::new(config);
    let mut display = MemoryDisplay::new(60, 16);

    let floor = {
        let mut s = Sprite::new(0, 15, 0, CharGrid::new(60, 1, '=')?);
        s.set_static(true);
        s
    };
    engine.display_sprite(floor, &mut display)?;

    let ball = Sprite::new(2, 12, 1, CharGrid::from_rows(&["o"])?);
    let id = engine.display_sprite(ball, &mut display)?;

    // Up and to the right; gravity pulls it back down each tick.
    engine.set_velocity(id, 2.0, 4.0)?;
    engine.set_acceleration(id, 0.0, -1.0)?;
    engine.config_mut().ground = Some(15);

    for frame in 0..24 {
        engine.tick(&mut display);
        let (vx, mut vy) = engine.velocity(id)?;
        // The ground clamp kills downward velocity; bounce with some loss.
        if vy == 0.0 && engine.stage().get(id).map(Sprite::y) == Some(14) {
            vy = 3.0;
            engine.set_velocity(id, vx, vy)?;
        }
        println!("tick {frame:2}  v=({vx:+.1}, {vy:+.1})");
        println!("{}", display.to_text());
        println!();
    }

    Ok(())
}
