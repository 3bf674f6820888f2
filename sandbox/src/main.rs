// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use std::time::Duration;
use stride_sdk::prelude::*;

const FRAMES: u32 = 900;
const PLAYER_SPEED: f32 = 6.0;
const OBSTACLE_GAP: f32 = 400.0;
const OBSTACLE_WIDTH: f32 = 40.0;

#[derive(Debug, Default)]
struct Particle {
    position: [f32; 2],
    velocity: [f32; 2],
    life: f32,
}

impl Poolable for Particle {
    fn reset(&mut self) {
        *self = Particle::default();
    }
}

/// Simulated frame cost: nominal, then a heavy stretch, then a recovery.
fn frame_cost(frame: u32, particles: usize) -> Duration {
    let base_ms = match frame {
        0..=239 => 12.0,
        240..=539 => 38.0,
        _ => 11.0,
    };
    Duration::from_secs_f32((base_ms + particles as f32 * 0.01) / 1000.0)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut core = match std::env::args().nth(1) {
        Some(path) => PerformanceCore::from_config_file(path, DeviceTier::High)?,
        None => PerformanceCore::new(StrideConfig::default(), DeviceTier::High),
    };
    core.pools_mut().register(ResourcePool::<Particle>::poolable(
        "particles",
        PoolConfig::sized(128, 1024),
    ));

    let mut live: Vec<Pooled<Particle>> = Vec::new();
    let mut player = 0.0f32;
    let (mut scores, mut hits) = (0u32, 0u32);

    for frame in 0..FRAMES {
        player += PLAYER_SPEED;

        // Every obstacle within reach of the player is sampled this frame.
        let first = ((player - OBSTACLE_GAP) / OBSTACLE_GAP).floor().max(0.0) as u32;
        for index in first..first + 3 {
            let id = format!("obstacle-{index}");
            let position = (index + 1) as f32 * OBSTACLE_GAP;
            let state = core.resolve_collision(&id, position, OBSTACLE_WIDTH, player);
            // Every fourth obstacle is a wall the player runs into.
            if index % 4 == 3 && state == CollisionState::Colliding && core.try_damage(&id) {
                hits += 1;
            }
            if state == CollisionState::Passed && core.try_score(&id) {
                scores += 1;
            }
        }

        let ceiling = core.current_quality_profile().particle_ceiling as usize;
        if let Some(pool) = core.pools_mut().get_mut::<Particle>("particles") {
            while live.len() < ceiling.min(40 + (frame as usize % 60) * 8) {
                let Some(mut particle) = pool.acquire() else {
                    break;
                };
                particle.life = 1.0;
                particle.velocity = [1.0, 0.5];
                live.push(particle);
            }
            for particle in live.iter_mut() {
                particle.life -= 0.05;
                particle.position[0] += particle.velocity[0];
                particle.position[1] += particle.velocity[1];
            }
            let (expired, alive): (Vec<_>, Vec<_>) = live.drain(..).partition(|p| p.life <= 0.0);
            live = alive;
            for particle in expired {
                pool.release(particle);
            }
        }

        if let Some(change) = core.record_frame(frame_cost(frame, live.len())) {
            log::info!(
                "frame {}: quality {:?} -> {:?} ({:?})",
                frame,
                change.from,
                change.to,
                change.reason
            );
        }

        if frame % 300 == 299 {
            core.maintenance();
        }
    }

    log::info!("Run finished: {} scores, {} hits", scores, hits);
    log::info!("Diagnostics:\n{}", core.diagnostics().to_json()?);
    Ok(())
}
