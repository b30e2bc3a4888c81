//! Fixed timestep simulation tick
//!
//! One tick source drives everything time-based: the projectile physics, the
//! thrower animation, cosmetic despawn timers and the level phase timers.

use glam::Vec2;

use super::collision::{first_hit, out_of_bounds};
use super::state::{
    GameEvent, GamePhase, GameState, Projectile, ProjectileOutcome, ProjectileState,
};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim-and-confirm point in arena coordinates (click/tap)
    pub aim: Option<Vec2>,
    /// Restart the session (win screen button)
    pub restart: bool,
    /// Idle/demo mode - AI throws at the first live target whenever it can
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
        return;
    }

    let aim = if input.idle_mode {
        input.aim.or_else(|| idle_aim(state))
    } else {
        input.aim
    };
    if let Some(aim) = aim {
        state.request_throw(aim);
    }

    state.time_ticks += 1;

    // Physics before animation so a projectile released this tick starts moving next tick
    step_projectile(state);
    step_throw_animation(state);
    step_despawns(state);
    state.advance_phase();
}

/// Demo player: aim-assisted throw at the first live target once the hand is free
fn idle_aim(state: &GameState) -> Option<Vec2> {
    if state.phase != GamePhase::Playing || state.throw_in_flight || state.throw_anim.is_some() {
        return None;
    }
    state
        .targets
        .first()
        .map(|target| state.tuning.aim_for(target.center()))
}

/// Integrate, then test targets, then test bounds. A capture wins over leaving the field.
fn step_projectile(state: &mut GameState) {
    let Some(projectile) = state.projectile.as_mut() else {
        return;
    };
    projectile.integrate(state.tuning.gravity);
    let (id, pos, radius) = (projectile.id, projectile.pos, projectile.radius);
    state.emit(GameEvent::ProjectileMoved { id, pos });

    if let Some(target_id) = first_hit(pos, radius, &state.targets).map(|t| t.id) {
        end_flight(state, ProjectileState::Captured);
        state.resolve_projectile(ProjectileOutcome::Hit { target_id });
        return;
    }

    if out_of_bounds(pos, state.tuning.arena_width, state.tuning.escape_height) {
        end_flight(state, ProjectileState::OutOfBounds);
        state.resolve_projectile(ProjectileOutcome::Missed);
    }
}

fn end_flight(state: &mut GameState, end: ProjectileState) {
    if let Some(p) = state.projectile.as_mut() {
        p.state = end;
        log::debug!(
            "Projectile {} {:?} at ({:.1}, {:.1}) after {} ticks",
            p.id,
            end,
            p.pos.x,
            p.pos.y,
            state.time_ticks
        );
    }
}

/// Advance the thrower sprite; the projectile leaves the hand on the release frame
fn step_throw_animation(state: &mut GameState) {
    let Some(mut anim) = state.throw_anim else {
        return;
    };
    let frame_ms = state.tuning.throw_frame_ms;
    let frames = state.tuning.throw_frames;
    let release_frame = state.tuning.release_frame;

    anim.elapsed_ms += state.tuning.step_ms;
    let mut launch_at = None;
    let mut finished = false;
    while anim.elapsed_ms >= frame_ms {
        anim.elapsed_ms -= frame_ms;
        if anim.frame >= frames {
            finished = true;
            break;
        }
        anim.frame += 1;
        state.emit(GameEvent::ThrowerFrame { frame: anim.frame });
        if anim.frame >= release_frame && !anim.released {
            anim.released = true;
            launch_at = Some(anim.aim);
        }
    }

    if finished {
        state.throw_anim = None;
        state.emit(GameEvent::ThrowerFrame { frame: 1 });
    } else {
        state.throw_anim = Some(anim);
    }

    if let Some(aim) = launch_at {
        launch_projectile(state, aim);
    }
}

fn launch_projectile(state: &mut GameState, aim: Vec2) {
    let id = state.next_entity_id();
    let projectile = Projectile::aimed(id, aim, &state.tuning);
    log::debug!(
        "Throw toward ({:.1}, {:.1}), v=({:.2}, {:.2})",
        aim.x,
        aim.y,
        projectile.vel.x,
        projectile.vel.y
    );
    state.emit(GameEvent::ProjectileLaunched {
        id,
        pos: projectile.pos,
        radius: projectile.radius,
    });
    state.projectile = Some(projectile);
}

fn step_despawns(state: &mut GameState) {
    let mut expired = Vec::new();
    state.pending_despawns.retain_mut(|pending| {
        pending.ticks_left = pending.ticks_left.saturating_sub(1);
        if pending.ticks_left == 0 {
            expired.push(pending.id);
            false
        } else {
            true
        }
    });
    for id in expired {
        state.emit(GameEvent::Despawn { id });
    }
}
