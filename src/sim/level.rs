//! Level and session progression
//!
//! Spawning, throw requests, capture handling and the
//! `Playing -> Clearing -> Advancing -> Playing | Victory` transitions.

use super::placement::Placement;
use super::state::{
    CaptureEffect, GameEvent, GamePhase, GameState, ProjectileOutcome, Target, ThrowAnimation,
};
use glam::Vec2;

impl GameState {
    /// Replace the live targets with a freshly placed set for `index`
    pub fn start_level(&mut self, index: usize) {
        let Some(names) = self.tuning.levels.get(index).cloned() else {
            log::warn!(
                "Level {} does not exist ({} configured)",
                index,
                self.level_count()
            );
            return;
        };

        for target in std::mem::take(&mut self.targets) {
            self.emit(GameEvent::Despawn { id: target.id });
        }

        self.level_index = index;
        self.phase = GamePhase::Playing;
        self.phase_ticks = 0;
        self.level_throws = 0;
        self.level_captures = 0;
        self.emit(GameEvent::LevelStarted { level: index });

        let placement = Placement::from_tuning(&self.tuning);
        let size = Vec2::splat(self.tuning.target_size);
        let placed = placement.place_all(names.len(), &mut self.rng);
        for (name, placed) in names.into_iter().zip(placed) {
            let target = Target {
                id: self.next_entity_id(),
                name,
                pos: placed.pos,
                size,
            };
            self.emit(GameEvent::TargetSpawned {
                id: target.id,
                name: target.name.clone(),
                pos: target.pos,
                size: target.size,
            });
            self.targets.push(target);
        }

        log::info!(
            "Level {}: {} targets ({})",
            index + 1,
            self.targets.len(),
            self.targets
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.emit_pokedex();

        // Nothing to catch, move straight on
        if self.targets.is_empty() {
            self.clear_level();
        }
    }

    /// Start a throw toward `aim`. Returns false (and changes nothing) while one is in flight.
    pub fn request_throw(&mut self, aim: Vec2) -> bool {
        if self.throw_in_flight {
            log::debug!("Throw ignored, one is already in flight");
            return false;
        }
        if self.phase == GamePhase::Victory {
            log::debug!("Throw ignored, game is over");
            return false;
        }

        self.throw_in_flight = true;
        self.level_throws += 1;
        self.throw_anim = Some(ThrowAnimation::new(aim));
        self.emit(GameEvent::ThrowerFrame { frame: 1 });
        true
    }

    /// Apply the end of a throw: capture on hit, plain guard release on miss
    pub fn resolve_projectile(&mut self, outcome: ProjectileOutcome) {
        let projectile_id = self.projectile.take().map(|p| p.id);

        // A resolution before release cancels the pending launch
        if let Some(anim) = self.throw_anim.as_mut() {
            anim.released = true;
        }
        self.throw_in_flight = false;

        match outcome {
            ProjectileOutcome::Hit { target_id } => self.capture(target_id, projectile_id),
            ProjectileOutcome::Missed => {
                if let Some(id) = projectile_id {
                    log::debug!("Throw missed");
                    self.emit(GameEvent::ProjectileMissed { id });
                    self.emit(GameEvent::Despawn { id });
                }
            }
        }
    }

    fn capture(&mut self, target_id: u32, projectile_id: Option<u32>) {
        let Some(index) = self.targets.iter().position(|t| t.id == target_id) else {
            log::warn!("Hit on unknown target {}", target_id);
            if let Some(id) = projectile_id {
                self.emit(GameEvent::Despawn { id });
            }
            return;
        };
        let target = self.targets.remove(index);

        let new_entry = self.captured.insert(target.name.clone());
        self.level_captures += 1;
        log::info!(
            "Captured {}{} ({}/{})",
            target.name,
            if new_entry { "" } else { " again" },
            self.captured_count(),
            self.total_targets()
        );

        self.emit(GameEvent::TargetCaptured {
            target_id,
            projectile_id,
            name: target.name,
            new_entry,
        });
        self.emit(GameEvent::Effect {
            id: target_id,
            effect: CaptureEffect::Vanish,
        });
        self.despawn_after(target_id, self.tuning.capture_removal_ms);
        if let Some(id) = projectile_id {
            self.emit(GameEvent::Effect {
                id,
                effect: CaptureEffect::Bounce,
            });
            self.despawn_after(id, self.tuning.projectile_bounce_ms);
        }
        if new_entry {
            self.emit_pokedex();
        }

        if self.targets.is_empty() && self.phase == GamePhase::Playing {
            self.clear_level();
        }
    }

    fn clear_level(&mut self) {
        log::info!("Level {} cleared", self.level_index + 1);
        self.phase = GamePhase::Clearing;
        self.phase_ticks = self.tuning.ticks_for(self.tuning.capture_removal_ms);
        self.emit(GameEvent::LevelCleared {
            level: self.level_index,
        });
    }

    /// Count down the timed phases, moving on when they expire
    pub(crate) fn advance_phase(&mut self) {
        match self.phase {
            GamePhase::Clearing => {
                if count_down(&mut self.phase_ticks) {
                    self.phase = GamePhase::Advancing;
                    self.phase_ticks = self.tuning.ticks_for(self.tuning.level_clear_delay_ms);
                }
            }
            GamePhase::Advancing => {
                if count_down(&mut self.phase_ticks) {
                    let next = self.level_index + 1;
                    if next < self.level_count() {
                        self.start_level(next);
                    } else {
                        log::info!("All levels cleared!");
                        self.phase = GamePhase::Victory;
                        self.emit(GameEvent::Victory);
                    }
                }
            }
            GamePhase::Playing | GamePhase::Victory => {}
        }
    }

    /// Wipe the session and begin again at level 0
    pub fn restart(&mut self) {
        log::info!("Session restarted");
        self.emit(GameEvent::Restarted);

        if let Some(p) = self.projectile.take() {
            self.emit(GameEvent::Despawn { id: p.id });
        }
        for pending in std::mem::take(&mut self.pending_despawns) {
            self.emit(GameEvent::Despawn { id: pending.id });
        }
        self.throw_in_flight = false;
        if self.throw_anim.take().is_some() {
            self.emit(GameEvent::ThrowerFrame { frame: 1 });
        }
        self.captured.clear();
        self.level_index = 0;
        self.phase = GamePhase::Playing;
        self.phase_ticks = 0;

        if self.tuning.levels.is_empty() {
            for target in std::mem::take(&mut self.targets) {
                self.emit(GameEvent::Despawn { id: target.id });
            }
            self.phase = GamePhase::Victory;
            self.emit_pokedex();
        } else {
            self.start_level(0);
        }
    }
}

/// Decrement a tick counter; true once it has reached zero
fn count_down(ticks: &mut u32) -> bool {
    *ticks = ticks.saturating_sub(1);
    *ticks == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn two_level_state() -> GameState {
        GameState::new(Tuning::with_levels([vec!["A", "B"], vec!["C"]]), 42)
    }

    fn id_of(state: &GameState, name: &str) -> u32 {
        state
            .targets
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .expect("target is live")
    }

    fn hit(state: &mut GameState, name: &str) {
        let target_id = id_of(state, name);
        assert!(state.request_throw(Vec2::ZERO));
        state.resolve_projectile(ProjectileOutcome::Hit { target_id });
    }

    fn run_phases(state: &mut GameState, ticks: u32) {
        for _ in 0..ticks {
            state.advance_phase();
        }
    }

    #[test]
    fn test_start_level_spawns_configured_names() {
        let mut state = two_level_state();
        state.drain_events();

        state.start_level(1);
        assert_eq!(state.level_index, 1);
        let names: Vec<_> = state.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["C"]);

        let events = state.drain_events();
        let despawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Despawn { .. }))
            .count();
        assert_eq!(despawned, 2);
        assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
    }

    #[test]
    fn test_start_level_keeps_targets_apart() {
        for seed in 0..20 {
            let state = GameState::new(Tuning::default(), seed);
            let min = state.tuning.min_separation;
            for (i, a) in state.targets.iter().enumerate() {
                for b in &state.targets[i + 1..] {
                    assert!(a.pos.distance(b.pos) >= min, "seed {}", seed);
                }
            }
        }
    }

    #[test]
    fn test_start_level_out_of_range_is_ignored() {
        let mut state = two_level_state();
        let before = state.targets.clone();
        state.start_level(5);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.targets, before);
    }

    #[test]
    fn test_single_flight_guard() {
        let mut state = two_level_state();
        assert!(state.request_throw(Vec2::new(100.0, 100.0)));
        let anim = state.throw_anim;
        let throws = state.level_throws;

        assert!(!state.request_throw(Vec2::new(300.0, 50.0)));
        assert_eq!(state.throw_anim, anim);
        assert_eq!(state.level_throws, throws);
        assert!(state.throw_in_flight);
    }

    #[test]
    fn test_capture_clears_guard_immediately() {
        let mut state = two_level_state();
        hit(&mut state, "A");
        assert!(!state.throw_in_flight);
        assert!(state.captured.contains("A"));
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
        // Removal animation is still pending but a new throw is allowed
        assert!(!state.pending_despawns.is_empty());
        assert!(state.request_throw(Vec2::ZERO));
    }

    #[test]
    fn test_level_progression_and_victory() {
        let mut state = two_level_state();
        hit(&mut state, "A");
        hit(&mut state, "B");
        assert_eq!(state.phase, GamePhase::Clearing);
        assert!(state.targets.is_empty());

        let clearing = state.tuning.ticks_for(state.tuning.capture_removal_ms);
        let advancing = state.tuning.ticks_for(state.tuning.level_clear_delay_ms);
        run_phases(&mut state, clearing);
        assert_eq!(state.phase, GamePhase::Advancing);
        run_phases(&mut state, advancing - 1);
        assert_eq!(state.phase, GamePhase::Advancing);
        run_phases(&mut state, 1);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 1);
        let names: Vec<_> = state.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["C"]);

        hit(&mut state, "C");
        state.drain_events();
        run_phases(&mut state, clearing + advancing);
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.drain_events().contains(&GameEvent::Victory));
        assert!(!state.request_throw(Vec2::ZERO));
    }

    #[test]
    fn test_empty_level_is_skipped() {
        let mut state = GameState::new(Tuning::with_levels([vec!["A"], vec![], vec!["C"]]), 42);
        let clearing = state.tuning.ticks_for(state.tuning.capture_removal_ms);
        let advancing = state.tuning.ticks_for(state.tuning.level_clear_delay_ms);

        hit(&mut state, "A");
        state.drain_events();
        run_phases(&mut state, clearing + advancing);
        assert_eq!(state.level_index, 1);
        assert!(state.targets.is_empty());
        assert_eq!(state.phase, GamePhase::Clearing);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelCleared { level: 1 })
        );

        run_phases(&mut state, clearing + advancing);
        assert_eq!(state.level_index, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        hit(&mut state, "C");
        run_phases(&mut state, clearing + advancing);
        assert_eq!(state.phase, GamePhase::Victory);
    }

    #[test]
    fn test_empty_first_level_still_progresses() {
        let mut state = GameState::new(Tuning::with_levels([vec![], vec!["B"]]), 7);
        assert_eq!(state.phase, GamePhase::Clearing);
        let clearing = state.tuning.ticks_for(state.tuning.capture_removal_ms);
        let advancing = state.tuning.ticks_for(state.tuning.level_clear_delay_ms);
        run_phases(&mut state, clearing + advancing);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.targets.len(), 1);
    }

    #[test]
    fn test_duplicate_names_do_not_grow_pokedex() {
        let mut state = GameState::new(Tuning::with_levels([vec!["A", "A"]]), 3);
        assert_eq!(state.total_targets(), 2);

        let first = state.targets[0].id;
        state.request_throw(Vec2::ZERO);
        state.resolve_projectile(ProjectileOutcome::Hit { target_id: first });
        assert_eq!(state.captured_count(), 1);

        let second = state.targets[0].id;
        state.request_throw(Vec2::ZERO);
        state.drain_events();
        state.resolve_projectile(ProjectileOutcome::Hit { target_id: second });
        assert_eq!(state.captured_count(), 1);

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::TargetCaptured {
                new_entry: false,
                ..
            }
        )));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::PokedexChanged { .. }))
        );
    }

    #[test]
    fn test_unknown_target_only_releases_guard() {
        let mut state = two_level_state();
        state.request_throw(Vec2::ZERO);
        state.resolve_projectile(ProjectileOutcome::Hit { target_id: 9999 });
        assert!(!state.throw_in_flight);
        assert_eq!(state.targets.len(), 2);
        assert_eq!(state.captured_count(), 0);
    }

    #[test]
    fn test_miss_releases_guard_without_capture() {
        let mut state = two_level_state();
        state.request_throw(Vec2::ZERO);
        state.resolve_projectile(ProjectileOutcome::Missed);
        assert!(!state.throw_in_flight);
        assert_eq!(state.captured_count(), 0);
        assert_eq!(state.targets.len(), 2);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = two_level_state();
        hit(&mut state, "A");
        hit(&mut state, "B");
        run_phases(&mut state, 200);
        hit(&mut state, "C");
        run_phases(&mut state, 200);
        assert_eq!(state.phase, GamePhase::Victory);

        state.drain_events();
        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.captured_count(), 0);
        assert!(!state.throw_in_flight);
        assert!(state.pending_despawns.is_empty());
        let mut names: Vec<_> = state.targets.iter().map(|t| t.name.clone()).collect();
        names.sort();
        assert_eq!(names, ["A", "B"]);

        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::Restarted));
        assert!(events.contains(&GameEvent::PokedexChanged {
            captured: 0,
            total: 3
        }));
    }
}
