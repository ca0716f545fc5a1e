//! Fixed timestep simulation tick
//!
//! One tick runs the components in a fixed order:
//! input → player body → floors → collision → combo → difficulty → game over.

use super::collision::{self, Contact};
use super::state::{GameEvent, GameOverReason, GamePhase, GameState, HorizontalIntent};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction
    pub direction: HorizontalIntent,
    /// Jump pressed this tick (edge, not level)
    pub jump: bool,
    /// Restart pressed this tick
    pub restart: bool,
    /// Idle/demo mode - the bot climbs on its own
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        if input.restart || input.jump {
            state.restart();
        }
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autoplay(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    let tuning = &state.tuning;

    // Player intent
    state
        .player
        .apply_horizontal_intent(input.direction, dt, tuning);
    if input.jump && state.player.apply_jump(tuning) {
        state.stats.jumps += 1;
        state.events.push(GameEvent::Jumped {
            floor: state.player.current_floor,
            momentum: state.player.momentum(),
        });
    }

    // Descending floors carry a standing player with them
    let drop = state.difficulty.descent_speed * dt;
    if drop > 0.0 {
        state.floors.descend(drop);
        if state.player.on_ground {
            state.player.pos.y += drop;
        }
    }
    let prev_bottom = state.player.bottom();

    state.player.integrate(dt, state.wall_mode, tuning);

    let previous_floor = state.player.current_floor;
    let outcome = collision::resolve(
        &mut state.player,
        prev_bottom,
        &state.floors,
        state.difficulty.descent_speed,
        dt,
        state.wall_mode,
        tuning,
    );

    match outcome.contact {
        Contact::Landed { floor } => {
            state.events.push(GameEvent::Landed {
                floor,
                delta: floor as i64 - previous_floor as i64,
            });
            state.combo.on_landing(
                floor,
                previous_floor,
                &mut state.stats,
                tuning,
                &mut state.events,
            );
        }
        Contact::Standing { .. } | Contact::Airborne => {
            state
                .combo
                .advance(dt, &mut state.stats, tuning, &mut state.events);
        }
    }

    state
        .difficulty
        .update(dt, state.stats.highest_floor, tuning, &mut state.events);

    // Keep the tracked window ahead of the climb and trimmed behind the view
    state
        .floors
        .ensure_generated_ahead(state.stats.highest_floor, tuning);
    state.camera.update(state.player.top(), dt);
    let lowest = state
        .floors
        .lowest_tracked_index(state.camera.bottom() + tuning.prune_margin);
    state.floors.prune_behind(lowest);
    state.stats.elapsed = state.difficulty.elapsed;

    if state.player.top() > state.camera.bottom() {
        let reason = if outcome.pushed || state.player.on_ground {
            GameOverReason::Swept
        } else {
            GameOverReason::Fell
        };
        state.phase = GamePhase::GameOver;
        state.game_over_reason = Some(reason);
        log::info!(
            "Game over ({:?}): floor {}, score {}",
            reason,
            state.stats.highest_floor,
            state.stats.score
        );
        state.events.push(GameEvent::GameOver {
            reason,
            stats: state.stats.clone(),
        });
    }
}

/// Demo bot: run flat out (letting the walls turn it around) and jump
/// whenever momentum is nearly full
fn autoplay(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    input.direction = if player.vel.x < 0.0 {
        HorizontalIntent::Left
    } else {
        HorizontalIntent::Right
    };
    input.jump = player.on_ground && player.momentum_ratio(&state.tuning) >= 0.9;
}
