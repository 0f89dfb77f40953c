//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::agent::{
    GhostMode, GhostView, choose_heading, first_exit, is_blocked, is_dead_end, is_intersection,
};
use super::collision::{can_move, touches};
use super::maze::{Cell, Direction};
use super::state::{GameEvent, GamePhase, GameState, Ghost, Position, Power, PowerKind, Session};
use crate::consts::*;
use crate::settings::Settings;
use crate::{cell_center, cell_origin};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction pressed this tick
    pub direction: Option<Direction>,
    /// Start / pause / resume / reset (space)
    pub confirm: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    match state.phase {
        GamePhase::Loading => {
            if input.confirm {
                start_session(state);
            }
        }
        GamePhase::Running => {
            if state.session.is_none() {
                log::warn!("Running without a session, resetting");
                state.reset();
                return;
            }
            if input.confirm {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
            state.time_ticks += 1;
            run(state, input);
        }
        GamePhase::Paused => {
            if state.session.is_none() {
                log::warn!("Paused without a session, resetting");
                state.reset();
            } else if input.confirm {
                state.phase = GamePhase::Running;
                log::info!("Resumed at tick {}", state.time_ticks);
            }
        }
        GamePhase::GameOver => {
            if input.confirm {
                log::info!("Run discarded, back to title");
                state.reset();
            }
        }
    }
}

fn start_session(state: &mut GameState) {
    let session = Session::spawn(&state.settings, &mut state.rng);
    log::info!(
        "New run (seed {}): player at column {}, {} ghosts, {} powers",
        state.seed,
        session.pacman.position.col,
        session.ghosts.len(),
        session.powers.len()
    );
    state.session = Some(session);
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::GameStart);
}

/// One Running tick
fn run(state: &mut GameState, input: &TickInput) {
    let GameState {
        rng,
        settings,
        phase,
        time_ticks,
        session,
        events,
        ..
    } = state;
    let Some(session) = session.as_mut() else {
        return;
    };
    let now = *time_ticks;

    if let Some(until) = session.invincible_until {
        if now >= until {
            session.invincible_until = None;
            events.push(GameEvent::InvincibilityEnded);
        }
    }

    if session.lives < 1 {
        *phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
        log::info!("Game over with score {}", session.score);
        return;
    }

    scroll_window(session, settings, rng);
    move_player(session, settings, input, events);
    collect_powers(session, settings, now, rng, events);
    ghost_contacts(session, settings, rng, events);
    move_ghosts(session, settings, rng);
}

/// Drop rows behind the player once it nears the top of the window
fn scroll_window<R: Rng + ?Sized>(session: &mut Session, settings: &Settings, rng: &mut R) {
    if session.pacman.position.row < settings.scroll_threshold_row() {
        return;
    }

    let shift = settings.compact_rows;
    session.maze.compact(shift);
    let wanted = VIEW_ROWS + settings.min_buffer_rows;
    if session.maze.rows() < wanted {
        let grow = settings.grow_rows.max(wanted - session.maze.rows());
        session.maze.grow_by(grow, rng);
        log::debug!("Maze grew by {grow} rows to {}", session.maze.rows());
    }

    session.pacman.position.shift_down(shift);
    session.scroll_offset = (session.scroll_offset - shift as f32 * CELL_SIZE).max(0.0);

    // Anything pushed off the bottom reappears near the top of the window
    let base = VIEW_ROWS - shift;
    for power in &mut session.powers {
        if !power.position.shift_down(shift) {
            let col = rng.random_range(0..COLUMNS);
            let row = base + rng.random_range(0..shift);
            *power = Power::new(col, row, power.kind);
        }
    }
    for ghost in &mut session.ghosts {
        if !ghost.position.shift_down(shift) {
            let col = rng.random_range(0..COLUMNS);
            let row = base + rng.random_range(0..shift);
            let heading = session
                .maze
                .cell(row, col)
                .map(first_exit)
                .unwrap_or(Direction::North);
            *ghost = Ghost::new(col, row, ghost.kind, heading);
        }
    }

    log::debug!(
        "Scrolled {shift} rows, maze head now at absolute row {}",
        session.maze.head_index()
    );
}

fn move_player(
    session: &mut Session,
    settings: &Settings,
    input: &TickInput,
    events: &mut Vec<GameEvent>,
) {
    let position = session.pacman.position;
    let cell = session.cell_at(position.cell());
    let center = cell_center(position.col, position.row);

    if !cell.visited {
        let offset = (center - position.pos).abs();
        if offset.x < HITBOX_HALF && offset.y < HITBOX_HALF {
            if let Some(cell) = session.maze.cell_mut(position.row, position.col) {
                cell.visited = true;
            }
            session.score += 1;
            events.push(GameEvent::Chomp);
        }
    }

    if let Some(dir) = input.direction {
        session.intent.request(dir);
    }
    let heading = session.intent.resolve(&cell);

    let player = &mut session.pacman.position;
    let aligned = if heading.is_vertical() {
        player.pos.x == center.x
    } else {
        player.pos.y == center.y
    };
    if aligned {
        player.direction = heading;
    }

    advance(player, settings.player_speed, &cell);

    // Camera only ever follows upward
    session.scroll_offset = session.scroll_offset.max(player.pos.y - SCROLL_ANCHOR);
}

fn collect_powers<R: Rng + ?Sized>(
    session: &mut Session,
    settings: &Settings,
    now: u64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let player = session.pacman.position;

    for power in &mut session.powers {
        let p = power.position;
        if !touches(player.pos, player.cell(), p.pos, p.cell(), settings.power_touch_radius) {
            continue;
        }

        match power.kind {
            PowerKind::Life => {
                // Left in place until a life can be granted
                if session.lives >= settings.max_lives {
                    continue;
                }
                session.lives += 1;
                events.push(GameEvent::CollectLife);
            }
            PowerKind::Invincibility => {
                // Restart, never extend
                session.invincible_until = Some(now + settings.invincibility_ticks);
                events.push(GameEvent::CollectPower);
            }
        }

        let (col, row) = ahead_of(p.row, settings, rng);
        *power = Power::new(col, row, power.kind);
    }
}

fn ghost_contacts<R: Rng + ?Sized>(
    session: &mut Session,
    settings: &Settings,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let player = session.pacman.position;
    let invincible = session.invincible_until.is_some();

    for ghost in &mut session.ghosts {
        let g = ghost.position;
        if !touches(player.pos, player.cell(), g.pos, g.cell(), settings.ghost_touch_radius) {
            continue;
        }

        if invincible {
            session.score += settings.ghost_bonus;
            events.push(GameEvent::EatGhost);
        } else {
            session.lives = session.lives.saturating_sub(1);
            events.push(GameEvent::LoseLife);
            log::debug!("Lost a life, {} left", session.lives);
        }

        let (col, row) = ahead_of(g.row, settings, rng);
        *ghost = Ghost::new(col, row, ghost.kind, Direction::North);
    }
}

fn move_ghosts<R: Rng + ?Sized>(session: &mut Session, settings: &Settings, rng: &mut R) {
    let player_cell = session.pacman.position.cell();
    let mode = if session.invincible_until.is_some() {
        GhostMode::Evasion
    } else {
        GhostMode::Pursuit
    };

    for ghost in &mut session.ghosts {
        let p = &mut ghost.position;
        // Ghosts above the visible window wait for the maze to scroll
        if p.row >= VIEW_ROWS {
            continue;
        }
        let walls = session.maze.cell(p.row, p.col).copied().unwrap_or(Cell::CLOSED);
        let view = GhostView {
            walls: &walls,
            cell: p.cell(),
            heading: p.direction,
            player_cell,
            row_limit: VIEW_ROWS,
            mode,
        };

        if is_intersection(&walls) {
            if p.is_centered() {
                p.direction = choose_heading(&view, rng);
            }
        } else if is_blocked(&walls, p.direction) || is_dead_end(&walls) {
            if p.is_centered() || !can_step(p, settings.ghost_speed, &walls) {
                p.direction = choose_heading(&view, rng);
            }
        }

        advance(p, settings.ghost_speed, &walls);
    }
}

/// Cell `band` rows up from `row`, a full window ahead
fn ahead_of<R: Rng + ?Sized>(row: usize, settings: &Settings, rng: &mut R) -> (usize, usize) {
    let band = settings.compact_rows;
    let col = rng.random_range(0..COLUMNS);
    let row = (row / band) * band + VIEW_ROWS + rng.random_range(0..band);
    (col, row)
}

fn step_target(position: &Position, speed: f32) -> Vec2 {
    let (dx, dy) = position.direction.delta();
    position.pos + Vec2::new(dx as f32, dy as f32) * speed
}

fn can_step(position: &Position, speed: f32, walls: &Cell) -> bool {
    can_move(HITBOX_HALF, step_target(position, speed), position.cell(), walls)
}

/// Move one step along the facing direction if the walls allow it, switching
/// cells once the leading edge crosses into the next one.
fn advance(position: &mut Position, speed: f32, walls: &Cell) -> bool {
    if !can_step(position, speed, walls) {
        return false;
    }
    let target = step_target(position, speed);
    position.pos = target;

    let origin = cell_origin(position.col, position.row);
    match position.direction {
        Direction::North if target.y + HITBOX_HALF > origin.y + CELL_SIZE => position.row += 1,
        Direction::South if target.y - HITBOX_HALF < origin.y => {
            position.row = position.row.saturating_sub(1)
        }
        Direction::East if target.x + HITBOX_HALF > origin.x + CELL_SIZE => position.col += 1,
        Direction::West if target.x - HITBOX_HALF < origin.x => {
            position.col = position.col.saturating_sub(1)
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::Wall;
    use crate::sim::state::GhostKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    /// Running state with no ghosts or powers on the board
    fn empty_board(seed: u64) -> GameState {
        let mut state = running(seed);
        let session = state.session.as_mut().unwrap();
        session.ghosts.clear();
        session.powers.clear();
        state
    }

    fn session(state: &mut GameState) -> &mut Session {
        state.session.as_mut().unwrap()
    }

    /// Direction of a single-cell step from `from` to `to`, if it is one
    fn step_between(from: (usize, usize), to: (usize, usize)) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| {
            let (dx, dy) = d.delta();
            from.0.checked_add_signed(dx) == Some(to.0)
                && from.1.checked_add_signed(dy) == Some(to.1)
        })
    }

    #[test]
    fn test_tick_loading_to_running() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Loading);

        // Tick without confirm - should stay in Loading
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Loading);
        assert!(state.session.is_none());

        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.events, vec![GameEvent::GameStart]);
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.lives, 5);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running(12345);
        tick(&mut state, &TickInput::default());

        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing moves while paused
        let frozen = serde_json::to_string(&state.snapshot()).unwrap();
        for _ in 0..10 {
            tick(&mut state, &TickInput { direction: Some(Direction::East), confirm: false });
        }
        assert_eq!(serde_json::to_string(&state.snapshot()).unwrap(), frozen);

        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_missing_session_resets_to_loading() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Running;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Loading);

        state.phase = GamePhase::Paused;
        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Loading);
    }

    #[test]
    fn test_last_life_lost_leads_to_game_over() {
        let mut state = empty_board(7);
        let s = session(&mut state);
        s.lives = 1;
        s.ghosts.push(Ghost {
            position: s.pacman.position,
            kind: GhostKind::Blinky,
        });

        tick(&mut state, &TickInput::default());
        assert_eq!(state.session.as_ref().unwrap().lives, 0);
        assert!(state.events.contains(&GameEvent::LoseLife));
        assert_eq!(state.phase, GamePhase::Running);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver]);

        // Frozen until reset, then back to the title with nothing left over
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        tick(&mut state, &confirm());
        assert_eq!(state.phase, GamePhase::Loading);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_invincible_ghost_contact_awards_bonus() {
        let mut state = empty_board(21);
        let s = session(&mut state);
        let start = s.pacman.position;
        s.powers.push(Power {
            position: start,
            kind: PowerKind::Invincibility,
        });
        s.ghosts.push(Ghost {
            position: start,
            kind: GhostKind::Inky,
        });
        let score = s.score;
        let lives = s.lives;

        tick(&mut state, &TickInput::default());

        let s = state.session.as_ref().unwrap();
        assert!(s.is_invincible());
        assert_eq!(s.score, score + 200);
        assert_eq!(s.lives, lives);
        assert!(s.ghosts[0].position.row >= VIEW_ROWS);
        assert_eq!(s.ghosts[0].position.direction, Direction::North);
        assert!(s.powers[0].position.row >= VIEW_ROWS);
        assert!(state.events.contains(&GameEvent::CollectPower));
        assert!(state.events.contains(&GameEvent::EatGhost));
    }

    #[test]
    fn test_invincibility_expires_once_and_restarts() {
        let mut state = empty_board(5);
        let s = session(&mut state);
        s.powers.push(Power {
            position: s.pacman.position,
            kind: PowerKind::Invincibility,
        });
        tick(&mut state, &TickInput::default());
        let armed_at = state.time_ticks;
        assert_eq!(
            state.session.as_ref().unwrap().invincible_until,
            Some(armed_at + 600)
        );
        session(&mut state).powers.clear();

        // Collecting again restarts the window instead of stacking
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        let s = session(&mut state);
        s.powers.push(Power {
            position: s.pacman.position,
            kind: PowerKind::Invincibility,
        });
        tick(&mut state, &TickInput::default());
        let rearmed_at = state.time_ticks;
        assert_eq!(
            state.session.as_ref().unwrap().invincible_until,
            Some(rearmed_at + 600)
        );
        session(&mut state).powers.clear();

        let mut ended = 0;
        for _ in 0..599 {
            tick(&mut state, &TickInput::default());
            ended += state.events.iter().filter(|e| **e == GameEvent::InvincibilityEnded).count();
        }
        assert!(state.session.as_ref().unwrap().is_invincible());
        assert_eq!(ended, 0);

        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
            ended += state.events.iter().filter(|e| **e == GameEvent::InvincibilityEnded).count();
        }
        assert!(!state.session.as_ref().unwrap().is_invincible());
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_life_power_respects_cap() {
        let mut state = empty_board(9);
        let s = session(&mut state);
        s.lives = 7;
        s.powers.push(Power {
            position: s.pacman.position,
            kind: PowerKind::Life,
        });
        let placed = s.powers[0];

        tick(&mut state, &TickInput::default());
        let s = session(&mut state);
        assert_eq!(s.lives, 7);
        assert_eq!(s.powers[0], placed);
        assert!(!state.events.contains(&GameEvent::CollectLife));

        let s = session(&mut state);
        s.lives = 6;
        s.powers[0].position = s.pacman.position;
        tick(&mut state, &TickInput::default());
        let s = state.session.as_ref().unwrap();
        assert_eq!(s.lives, 7);
        assert!(s.powers[0].position.row >= VIEW_ROWS);
        assert!(state.events.contains(&GameEvent::CollectLife));
    }

    #[test]
    fn test_scroll_threshold_compacts_and_shifts() {
        let mut state = empty_board(33);
        let s = session(&mut state);
        s.pacman.position = Position::at_cell(4, 16, Direction::North);
        s.ghosts.push(Ghost::new(1, 10, GhostKind::Pinky, Direction::North));
        s.ghosts.push(Ghost::new(2, 2, GhostKind::Clyde, Direction::North));
        s.powers.push(Power::new(3, 18, PowerKind::Life));
        s.powers.push(Power::new(5, 1, PowerKind::Invincibility));
        let rows_before = s.maze.window(0, s.maze.rows()).to_vec();
        assert_eq!(s.maze.head_index(), 0);

        tick(&mut state, &TickInput::default());

        let s = state.session.as_ref().unwrap();
        assert_eq!(s.maze.head_index(), 4);
        assert!(s.maze.rows() >= VIEW_ROWS + 4);
        let rows_after = s.maze.window(0, s.maze.rows());
        assert!(rows_after[0].iter().all(|c| !c.is_open(Direction::South)));
        // Surviving rows moved down unchanged (visited flags aside)
        for r in 1..rows_before.len() - 4 {
            for c in 0..COLUMNS {
                assert_eq!(rows_after[r][c].walls, rows_before[r + 4][c].walls);
            }
        }

        assert_eq!(s.pacman.position.row, 12);
        assert_eq!(s.ghosts[0].position.row, 6);
        assert!((VIEW_ROWS - 4..VIEW_ROWS).contains(&s.ghosts[1].position.row));
        assert_eq!(s.powers[0].position.row, 14);
        assert_eq!(s.powers[0].position.col, 3);
        assert!((VIEW_ROWS - 4..VIEW_ROWS).contains(&s.powers[1].position.row));
        assert_eq!(s.powers[1].kind, PowerKind::Invincibility);
    }

    #[test]
    fn test_player_visits_neighbour_cell() {
        let mut state = empty_board(77);
        let s = session(&mut state);
        let start = s.pacman.position;
        let exit = first_exit(&s.cell_at(start.cell()));
        let score = s.score;

        let mut chomps = 0;
        tick(&mut state, &TickInput { direction: Some(exit), confirm: false });
        // Stops short of the leading-edge switch into the cell after
        for _ in 0..34 {
            chomps += state.events.iter().filter(|e| **e == GameEvent::Chomp).count();
            tick(&mut state, &TickInput::default());
        }
        chomps += state.events.iter().filter(|e| **e == GameEvent::Chomp).count();

        let s = state.session.as_ref().unwrap();
        assert_ne!(s.pacman.position.cell(), start.cell());
        assert_eq!(s.pacman.position.direction, exit);
        assert!(s.cell_at(s.pacman.position.cell()).visited);
        assert_eq!(s.score, score + 1);
        assert_eq!(chomps, 1);
    }

    #[test]
    fn test_player_stops_at_closed_wall() {
        let mut state = empty_board(3);
        let s = session(&mut state);
        let start = s.pacman.position;
        // South of row 0 is always sealed
        s.pacman.position.direction = Direction::South;
        s.intent.heading = Direction::South;

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let s = state.session.as_ref().unwrap();
        assert_eq!(s.pacman.position.pos, start.pos);
        assert_eq!(s.pacman.position.cell(), start.cell());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical traces
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let mut trace1 = Vec::new();
        let mut trace2 = Vec::new();
        for i in 0..900 {
            let input = TickInput {
                confirm: i == 0,
                direction: match i % 97 {
                    10 => Some(Direction::East),
                    40 => Some(Direction::North),
                    70 => Some(Direction::West),
                    _ => None,
                },
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
            trace1.push(serde_json::to_string(&state1.snapshot()).unwrap());
            trace2.push(serde_json::to_string(&state2.snapshot()).unwrap());
        }

        assert_eq!(trace1, trace2);
        assert_eq!(state1.time_ticks, state2.time_ticks);
    }

    #[test]
    fn test_long_random_run_keeps_invariants() {
        let mut state = GameState::new(2024);
        let mut inputs = Pcg32::seed_from_u64(4048);

        for _ in 0..6000 {
            let direction = if inputs.random_bool(0.1) {
                Some(Direction::ALL[inputs.random_range(0..4)])
            } else {
                None
            };
            let confirm = matches!(state.phase, GamePhase::Loading | GamePhase::GameOver);
            tick(&mut state, &TickInput { direction, confirm });

            if let Some(s) = &state.session {
                let p = s.pacman.position;
                assert!(p.col < COLUMNS);
                assert!(p.row < s.maze.rows());
                assert!(p.row <= state.settings.scroll_threshold_row());
                assert!(s.maze.rows() >= VIEW_ROWS);
                assert!(s.lives <= state.settings.max_lives);
                for ghost in &s.ghosts {
                    assert!(ghost.position.col < COLUMNS);
                }
            }
        }
    }

    #[test]
    fn test_invalid_settings_still_step() {
        let mut state = GameState::with_settings(
            1,
            Settings {
                compact_rows: 0,
                ..Default::default()
            },
        );
        tick(&mut state, &confirm());
        let s = session(&mut state);
        s.ghosts.clear();
        s.powers.clear();
        s.powers.push(Power {
            position: s.pacman.position,
            kind: PowerKind::Invincibility,
        });

        tick(&mut state, &TickInput::default());
        let s = state.session.as_ref().unwrap();
        assert!(s.is_invincible());
        assert!(s.powers[0].position.row >= VIEW_ROWS);
    }

    #[test]
    fn test_ghost_turns_when_heading_is_blocked() {
        let mut state = empty_board(41);
        let s = session(&mut state);
        // Park the player against the sealed bottom edge
        s.pacman.position.direction = Direction::South;
        s.intent.heading = Direction::South;

        // Dead end at (4, 8), open only to the South
        let (col, row) = (4, 8);
        for (r, c, dir, wall) in [
            (row, col, Direction::North, Wall::Closed),
            (row + 1, col, Direction::South, Wall::Closed),
            (row, col, Direction::East, Wall::Closed),
            (row, col + 1, Direction::West, Wall::Closed),
            (row, col, Direction::West, Wall::Closed),
            (row, col - 1, Direction::East, Wall::Closed),
            (row, col, Direction::South, Wall::Open),
            (row - 1, col, Direction::North, Wall::Open),
        ] {
            s.maze.cell_mut(r, c).unwrap().set_wall(dir, wall);
        }
        s.ghosts.push(Ghost::new(col, row, GhostKind::Clyde, Direction::North));

        // East-west corridor at (4, 12), entered facing North
        let corridor = 12;
        for (r, c, dir, wall) in [
            (corridor, col, Direction::North, Wall::Closed),
            (corridor + 1, col, Direction::South, Wall::Closed),
            (corridor, col, Direction::South, Wall::Closed),
            (corridor - 1, col, Direction::North, Wall::Closed),
            (corridor, col, Direction::East, Wall::Open),
            (corridor, col + 1, Direction::West, Wall::Open),
            (corridor, col, Direction::West, Wall::Open),
            (corridor, col - 1, Direction::East, Wall::Open),
        ] {
            s.maze.cell_mut(r, c).unwrap().set_wall(dir, wall);
        }
        s.ghosts.push(Ghost::new(col, corridor, GhostKind::Inky, Direction::North));

        // One cell's travel at ghost speed
        for _ in 0..CELL_SIZE as usize {
            tick(&mut state, &TickInput::default());
        }

        let s = state.session.as_ref().unwrap();
        let dead_end = s.ghosts[0].position;
        assert_eq!(dead_end.direction, Direction::South);
        assert_eq!(dead_end.cell(), (col, row - 1));

        let corridor_ghost = s.ghosts[1].position;
        match corridor_ghost.direction {
            Direction::East => assert_eq!(corridor_ghost.cell(), (col + 1, corridor)),
            Direction::West => assert_eq!(corridor_ghost.cell(), (col - 1, corridor)),
            other => panic!("ghost left the corridor heading {other:?}"),
        }
    }

    #[test]
    fn test_cell_changes_only_through_open_walls() {
        let mut moves = 0;
        for seed in 0..8 {
            let mut state = GameState::new(seed);
            let mut inputs = Pcg32::seed_from_u64(seed + 100);

            for _ in 0..3000 {
                let direction = if inputs.random_bool(0.1) {
                    Some(Direction::ALL[inputs.random_range(0..4)])
                } else {
                    None
                };
                let confirm = matches!(state.phase, GamePhase::Loading | GamePhase::GameOver);
                let before = state
                    .session
                    .as_ref()
                    .filter(|_| state.phase == GamePhase::Running)
                    .map(|s| {
                        let ghosts: Vec<_> = s.ghosts.iter().map(|g| g.position.cell()).collect();
                        (s.maze.head_index(), s.pacman.position.cell(), ghosts)
                    });

                tick(&mut state, &TickInput { direction, confirm });

                let (Some((head, player, ghosts)), Some(s)) = (before, &state.session) else {
                    continue;
                };
                let shift = (s.maze.head_index() - head) as usize;
                let mut pairs = vec![(player, s.pacman.position.cell())];
                pairs.extend(ghosts.into_iter().zip(s.ghosts.iter().map(|g| g.position.cell())));

                for ((col, row), to) in pairs {
                    // Pushed off the bottom and respawned
                    let Some(row) = row.checked_sub(shift) else {
                        continue;
                    };
                    let from = (col, row);
                    if from == to {
                        continue;
                    }
                    // Anything further than one cell was relocated
                    let Some(dir) = step_between(from, to) else {
                        continue;
                    };
                    assert!(
                        s.cell_at(from).is_open(dir),
                        "seed {seed}: {from:?} -> {to:?} through a closed wall"
                    );
                    moves += 1;
                }
            }
        }
        assert!(moves > 100, "only {moves} cell changes observed");
    }
}
