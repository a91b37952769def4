//! Headless demo driver
//!
//! Runs a full session at a fixed 60 fps timestep with a simple
//! ball-tracking paddle, saves the finished run into the local ledger and
//! prints the record table.
//!
//! Usage: `oheng-breakout [difficulty] [seed]`

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use oheng_breakout::records::{FileStore, RecordBook};
use oheng_breakout::sim::{Difficulty, GameEvent, GamePhase, GameState, TickInput, tick};
use oheng_breakout::ui::{NullSurface, StatusSink, publish_status, render};

const DT: f32 = 1.0 / 60.0;
/// Hard stop so a run can never loop forever (one hour of sim time)
const MAX_TICKS: u32 = 60 * 60 * 60;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    let mut state = GameState::new(seed);
    state.start_with_difficulty(difficulty);

    let mut book = RecordBook::load(FileStore::new("records"));
    let mut surface = NullSurface;
    let mut status = ConsoleStatus::default();

    for _ in 0..MAX_TICKS {
        let input = track_ball(&state);
        tick(&mut state, &input, DT);
        render(&state, &mut surface);
        publish_status(&state, &mut status);

        for event in state.drain_events() {
            if let GameEvent::RunEnded {
                outcome,
                difficulty,
                score,
                time,
            } = event
            {
                book.record_run(outcome, difficulty, score, time);
                println!(
                    "run over: {outcome:?} on {} with score {score} in {time:.1}s",
                    difficulty.as_str()
                );
            }
        }

        if state.phase == GamePhase::Over {
            break;
        }
    }

    println!("--- recent records ---");
    for record in book.latest(10) {
        println!(
            "{:>6} pts  {:>7.1}s  {:<7}  {:?}",
            record.score,
            record.time,
            record.difficulty.as_str(),
            record.outcome
        );
    }
}

/// Console scoreboard: reports score milestones and the final time
#[derive(Debug, Default)]
struct ConsoleStatus {
    score: u32,
    lives: u32,
    element: String,
}

impl StatusSink for ConsoleStatus {
    fn set_score(&mut self, score: u32) {
        if score != self.score {
            self.score = score;
            log::debug!("score {score}");
        }
    }

    fn set_lives(&mut self, lives: u32) {
        if lives != self.lives {
            self.lives = lives;
            log::info!("lives {lives}");
        }
    }

    fn set_element_label(&mut self, label: &str) {
        if label != self.element {
            self.element = label.to_string();
            log::debug!("paddle element {label}");
        }
    }

    fn set_timer(&mut self, _seconds: f32) {}

    fn set_final_time(&mut self, seconds: f32) {
        println!("final time: {seconds:.1}s");
    }
}

/// Keep the paddle under the lowest descending ball
fn track_ball(state: &GameState) -> TickInput {
    let target = state
        .balls
        .balls()
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| state.balls.balls().first())
        .map(|b| b.pos.x);

    let mut input = TickInput::default();
    if let Some(x) = target {
        let center = state.paddle.center_x();
        if x < center - 4.0 {
            input.move_left = true;
        } else if x > center + 4.0 {
            input.move_right = true;
        }
    }
    input
}
