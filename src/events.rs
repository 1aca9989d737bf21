use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

/// Ring capacity for the `/events` feed; the oldest entries fall off first.
const EVENT_CAPACITY: usize = 500;
/// Warn once per this many dropped events rather than on every overflow.
const DROP_WARN_INTERVAL: u64 = 100;

#[derive(Serialize, Clone)]
pub struct GameEvent {
    pub name: String,
    pub data: serde_json::Value,
    pub frame: u64,
}

/// Bounded feed of notable game moments. Gameplay systems push into it and
/// the HTTP snapshot mirrors the tail out for `GET /events`.
#[derive(Resource, Default)]
pub struct GameEventBus {
    pub recent: VecDeque<GameEvent>,
    pub frame: u64,
    pub dropped_events: u64,
}

impl GameEventBus {
    pub fn emit(&mut self, name: &str, data: serde_json::Value) {
        if self.recent.len() == EVENT_CAPACITY {
            self.recent.pop_front();
            self.dropped_events += 1;
            if self.dropped_events % DROP_WARN_INTERVAL == 1 {
                warn!(
                    "[MazeRunner events] Event feed full; {} events dropped so far",
                    self.dropped_events
                );
            }
        }
        self.recent.push_back(GameEvent {
            name: name.to_string(),
            data,
            frame: self.frame,
        });
    }

    pub fn goal_reached(&mut self, clear_time: f32) {
        self.emit("goal_reached", serde_json::json!({ "clear_time": clear_time }));
    }

    pub fn maze_generated(&mut self, size: usize, path_length: Option<u32>, meets_standard: bool) {
        self.emit(
            "maze_generated",
            serde_json::json!({
                "size": size,
                "path_length": path_length,
                "meets_standard": meets_standard,
            }),
        );
    }
}

pub struct GameEventsPlugin;

impl Plugin for GameEventsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameEventBus::default()).add_systems(
            FixedUpdate,
            tick_event_frame.run_if(crate::game_runtime::gameplay_systems_enabled),
        );
    }
}

fn tick_event_frame(mut bus: ResMut<GameEventBus>) {
    bus.frame = bus.frame.saturating_add(1);
}
