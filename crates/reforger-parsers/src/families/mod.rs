//! One module per event family.
//!
//! Line families expose a `classifier()` built from their tag patterns and
//! a `parse` function for the matched fields. The squad roster and the
//! server command log parse JSON and have their own classifier types.

pub mod ai_killed;
pub mod base_capture;
pub mod chat;
pub mod damage;
pub mod editor_action;
pub mod game_status;
pub mod gm_status;
pub mod player_joined;
pub mod player_killed;
pub mod server_command;
pub mod squad_list;
