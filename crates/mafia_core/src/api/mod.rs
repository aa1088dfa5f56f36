pub mod engine_api;
pub mod types;


pub use engine_api::{
    engine_input_schema, load_game, load_game_json, new_game, new_game_json, resolve_game,
    resolve_game_json, validate_input,
};
pub use types::{ApiError, EngineInput, EngineOptions, EngineResult};
