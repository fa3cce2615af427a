//! grid-rover: a terminal robot scripting sandbox.
//!
//! A line-oriented script (`MOVE_FORWARD`, `TURN_LEFT`, `WHILE`, `IF`, ...)
//! drives a robot across a cube-grid terrain. The engine compiles the script
//! into a flat instruction list and executes it cooperatively: the host calls
//! `Executor::step` once per frame, and each instruction's effect is
//! amortized over a fixed 1-second window so motion stays smooth at any
//! frame rate.
//!
//! - `engine`: compiler, opcode table, control-flow resolver, executor
//! - `world`: world query interface and the grid world that implements it
//! - `renderer`: pure world-snapshot to cell-grid rasterizer
//! - `player`: crossterm frame loop, map view, and script trace

pub mod engine;
pub mod player;
pub mod renderer;
pub mod types;
pub mod world;
