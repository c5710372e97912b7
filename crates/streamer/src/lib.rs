//! Replays static CSV files as a stream of one-line output files.
//!
//! Every line of every matching source file becomes its own file in the
//! destination directory, with a fixed pause between writes.

pub mod config;
pub mod emitter;
pub mod error;
pub mod lines;
pub mod naming;
pub mod pacer;

pub use config::{CounterMode, FieldPolicy, MalformedPolicy, StreamConfig};
pub use emitter::{EmitSummary, LineEmitter};
pub use error::{Result, StreamError};
pub use lines::LineReader;
pub use pacer::{FixedInterval, Pacer};
