//! Channel primitives connecting the relay's concurrent loops.
//!
//! - [`handoff`] is the unbuffered rendezvous between ingestion and the dispatcher. A sender
//!   only resumes once the dispatcher has taken its item, which provides backpressure without a
//!   queue.
//! - [`errors`] carries the single exit report of every supervised loop to the supervisor.

pub mod errors;
pub mod handoff;
