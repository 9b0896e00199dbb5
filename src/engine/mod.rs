//! Typewriter engine
//!
//! Types and deletes an ordered list of phrases, one character per step,
//! looping forever. The engine is split in two:
//!
//! - [`advance`]: pure step function computing the next state and the
//!   delay before the following step
//! - [`EngineHandle`]: owns the single re-armed timer that drives
//!   `advance`, publishes [`Frame`]s, and cancels on stop or drop
//!
//! # Example
//!
//! ```no_run
//! use typewriter::config::TimingOverrides;
//! use typewriter::engine::EngineHandle;
//!
//! # async fn demo() -> Result<(), typewriter::error::InvalidConfiguration> {
//! let handle = EngineHandle::create(["Hi", "Go"], TimingOverrides::default())?;
//! let mut frames = handle.subscribe();
//! while frames.changed().await.is_ok() {
//!     println!("{}", frames.borrow_and_update().text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod handle;
pub mod state;
pub mod step;

pub use handle::{EngineHandle, Frame};
pub use state::{EngineState, Mode, PhraseList};
pub use step::advance;
