pub mod create;
pub mod detail;
pub mod list;
pub mod scope;

pub use create::CreateScreen;
pub use detail::{DetailMode, DetailScreen};
pub use list::{ListScreen, ListState, ListView};
pub use scope::ScreenScope;

/// What a user action on a screen ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action completed and state was updated.
    Done,
    /// Validation failed; nothing was sent.
    Invalid,
    /// The request failed; state was left for the user to retry.
    Failed,
    /// The action does not apply in the current state or is already pending.
    Ignored,
    /// The screen was closed before the response arrived.
    Cancelled,
    /// The screen is finished and should be popped.
    Exit,
}
