pub mod close_guard;
pub mod controller;
pub mod countdown;
pub mod schedule;
pub mod session;
pub mod unlock;
pub mod window;

pub use controller::{CloseDecision, FocusController, FocusEvent, FocusState, ModeSwitch};
pub use session::FocusSession;
pub use unlock::UnlockOutcome;
pub use window::{TerminalWindow, WindowControl};
