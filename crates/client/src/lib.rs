//! Blog/comment interaction core: repositories over the transport, the
//! form and delete-confirmation state machines, and the dashboard tying
//! them together.

pub mod blogs;
pub mod config;
pub mod console;
mod dashboard;
pub mod gate;
pub mod mvi;
pub mod thread;
pub mod workflow;

pub use blogs::BlogRepository;
pub use dashboard::Dashboard;
pub use gate::{Deleter, DeletionGate, GateState};
pub use thread::CommentThreadManager;
pub use workflow::{BlogDraft, EditWorkflow, FormState};
