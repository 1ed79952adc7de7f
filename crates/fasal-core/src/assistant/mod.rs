//! Farming question answering: a remote advisor with an offline guide behind it.

pub mod guide;
pub mod remote;
pub mod session;

pub use guide::{GuideEntry, OfflineGuide, Season};
pub use remote::{GeminiAdvisor, RemoteAdvisor};
pub use session::{
    Assistant, ChatReply, ChatState, Connectivity, ReplySource, TurnOutcome,
    DEFAULT_REMOTE_TIMEOUT, OFFLINE_SWITCH_NOTE,
};
