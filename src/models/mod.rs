pub mod context;
pub mod deepgram;
pub mod features;
pub mod feedback;
pub mod scores;
pub mod session;
pub mod topic;
pub mod utterance;

pub use context::*;
pub use deepgram::*;
pub use features::*;
pub use feedback::*;
pub use scores::*;
pub use session::*;
pub use topic::*;
pub use utterance::*;
