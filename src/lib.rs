pub mod analysis;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod sparring;

pub use analysis::{AnalysisMode, AnalysisOutcome, AnalysisReport, Analyzer, AnalyzerConfig};
pub use error::InvalidInput;
pub use io::{
    HumanReport, SegmentConfig, SessionReport, format_outcome, load_transcript,
    parse_deepgram_file, parse_deepgram_json,
};
pub use models::{
    AnalysisInput, DebateContext, FeedbackItem, MotionBrief, Role, SessionAggregates,
    StructureElement, Utterance, builtin_motions, find_motion,
};
pub use session::{
    ConsoleSpeaker, LineSource, LiveConfig, PracticeSession, Speaker, TranscriptSource, replay,
    run_live, seeded_rng,
};
pub use sparring::{SparringConfig, SparringPartner, debate_score};
