//! Record state decoding and relevance filtering.

mod decoder;
mod filter;
mod progress;
mod state;

pub use decoder::{
    DEFAULT_COMPLETION_VALUE, DecodedObjective, DecodedRecord, ObjectiveProgress, RecordInstance,
    declared_objective_hashes, decode_record, guess_weapon_type, parse_profile_records,
    required_hashes,
};
pub use filter::{MAX_CONTENT_MATCH_CHILDREN, RecordFilter, RelevanceMode};
pub use progress::overall_progress;
pub use state::{RecordState, bits};
