mod auth;
mod job;
mod rebuild;

pub use auth::TokenManager;
pub use job::JobOutcome;
pub use job::ReconstructionJob;
pub use rebuild::PlaylistRebuilder;
pub use rebuild::RebuildOutcome;
