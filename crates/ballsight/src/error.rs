//! Invocation-fatal detection errors.
//!
//! Configuration problems that only weaken a single filter stage are
//! downgraded with a warning instead of surfacing here; the error type
//! covers the cases where no candidate can be scored at all.

/// Detection failure for one invocation.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The configured ball color label resolves to no channel, so the
    /// region list cannot be interpreted.
    #[error("unknown ball color label '{label}'")]
    UnknownBallColor {
        /// The unresolvable label as configured.
        label: String,
    },
}
