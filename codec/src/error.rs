//! Error types for codec operations

use crate::kind::Kind;
use thiserror::Error;

/// Boxed error returned by user-supplied handlers and marshal implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    Truncated,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("target is not settable: {0}")]
    NotSettable(&'static str),
    #[error("map key of kind {0:?} is not comparable")]
    NotComparable(Kind),
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),
    #[error("invalid kind: {0}")]
    InvalidKind(u64),
    #[error("no kind registered for {0}")]
    Unregistered(&'static str),
    #[error("kind mismatch: expected {expected:?}, found {found:?}")]
    Mismatch { expected: Kind, found: Kind },
    #[error("invalid bool")]
    InvalidBool,
    #[error("invalid value in {0}: {1}")]
    InvalidValue(&'static str, String), // context, message
    #[error("absent value outside of an elidable position")]
    Absent,
    #[error("unknown tag {0} for {1}")]
    UnknownTag(u64, &'static str), // tag, type
    #[error("invalid length: {0}")]
    InvalidLength(u64),
    #[error("too many zero-sized elements: {0}")]
    ZeroSizedExceeded(usize),
    #[error("depth exceeded: {0}")]
    DepthExceeded(usize),
    #[error("value cannot be projected into {0}")]
    Projection(&'static str),
}
