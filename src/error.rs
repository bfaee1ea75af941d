use thiserror::Error;

/// The error taxonomy exposed by every [`crate::Tree`] operation.
///
/// Each variant maps onto one of the POSIX-flavoured codes a C caller of
/// this protocol would expect (see the crate-level docs), but nothing here
/// is actually POSIX: these are just names for the handful of ways a tree
/// operation can fail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// The path string is malformed: empty, missing leading/trailing `/`,
    /// an over-long or empty segment, or a segment with disallowed
    /// characters.
    #[error("invalid path")]
    InvalidPath,
    /// Some prefix of the path does not name an existing folder.
    #[error("no such folder")]
    NotFound,
    /// `create`/`move` targeted a name that is already bound.
    #[error("folder already exists")]
    Exists,
    /// `remove` targeted a folder that still has children, or that has a
    /// writer (a concurrent `create`) currently waiting to mutate it.
    #[error("folder is not empty")]
    NotEmpty,
    /// The root folder ("/") was the target of an operation that forbids
    /// it (`remove("/")`, `move_path` with `source == "/"`).
    #[error("operation not permitted on the root folder")]
    Busy,
    /// `move_path(source, target)` was called with `target` a strict
    /// descendant of `source`.
    #[error("cannot move a folder into its own subtree")]
    MoveIntoOwnSubtree,
}

impl TreeError {
    /// Returns the POSIX-flavoured numeric code used by the C ancestor of
    /// this protocol (see `SPEC_FULL.md` §6), for callers that want a
    /// stable machine-readable code rather than matching on the enum.
    pub const fn code(self) -> i32 {
        match self {
            TreeError::InvalidPath => libc_like::EINVAL,
            TreeError::NotFound => libc_like::ENOENT,
            TreeError::Exists => libc_like::EEXIST,
            TreeError::NotEmpty => libc_like::ENOTEMPTY,
            TreeError::Busy => libc_like::EBUSY,
            TreeError::MoveIntoOwnSubtree => -1,
        }
    }
}

/// Small, dependency-free stand-ins for the `errno.h` constants the
/// original protocol returns. Values match Linux's `errno.h`.
mod libc_like {
    pub const EINVAL: i32 = 22;
    pub const ENOENT: i32 = 2;
    pub const EEXIST: i32 = 17;
    pub const EBUSY: i32 = 16;
    pub const ENOTEMPTY: i32 = 39;
}

pub type TreeResult<T> = Result<T, TreeError>;
