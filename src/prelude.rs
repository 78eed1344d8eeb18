pub use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

pub use nix::{errno::Errno, unistd::Pid};

pub const STDIN: RawFd = nix::libc::STDIN_FILENO;
pub const STDOUT: RawFd = nix::libc::STDOUT_FILENO;
