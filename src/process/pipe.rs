use nix::{fcntl::OFlag, unistd::pipe2};

use crate::prelude::*;

/// Both ends of one inter-stage pipe.
///
/// Created close-on-exec; `dup2` onto a standard descriptor clears the flag
/// on the copy, so an exec'd program only ever sees the end it was wired to.
#[derive(Debug)]
pub struct PipeEndpoint {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl PipeEndpoint {
    pub fn open() -> Result<Self, Errno> {
        let (read, write) = pipe2(OFlag::O_CLOEXEC)?;

        // SAFETY: pipe2 just handed us these descriptors and nothing else owns them
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(read), OwnedFd::from_raw_fd(write)) };

        Ok(Self { read, write })
    }
}

/// Pipes indexed by boundary. Boundary `k` connects stage `k` to stage `k + 1`.
#[derive(Debug, Default)]
pub struct Boundaries {
    pipes: Vec<Option<PipeEndpoint>>,
}

impl Boundaries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pipes: Vec::with_capacity(capacity),
        }
    }

    pub fn open(&mut self, boundary: usize) -> Result<(), Errno> {
        let pipe = PipeEndpoint::open()?;

        trace!(
            boundary,
            read = pipe.read.as_raw_fd(),
            write = pipe.write.as_raw_fd(),
            "opened pipe"
        );

        if self.pipes.len() <= boundary {
            self.pipes.resize_with(boundary + 1, || None);
        }
        self.pipes[boundary] = Some(pipe);

        Ok(())
    }

    pub fn take(&mut self, boundary: usize) -> Option<PipeEndpoint> {
        self.pipes.get_mut(boundary).and_then(Option::take)
    }

    pub fn close(&mut self, boundary: usize) {
        if self.take(boundary).is_some() {
            trace!(boundary, "closed pipe");
        }
    }

    pub fn close_all(&mut self) {
        self.pipes.clear();
    }

    pub fn open_count(&self) -> usize {
        self.pipes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.open_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs::File,
        io::{Read, Write},
    };

    use super::*;

    #[test]
    fn endpoints_are_connected() {
        let PipeEndpoint { read, write } = PipeEndpoint::open().unwrap();

        let mut write = File::from(write);
        write.write_all(b"through the pipe").unwrap();
        drop(write);

        let mut buf = String::new();
        File::from(read).read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "through the pipe");
    }

    #[test]
    fn boundaries_grow_and_release() {
        let mut boundaries = Boundaries::with_capacity(1);
        assert!(boundaries.is_empty());

        boundaries.open(0).unwrap();
        boundaries.open(2).unwrap();
        assert_eq!(boundaries.open_count(), 2);
        assert!(boundaries.take(1).is_none());

        assert!(boundaries.take(0).is_some());
        assert!(boundaries.take(0).is_none());

        boundaries.close(2);
        assert!(boundaries.is_empty());

        boundaries.open(1).unwrap();
        boundaries.close_all();
        assert!(boundaries.is_empty());
    }
}
