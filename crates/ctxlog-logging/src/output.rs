//! Output sinks for rendered log records.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, clonable destination for rendered records.
///
/// Writes are serialized through a mutex so records emitted along one
/// logger chain reach the sink in call order. Write failures are swallowed.
#[derive(Clone)]
pub struct LogOutput {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl LogOutput {
    /// Wrap any writer
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Standard error, the backend default
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write one complete record
    pub fn write_record(&self, record: &[u8]) {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if writer.write_all(record).is_ok() {
            let _ = writer.flush();
        }
    }
}

impl fmt::Debug for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogOutput")
    }
}

/// In-memory sink whose contents can be drained by another handle
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and return everything written so far
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of the current contents, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A `LogOutput` writing into this buffer
    pub fn output(&self) -> LogOutput {
        LogOutput::new(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_records_reach_shared_buffer() {
        let buffer = SharedBuffer::new();
        let output = buffer.output();

        output.write_record(b"one\n");
        output.write_record(b"two\n");

        assert_eq!(buffer.contents(), "one\ntwo\n");
    }

    #[test]
    fn test_take_drains_buffer() {
        let buffer = SharedBuffer::new();
        buffer.output().write_record(b"abc");

        assert_eq!(buffer.take(), b"abc".to_vec());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let output = LogOutput::new(FailingWriter);
        output.write_record(b"lost\n");
    }
}
