//! Line-oriented output streams
//!
//! An [`OutputStream`] is a cheaply cloneable handle to a shared writer plus
//! the column width renderers lay lines out against. The logger writes
//! pre-formatted text followed by a newline and flushes; it never opens or
//! closes the underlying stream.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct OutputStream {
    name: String,
    writer: SharedWriter,
    columns: Option<usize>,
}

impl OutputStream {
    /// Process stdout; columns come from the terminal when attached to one
    pub fn stdout() -> Self {
        let columns = if io::stdout().is_terminal() {
            terminal_columns()
        } else {
            None
        };
        Self::from_writer("stdout", io::stdout(), columns)
    }

    /// Process stderr; columns come from the terminal when attached to one
    pub fn stderr() -> Self {
        let columns = if io::stderr().is_terminal() {
            terminal_columns()
        } else {
            None
        };
        Self::from_writer("stderr", io::stderr(), columns)
    }

    /// An in-memory stream and a handle for reading back what was written
    pub fn memory() -> (Self, MemoryBuffer) {
        let buffer = MemoryBuffer::default();
        let stream = Self::from_writer("memory", buffer.clone(), None);
        (stream, buffer)
    }

    /// Append to the file at `path`, creating it when missing
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "open",
                    format!("cannot open output file {}", path.display()),
                    e,
                )
            })?;
        Ok(Self::from_writer(
            path.display().to_string(),
            io::BufWriter::new(file),
            None,
        ))
    }

    pub fn from_writer<W>(name: impl Into<String>, writer: W, columns: Option<usize>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name: name.into(),
            writer: Arc::new(Mutex::new(Box::new(writer))),
            columns,
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Option<usize>) -> Self {
        self.columns = columns;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> Option<usize> {
        self.columns
    }

    /// Write `text` plus a trailing newline, then flush
    pub fn write_line(&self, text: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush())
            .map_err(|e| LoggerError::io_operation("write", format!("failed writing to {}", self.name), e))
    }

    /// Whether both handles write to the same sink
    pub fn same_as(&self, other: &OutputStream) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish()
    }
}

fn terminal_columns() -> Option<usize> {
    crossterm::terminal::size()
        .ok()
        .map(|(columns, _)| columns as usize)
        .filter(|&columns| columns > 0)
}

/// Shared byte buffer behind [`OutputStream::memory`]
#[derive(Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Written text split into lines, without the trailing newline
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBuffer")
            .field("len", &self.bytes.lock().len())
            .finish()
    }
}
