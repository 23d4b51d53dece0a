//! Terminal sink abstraction.
//!
//! The flash engine streams protocol-level diagnostics through this trait;
//! the sink itself knows nothing about flashing. Frontends provide their
//! own rendering surface (stdout, a log widget, a file).

use std::sync::{Arc, Mutex};

pub trait Terminal {
    /// Discard all rendered text.
    fn clear(&mut self);

    /// Append `text` followed by a line break.
    fn write_line(&mut self, text: &str);

    /// Append `text` verbatim, no trailing break.
    fn write(&mut self, text: &str);
}

/// In-memory terminal backed by a shared buffer.
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// [`crate::FlashSession`] and inspect the output through another.
#[derive(Debug, Clone, Default)]
pub struct BufferTerminal {
    buffer: Arc<Mutex<String>>,
}

impl BufferTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().unwrap().clone()
    }
}

impl Terminal for BufferTerminal {
    fn clear(&mut self) {
        self.buffer.lock().unwrap().clear();
    }

    fn write_line(&mut self, text: &str) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.push_str(text);
        buffer.push('\n');
    }

    fn write(&mut self, text: &str) {
        self.buffer.lock().unwrap().push_str(text);
    }
}
