use std::collections::VecDeque;

/// Longest partial line kept while waiting for a newline.
const MAX_PENDING: usize = 4096;

/// Buffers serial bytes and hands out complete, trimmed ASCII lines.
///
/// Non-ASCII bytes are dropped. A run of bytes longer than [`MAX_PENDING`]
/// without a newline is discarded as noise.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    ready: VecDeque<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer {
            pending: Vec::with_capacity(256),
            ready: VecDeque::new(),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                let line: String = self.pending.iter().map(|&c| c as char).collect();
                self.pending.clear();
                self.ready.push_back(line.trim().to_string());
            } else if b.is_ascii() {
                if self.pending.len() >= MAX_PENDING {
                    self.pending.clear();
                }
                self.pending.push(b);
            }
        }
    }

    /// Next complete line, in arrival order
    pub fn pop_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.ready.clear();
    }
}
