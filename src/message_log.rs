//! Accumulate-and-drain buffer for vehicle status text

use parking_lot::Mutex;

/// Status text accumulated between snapshots.
///
/// Each appended line is terminated with `\n`. [`MessageLog::drain`] hands the
/// accumulated text to exactly one reader.
#[derive(Debug, Default)]
pub struct MessageLog {
    buffer: Mutex<String>,
}

impl MessageLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of text.
    pub fn append(&self, text: &str) {
        let mut buffer = self.buffer.lock();
        buffer.push_str(text);
        buffer.push('\n');
    }

    /// Take everything appended since the last drain.
    pub fn drain(&self) -> String {
        std::mem::take(&mut *self.buffer.lock())
    }

    /// Whether there is undrained text.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn drain_returns_lines_in_order() {
        let log = MessageLog::new();
        log.append("a");
        log.append("b");
        assert_eq!(log.drain(), "a\nb\n");
    }

    #[test]
    fn second_drain_is_empty() {
        let log = MessageLog::new();
        log.append("PreArm: Battery low");
        assert_eq!(log.drain(), "PreArm: Battery low\n");
        assert_eq!(log.drain(), "");
        assert!(log.is_empty());
    }

    #[test]
    fn appends_after_drain_start_fresh() {
        let log = MessageLog::new();
        log.append("first");
        let _ = log.drain();
        log.append("second");
        assert_eq!(log.drain(), "second\n");
    }

    #[test]
    fn concurrent_appends_are_never_lost() {
        let log = Arc::new(MessageLog::new());
        let handles: Vec<_> = (0..4)
            .map(|writer| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        log.append(&format!("w{writer}-{i}"));
                    }
                })
            })
            .collect();

        let mut collected = String::new();
        for handle in handles {
            collected.push_str(&log.drain());
            handle.join().unwrap();
        }
        collected.push_str(&log.drain());

        assert_eq!(collected.lines().count(), 400);
    }
}
