//! FIFO of host input commands, consumed once per frame.
//!
//! Key properties:
//! - Commands are applied in arrival order.
//! - Optional coalescing replaces the newest pending command when it is
//!   superseded by the incoming one (e.g. consecutive pointer moves).
//! - Optional backpressure via a maximum pending length. A full queue rejects
//!   the push instead of dropping queued commands.

use std::collections::VecDeque;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommandQueueFull {
    pub max_len: usize,
}

#[derive(Debug)]
pub struct CommandQueue<T> {
    items: VecDeque<T>,
    max_len: Option<usize>,
}

impl<T> Default for CommandQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            max_len: None,
        }
    }
}

impl<T> CommandQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn try_push(&mut self, cmd: T) -> Result<(), CommandQueueFull> {
        if let Some(max_len) = self.max_len
            && self.items.len() >= max_len
        {
            return Err(CommandQueueFull { max_len });
        }
        self.items.push_back(cmd);
        Ok(())
    }

    /// Push `cmd`, replacing the newest pending command if `supersedes(newest, &cmd)`.
    pub fn push_coalescing<F>(&mut self, cmd: T, supersedes: F) -> Result<(), CommandQueueFull>
    where
        F: Fn(&T, &T) -> bool,
    {
        if let Some(last) = self.items.back_mut()
            && supersedes(last, &cmd)
        {
            *last = cmd;
            return Ok(());
        }
        self.try_push(cmd)
    }

    /// Take every pending command in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandQueue, CommandQueueFull};

    #[derive(Debug, PartialEq)]
    enum Cmd {
        Move(i32),
        Down,
    }

    fn is_move(a: &Cmd, b: &Cmd) -> bool {
        matches!((a, b), (Cmd::Move(_), Cmd::Move(_)))
    }

    #[test]
    fn drains_in_arrival_order() {
        let mut q = CommandQueue::new();
        q.try_push("a").unwrap();
        q.try_push("b").unwrap();
        let got: Vec<_> = q.drain().collect();
        assert_eq!(got, vec!["a", "b"]);
        assert!(q.is_empty());
    }

    #[test]
    fn coalesces_consecutive_moves_only() {
        let mut q = CommandQueue::new();
        q.push_coalescing(Cmd::Move(1), is_move).unwrap();
        q.push_coalescing(Cmd::Move(2), is_move).unwrap();
        q.push_coalescing(Cmd::Down, is_move).unwrap();
        q.push_coalescing(Cmd::Move(3), is_move).unwrap();
        let got: Vec<_> = q.drain().collect();
        assert_eq!(got, vec![Cmd::Move(2), Cmd::Down, Cmd::Move(3)]);
    }

    #[test]
    fn backpressure_rejects_when_full() {
        let mut q = CommandQueue::with_max_len(1);
        assert!(q.try_push(1).is_ok());
        assert_eq!(q.try_push(2), Err(CommandQueueFull { max_len: 1 }));
        assert_eq!(q.len(), 1);
    }
}
