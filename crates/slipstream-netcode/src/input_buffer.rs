//! Pending-input log for prediction and reconciliation
//!
//! Every movement command is tagged with a monotonically increasing
//! sequence number and retained here until the authority acknowledges it.
//! Reconciliation drops acknowledged entries and replays the rest.

use serde::{Deserialize, Serialize};
use slipstream_core::{Millis, Vec3};
use std::collections::VecDeque;

/// One movement command issued by the local player
///
/// `target = None` is a legal "stop" command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Monotonically increasing sequence number, starting at 1
    pub sequence: u64,
    /// Destination of the move, or `None` to halt
    pub target: Option<Vec3>,
    /// When the command was issued
    pub timestamp_ms: Millis,
}

/// Buffer of inputs sent to the authority but not yet acknowledged
///
/// Insertion order equals sequence order; acknowledged entries are
/// discarded from the front.
#[derive(Debug)]
pub struct InputBuffer {
    inputs: VecDeque<PlayerInput>,
    capacity: usize,
    last_acknowledged: u64,
}

impl InputBuffer {
    /// Create a new input buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            inputs: VecDeque::with_capacity(capacity),
            capacity,
            last_acknowledged: 0,
        }
    }

    /// Append an input to the log
    ///
    /// Returns `Err` if the buffer is full.
    pub fn push(&mut self, input: PlayerInput) -> crate::Result<()> {
        if self.inputs.len() >= self.capacity {
            return Err(crate::Error::InputBufferFull);
        }
        self.inputs.push_back(input);
        Ok(())
    }

    /// Drop every input with a sequence number at or below `sequence`
    ///
    /// The authority has already accounted for those.
    pub fn acknowledge(&mut self, sequence: u64) {
        if sequence > self.last_acknowledged {
            self.last_acknowledged = sequence;
        }
        while let Some(front) = self.inputs.front() {
            if front.sequence <= sequence {
                self.inputs.pop_front();
            } else {
                break;
            }
        }
    }

    /// Iterate over the unacknowledged inputs in sequence order
    pub fn iter(&self) -> impl Iterator<Item = &PlayerInput> {
        self.inputs.iter()
    }

    /// Sequence number of the newest pending input
    pub fn newest_sequence(&self) -> Option<u64> {
        self.inputs.back().map(|i| i.sequence)
    }

    /// Last sequence number the authority acknowledged
    pub fn last_acknowledged(&self) -> u64 {
        self.last_acknowledged
    }

    /// Number of pending inputs
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether no inputs are pending
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Discard all pending inputs
    pub fn clear(&mut self) {
        self.inputs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_input(sequence: u64) -> PlayerInput {
        PlayerInput {
            sequence,
            target: Some(Vec3::new(sequence as f64, 0.0, 0.0)),
            timestamp_ms: sequence as f64 * 16.0,
        }
    }

    #[test]
    fn test_push_and_order() {
        let mut buffer = InputBuffer::new(10);
        for seq in 1..=4 {
            buffer.push(make_input(seq)).unwrap();
        }

        assert_eq!(buffer.len(), 4);
        let sequences: Vec<u64> = buffer.iter().map(|i| i.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(buffer.newest_sequence(), Some(4));
    }

    #[test]
    fn test_acknowledge_drops_prefix() {
        let mut buffer = InputBuffer::new(10);
        for seq in 1..=5 {
            buffer.push(make_input(seq)).unwrap();
        }

        buffer.acknowledge(3);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.last_acknowledged(), 3);
        assert!(buffer.iter().all(|i| i.sequence > 3));
    }

    #[test]
    fn test_acknowledge_is_monotone() {
        let mut buffer = InputBuffer::new(10);
        for seq in 1..=5 {
            buffer.push(make_input(seq)).unwrap();
        }

        buffer.acknowledge(4);
        // A stale ack must not roll the watermark back
        buffer.acknowledge(2);

        assert_eq!(buffer.last_acknowledged(), 4);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_capacity() {
        let mut buffer = InputBuffer::new(2);
        buffer.push(make_input(1)).unwrap();
        buffer.push(make_input(2)).unwrap();
        assert!(matches!(
            buffer.push(make_input(3)),
            Err(crate::Error::InputBufferFull)
        ));
    }
}
