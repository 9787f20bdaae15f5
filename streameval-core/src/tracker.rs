use crate::error::{Error, Result};

/// A scalar whose updates can be undone in last-in-first-out order.
///
/// Every `update` pushes the value it replaces onto an unbounded history, and
/// `revert` pops it back. After `n` updates and `r <= n` reverts the current
/// value is the one given to update number `n - r`, or `0.0` when `n == r`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevertibleScalarTracker {
    history: Vec<f32>,
    current: f32,
}

impl RevertibleScalarTracker {
    pub fn new() -> RevertibleScalarTracker {
        RevertibleScalarTracker {
            history: Vec::new(),
            current: 0.0,
        }
    }

    pub fn update(&mut self, value: f32) -> &mut Self {
        self.history.push(self.current);
        self.current = value;
        self
    }

    pub fn revert(&mut self) -> Result<&mut Self> {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                Ok(self)
            }
            None => Err(Error::EmptyHistory("tracker".to_owned())),
        }
    }

    pub fn get(&self) -> f32 {
        self.current
    }

    /// Number of updates that can still be reverted.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
