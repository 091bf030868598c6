/// Last-in-first-out stack of transform frames
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::transform::Transform;

/// Nested transform scopes; the top frame is the active transform.
///
/// The stack only stores frames. Applying them to geometry is up to the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStack {
    frames: Vec<Matrix>,
}

impl TransformStack {
    pub fn new(initial: Matrix) -> Self {
        Self { frames: vec![initial] }
    }

    pub fn empty() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, m: Matrix) {
        self.frames.push(m);
    }

    /// Duplicate the top frame so it can be modified without disturbing
    /// the frame below
    pub fn push_copy(&mut self) -> Result<()> {
        let top = self.peek()?.clone();
        self.frames.push(top);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Matrix> {
        self.frames.pop().ok_or(Error::EmptyStack)
    }

    pub fn peek(&self) -> Result<&Matrix> {
        self.frames.last().ok_or(Error::EmptyStack)
    }

    /// Replace the top frame with `top * m`
    pub fn compose(&mut self, m: &Matrix) -> Result<()> {
        let top = self.frames.last_mut().ok_or(Error::EmptyStack)?;
        *top = top.mul(m)?;
        Ok(())
    }

    /// Reset the top frame to the identity
    pub fn reset_top(&mut self) -> Result<()> {
        let top = self.frames.last_mut().ok_or(Error::EmptyStack)?;
        *top = Transform::identity();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new(Transform::identity())
    }
}
