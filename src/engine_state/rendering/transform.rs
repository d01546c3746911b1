//! # Transform Stack
//!
//! Projection and modelview matrix stacks with bounded depth. Every operation works on
//! the top of the stack selected by [`TransformStack::matrix_mode`] and marks it dirty;
//! [`TransformStack::flush`] uploads dirty matrices to the backend right before a draw.
//!
//! Transforms post-multiply the current matrix, so the last transform applied is the
//! first one a vertex sees.

use cgmath::{perspective, Deg, Matrix4, Rad, SquareMatrix, Vector3};

use crate::error::TransformError;

use super::backend::RenderBackend;

/// Maximum number of matrices on each stack, base matrix included.
pub const MATRIX_STACK_DEPTH: usize = 10;

/// Which stack an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixType {
    /// Camera projection
    PROJECTION = 0,
    /// Object placement
    MODELVIEW = 1,
}

impl MatrixType {
    /// Both stacks in upload order.
    pub fn all() -> [MatrixType; 2] {
        [MatrixType::PROJECTION, MatrixType::MODELVIEW]
    }
}

#[derive(Debug)]
struct MatrixStack {
    matrices: Vec<Matrix4<f32>>,
    dirty: bool,
}

impl MatrixStack {
    fn new() -> Self {
        let mut matrices = Vec::with_capacity(MATRIX_STACK_DEPTH);
        matrices.push(Matrix4::identity());
        Self {
            matrices,
            dirty: true,
        }
    }

    fn top(&self) -> &Matrix4<f32> {
        // The base matrix is never popped.
        &self.matrices[self.matrices.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix4<f32> {
        let last = self.matrices.len() - 1;
        self.dirty = true;
        &mut self.matrices[last]
    }
}

/// The two matrix stacks and the current matrix mode.
#[derive(Debug)]
pub struct TransformStack {
    stacks: [MatrixStack; 2],
    mode: MatrixType,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Both stacks hold a single identity matrix; the mode is `PROJECTION`.
    pub fn new() -> Self {
        Self {
            stacks: [MatrixStack::new(), MatrixStack::new()],
            mode: MatrixType::PROJECTION,
        }
    }

    fn current(&mut self) -> &mut MatrixStack {
        &mut self.stacks[self.mode as usize]
    }

    /// Selects the stack later operations apply to.
    pub fn matrix_mode(&mut self, mode: MatrixType) {
        self.mode = mode;
    }

    /// The currently selected stack.
    pub fn mode(&self) -> MatrixType {
        self.mode
    }

    /// Top of the given stack.
    pub fn matrix(&self, matrix: MatrixType) -> Matrix4<f32> {
        *self.stacks[matrix as usize].top()
    }

    /// Number of matrices on the given stack.
    pub fn depth(&self, matrix: MatrixType) -> usize {
        self.stacks[matrix as usize].matrices.len()
    }

    /// Whether the given stack changed since the last flush.
    pub fn is_dirty(&self, matrix: MatrixType) -> bool {
        self.stacks[matrix as usize].dirty
    }

    /// Duplicates the top of the current stack.
    pub fn push(&mut self) -> Result<(), TransformError> {
        let stack = self.current();
        if stack.matrices.len() >= MATRIX_STACK_DEPTH {
            return Err(TransformError::StackOverflow(MATRIX_STACK_DEPTH));
        }

        let top = *stack.top();
        stack.matrices.push(top);
        Ok(())
    }

    /// Discards the top of the current stack.
    pub fn pop(&mut self) -> Result<(), TransformError> {
        let stack = self.current();
        if stack.matrices.len() <= 1 {
            return Err(TransformError::StackUnderflow);
        }

        stack.matrices.pop();
        stack.dirty = true;
        Ok(())
    }

    /// Replaces the top of the current stack.
    pub fn load_matrix(&mut self, matrix: Matrix4<f32>) {
        *self.current().top_mut() = matrix;
    }

    /// Replaces the top of the current stack with the identity.
    pub fn load_identity(&mut self) {
        self.load_matrix(Matrix4::identity());
    }

    /// Post-multiplies the top of the current stack.
    pub fn mult_matrix(&mut self, matrix: Matrix4<f32>) {
        let top = self.current().top_mut();
        *top = *top * matrix;
    }

    /// Replaces the top of the current stack with a perspective projection.
    pub fn projection(&mut self, fovy: Deg<f32>, aspect: f32, near: f32, far: f32) {
        self.load_matrix(perspective(fovy, aspect, near, far));
    }

    /// Applies a translation.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.mult_matrix(Matrix4::from_translation(offset));
    }

    /// Applies a non-uniform scale.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult_matrix(Matrix4::from_nonuniform_scale(x, y, z));
    }

    /// Applies a rotation around X.
    pub fn rotate_x<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.mult_matrix(Matrix4::from_angle_x(angle));
    }

    /// Applies a rotation around Y.
    pub fn rotate_y<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.mult_matrix(Matrix4::from_angle_y(angle));
    }

    /// Applies a rotation around Z.
    pub fn rotate_z<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.mult_matrix(Matrix4::from_angle_z(angle));
    }

    /// Uploads every dirty matrix and clears the dirty flags.
    pub fn flush<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for matrix in MatrixType::all() {
            let stack = &mut self.stacks[matrix as usize];
            if stack.dirty {
                backend.upload_transform(matrix, stack.top());
                stack.dirty = false;
            }
        }
    }
}
