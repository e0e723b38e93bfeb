//! Matrix stacks for the model-view, projection and texture modes

use crate::core::limits::{
    MAX_MODELVIEW_STACK_DEPTH, MAX_PROJECTION_STACK_DEPTH, MAX_TEXTURE_STACK_DEPTH,
};
use crate::error::{GlError, GlResult, StackKind};
use crate::foundation::math::{Mat3, Mat4, Mat4Ext};

/// Which stack matrix operations apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    /// Object to eye space
    #[default]
    ModelView,
    /// Eye to clip space
    Projection,
    /// Texture coordinate transform
    Texture,
}

impl MatrixMode {
    fn index(self) -> usize {
        match self {
            Self::ModelView => 0,
            Self::Projection => 1,
            Self::Texture => 2,
        }
    }

    /// Maximum depth of this mode's stack
    pub fn max_depth(self) -> usize {
        match self {
            Self::ModelView => MAX_MODELVIEW_STACK_DEPTH,
            Self::Projection => MAX_PROJECTION_STACK_DEPTH,
            Self::Texture => MAX_TEXTURE_STACK_DEPTH,
        }
    }
}

/// Bounded stack of matrices; never empty
#[derive(Debug, Clone)]
pub struct MatrixStack {
    mode: MatrixMode,
    stack: Vec<Mat4>,
}

impl MatrixStack {
    /// A stack holding only the identity
    pub fn new(mode: MatrixMode) -> Self {
        let mut stack = Vec::with_capacity(mode.max_depth());
        stack.push(Mat4::identity());
        Self { mode, stack }
    }

    /// Current depth (1 when nothing was pushed)
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The top matrix
    pub fn top(&self) -> &Mat4 {
        // The stack is created with one entry and pop never removes the last.
        &self.stack[self.stack.len() - 1]
    }

    /// Replace the top matrix
    pub fn load(&mut self, m: Mat4) {
        let top = self.stack.len() - 1;
        self.stack[top] = m;
    }

    /// Post-multiply the top matrix: `top = top * m`
    pub fn mult(&mut self, m: &Mat4) {
        let top = self.stack.len() - 1;
        self.stack[top] *= m;
    }

    /// Duplicate the top matrix
    pub fn push(&mut self) -> GlResult<()> {
        if self.stack.len() >= self.mode.max_depth() {
            return Err(GlError::StackOverflow(StackKind::Matrix(self.mode)));
        }
        self.stack.push(*self.top());
        Ok(())
    }

    /// Discard the top matrix
    pub fn pop(&mut self) -> GlResult<()> {
        if self.stack.len() <= 1 {
            return Err(GlError::StackUnderflow(StackKind::Matrix(self.mode)));
        }
        self.stack.pop();
        Ok(())
    }
}

/// The three matrix stacks plus products derived from them
#[derive(Debug, Clone)]
pub struct MatrixState {
    mode: MatrixMode,
    stacks: [MatrixStack; 3],
    model_projection: Option<Mat4>,
    normal_matrix: Option<Mat3>,
}

impl Default for MatrixState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixState {
    /// All stacks at identity, model-view selected
    pub fn new() -> Self {
        Self {
            mode: MatrixMode::ModelView,
            stacks: [
                MatrixStack::new(MatrixMode::ModelView),
                MatrixStack::new(MatrixMode::Projection),
                MatrixStack::new(MatrixMode::Texture),
            ],
            model_projection: None,
            normal_matrix: None,
        }
    }

    /// The selected mode
    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    /// Select the stack later operations apply to
    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    /// The stack for `mode`
    pub fn stack(&self, mode: MatrixMode) -> &MatrixStack {
        &self.stacks[mode.index()]
    }

    /// Top of the stack for `mode`
    pub fn top(&self, mode: MatrixMode) -> &Mat4 {
        self.stacks[mode.index()].top()
    }

    fn invalidate(&mut self) {
        match self.mode {
            MatrixMode::ModelView => {
                self.model_projection = None;
                self.normal_matrix = None;
            }
            MatrixMode::Projection => self.model_projection = None,
            MatrixMode::Texture => {}
        }
    }

    fn current(&mut self) -> &mut MatrixStack {
        &mut self.stacks[self.mode.index()]
    }

    /// Replace the current top matrix
    pub fn load(&mut self, m: Mat4) {
        self.current().load(m);
        self.invalidate();
    }

    /// Post-multiply the current top matrix
    pub fn mult(&mut self, m: &Mat4) {
        self.current().mult(m);
        self.invalidate();
    }

    /// Push the current stack
    pub fn push(&mut self) -> GlResult<()> {
        self.current().push()
    }

    /// Pop the current stack
    pub fn pop(&mut self) -> GlResult<()> {
        self.current().pop()?;
        self.invalidate();
        Ok(())
    }

    /// Projection * model-view, cached until either changes
    pub fn model_projection(&mut self) -> Mat4 {
        if let Some(m) = self.model_projection {
            return m;
        }
        let m = self.top(MatrixMode::Projection) * self.top(MatrixMode::ModelView);
        self.model_projection = Some(m);
        m
    }

    /// Inverse-transpose of the model-view 3x3, cached until it changes
    pub fn normal_matrix(&mut self) -> Mat3 {
        if let Some(m) = self.normal_matrix {
            return m;
        }
        let m = self.top(MatrixMode::ModelView).normal_matrix();
        self.normal_matrix = Some(m);
        m
    }

    /// Whether texture coordinates need the texture matrix applied
    pub fn texture_matrix_active(&self) -> bool {
        *self.top(MatrixMode::Texture) != Mat4::identity()
    }
}
