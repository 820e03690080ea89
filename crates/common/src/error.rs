/// Numeric degeneracy surfaced by the transform math.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("matrix is not invertible (determinant = {determinant})")]
    SingularMatrix { determinant: f32 },
}
