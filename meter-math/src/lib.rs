//! meter-math - Mathematical helpers for astronomical image simulation
//!
//! Currently provides 2x2 transformation matrices (rotation, scaling,
//! reduced shear) and checked inversion, used by the profile layer to map
//! image-plane positions back into a profile's own frame.

pub mod matrix2;

pub use matrix2::{
    invert_matrix, rotation_matrix, scale_matrix, shear_matrix, SingularMatrixError,
};
