//! Surface-brightness profiles
//!
//! A [`Profile`] is an immutable expression tree of surface-brightness
//! functions: gridded [`InterpolatedImage`] samples or arbitrary
//! [`SurfaceBrightness`] implementations at the leaves, combined by sums and
//! affine transforms. Nodes are reference counted, so cloning a profile is
//! cheap and "mutating" methods simply swap in a new root node.
//!
//! Transforms preserve surface brightness: a profile transformed by matrix
//! `M` and shift `c` evaluates as `inner(M⁻¹ (p - c)) * flux_scaling`.

pub mod interpolant;
pub mod interpolated;
pub mod transform;

pub use interpolant::{Interpolant, InterpolantKind};
pub use interpolated::InterpolatedImage;
pub use transform::{Ellipse, Shear};

use meter_math::{invert_matrix, rotation_matrix, shear_matrix, SingularMatrixError};
use nalgebra::{Matrix2, Vector2};
use ndarray::Zip;
use shared::image_proc::{normalize_scale, Image};
use shared::units::{Angle, AngleExt};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when building or transforming profiles
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("profile data array is empty")]
    EmptyData,

    #[error("pixel scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("shear ({g1}, {g2}) must be finite with |g| < 1")]
    InvalidShear { g1: f64, g2: f64 },

    #[error("gain must be positive and finite, got {0}")]
    InvalidGain(f64),

    #[error("transform is not invertible: {0}")]
    SingularTransform(#[from] SingularMatrixError),
}

/// Position in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// How pixel values relate to surface brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Pixel values are fluxes: surface brightness times pixel area
    #[default]
    Flux,
    /// Pixel values are surface-brightness samples
    SurfaceBrightness,
}

/// A function of position that can be evaluated anywhere on the plane
pub trait SurfaceBrightness: fmt::Debug + Send + Sync {
    fn x_value(&self, pos: Position) -> f64;
}

/// Adapter turning a closure into a [`SurfaceBrightness`]
struct FnSurface<F>(F);

impl<F> fmt::Debug for FnSurface<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSurface")
    }
}

impl<F> SurfaceBrightness for FnSurface<F>
where
    F: Fn(Position) -> f64 + Send + Sync,
{
    fn x_value(&self, pos: Position) -> f64 {
        (self.0)(pos)
    }
}

#[derive(Debug)]
enum Node {
    Base(Arc<dyn SurfaceBrightness>),
    Sum(Vec<Profile>),
    Transformed {
        inner: Profile,
        forward: Matrix2<f64>,
        inverse: Matrix2<f64>,
        shift: Vector2<f64>,
        flux_scaling: f64,
    },
}

/// Options for rendering a profile into an image
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    /// Pixel scale to draw at; `None` uses the image's own scale
    pub scale: Option<f64>,
    pub normalization: Normalization,
    /// Divisor applied to every pixel value
    pub gain: f64,
    /// Add to the existing pixels instead of overwriting them
    pub add_to_image: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            scale: None,
            normalization: Normalization::Flux,
            gain: 1.0,
            add_to_image: false,
        }
    }
}

/// Immutable, cheaply cloneable surface-brightness profile
#[derive(Debug, Clone)]
pub struct Profile {
    node: Arc<Node>,
}

impl Profile {
    pub fn new<S: SurfaceBrightness + 'static>(surface: S) -> Self {
        Self::from_node(Node::Base(Arc::new(surface)))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Position) -> f64 + Send + Sync + 'static,
    {
        Self::new(FnSurface(f))
    }

    pub fn interpolated(image: InterpolatedImage) -> Self {
        Self::new(image)
    }

    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Whether two handles refer to the same profile node
    pub fn ptr_eq(&self, other: &Profile) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn x_value(&self, pos: Position) -> f64 {
        match self.node.as_ref() {
            Node::Base(surface) => surface.x_value(pos),
            Node::Sum(terms) => terms.iter().map(|term| term.x_value(pos)).sum(),
            Node::Transformed {
                inner,
                inverse,
                shift,
                flux_scaling,
                ..
            } => {
                let p = inverse * (pos.to_vector() - shift);
                inner.x_value(Position::new(p.x, p.y)) * flux_scaling
            }
        }
    }

    /// Sum of two profiles. Nested sums are flattened.
    pub fn add(&self, other: &Profile) -> Profile {
        let mut terms = Vec::new();
        for profile in [self, other] {
            match profile.node.as_ref() {
                Node::Sum(inner) => terms.extend(inner.iter().cloned()),
                _ => terms.push(profile.clone()),
            }
        }
        Self::from_node(Node::Sum(terms))
    }

    /// Multiply the profile's amplitude by `factor`.
    pub fn scale_flux(&mut self, factor: f64) {
        self.compose(Matrix2::identity(), Matrix2::identity(), Vector2::zeros(), factor);
    }

    /// Apply the linear part and shift of `ellipse`.
    ///
    /// # Errors
    /// `SingularTransform` if the dilation collapses the matrix.
    pub fn apply_transformation(&mut self, ellipse: &Ellipse) -> Result<(), ProfileError> {
        let forward = ellipse.matrix();
        let inverse = invert_matrix(&forward)?;
        self.compose(forward, inverse, ellipse.shift().to_vector(), 1.0);
        Ok(())
    }

    /// Rotate counter-clockwise by `angle`.
    pub fn apply_rotation(&mut self, angle: Angle) {
        let theta = angle.as_radians();
        self.compose(
            rotation_matrix(theta),
            rotation_matrix(-theta),
            Vector2::zeros(),
            1.0,
        );
    }

    pub fn apply_shear(&mut self, shear: Shear) {
        // S(g) has unit determinant and S(g)⁻¹ = S(-g)
        self.compose(
            shear.matrix(),
            shear_matrix(-shear.g1(), -shear.g2()),
            Vector2::zeros(),
            1.0,
        );
    }

    pub fn apply_shift(&mut self, dx: f64, dy: f64) {
        self.compose(
            Matrix2::identity(),
            Matrix2::identity(),
            Vector2::new(dx, dy),
            1.0,
        );
    }

    /// Fold a new affine transform into the root, merging with an existing
    /// transform node instead of nesting.
    fn compose(
        &mut self,
        forward: Matrix2<f64>,
        inverse: Matrix2<f64>,
        shift: Vector2<f64>,
        flux: f64,
    ) {
        let node = match self.node.as_ref() {
            Node::Transformed {
                inner,
                forward: f0,
                inverse: i0,
                shift: c0,
                flux_scaling,
            } => Node::Transformed {
                inner: inner.clone(),
                forward: forward * f0,
                inverse: i0 * inverse,
                shift: forward * c0 + shift,
                flux_scaling: flux_scaling * flux,
            },
            _ => Node::Transformed {
                inner: self.clone(),
                forward,
                inverse,
                shift,
                flux_scaling: flux,
            },
        };
        *self = Self::from_node(node);
    }

    /// Render into `image`. The profile origin lands on array index
    /// `(rows / 2, cols / 2)` and the image's scale is set to the scale
    /// drawn at.
    ///
    /// # Errors
    /// `InvalidGain` for a nonpositive or non-finite gain.
    pub fn draw(&self, image: &mut Image, options: &DrawOptions) -> Result<(), ProfileError> {
        if !(options.gain.is_finite() && options.gain > 0.0) {
            return Err(ProfileError::InvalidGain(options.gain));
        }

        let scale = normalize_scale(options.scale.unwrap_or_else(|| image.scale()));
        image.set_scale(scale);

        let factor = match options.normalization {
            Normalization::Flux => scale * scale,
            Normalization::SurfaceBrightness => 1.0,
        } / options.gain;

        let (rows, cols) = image.shape();
        let (cy, cx) = ((rows / 2) as f64, (cols / 2) as f64);
        let add = options.add_to_image;

        Zip::indexed(image.array_mut()).par_for_each(|(i, j), pixel| {
            let pos = Position::new((j as f64 - cx) * scale, (i as f64 - cy) * scale);
            let value = self.x_value(pos) * factor;
            if add {
                *pixel += value;
            } else {
                *pixel = value;
            }
        });

        Ok(())
    }
}
