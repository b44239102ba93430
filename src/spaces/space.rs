// Common trait for sampleable spaces.

use rand::Rng;

/// A trait implemented by spaces that can be sampled from.
/// Element is the value type that lives in the space (u32 for Discrete).
pub trait Space {
    type Element;

    /// Draw a sample from the space using the provided RNG.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Return true if the given element is a valid member of the space.
    fn contains(&self, elem: &Self::Element) -> bool;
}
