//! The texture owning a set of images.

/// The owner of images, notified when one of its images loses a reference.
///
/// An image only holds a weak association with its texture. The texture decides itself which
/// of its images have become unreferenced elsewhere, typically by checking
/// [`Image::has_single_reference`](crate::Image::has_single_reference) for each of them.
pub trait Texture: Send + Sync {
    /// Reclaim images that no other holder references anymore.
    fn sweep(&self);
}
