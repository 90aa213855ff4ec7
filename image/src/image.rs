use core::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use gles_format::{
    compressed_row_bytes, compute_packing_offset, compute_pitch, resolve_transfer_format,
    try_resolve_storage_format, ClientFormat, ClientType, InternalFormat, UnpackParameters,
};
use tracing::{debug, trace};

use crate::blit::{Blitter, SourceSurface};
use crate::layout::{ImageKind, LayoutError, StorageLayout};
use crate::region::{Offset, Rect, Region};
use crate::texture::Texture;
use crate::transcode::{copy_blocks, transcode, Dispatch, Strides};

/// A shared, lockable unit of image storage.
///
/// Each handle is one reference. Cloning a handle adds a reference, [`Image::release`] gives
/// one up and reports the outcome, and dropping a handle gives it up the same way. The storage
/// is destroyed with the last reference. Locks borrow the handle they were taken through, so a
/// handle can not be released while it is still locked.
pub struct Image {
    inner: Arc<Shared>,
    /// Set once the reference of this handle has been given up.
    released: bool,
}

struct Shared {
    /// Handles that have not given up their reference.
    holders: AtomicUsize,
    kind: ImageKind,
    client: Option<(ClientFormat, ClientType)>,
    layout: StorageLayout,
    lockable: bool,
    color: RwLock<Box<[u8]>>,
    stencil: Option<RwLock<Box<[u8]>>>,
    parent: Mutex<Option<Weak<dyn Texture>>>,
}

/// The intended access of a lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// What became of an image after giving up a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Release {
    /// This was the last reference, the storage is gone.
    Destroyed,
    /// Other references remain.
    Retained,
}

/// The path an upload took.
///
/// None of these is an error. An upload that writes nothing leaves the previous contents of
/// the image unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Upload {
    /// The data was transcoded directly into storage.
    Direct,
    /// The data was handed to the generic blit.
    Blit,
    /// No storage format exists for the client description; nothing was written.
    Unsupported,
    /// The storage could not be locked; nothing was written.
    Unavailable,
}

/// Access to the storage of an image, starting at the locked pixel.
///
/// Dropping the lock unlocks the storage.
pub struct ImageLock<'image> {
    inner: LockInner<'image>,
}

enum LockInner<'image> {
    Read {
        guard: RwLockReadGuard<'image, Box<[u8]>>,
        offset: usize,
    },
    Write(PlaneWrite<'image>),
}

/// Exclusive access to one plane.
struct PlaneWrite<'image> {
    guard: RwLockWriteGuard<'image, Box<[u8]>>,
    offset: usize,
}

impl Image {
    /// Storage for a level of `texture`, holding client data of the given format and type.
    pub fn for_texture<T: Texture + 'static>(
        texture: &Arc<T>,
        width: u32,
        height: u32,
        depth: u32,
        format: ClientFormat,
        ty: ClientType,
    ) -> Result<Self, LayoutError> {
        let internal = storage_format(format, ty)?;
        let layout = StorageLayout::new(internal, width, height, depth)?;
        let parent: Weak<T> = Arc::downgrade(texture);
        let parent: Weak<dyn Texture> = parent;

        Ok(Image::with_layout(
            ImageKind::Texture,
            Some((format, ty)),
            layout,
            true,
            Some(parent),
        ))
    }

    /// Storage with rows `pitch` pixels apart, as given by a client.
    pub fn with_client_storage(
        width: u32,
        height: u32,
        format: ClientFormat,
        ty: ClientType,
        pitch: u32,
    ) -> Result<Self, LayoutError> {
        let internal = storage_format(format, ty)?;
        let layout = StorageLayout::with_client_pitch(internal, width, height, pitch)?;

        Ok(Image::with_layout(
            ImageKind::ClientStorage,
            Some((format, ty)),
            layout,
            true,
            None,
        ))
    }

    /// Renderer internal storage with one layer per sample.
    pub fn render_target(
        width: u32,
        height: u32,
        internal: InternalFormat,
        samples: u32,
        lockable: bool,
    ) -> Result<Self, LayoutError> {
        let layout = StorageLayout::new(internal, width, height, samples)?;
        Ok(Image::with_layout(
            ImageKind::RenderTarget,
            None,
            layout,
            lockable,
            None,
        ))
    }

    fn with_layout(
        kind: ImageKind,
        client: Option<(ClientFormat, ClientType)>,
        layout: StorageLayout,
        lockable: bool,
        parent: Option<Weak<dyn Texture>>,
    ) -> Self {
        let color = vec![0; layout.byte_len()].into_boxed_slice();
        let stencil = layout
            .stencil_len()
            .map(|len| RwLock::new(vec![0; len].into_boxed_slice()));

        Image {
            inner: Arc::new(Shared {
                holders: AtomicUsize::new(1),
                kind,
                client,
                layout,
                lockable,
                color: RwLock::new(color),
                stencil,
                parent: Mutex::new(parent),
            }),
            released: false,
        }
    }

    pub fn kind(&self) -> ImageKind {
        self.inner.kind
    }

    pub fn width(&self) -> u32 {
        self.inner.layout.width
    }

    pub fn height(&self) -> u32 {
        self.inner.layout.height
    }

    /// Layers of a texture image, or samples of a render target.
    pub fn depth(&self) -> u32 {
        self.inner.layout.depth
    }

    /// The client format the image was created with, if it was created from one.
    pub fn format(&self) -> Option<ClientFormat> {
        Some(self.inner.client?.0)
    }

    /// The client type the image was created with, if it was created from one.
    pub fn ty(&self) -> Option<ClientType> {
        Some(self.inner.client?.1)
    }

    pub fn internal_format(&self) -> InternalFormat {
        self.inner.layout.internal
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.inner.layout
    }

    /// Bytes between rows of the primary plane.
    pub fn pitch(&self) -> usize {
        self.inner.layout.strides.pitch
    }

    /// Bytes between layers of the primary plane.
    pub fn slice(&self) -> usize {
        self.inner.layout.strides.slice
    }

    /// Bytes between rows of the stencil plane.
    pub fn stencil_pitch(&self) -> Option<usize> {
        Some(self.inner.layout.stencil?.pitch)
    }

    pub fn strides(&self) -> Strides {
        self.inner.layout.strides
    }

    pub fn is_lockable(&self) -> bool {
        self.inner.lockable
    }

    /// The number of outstanding references.
    pub fn ref_count(&self) -> usize {
        self.inner.holders.load(Ordering::Acquire)
    }

    /// Whether this handle is the only reference.
    pub fn has_single_reference(&self) -> bool {
        self.ref_count() == 1
    }

    /// Lock the storage for access, starting at `origin`.
    ///
    /// Read locks are shared, write locks are exclusive, and this blocks until the requested
    /// access is available. Returns `None` if the image can not be locked, the origin is outside
    /// of the image, or a previous holder panicked.
    pub fn lock(&self, origin: Offset, access: Access) -> Option<ImageLock<'_>> {
        if !self.inner.lockable {
            trace!(kind = ?self.inner.kind, "image is not lockable");
            return None;
        }

        let offset = self.inner.layout.offset_of(origin)?;
        let inner = match access {
            Access::ReadOnly => LockInner::Read {
                guard: self.inner.color.read().ok()?,
                offset,
            },
            Access::WriteOnly | Access::ReadWrite => LockInner::Write(PlaneWrite {
                guard: self.inner.color.write().ok()?,
                offset,
            }),
        };

        Some(ImageLock { inner })
    }

    fn write_color(&self, origin: Offset) -> Option<PlaneWrite<'_>> {
        match self.lock(origin, Access::WriteOnly)?.inner {
            LockInner::Write(write) => Some(write),
            LockInner::Read { .. } => None,
        }
    }

    fn write_stencil(&self, origin: Offset) -> Option<PlaneWrite<'_>> {
        let plane = self.inner.stencil.as_ref()?;
        let offset = self.inner.layout.stencil_offset_of(origin)?;
        Some(PlaneWrite {
            guard: plane.write().ok()?,
            offset,
        })
    }

    /// Wait for all locks held through other handles to be released.
    ///
    /// Must not be called while holding a lock of this image on the same thread.
    pub fn sync(&self) {
        // Exclusive access drains all holders, the guards are dropped right away.
        drop(self.inner.color.write());
        if let Some(stencil) = &self.inner.stencil {
            drop(stencil.write());
        }
    }

    /// Give up this reference.
    ///
    /// When other references remain the owning texture, if any, is asked to sweep its images.
    /// Of any number of concurrent releases exactly one observes [`Release::Destroyed`].
    pub fn release(mut self) -> Release {
        self.released = true;
        self.give_up()
    }

    fn give_up(&self) -> Release {
        // Exactly one holder takes the count from one to zero.
        if self.inner.holders.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!(
                kind = ?self.inner.kind,
                internal = ?self.inner.layout.internal,
                "destroying image"
            );
            return Release::Destroyed;
        }

        if let Some(texture) = self.parent() {
            texture.sweep();
        }

        Release::Retained
    }

    /// Detach from `texture` if it is the owner, then give up this reference.
    pub fn unbind(self, texture: &dyn Texture) -> Release {
        if let Ok(mut parent) = self.inner.parent.lock() {
            if parent.as_ref().is_some_and(|weak| is_same(weak, texture)) {
                *parent = None;
            }
        }

        self.release()
    }

    /// Whether `texture` is the owner of this image.
    pub fn is_owned_by(&self, texture: &dyn Texture) -> bool {
        match self.inner.parent.lock() {
            Ok(parent) => parent.as_ref().is_some_and(|weak| is_same(weak, texture)),
            Err(_) => false,
        }
    }

    fn parent(&self) -> Option<Arc<dyn Texture>> {
        let parent = self.inner.parent.lock().ok()?;
        parent.as_ref()?.upgrade()
    }

    /// Write a region of client pixels.
    ///
    /// The client data is located with the unpack parameters. If the storage format of the
    /// client description is the one of the image, or one of its bit-compatible
    /// reinterpretations, the data is transcoded directly under a write lock. Otherwise it is
    /// described in its transfer format and handed to `blitter`.
    ///
    /// # Panics
    ///
    /// If the client format and type are not a valid pixel description, if the data has to be
    /// blitted but no transfer format describes it, or if `pixels` is too short for the region
    /// under the unpack parameters.
    #[track_caller]
    pub fn upload_region(
        &self,
        blitter: &dyn Blitter,
        region: Region,
        format: ClientFormat,
        ty: ClientType,
        unpack: &UnpackParameters,
        pixels: &[u8],
    ) -> Upload {
        let Some(upload_format) = try_resolve_storage_format(format, ty) else {
            trace!(?format, ?ty, "no storage format, skipping upload");
            return Upload::Unsupported;
        };

        let extent = region.extent;
        let (input_width, input_height) = unpack.input_extent(extent.width, extent.height);
        let input_pitch = compute_pitch(input_width, format, ty, unpack.alignment);
        let offset = compute_packing_offset(format, ty, input_width, input_height, unpack);
        let input = &pixels[offset..];
        let input_strides = Strides::with_rows(input_pitch, input_height as usize);

        if !upload_format.is_direct_compatible(self.internal_format()) {
            let transfer = resolve_transfer_format(format, ty);
            debug!(
                ?transfer,
                internal = ?self.internal_format(),
                "no direct transcoding, falling back to blit"
            );

            let source = SourceSurface::new(input, extent, transfer, input_strides);
            let source_rect = Rect::new(0, 0, extent.width, extent.height);
            blitter.blit(&source, source_rect, self, region.rect());
            return Upload::Blit;
        }

        let dispatch = Dispatch::select(format, ty);
        let Some(mut color) = self.write_color(region.offset) else {
            trace!(offset = ?region.offset, "lock unavailable, skipping upload");
            return Upload::Unavailable;
        };

        match dispatch {
            Dispatch::Single(layout) => {
                transcode(
                    layout,
                    extent,
                    input,
                    input_strides,
                    color.bytes_mut(),
                    self.strides(),
                );
            }
            Dispatch::DepthStencil { depth, stencil } => {
                transcode(
                    depth,
                    extent,
                    input,
                    input_strides,
                    color.bytes_mut(),
                    self.strides(),
                );

                match (self.write_stencil(region.offset), self.inner.layout.stencil) {
                    (Some(mut plane), Some(strides)) => {
                        transcode(stencil, extent, input, input_strides, plane.bytes_mut(), strides)
                    }
                    _ => trace!("stencil plane unavailable, depth written only"),
                }
            }
        }

        Upload::Direct
    }

    /// Write a region of block-compressed data, copying the blocks verbatim.
    ///
    /// `image_size` is the total byte count of the client data over all layers of the region.
    ///
    /// # Panics
    ///
    /// If the image is not block-compressed, the region is empty, or `pixels` is shorter than
    /// `image_size`.
    #[track_caller]
    pub fn upload_compressed_region(
        &self,
        region: Region,
        image_size: usize,
        pixels: &[u8],
    ) -> Upload {
        let internal = self.internal_format();
        let InternalFormat::Compressed(format) = internal else {
            panic!("compressed upload into uncompressed storage {internal:?}");
        };

        let extent = region.extent;
        assert!(
            extent.width > 0 && extent.depth > 0,
            "compressed upload of empty region {extent:?}"
        );

        let input_pitch = compressed_row_bytes(extent.width, format);
        let input_slice = image_size / extent.depth as usize;
        let rows = input_slice / input_pitch;

        let Some(mut dest) = self.write_color(region.offset) else {
            trace!(offset = ?region.offset, "lock unavailable, skipping upload");
            return Upload::Unavailable;
        };

        copy_blocks(
            rows,
            extent.depth as usize,
            input_pitch,
            &pixels[..image_size],
            input_slice,
            dest.bytes_mut(),
            self.strides(),
        );

        Upload::Direct
    }
}

impl ImageLock<'_> {
    /// The locked bytes, from the locked pixel to the end of storage.
    pub fn bytes(&self) -> &[u8] {
        match &self.inner {
            LockInner::Read { guard, offset } => &guard[*offset..],
            LockInner::Write(write) => &write.guard[write.offset..],
        }
    }

    /// The locked bytes for writing, or `None` for a read lock.
    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.inner {
            LockInner::Read { .. } => None,
            LockInner::Write(write) => Some(write.bytes_mut()),
        }
    }

    /// Release the lock, same as dropping it.
    pub fn unlock(self) {}
}

impl PlaneWrite<'_> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.guard[self.offset..]
    }
}

impl Clone for Image {
    fn clone(&self) -> Self {
        self.inner.holders.fetch_add(1, Ordering::Relaxed);
        Image {
            inner: Arc::clone(&self.inner),
            released: false,
        }
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        if !self.released {
            self.give_up();
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("kind", &self.inner.kind)
            .field("client", &self.inner.client)
            .field("layout", &self.inner.layout)
            .field("lockable", &self.inner.lockable)
            .field("references", &self.ref_count())
            .finish()
    }
}

fn storage_format(format: ClientFormat, ty: ClientType) -> Result<InternalFormat, LayoutError> {
    try_resolve_storage_format(format, ty).ok_or(LayoutError::Unsupported { format, ty })
}

fn is_same(parent: &Weak<dyn Texture>, texture: &dyn Texture) -> bool {
    core::ptr::addr_eq(parent.as_ptr(), texture)
}
