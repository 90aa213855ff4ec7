//! Coordinates of pixels within an image.

/// The first pixel of a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// The number of pixels along each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

/// A sub-volume of an image that an upload writes.
///
/// The caller validates that the region lies within the image; it is not checked again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub offset: Offset,
    pub extent: Extent,
}

/// A two-dimensional rectangle, from the inclusive corner to the exclusive corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Offset {
    pub const ORIGIN: Self = Offset { x: 0, y: 0, z: 0 };

    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Offset { x, y, z }
    }
}

impl Extent {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Extent {
            width,
            height,
            depth,
        }
    }

    /// Whether the extent covers no pixel at all.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }
}

impl Region {
    pub const fn new(offset: Offset, extent: Extent) -> Self {
        Region { offset, extent }
    }

    /// A region starting at the origin of the image.
    pub const fn with_extent(extent: Extent) -> Self {
        Region {
            offset: Offset::ORIGIN,
            extent,
        }
    }

    /// The rectangle covered in each of the layers of the region.
    pub const fn rect(self) -> Rect {
        Rect {
            x0: self.offset.x,
            y0: self.offset.y,
            x1: self.offset.x + self.extent.width,
            y1: self.offset.y + self.extent.height,
        }
    }
}

impl Rect {
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub const fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub const fn height(self) -> u32 {
        self.y1 - self.y0
    }
}
