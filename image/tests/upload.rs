use std::cell::RefCell;
use std::sync::Arc;

use gles_format::{ClientFormat, ClientType, CompressedFormat, InternalFormat, UnpackParameters};
use gles_image::{
    Access, Blitter, Extent, Image, Offset, Rect, Region, SourceSurface, Strides, Texture, Upload,
};

struct Level;

impl Texture for Level {
    fn sweep(&self) {}
}

/// Remembers every blit instead of performing it.
#[derive(Default)]
struct Recorder {
    blits: RefCell<Vec<Blit>>,
}

#[derive(Debug, PartialEq)]
struct Blit {
    format: InternalFormat,
    extent: Extent,
    strides: Strides,
    first_row: Vec<u8>,
    source_rect: Rect,
    dest_rect: Rect,
}

impl Blitter for Recorder {
    fn blit(&self, source: &SourceSurface<'_>, source_rect: Rect, _: &Image, dest_rect: Rect) {
        self.blits.borrow_mut().push(Blit {
            format: source.format(),
            extent: source.extent(),
            strides: source.strides(),
            first_row: source.row(0, 0).unwrap().to_vec(),
            source_rect,
            dest_rect,
        });
    }
}

fn contents(image: &Image) -> Vec<u8> {
    let lock = image.lock(Offset::ORIGIN, Access::ReadOnly).unwrap();
    lock.bytes().to_vec()
}

fn rgba_texture(width: u32, height: u32) -> Image {
    let texture = Arc::new(Level);
    let (format, ty) = (ClientFormat::Rgba, ClientType::UnsignedByte);
    Image::for_texture(&texture, width, height, 1, format, ty).unwrap()
}

#[test]
fn rows_land_at_storage_pitch() {
    // Three pixels wide, stored four pixels apart.
    let image = rgba_texture(3, 2);
    assert_eq!(image.pitch(), 16);

    let pixels: Vec<u8> = (1..=16).collect();
    let region = Region::with_extent(Extent::new(2, 2, 1));
    let upload = image.upload_region(
        &Recorder::default(),
        region,
        ClientFormat::Rgba,
        ClientType::UnsignedByte,
        &UnpackParameters::default(),
        &pixels,
    );

    assert_eq!(upload, Upload::Direct);
    let bytes = contents(&image);
    assert_eq!(&bytes[..8], &pixels[..8]);
    assert_eq!(&bytes[8..16], &[0; 8]);
    assert_eq!(&bytes[16..24], &pixels[8..]);
    assert_eq!(&bytes[24..], &[0; 8]);
}

#[test]
fn skipped_pixels_are_never_read() {
    let image = rgba_texture(2, 2);
    let unpack = UnpackParameters {
        row_length: 3,
        skip_pixels: 1,
        skip_rows: 1,
        ..UnpackParameters::default()
    };

    // Three rows of three pixels, the region is the lower right 2x2 corner.
    let mut pixels = vec![0xee; 36];
    pixels[16..24].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    pixels[28..36].copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);

    let region = Region::with_extent(Extent::new(2, 2, 1));
    let upload = image.upload_region(
        &Recorder::default(),
        region,
        ClientFormat::Rgba,
        ClientType::UnsignedByte,
        &unpack,
        &pixels,
    );

    assert_eq!(upload, Upload::Direct);
    let expected: Vec<u8> = (1..=16).collect();
    assert_eq!(contents(&image), expected);
}

#[test]
fn region_offset_moves_the_write() {
    let image = rgba_texture(4, 4);
    let pixels = [0xab; 4];
    let region = Region::new(Offset::new(3, 2, 0), Extent::new(1, 1, 1));

    let upload = image.upload_region(
        &Recorder::default(),
        region,
        ClientFormat::Rgba,
        ClientType::UnsignedByte,
        &UnpackParameters::default(),
        &pixels,
    );

    assert_eq!(upload, Upload::Direct);
    let bytes = contents(&image);
    let at = 2 * image.pitch() + 3 * 4;
    assert_eq!(&bytes[at..at + 4], &pixels);
    assert_eq!(bytes.iter().filter(|&&b| b != 0).count(), 4);
}

#[test]
fn three_channels_get_opaque_alpha() {
    let texture = Arc::new(Level);
    let (format, ty) = (ClientFormat::Rgb, ClientType::HalfFloat);
    let image = Image::for_texture(&texture, 2, 1, 1, format, ty).unwrap();
    assert_eq!(image.internal_format(), InternalFormat::X16B16G16R16F);

    let lanes = [0x3800u16, 0x4000, 0x4200, 0x4400, 0x4500, 0x4600];
    let pixels: Vec<u8> = lanes.iter().flat_map(|lane| lane.to_ne_bytes()).collect();
    let region = Region::with_extent(Extent::new(2, 1, 1));
    let upload = image.upload_region(
        &Recorder::default(),
        region,
        format,
        ty,
        &UnpackParameters::default(),
        &pixels,
    );

    assert_eq!(upload, Upload::Direct);
    let stored: Vec<u16> = contents(&image)
        .chunks_exact(2)
        .map(|lane| u16::from_ne_bytes([lane[0], lane[1]]))
        .collect();
    assert_eq!(
        stored,
        [0x3800, 0x4000, 0x4200, 0x3c00, 0x4400, 0x4500, 0x4600, 0x3c00]
    );
}

#[test]
fn depth_is_normalized() {
    let texture = Arc::new(Level);
    let (format, ty) = (ClientFormat::DepthComponent, ClientType::UnsignedShort);
    let image = Image::for_texture(&texture, 2, 1, 1, format, ty).unwrap();

    let pixels: Vec<u8> = [0u16, 0xffff].iter().flat_map(|d| d.to_ne_bytes()).collect();
    let unpack = UnpackParameters::default();
    let region = Region::with_extent(Extent::new(2, 1, 1));
    let upload = image.upload_region(&Recorder::default(), region, format, ty, &unpack, &pixels);

    assert_eq!(upload, Upload::Direct);
    let depth: Vec<f32> = contents(&image)
        .chunks_exact(4)
        .map(|d| f32::from_ne_bytes([d[0], d[1], d[2], d[3]]))
        .collect();
    assert_eq!(depth, [0.0, 1.0]);
}

#[test]
fn layers_follow_image_height() {
    let texture = Arc::new(Level);
    let (format, ty) = (ClientFormat::Red, ClientType::UnsignedByte);
    let image = Image::for_texture(&texture, 2, 2, 2, format, ty).unwrap();

    // Each client layer has three rows, of which the region covers the first two.
    let unpack = UnpackParameters {
        alignment: 1,
        image_height: 3,
        ..UnpackParameters::default()
    };
    let pixels = [1, 2, 3, 4, 0xee, 0xee, 5, 6, 7, 8, 0xee, 0xee];
    let region = Region::with_extent(Extent::new(2, 2, 2));
    let upload = image.upload_region(&Recorder::default(), region, format, ty, &unpack, &pixels);

    assert_eq!(upload, Upload::Direct);
    assert_eq!(contents(&image), [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn incompatible_storage_is_blitted() {
    let image = Image::render_target(3, 2, InternalFormat::R5G6B5, 1, true).unwrap();
    let recorder = Recorder::default();

    let pixels: Vec<u8> = (0..16).collect();
    let region = Region::new(Offset::new(1, 0, 0), Extent::new(2, 2, 1));
    let upload = image.upload_region(
        &recorder,
        region,
        ClientFormat::Rgba,
        ClientType::UnsignedByte,
        &UnpackParameters::default(),
        &pixels,
    );

    assert_eq!(upload, Upload::Blit);
    assert_eq!(
        recorder.blits.into_inner(),
        [Blit {
            format: InternalFormat::A8B8G8R8,
            extent: Extent::new(2, 2, 1),
            strides: Strides { pitch: 8, slice: 16 },
            first_row: pixels[..8].to_vec(),
            source_rect: Rect::new(0, 0, 2, 2),
            dest_rect: Rect::new(1, 0, 3, 2),
        }]
    );

    // The blitter is in charge of writing, the image is untouched here.
    assert!(contents(&image).iter().all(|&b| b == 0));
}

#[test]
#[should_panic(expected = "unsupported format/type combination")]
fn blit_needs_a_transfer_format() {
    let image = Image::render_target(2, 2, InternalFormat::A8B8G8R8, 1, true).unwrap();

    // Stored as signed bytes, with no format that represents the client bytes exactly.
    let (format, ty) = (ClientFormat::Rgb, ClientType::Byte);
    let region = Region::with_extent(Extent::new(2, 2, 1));
    image.upload_region(
        &Recorder::default(),
        region,
        format,
        ty,
        &UnpackParameters::default(),
        &[0x7f; 16],
    );
}

#[test]
fn unsupported_description_writes_nothing() {
    let image = rgba_texture(2, 2);
    let recorder = Recorder::default();

    let region = Region::with_extent(Extent::new(2, 2, 1));
    let upload = image.upload_region(
        &recorder,
        region,
        ClientFormat::Bgra,
        ClientType::UnsignedShort4444Rev,
        &UnpackParameters::default(),
        &[0xff; 8],
    );

    assert_eq!(upload, Upload::Unsupported);
    assert!(recorder.blits.into_inner().is_empty());
    assert!(contents(&image).iter().all(|&b| b == 0));
}

#[test]
fn locked_out_storage_is_unavailable() {
    let image = Image::render_target(2, 2, InternalFormat::A8B8G8R8, 1, false).unwrap();
    assert!(image.lock(Offset::ORIGIN, Access::ReadOnly).is_none());

    let region = Region::with_extent(Extent::new(2, 2, 1));
    let upload = image.upload_region(
        &Recorder::default(),
        region,
        ClientFormat::Rgba,
        ClientType::UnsignedByte,
        &UnpackParameters::default(),
        &[0xff; 16],
    );

    assert_eq!(upload, Upload::Unavailable);
}

#[test]
fn client_storage_uses_client_pitch() {
    let (format, ty) = (ClientFormat::Red, ClientType::UnsignedByte);
    let image = Image::with_client_storage(2, 2, format, ty, 5).unwrap();
    assert_eq!(image.pitch(), 5);

    let pixels = [1, 2, 0, 0, 3, 4];
    let region = Region::with_extent(Extent::new(2, 2, 1));
    let unpack = UnpackParameters::default();
    let upload = image.upload_region(&Recorder::default(), region, format, ty, &unpack, &pixels);

    assert_eq!(upload, Upload::Direct);
    assert_eq!(contents(&image), [1, 2, 0, 0, 0, 3, 4, 0, 0, 0]);
}

#[test]
fn compressed_rows_of_blocks() {
    let texture = Arc::new(Level);
    let format = ClientFormat::Compressed(CompressedFormat::Etc1Rgb8);
    let image = Image::for_texture(&texture, 8, 8, 1, format, ClientType::UnsignedByte).unwrap();
    assert_eq!(image.pitch(), 16);

    // The lower row of blocks only.
    let blocks: Vec<u8> = (1..=16).collect();
    let region = Region::new(Offset::new(0, 4, 0), Extent::new(8, 4, 1));
    let upload = image.upload_compressed_region(region, blocks.len(), &blocks);

    assert_eq!(upload, Upload::Direct);
    let bytes = contents(&image);
    assert_eq!(&bytes[..16], &[0; 16]);
    assert_eq!(&bytes[16..], &blocks[..]);
}

#[test]
fn compressed_layers_are_slices_apart() {
    let texture = Arc::new(Level);
    let format = ClientFormat::Compressed(CompressedFormat::Etc1Rgb8);
    let image = Image::for_texture(&texture, 8, 4, 2, format, ClientType::UnsignedByte).unwrap();
    assert_eq!((image.pitch(), image.slice()), (16, 16));

    // The right block of both layers.
    let blocks: Vec<u8> = (1..=16).collect();
    let region = Region::new(Offset::new(4, 0, 0), Extent::new(4, 4, 2));
    let upload = image.upload_compressed_region(region, blocks.len(), &blocks);

    assert_eq!(upload, Upload::Direct);
    let bytes = contents(&image);
    assert_eq!(&bytes[..8], &[0; 8]);
    assert_eq!(&bytes[8..16], &blocks[..8]);
    assert_eq!(&bytes[16..24], &[0; 8]);
    assert_eq!(&bytes[24..], &blocks[8..]);
}
