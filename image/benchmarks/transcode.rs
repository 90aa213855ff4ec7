//! Benchmarks row transcoding of client data into storage.
use brunch::Bench;

use gles_format::{compute_pitch, resolve_storage_format, ClientFormat, ClientType};
use gles_image::{transcode, Dispatch, Extent, StorageLayout, Strides};

struct Transcode {
    format: ClientFormat,
    ty: ClientType,
    sz: u32,
}

impl Transcode {
    fn name(&self) -> String {
        format!("transcode({:?}/{:?}, {})", self.format, self.ty, self.sz)
    }

    fn prepare(self) -> impl FnMut() {
        let Transcode { format, ty, sz } = self;
        let internal = resolve_storage_format(format, ty);
        let layout = StorageLayout::new(internal, sz, sz, 1).expect("Failed to setup benchmark");

        let pitch = compute_pitch(sz, format, ty, 4);
        let source = vec![0x5a; pitch * sz as usize];
        let mut dest = vec![0; layout.byte_len()];

        let extent = Extent::new(sz, sz, 1);
        let source_strides = Strides::with_rows(pitch, sz as usize);
        let Dispatch::Single(pixels) = Dispatch::select(format, ty) else {
            panic!("No single plane for {format:?}/{ty:?}");
        };

        move || {
            transcode(
                pixels,
                extent,
                &source,
                source_strides,
                &mut dest,
                layout.strides(),
            )
        }
    }
}

fn main() {
    let tests = [
        /* verbatim copies */
        Transcode {
            format: ClientFormat::Rgba,
            ty: ClientType::UnsignedByte,
            sz: 256,
        },
        Transcode {
            format: ClientFormat::Rgba,
            ty: ClientType::Float,
            sz: 256,
        },
        /* widening of three channels */
        Transcode {
            format: ClientFormat::Rgb,
            ty: ClientType::UnsignedByte,
            sz: 256,
        },
        Transcode {
            format: ClientFormat::Rgb,
            ty: ClientType::HalfFloat,
            sz: 256,
        },
        /* packed encodings */
        Transcode {
            format: ClientFormat::Rgba,
            ty: ClientType::UnsignedShort4444,
            sz: 256,
        },
        Transcode {
            format: ClientFormat::Rgba,
            ty: ClientType::UnsignedShort5551,
            sz: 256,
        },
        Transcode {
            format: ClientFormat::Rgb,
            ty: ClientType::UnsignedInt10F11F11FRev,
            sz: 256,
        },
        Transcode {
            format: ClientFormat::Rgb,
            ty: ClientType::UnsignedInt5999Rev,
            sz: 256,
        },
        /* depth normalization */
        Transcode {
            format: ClientFormat::DepthComponent,
            ty: ClientType::UnsignedShort,
            sz: 256,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|test| {
        Bench::new(format!("gles_image::transcode::main::{}", test.name())).run(test.prepare())
    }));
    benches.finish();
}
