use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use gles_format::{ClientFormat, ClientType, InternalFormat};
use gles_image::{Access, Image, Offset, Release, Texture};

#[derive(Default)]
struct Level {
    sweeps: AtomicUsize,
}

impl Texture for Level {
    fn sweep(&self) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
    }
}

impl Level {
    fn sweeps(&self) -> usize {
        self.sweeps.load(Ordering::Relaxed)
    }
}

fn image_of(texture: &Arc<Level>) -> Image {
    let (format, ty) = (ClientFormat::Rgba, ClientType::UnsignedByte);
    Image::for_texture(texture, 4, 4, 1, format, ty).unwrap()
}

#[test]
fn last_release_destroys() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let other = image.clone();
    assert_eq!(image.ref_count(), 2);

    assert_eq!(other.release(), Release::Retained);
    assert_eq!(texture.sweeps(), 1);
    assert!(image.has_single_reference());

    assert_eq!(image.release(), Release::Destroyed);
    assert_eq!(texture.sweeps(), 1);
}

#[test]
fn unbind_forgets_the_owner() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let held = image.clone();
    assert!(held.is_owned_by(&*texture));

    assert_eq!(image.unbind(&*texture), Release::Retained);
    assert!(!held.is_owned_by(&*texture));
    // No owner is left to be told.
    assert_eq!(texture.sweeps(), 0);

    assert_eq!(held.release(), Release::Destroyed);
}

#[test]
fn unbind_from_another_texture_keeps_the_owner() {
    let texture = Arc::new(Level::default());
    let stranger = Level::default();
    let image = image_of(&texture);
    let held = image.clone();

    assert!(!held.is_owned_by(&stranger));
    assert_eq!(image.unbind(&stranger), Release::Retained);
    assert!(held.is_owned_by(&*texture));
    assert_eq!(texture.sweeps(), 1);
}

#[test]
fn owner_may_go_first() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let held = image.clone();
    drop(texture);

    assert_eq!(image.release(), Release::Retained);
    assert_eq!(held.release(), Release::Destroyed);
}

#[test]
fn unowned_images_release_quietly() {
    let image = Image::render_target(2, 2, InternalFormat::D32F, 4, true).unwrap();
    assert_eq!(image.depth(), 4);

    let other = image.clone();
    assert_eq!(image.release(), Release::Retained);
    assert_eq!(other.release(), Release::Destroyed);
}

#[test]
fn concurrent_releases_destroy_once() {
    const THREADS: usize = 8;

    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let barrier = Barrier::new(THREADS);
    let destroyed = AtomicUsize::new(0);

    let handles: Vec<_> = (0..THREADS).map(|_| image.clone()).collect();
    drop(image);
    assert_eq!(texture.sweeps(), 1);

    thread::scope(|scope| {
        for handle in handles {
            let (barrier, destroyed) = (&barrier, &destroyed);
            scope.spawn(move || {
                barrier.wait();
                if handle.release() == Release::Destroyed {
                    destroyed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(destroyed.into_inner(), 1);
    assert_eq!(texture.sweeps(), THREADS);
}

#[test]
fn dropped_handles_are_released() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let other = image.clone();

    drop(other);
    assert_eq!(texture.sweeps(), 1);
    assert!(image.has_single_reference());

    assert_eq!(image.release(), Release::Destroyed);
    assert_eq!(texture.sweeps(), 1);
}

#[test]
fn dropping_the_last_handle_does_not_sweep() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let other = image.clone();

    assert_eq!(image.release(), Release::Retained);
    drop(other);
    assert_eq!(texture.sweeps(), 1);
}

#[test]
fn released_handles_are_counted_once() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let held = image.clone();
    let other = image.clone();
    assert_eq!(held.ref_count(), 3);

    assert_eq!(image.release(), Release::Retained);
    assert_eq!(held.ref_count(), 2);
    drop(other);
    assert_eq!(held.ref_count(), 1);
    assert_eq!(held.release(), Release::Destroyed);
}

#[test]
fn readers_share_the_storage() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let other = image.clone();

    let first = image.lock(Offset::ORIGIN, Access::ReadOnly).unwrap();
    let second = other.lock(Offset::new(1, 0, 0), Access::ReadOnly).unwrap();
    assert_eq!(first.bytes().len(), second.bytes().len() + 4);

    second.unlock();
    drop(first);
}

#[test]
fn read_locks_do_not_write() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);

    let mut lock = image.lock(Offset::ORIGIN, Access::ReadOnly).unwrap();
    assert!(lock.bytes_mut().is_none());
}

#[test]
fn origin_outside_of_image() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);

    assert!(image.lock(Offset::new(4, 0, 0), Access::ReadOnly).is_none());
    assert!(image.lock(Offset::new(0, 0, 1), Access::ReadWrite).is_none());
}

#[test]
fn sync_waits_for_writers() {
    let texture = Arc::new(Level::default());
    let image = image_of(&texture);
    let barrier = Barrier::new(2);
    let written = AtomicBool::new(false);

    thread::scope(|scope| {
        let handle = image.clone();
        let (barrier, written) = (&barrier, &written);
        scope.spawn(move || {
            let mut lock = handle.lock(Offset::ORIGIN, Access::WriteOnly).unwrap();
            barrier.wait();
            thread::sleep(Duration::from_millis(20));
            lock.bytes_mut().unwrap()[0] = 0x5a;
            written.store(true, Ordering::Release);
        });

        barrier.wait();
        image.sync();
        assert!(written.load(Ordering::Acquire));
    });

    let lock = image.lock(Offset::ORIGIN, Access::ReadOnly).unwrap();
    assert_eq!(lock.bytes()[0], 0x5a);
}
