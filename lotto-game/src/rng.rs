//! Seeded, domain-separated random streams for a session.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Random source handed out by [`RngBundle`].
pub type StreamRng = CountingRng<SmallRng>;

/// Named random streams. The label is the HMAC domain tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Profiles,
    Events,
    Draws,
    Picks,
}

impl Stream {
    const ALL: [Self; 4] = [Self::Profiles, Self::Events, Self::Draws, Self::Picks];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Events => "events",
            Self::Draws => "draws",
            Self::Picks => "picks",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Independent RNG streams derived from one user-visible seed, so that e.g.
/// buying an extra ticket never shifts which life events happen later.
#[derive(Debug)]
pub struct RngBundle {
    streams: [RefCell<StreamRng>; 4],
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            streams: Stream::ALL.map(|stream| RefCell::new(open_stream(seed, stream))),
        }
    }

    /// Borrow one stream for the duration of the returned guard.
    #[must_use]
    pub fn stream(&self, stream: Stream) -> RefMut<'_, StreamRng> {
        self.streams[stream.slot()].borrow_mut()
    }

    /// Profile candidate generation.
    #[must_use]
    pub fn profiles(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Profiles)
    }

    /// Daily event gate and selection.
    #[must_use]
    pub fn events(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Events)
    }

    #[must_use]
    pub fn draws(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Draws)
    }

    #[must_use]
    pub fn picks(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Picks)
    }
}

fn open_stream(user_seed: u64, stream: Stream) -> StreamRng {
    CountingRng {
        inner: SmallRng::seed_from_u64(derive_stream_seed(user_seed, stream.label().as_bytes())),
        taken: 0,
    }
}

/// Wraps a generator and tallies every call made against it.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    inner: R,
    taken: u64,
}

impl<R> CountingRng<R> {
    /// Number of generator calls taken from this stream so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.taken
    }

    fn tick(&mut self) -> &mut R {
        self.taken = self.taken.saturating_add(1);
        &mut self.inner
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.tick().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.tick().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.tick().fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.tick().try_fill_bytes(dest)
    }
}

/// First eight bytes of HMAC-SHA256(key = seed, message = domain tag).
fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
