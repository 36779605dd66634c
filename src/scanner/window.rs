/*! Boundary-safe, width-parameterized loads.

Pattern scanning issues register-width and vector-width reads that start
near the first or last byte of a buffer, where an unconditional wide read
would cross into memory the scan does not own. The cautious loads below
make such reads defined: every byte of the result that falls outside the
window is zero, and memory outside the window is never touched. The
`load`/`load_aligned` variants skip the masking for the common mid-buffer
case where the caller has already proven the full width safe.

One generic implementation serves every width; [`LoadValue`] supplies the
width, the alignment, and the byte-array carrier, and the compiler
monomorphizes a concrete load per width.
*/

use std::mem;

/// A fixed-width value the scan loop can load from a [`Window`].
///
/// Implemented for the scalar widths `u8` through `u64` and for `u128`,
/// which stands in for one 16-byte vector register.
pub trait LoadValue: Copy {
    /// Natural width of the value, in bytes.
    const WIDTH: usize;

    /// Address alignment required by [`Window::load_aligned`]. Equal to
    /// [`Self::WIDTH`] for the scalar widths and to the vector register
    /// alignment for the wide width.
    const ALIGN: usize;

    /// The `[u8; WIDTH]` carrier for the value's bytes.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy;

    /// Reassembles a value from bytes in memory order.
    fn from_ne_bytes(bytes: Self::Bytes) -> Self;

    /// The value's bytes, in memory order.
    fn to_ne_bytes(self) -> Self::Bytes;
}

macro_rules! impl_load_value {
    ($ty:ty, $align:expr) => {
        impl LoadValue for $ty {
            const WIDTH: usize = mem::size_of::<$ty>();
            const ALIGN: usize = $align;
            type Bytes = [u8; mem::size_of::<$ty>()];

            #[inline]
            fn from_ne_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_ne_bytes(bytes)
            }

            #[inline]
            fn to_ne_bytes(self) -> Self::Bytes {
                <$ty>::to_ne_bytes(self)
            }
        }
    };
}

impl_load_value!(u8, 1);
impl_load_value!(u16, 2);
impl_load_value!(u32, 4);
impl_load_value!(u64, 8);
// The wide vector width: one 16-byte lane, aligned as the register is.
impl_load_value!(u128, 16);

/// A bounded view of scan memory.
///
/// `buf` is the readable buffer and `[lo, hi)` the subrange of it that the
/// current load may observe; the range is typically narrower than the
/// buffer near a stream boundary. Loads target a byte position `at` in
/// `buf`. The cautious variants zero-fill every result byte whose position
/// falls outside `[lo, hi)` and never read such bytes.
///
/// `lo > hi` is permitted and denotes an empty window: every cautious load
/// through it yields zero.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    buf: &'a [u8],
    lo: usize,
    hi: usize,
}

impl<'a> Window<'a> {
    /// Creates a window over `buf` restricted to `[lo, hi)`.
    ///
    /// # Panics
    ///
    /// When the non-empty range reaches past the end of `buf`; a window
    /// claiming unbacked bytes is an upstream bug, not a maskable
    /// condition.
    pub fn new(buf: &'a [u8], lo: usize, hi: usize) -> Window<'a> {
        assert!(hi <= buf.len() || lo >= hi);
        Window { buf, lo, hi }
    }

    /// A window over all of `buf`.
    pub fn whole(buf: &'a [u8]) -> Window<'a> {
        Window { buf, lo: 0, hi: buf.len() }
    }

    /// Lower end of the observable range.
    #[inline]
    pub fn lo(&self) -> usize {
        self.lo
    }

    /// Upper end of the observable range.
    #[inline]
    pub fn hi(&self) -> usize {
        self.hi
    }

    /// Loads `T::WIDTH` bytes starting at `at`, in memory order.
    ///
    /// The caller must have proven `lo <= at` and `at + T::WIDTH <= hi`;
    /// this variant pays no masking cost in exchange.
    #[inline]
    pub fn load<T: LoadValue>(&self, at: usize) -> T {
        debug_assert!(self.lo <= at && at + T::WIDTH <= self.hi);
        let mut bytes = T::Bytes::default();
        bytes.as_mut().copy_from_slice(&self.buf[at..at + T::WIDTH]);
        T::from_ne_bytes(bytes)
    }

    /// Like [`Window::load`], for positions known to sit on a `T::ALIGN`
    /// address boundary. For single-byte loads there is no distinction.
    #[inline]
    pub fn load_aligned<T: LoadValue>(&self, at: usize) -> T {
        debug_assert_eq!(
            (self.buf.as_ptr() as usize).wrapping_add(at) % T::ALIGN,
            0
        );
        self.load(at)
    }

    /// Cautious toward the upper bound: result byte `i` is `buf[at + i]`
    /// when `at + i < hi` and zero otherwise. `hi` at or below `at` yields
    /// all zeroes. The lower bound is the caller's to prove.
    #[inline]
    pub fn load_cautious_fwd<T: LoadValue>(&self, at: usize) -> T {
        debug_assert!(self.lo <= at);
        let mut bytes = T::Bytes::default();
        let end = self.hi.min(at + T::WIDTH);
        if at < end {
            bytes.as_mut()[..end - at].copy_from_slice(&self.buf[at..end]);
        }
        T::from_ne_bytes(bytes)
    }

    /// Cautious toward the lower bound: result byte `i` is `buf[at + i]`
    /// when `at + i >= lo` and zero otherwise. The upper bound is the
    /// caller's to prove.
    #[inline]
    pub fn load_cautious_bck<T: LoadValue>(&self, at: usize) -> T {
        debug_assert!(at + T::WIDTH <= self.hi);
        let mut bytes = T::Bytes::default();
        let start = self.lo.max(at);
        let end = at + T::WIDTH;
        if start < end {
            bytes.as_mut()[start - at..].copy_from_slice(&self.buf[start..end]);
        }
        T::from_ne_bytes(bytes)
    }

    /// Cautious at both ends: result byte `i` is `buf[at + i]` only when
    /// `lo <= at + i < hi`. Subsumes the forward and backward variants and
    /// is the variant to use when neither bound is statically safe.
    #[inline]
    pub fn load_cautious<T: LoadValue>(&self, at: usize) -> T {
        let mut bytes = T::Bytes::default();
        let start = self.lo.max(at);
        let end = self.hi.min(at + T::WIDTH);
        if start < end {
            bytes.as_mut()[start - at..end - at]
                .copy_from_slice(&self.buf[start..end]);
        }
        T::from_ne_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{LoadValue, Window};

    /// Backing storage for the load tests, 16-byte aligned so the aligned
    /// variant can be exercised at offset 0.
    #[repr(align(16))]
    struct AlignedBuf([u8; 64]);

    impl AlignedBuf {
        fn filled() -> AlignedBuf {
            let mut buf = AlignedBuf([0; 64]);
            for (i, b) in buf.0.iter_mut().enumerate() {
                *b = (i % 254 + 1) as u8;
            }
            buf
        }
    }

    macro_rules! load_tests {
        ($name:ident, $ty:ty) => {
            mod $name {
                use super::*;
                use pretty_assertions::assert_eq;

                const W: usize = <$ty as LoadValue>::WIDTH;

                #[test]
                fn normal_at_any_alignment() {
                    let mem = AlignedBuf::filled();
                    for i in 0..16 {
                        let w = Window::new(&mem.0, i, i + W);
                        let val: $ty = w.load(i);
                        assert_eq!(&mem.0[i..i + W], val.to_ne_bytes().as_ref());
                    }
                }

                #[test]
                fn aligned() {
                    let mem = AlignedBuf::filled();
                    let w = Window::whole(&mem.0);
                    for at in [0, W, W * 2] {
                        let val: $ty = w.load_aligned(at);
                        assert_eq!(
                            &mem.0[at..at + W],
                            val.to_ne_bytes().as_ref()
                        );
                    }
                }

                #[test]
                fn cautious_fwd_zero_fills_past_hi() {
                    let mem = AlignedBuf::filled();
                    // Offset 1 forces the access off its natural alignment.
                    let buf = &mem.0[1..1 + W];
                    for i in 1..=W {
                        let w = Window::new(buf, 0, i);
                        let val: $ty = w.load_cautious_fwd(0);
                        let bytes = val.to_ne_bytes();
                        for j in 0..W {
                            let expected = if j < i { buf[j] } else { 0 };
                            assert_eq!(
                                expected,
                                bytes.as_ref()[j],
                                "hi={} byte={}",
                                i,
                                j
                            );
                        }
                    }
                }

                #[test]
                fn cautious_fwd_hi_below_at_is_zero() {
                    let mem = AlignedBuf::filled();
                    let w = Window::new(&mem.0, 2, 2);
                    let val: $ty = w.load_cautious_fwd(2);
                    assert_eq!(<$ty>::default(), val);

                    let w = Window::new(&mem.0, 2, 4);
                    let val: $ty = w.load_cautious_fwd(8);
                    assert_eq!(<$ty>::default(), val);
                }

                #[test]
                fn cautious_bck_zero_fills_before_lo() {
                    let mem = AlignedBuf::filled();
                    let buf = &mem.0[1..1 + W];
                    for i in 1..=W {
                        let w = Window::new(buf, W - i, W);
                        let val: $ty = w.load_cautious_bck(0);
                        let bytes = val.to_ne_bytes();
                        for j in 0..W {
                            let expected = if j < W - i { 0 } else { buf[j] };
                            assert_eq!(
                                expected,
                                bytes.as_ref()[j],
                                "lo={} byte={}",
                                W - i,
                                j
                            );
                        }
                    }
                }

                #[test]
                fn cautious_everywhere_grid() {
                    let mem = AlignedBuf::filled();
                    let buf = &mem.0[1..1 + W];
                    for i in 0..=W {
                        for j in 0..=W {
                            let w = Window::new(buf, i, j);
                            let val: $ty = w.load_cautious(0);
                            let bytes = val.to_ne_bytes();
                            for k in 0..W {
                                let expected =
                                    if k >= i && k < j { buf[k] } else { 0 };
                                assert_eq!(
                                    expected,
                                    bytes.as_ref()[k],
                                    "lo={} hi={} byte={}",
                                    i,
                                    j,
                                    k
                                );
                            }
                        }
                    }
                }

                #[test]
                fn cautious_matches_normal_when_window_covers() {
                    let mem = AlignedBuf::filled();
                    let w = Window::new(&mem.0, 3, 3 + W);
                    let normal: $ty = w.load(3);
                    let fwd: $ty = w.load_cautious_fwd(3);
                    let bck: $ty = w.load_cautious_bck(3);
                    let both: $ty = w.load_cautious(3);
                    assert_eq!(normal, fwd);
                    assert_eq!(normal, bck);
                    assert_eq!(normal, both);
                }
            }
        };
    }

    load_tests!(load_u8, u8);
    load_tests!(load_u16, u16);
    load_tests!(load_u32, u32);
    load_tests!(load_u64, u64);
    load_tests!(load_u128, u128);
}
