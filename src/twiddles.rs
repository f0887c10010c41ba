/*
 * // Copyright (c) Radzivon Bartoshyk 10/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::err::{try_vec, DftwError};
use crate::traits::{FftSample, FftTrigonometry};
use num_complex::Complex;
use num_traits::{AsPrimitive, Float};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// The forward root of unity `e^{-2πi·index/n}`.
///
/// The index is reduced modulo `n` before the angle is formed, so arbitrarily
/// large product indices stay exact and no rotation is ever iterated.
pub(crate) fn compute_twiddle<T: Float + FftTrigonometry + 'static>(
    index: usize,
    n: usize,
) -> Complex<T>
where
    f64: AsPrimitive<T>,
{
    let reduced = index % n;
    let angle = (-2. * reduced as f64 / n as f64).as_();
    let (v_sin, v_cos) = angle.sincos_pi();
    Complex {
        re: v_cos,
        im: v_sin,
    }
}

struct CacheEntry<T> {
    refs: usize,
    table: Arc<[Complex<T>]>,
}

/// Memoized dense twiddle tables, keyed by `(n, r, m)` and shared between
/// plans with identical keys.
///
/// Plans acquire on wake and release on sleep, always in matching pairs; a
/// table is freed when its last holder releases it. Tables are never mutated
/// after construction.
pub struct TwiddleCache<T> {
    entries: HashMap<(usize, usize, usize), CacheEntry<T>>,
}

impl<T: FftSample> TwiddleCache<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new() -> TwiddleCache<T> {
        TwiddleCache {
            entries: HashMap::new(),
        }
    }

    /// Returns the dense table of `n` forward roots for the key, building it
    /// on first acquisition.
    pub fn acquire(
        &mut self,
        n: usize,
        r: usize,
        m: usize,
    ) -> Result<Arc<[Complex<T>]>, DftwError> {
        match self.entries.entry((n, r, m)) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.refs += 1;
                Ok(entry.table.clone())
            }
            Entry::Vacant(vacant) => {
                let mut table = try_vec![Complex::<T>::default(); n];
                for (i, dst) in table.iter_mut().enumerate() {
                    *dst = compute_twiddle(i, n);
                }
                let table: Arc<[Complex<T>]> = table.into();
                vacant.insert(CacheEntry {
                    refs: 1,
                    table: table.clone(),
                });
                Ok(table)
            }
        }
    }

    /// Drops one reference to the key's table, freeing it at zero.
    pub fn release(&mut self, n: usize, r: usize, m: usize) {
        let Some(entry) = self.entries.get_mut(&(n, r, m)) else {
            panic!("twiddle table ({n}, {r}, {m}) released without a matching acquire");
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.entries.remove(&(n, r, m));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: FftSample> Default for TwiddleCache<T>
where
    f64: AsPrimitive<T>,
{
    fn default() -> Self {
        TwiddleCache::new()
    }
}

/// Integer approximation of `log2(sqrt(n))`: count divisions of `n` by 4
/// until it reaches zero.
///
/// This intentionally overshoots the exact square root by up to one bit; the
/// resulting table split is an empirically tuned trade and must not be
/// replaced by a closed form.
pub(crate) fn choose_log2_twradix(n: usize) -> u32 {
    let mut log2r = 0u32;
    let mut n = n;
    while n > 0 {
        log2r += 1;
        n /= 4;
    }
    log2r
}

/// The `O(sqrt(n))` twiddle representation: two tables of positive-angle
/// roots whose pairwise products reconstruct any root of order `n`.
///
/// `w0[i]` sits at angle `2π·i/n` for `i < 2^k`, `w1[i]` at `2π·(i·2^k)/n`,
/// `k = choose_log2_twradix(n)`. For a product index `jk`,
/// `w1[jk >> k] * w0[jk & (2^k - 1)]` equals the root at `2π·jk/n` up to
/// rounding. Owned by exactly one plan, never shared.
pub(crate) struct SplitTwiddles<T> {
    log2_twradix: u32,
    w0: Vec<Complex<T>>,
    w1: Vec<Complex<T>>,
}

impl<T: FftSample> SplitTwiddles<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn build(n: usize) -> Result<SplitTwiddles<T>, DftwError> {
        let log2_twradix = choose_log2_twradix(n);
        let twradix = 1usize << log2_twradix;
        let n0 = twradix;
        let n1 = (n + twradix - 1) / twradix;

        let mut w0 = try_vec![Complex::<T>::default(); n0];
        for (i, dst) in w0.iter_mut().enumerate() {
            *dst = compute_twiddle::<T>(i, n).conj();
        }
        let mut w1 = try_vec![Complex::<T>::default(); n1];
        for (i, dst) in w1.iter_mut().enumerate() {
            *dst = compute_twiddle::<T>(i * twradix, n).conj();
        }

        Ok(SplitTwiddles {
            log2_twradix,
            w0,
            w1,
        })
    }

    #[inline]
    pub(crate) fn log2_twradix(&self) -> u32 {
        self.log2_twradix
    }

    #[inline]
    pub(crate) fn w0(&self) -> &[Complex<T>] {
        &self.w0
    }

    #[inline]
    pub(crate) fn w1(&self) -> &[Complex<T>] {
        &self.w1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_log2_twradix() {
        assert_eq!(choose_log2_twradix(1), 1);
        assert_eq!(choose_log2_twradix(3), 1);
        assert_eq!(choose_log2_twradix(4), 2);
        assert_eq!(choose_log2_twradix(16), 3);
        assert_eq!(choose_log2_twradix(16384), 8);
        assert_eq!(choose_log2_twradix(65536), 9);
        assert_eq!(choose_log2_twradix(65537), 9);
    }

    #[test]
    fn test_split_reconstruction_law() {
        for n in [12usize, 60, 210, 1000] {
            let split = SplitTwiddles::<f64>::build(n).unwrap();
            let shift = split.log2_twradix();
            let mask = (1usize << shift) - 1;
            for jk in 0..n {
                let reconstructed = split.w1()[jk >> shift] * split.w0()[jk & mask];
                let angle = 2. * std::f64::consts::PI * jk as f64 / n as f64;
                assert!(
                    (reconstructed.re - angle.cos()).abs() < 1e-12,
                    "re mismatch at jk={jk}, n={n}"
                );
                assert!(
                    (reconstructed.im - angle.sin()).abs() < 1e-12,
                    "im mismatch at jk={jk}, n={n}"
                );
            }
        }
    }

    #[test]
    fn test_split_table_sizes() {
        let n = 16385usize;
        let split = SplitTwiddles::<f64>::build(n).unwrap();
        let twradix = 1usize << split.log2_twradix();
        assert_eq!(split.w0().len(), twradix);
        assert_eq!(split.w1().len(), (n + twradix - 1) / twradix);
    }

    #[test]
    fn test_cache_shares_identical_keys() {
        let mut cache = TwiddleCache::<f64>::new();
        let first = cache.acquire(15, 3, 5).unwrap();
        let second = cache.acquire(15, 3, 5).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let other = cache.acquire(15, 5, 3).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));

        cache.release(15, 3, 5);
        assert!(!cache.is_empty());
        cache.release(15, 3, 5);
        cache.release(15, 5, 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_full_table_matches_direct_roots() {
        let mut cache = TwiddleCache::<f64>::new();
        let table = cache.acquire(24, 4, 6).unwrap();
        for (i, w) in table.iter().enumerate() {
            let angle = -2. * std::f64::consts::PI * i as f64 / 24.;
            assert!((w.re - angle.cos()).abs() < 1e-12);
            assert!((w.im - angle.sin()).abs() < 1e-12);
        }
        cache.release(24, 4, 6);
    }
}
