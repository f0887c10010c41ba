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
use crate::planner::{BoxedPlan, Ops, Plan, Planner, Solver};
use crate::problem::{DftProblem, Problem};
use crate::traits::FftSample;
use crate::twiddles::compute_twiddle;
use num_complex::Complex;
use num_traits::{AsPrimitive, Zero};
use std::sync::Arc;

/// Direct O(n²) in-place DFT over a strided split-buffer layout.
///
/// The base case the recursive decomposition bottoms out in: admissible for
/// any geometry, cheap for none. Its twiddle table lives only between wake
/// and sleep.
pub(crate) struct GenericDft<T> {
    size_n: usize,
    size_stride: usize,
    vector_n: usize,
    vector_stride: usize,
    twiddles: Vec<Complex<T>>,
    ops: Ops,
}

impl<T: FftSample> GenericDft<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(problem: DftProblem) -> GenericDft<T> {
        let n = problem.size.n as f64;
        let vl = problem.vector.n as f64;
        GenericDft {
            size_n: problem.size.n,
            size_stride: problem.size.stride,
            vector_n: problem.vector.n,
            vector_stride: problem.vector.stride,
            twiddles: Vec::new(),
            // n complex multiply-accumulates per output, plus the writeback.
            ops: Ops::new(vl * (4. * n * n - 2. * n), vl * 4. * n * n, vl * 2. * n),
        }
    }

    fn min_len(&self) -> usize {
        self.vector_stride * (self.vector_n - 1) + self.size_stride * (self.size_n - 1) + 1
    }
}

impl<T: FftSample> Plan<T> for GenericDft<T>
where
    f64: AsPrimitive<T>,
{
    fn execute(&self, rio: &mut [T], iio: &mut [T]) -> Result<(), DftwError> {
        if rio.len() != iio.len() {
            return Err(DftwError::MismatchedBuffers(rio.len(), iio.len()));
        }
        let required = self.min_len();
        if rio.len() < required {
            return Err(DftwError::InvalidInPlaceLength(required, rio.len()));
        }
        assert!(
            !self.twiddles.is_empty(),
            "generic DFT executed while asleep"
        );

        let n = self.size_n;
        let is = self.size_stride;
        let mut scratch = try_vec![Complex::<T>::zero(); n];

        for v in 0..self.vector_n {
            let base = v * self.vector_stride;
            for (k, dst) in scratch.iter_mut().enumerate() {
                let mut sum = Complex::<T>::zero();
                let mut twiddle_idx = 0usize;
                for j in 0..n {
                    unsafe {
                        let w = *self.twiddles.get_unchecked(twiddle_idx);
                        let x = Complex::new(
                            *rio.get_unchecked(base + is * j),
                            *iio.get_unchecked(base + is * j),
                        );
                        sum = sum + x * w;
                    }
                    twiddle_idx += k;
                    if twiddle_idx >= n {
                        twiddle_idx -= n;
                    }
                }
                *dst = sum;
            }
            for (k, src) in scratch.iter().enumerate() {
                unsafe {
                    *rio.get_unchecked_mut(base + is * k) = src.re;
                    *iio.get_unchecked_mut(base + is * k) = src.im;
                }
            }
        }
        Ok(())
    }

    fn awake(&mut self) -> Result<(), DftwError> {
        let mut twiddles = try_vec![Complex::<T>::default(); self.size_n];
        for (k, dst) in twiddles.iter_mut().enumerate() {
            *dst = compute_twiddle(k, self.size_n);
        }
        self.twiddles = twiddles;
        Ok(())
    }

    fn sleep(&mut self) {
        self.twiddles = Vec::new();
    }

    fn ops(&self) -> Ops {
        self.ops
    }

    fn describe(&self) -> String {
        format!("(dft-generic-{}x{})", self.size_n, self.vector_n)
    }
}

/// Accepts every non-degenerate [`DftProblem`]; the last resort the planner
/// falls back to when nothing cheaper bids.
pub struct GenericDftSolver;

impl<T: FftSample> Solver<T> for GenericDftSolver
where
    f64: AsPrimitive<T>,
{
    fn plan(
        &self,
        problem: &Problem,
        _planner: &mut Planner<T>,
    ) -> Result<Option<BoxedPlan<T>>, DftwError> {
        let Problem::Dft(p) = problem else {
            return Ok(None);
        };
        if p.size.n == 0 || p.vector.n == 0 {
            return Ok(None);
        }
        Ok(Some(Box::new(GenericDft::new(*p))))
    }
}

pub fn register_generic_dft<T: FftSample>(planner: &mut Planner<T>)
where
    f64: AsPrimitive<T>,
{
    planner.register(Arc::new(GenericDftSolver));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Dim;

    fn awakened(problem: DftProblem) -> GenericDft<f64> {
        let mut dft = GenericDft::new(problem);
        dft.awake().unwrap();
        dft
    }

    #[test]
    fn test_dft4_known_values() {
        let dft = awakened(DftProblem {
            size: Dim::new(4, 1),
            vector: Dim::new(1, 0),
        });
        let mut re = [1.0, 2.0, 3.0, 4.0];
        let mut im = [0.0; 4];
        dft.execute(&mut re, &mut im).unwrap();
        // X = [10, -2+2i, -2, -2-2i]
        let expected_re = [10.0, -2.0, -2.0, -2.0];
        let expected_im = [0.0, 2.0, 0.0, -2.0];
        for i in 0..4 {
            assert!((re[i] - expected_re[i]).abs() < 1e-12, "re at {i}");
            assert!((im[i] - expected_im[i]).abs() < 1e-12, "im at {i}");
        }
    }

    #[test]
    fn test_strided_vectorized_matches_packed() {
        // Two interleaved length-3 transforms: element stride 2, batch stride 1.
        let dft = awakened(DftProblem {
            size: Dim::new(3, 2),
            vector: Dim::new(2, 1),
        });
        let mut re = [0.5, -1.0, 2.0, 0.25, -0.75, 3.0];
        let mut im = [1.0, 0.0, -0.5, 0.125, 2.0, -1.0];
        let packed_re: Vec<Vec<f64>> = (0..2).map(|v| vec![re[v], re[v + 2], re[v + 4]]).collect();
        let packed_im: Vec<Vec<f64>> = (0..2).map(|v| vec![im[v], im[v + 2], im[v + 4]]).collect();

        dft.execute(&mut re, &mut im).unwrap();

        let packed = awakened(DftProblem {
            size: Dim::new(3, 1),
            vector: Dim::new(1, 0),
        });
        for v in 0..2 {
            let mut pre = packed_re[v].clone();
            let mut pim = packed_im[v].clone();
            packed.execute(&mut pre, &mut pim).unwrap();
            for k in 0..3 {
                assert!((re[v + 2 * k] - pre[k]).abs() < 1e-12);
                assert!((im[v + 2 * k] - pim[k]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let dft = awakened(DftProblem {
            size: Dim::new(8, 1),
            vector: Dim::new(1, 0),
        });
        let mut re = [0.0; 4];
        let mut im = [0.0; 4];
        assert!(dft.execute(&mut re, &mut im).is_err());
    }

    #[test]
    fn test_sleep_releases_twiddles() {
        let mut dft = awakened(DftProblem {
            size: Dim::new(6, 1),
            vector: Dim::new(1, 0),
        });
        assert!(!dft.twiddles.is_empty());
        dft.sleep();
        assert!(dft.twiddles.is_empty());
    }
}
