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

/// Which side of the recursion applies the twiddle factors.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum DecimationMode {
    /// Twiddle multiplication first, then the child transforms.
    Time,
    /// Child transforms first, then the twiddle multiplication.
    Frequency,
}

/// One extent/stride pair of a strided layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dim {
    pub n: usize,
    pub stride: usize,
}

impl Dim {
    pub const fn new(n: usize, stride: usize) -> Dim {
        Dim { n, stride }
    }
}

/// An in-place complex DFT request: `vector.n` transforms of length `size.n`,
/// element stride `size.stride`, batch stride `vector.stride`, over a split
/// real/imaginary buffer pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DftProblem {
    pub size: Dim,
    pub vector: Dim,
}

/// A twiddle-decomposition step: the data is an `outer × inner` matrix with
/// element `(j, k)` at offset `stride * (j * inner + k)`, to be multiplied by
/// the roots of unity of order `outer * inner` and transformed column-wise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DftwProblem {
    pub outer: usize,
    pub inner: usize,
    pub stride: usize,
    pub twiddle_stride: usize,
    pub batch: usize,
    pub batch_stride: usize,
    pub twiddle_batch_stride: usize,
    pub decimation: DecimationMode,
}

impl DftwProblem {
    /// The canonical in-place geometry: twiddle strides coincide with data
    /// strides and there is no batching.
    pub const fn in_place(
        outer: usize,
        inner: usize,
        stride: usize,
        decimation: DecimationMode,
    ) -> DftwProblem {
        DftwProblem {
            outer,
            inner,
            stride,
            twiddle_stride: stride,
            batch: 1,
            batch_stride: 0,
            twiddle_batch_stride: 0,
            decimation,
        }
    }

    pub const fn transform_length(&self) -> usize {
        self.outer * self.inner
    }
}

/// Everything the planner knows how to plan. Solvers pattern-match and
/// refuse shapes they do not serve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Problem {
    Dft(DftProblem),
    Dftw(DftwProblem),
}
