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

//! Cost-driven Cooley-Tukey twiddle decomposition for composite-size DFTs.
//!
//! A transform of size `n = r·m` is expressed as `m` column transforms of
//! length `r` plus an element-wise multiplication by roots of unity, with two
//! competing twiddle representations (one dense shared table, or two
//! `O(sqrt(n))` tables) offered to a cost-comparing planner as independent
//! solvers. Plans operate in place on split real/imaginary buffer pairs and
//! carry an explicit wake/sleep resource lifecycle around execution.

mod dft;
mod dftw;
mod err;
mod planner;
mod problem;
mod traits;
mod twiddles;

pub use dft::{register_generic_dft, GenericDftSolver};
pub use dftw::{register_dftw_solvers, DftwDftSolver, TableKind};
pub use err::DftwError;
pub use planner::{BoxedPlan, Ops, Plan, Planner, PlannerMode, Solver};
pub use problem::{DecimationMode, DftProblem, DftwProblem, Dim, Problem};
pub use traits::{FftSample, FftTrigonometry};
pub use twiddles::TwiddleCache;
