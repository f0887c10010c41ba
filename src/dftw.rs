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

//! Twiddle decomposition of a composite-size DFT: a [`DftwProblem`] is solved
//! as an element-wise multiplication by roots of unity plus one recursive
//! child transform, in the order fixed by the decimation mode.

use crate::err::DftwError;
use crate::planner::{BoxedPlan, Ops, Plan, Planner, PlannerMode, Solver};
use crate::problem::{DecimationMode, DftProblem, DftwProblem, Dim, Problem};
use crate::traits::FftSample;
use crate::twiddles::{SplitTwiddles, TwiddleCache};
use num_complex::Complex;
use num_traits::AsPrimitive;
use std::sync::{Arc, Mutex};

/// Above this transform size the dense table stops being attractive under
/// restricted planning.
const DENSE_TABLE_CEILING: usize = 16384;
/// At or below this transform size the split table stops being attractive
/// under restricted planning.
const SPLIT_TABLE_FLOOR: usize = 65536;

/// Which twiddle representation a plan carries. Resolved once at plan
/// construction; the execution path never re-dispatches per element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TableKind {
    /// One dense table of `n` roots, shared through the planner's cache.
    Full,
    /// Two `O(sqrt(n))` tables owned exclusively by the plan.
    Split,
}

impl TableKind {
    fn ordinal(self) -> u32 {
        match self {
            TableKind::Full => 1,
            TableKind::Split => 2,
        }
    }
}

/// Twiddle resources held between wake and sleep.
enum TwiddleTable<T> {
    Idle,
    Full(Arc<[Complex<T>]>),
    Split(SplitTwiddles<T>),
}

/// The decomposition dispatcher: multiplies the `outer × inner` data matrix
/// by twiddle factors and hands the column transforms to the exclusively
/// owned child plan.
pub(crate) struct DftwPlan<T> {
    outer: usize,
    inner: usize,
    stride: usize,
    decimation: DecimationMode,
    kind: TableKind,
    child: BoxedPlan<T>,
    table: TwiddleTable<T>,
    cache: Arc<Mutex<TwiddleCache<T>>>,
    ops: Ops,
}

impl<T: FftSample> DftwPlan<T>
where
    f64: AsPrimitive<T>,
{
    /// Multiplies every non-identity `(j, k)` element by the root of unity at
    /// angle `-2π·jk/n`. The `j = 0` row and `k = 0` column are fixed points
    /// of the decomposition and are skipped.
    fn bytwiddle(&self, rio: &mut [T], iio: &mut [T]) {
        match self.table {
            TwiddleTable::Full(ref table) => self.bytwiddle_full(table, rio, iio),
            TwiddleTable::Split(ref split) => self.bytwiddle_split(split, rio, iio),
            TwiddleTable::Idle => panic!("twiddle plan executed while asleep"),
        }
    }

    fn bytwiddle_full(&self, table: &[Complex<T>], rio: &mut [T], iio: &mut [T]) {
        let (r, m, s) = (self.outer, self.inner, self.stride);
        for j in 1..r {
            for k in 1..m {
                let jk = j * k;
                let idx = s * (j * m + k);
                unsafe {
                    let w = *table.get_unchecked(jk);
                    let xr = *rio.get_unchecked(idx);
                    let xi = *iio.get_unchecked(idx);
                    *rio.get_unchecked_mut(idx) = xr * w.re - xi * w.im;
                    *iio.get_unchecked_mut(idx) = xi * w.re + xr * w.im;
                }
            }
        }
    }

    fn bytwiddle_split(&self, split: &SplitTwiddles<T>, rio: &mut [T], iio: &mut [T]) {
        let (r, m, s) = (self.outer, self.inner, self.stride);
        let twshft = split.log2_twradix();
        let twmsk = (1usize << twshft) - 1;
        let w0 = split.w0();
        let w1 = split.w1();
        for j in 1..r {
            for k in 1..m {
                let jk = j * k;
                let idx = s * (j * m + k);
                unsafe {
                    let c0 = *w0.get_unchecked(jk & twmsk);
                    let c1 = *w1.get_unchecked(jk >> twshft);
                    // One complex multiply reconstructs the positive-angle
                    // root; the conjugating form below applies its inverse.
                    let wr = c1.re * c0.re - c1.im * c0.im;
                    let wi = c1.im * c0.re + c1.re * c0.im;
                    let xr = *rio.get_unchecked(idx);
                    let xi = *iio.get_unchecked(idx);
                    *rio.get_unchecked_mut(idx) = xr * wr + xi * wi;
                    *iio.get_unchecked_mut(idx) = xi * wr - xr * wi;
                }
            }
        }
    }
}

impl<T: FftSample> Plan<T> for DftwPlan<T>
where
    f64: AsPrimitive<T>,
{
    fn execute(&self, rio: &mut [T], iio: &mut [T]) -> Result<(), DftwError> {
        if rio.len() != iio.len() {
            return Err(DftwError::MismatchedBuffers(rio.len(), iio.len()));
        }
        let required = self.stride * (self.outer * self.inner - 1) + 1;
        if rio.len() < required {
            return Err(DftwError::InvalidInPlaceLength(required, rio.len()));
        }
        match self.decimation {
            DecimationMode::Time => {
                self.bytwiddle(rio, iio);
                self.child.execute(rio, iio)
            }
            DecimationMode::Frequency => {
                self.child.execute(rio, iio)?;
                self.bytwiddle(rio, iio);
                Ok(())
            }
        }
    }

    fn awake(&mut self) -> Result<(), DftwError> {
        assert!(
            matches!(self.table, TwiddleTable::Idle),
            "twiddle plan awakened twice"
        );
        // Child resources must exist before this level's table is needed.
        self.child.awake()?;
        let n = self.outer * self.inner;
        self.table = match self.kind {
            TableKind::Full => {
                let table = self
                    .cache
                    .lock()
                    .unwrap()
                    .acquire(n, self.outer, self.inner)?;
                TwiddleTable::Full(table)
            }
            TableKind::Split => TwiddleTable::Split(SplitTwiddles::build(n)?),
        };
        Ok(())
    }

    fn sleep(&mut self) {
        match std::mem::replace(&mut self.table, TwiddleTable::Idle) {
            TwiddleTable::Full(table) => {
                drop(table);
                self.cache
                    .lock()
                    .unwrap()
                    .release(self.outer * self.inner, self.outer, self.inner);
            }
            TwiddleTable::Split(split) => drop(split),
            TwiddleTable::Idle => panic!("twiddle plan put to sleep while not awake"),
        }
        self.child.sleep();
    }

    fn ops(&self) -> Ops {
        self.ops
    }

    fn describe(&self) -> String {
        format!(
            "(dftw-dft{}-{}-{} {})",
            self.kind.ordinal(),
            self.outer,
            self.inner,
            self.child.describe()
        )
    }
}

impl<T> Drop for DftwPlan<T> {
    fn drop(&mut self) {
        // Sleep must always precede destruction.
        assert!(
            matches!(self.table, TwiddleTable::Idle),
            "twiddle plan dropped with its table still allocated"
        );
    }
}

/// One solver per [`TableKind`]; both register with the planner and bid
/// independently.
pub struct DftwDftSolver {
    kind: TableKind,
}

impl DftwDftSolver {
    pub fn new(kind: TableKind) -> DftwDftSolver {
        DftwDftSolver { kind }
    }

    fn applicable(&self, p: &DftwProblem, mode: PlannerMode) -> bool {
        // In-place only, and batched application is unsupported.
        if p.batch != 1
            || p.stride != p.twiddle_stride
            || p.batch_stride != p.twiddle_batch_stride
        {
            return false;
        }
        if mode == PlannerMode::Restricted {
            match self.kind {
                TableKind::Full => {
                    if p.transform_length() > DENSE_TABLE_CEILING {
                        return false;
                    }
                }
                TableKind::Split => {
                    if p.transform_length() <= SPLIT_TABLE_FLOOR {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl<T: FftSample> Solver<T> for DftwDftSolver
where
    f64: AsPrimitive<T>,
{
    fn plan(
        &self,
        problem: &Problem,
        planner: &mut Planner<T>,
    ) -> Result<Option<BoxedPlan<T>>, DftwError> {
        let Problem::Dftw(p) = problem else {
            return Ok(None);
        };
        if !self.applicable(p, planner.mode()) {
            return Ok(None);
        }

        // `inner` column transforms of length `outer`, one per column.
        let child_problem = Problem::Dft(DftProblem {
            size: Dim::new(p.outer, p.inner * p.stride),
            vector: Dim::new(p.inner, p.stride),
        });
        let Some(child) = planner.plan(&child_problem)? else {
            return Ok(None);
        };

        let n0 = ((p.outer - 1) * (p.inner - 1)) as f64;
        let ops = child.ops() + Ops::new(4. * n0, 8. * n0, 8. * n0);

        Ok(Some(Box::new(DftwPlan {
            outer: p.outer,
            inner: p.inner,
            stride: p.stride,
            decimation: p.decimation,
            kind: self.kind,
            child,
            table: TwiddleTable::Idle,
            cache: planner.twiddle_cache(),
            ops,
        })))
    }
}

/// Registers both table representations with the planner.
pub fn register_dftw_solvers<T: FftSample>(planner: &mut Planner<T>)
where
    f64: AsPrimitive<T>,
{
    planner.register(Arc::new(DftwDftSolver::new(TableKind::Full)));
    planner.register(Arc::new(DftwDftSolver::new(TableKind::Split)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dft::register_generic_dft;

    fn synthetic(n: usize) -> (Vec<f64>, Vec<f64>) {
        let re = (0..n).map(|i| (i as f64 * 0.37).sin() + 0.1).collect();
        let im = (0..n).map(|i| (i as f64 * 0.23).cos() - 0.05).collect();
        (re, im)
    }

    fn reference_dft(re: &[f64], im: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = re.len();
        let mut out_re = vec![0.0; n];
        let mut out_im = vec![0.0; n];
        for k in 0..n {
            for j in 0..n {
                let angle = -2. * std::f64::consts::PI * ((j * k) % n) as f64 / n as f64;
                let (s, c) = angle.sin_cos();
                out_re[k] += re[j] * c - im[j] * s;
                out_im[k] += im[j] * c + re[j] * s;
            }
        }
        (out_re, out_im)
    }

    /// Length-`cols` DFT of each contiguous row.
    fn row_dfts(re: &mut [f64], im: &mut [f64], rows: usize, cols: usize) {
        for j in 0..rows {
            let (row_re, row_im) =
                reference_dft(&re[j * cols..(j + 1) * cols], &im[j * cols..(j + 1) * cols]);
            re[j * cols..(j + 1) * cols].copy_from_slice(&row_re);
            im[j * cols..(j + 1) * cols].copy_from_slice(&row_im);
        }
    }

    fn make_plan(kind: TableKind, problem: DftwProblem) -> BoxedPlan<f64> {
        let mut planner = Planner::<f64>::new(PlannerMode::Unrestricted);
        register_generic_dft(&mut planner);
        DftwDftSolver::new(kind)
            .plan(&Problem::Dftw(problem), &mut planner)
            .unwrap()
            .unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64], tol: f64, what: &str) {
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!((x - y).abs() < tol, "{what}: {x} != {y} at {i}");
        }
    }

    #[test]
    fn test_time_decimation_completes_a_dft() {
        for (r, m) in [(3usize, 5usize), (4, 4), (2, 8), (6, 5)] {
            for kind in [TableKind::Full, TableKind::Split] {
                let n = r * m;
                let (sig_re, sig_im) = synthetic(n);

                // Load transposed: row j, column k holds sample k*r + j.
                let mut re = vec![0.0; n];
                let mut im = vec![0.0; n];
                for j in 0..r {
                    for k in 0..m {
                        re[j * m + k] = sig_re[k * r + j];
                        im[j * m + k] = sig_im[k * r + j];
                    }
                }

                row_dfts(&mut re, &mut im, r, m);

                let mut plan = make_plan(kind, DftwProblem::in_place(r, m, 1, DecimationMode::Time));
                plan.awake().unwrap();
                plan.execute(&mut re, &mut im).unwrap();
                plan.sleep();

                let (exp_re, exp_im) = reference_dft(&sig_re, &sig_im);
                assert_close(&re, &exp_re, 1e-9, "re");
                assert_close(&im, &exp_im, 1e-9, "im");
            }
        }
    }

    #[test]
    fn test_frequency_decimation_is_the_dual_ordering() {
        for (r, m) in [(3usize, 5usize), (4, 4), (5, 6)] {
            for kind in [TableKind::Full, TableKind::Split] {
                let n = r * m;
                let (sig_re, sig_im) = synthetic(n);
                let mut re = sig_re.clone();
                let mut im = sig_im.clone();

                let mut plan =
                    make_plan(kind, DftwProblem::in_place(r, m, 1, DecimationMode::Frequency));
                plan.awake().unwrap();
                plan.execute(&mut re, &mut im).unwrap();
                plan.sleep();

                row_dfts(&mut re, &mut im, r, m);

                // Output lands digit-reversed: slot (j', k') holds bin j' + k'*r.
                let (exp_re, exp_im) = reference_dft(&sig_re, &sig_im);
                for jp in 0..r {
                    for kp in 0..m {
                        let got = (re[jp * m + kp], im[jp * m + kp]);
                        let want = (exp_re[jp + kp * r], exp_im[jp + kp * r]);
                        assert!((got.0 - want.0).abs() < 1e-9, "re at ({jp}, {kp})");
                        assert!((got.1 - want.1).abs() < 1e-9, "im at ({jp}, {kp})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_full_and_split_kernels_agree() {
        let (r, m) = (7usize, 9usize);
        let n = r * m;
        let (sig_re, sig_im) = synthetic(n);

        let mut results = Vec::new();
        for kind in [TableKind::Full, TableKind::Split] {
            let mut re = sig_re.clone();
            let mut im = sig_im.clone();
            let mut plan = make_plan(kind, DftwProblem::in_place(r, m, 1, DecimationMode::Time));
            plan.awake().unwrap();
            plan.execute(&mut re, &mut im).unwrap();
            plan.sleep();
            results.push((re, im));
        }
        assert_close(&results[0].0, &results[1].0, 1e-12, "re");
        assert_close(&results[0].1, &results[1].1, 1e-12, "im");
    }

    #[test]
    fn test_strided_layout_touches_only_its_elements() {
        let (r, m, s) = (3usize, 4usize, 2usize);
        let n = r * m;
        let (sig_re, sig_im) = synthetic(n);

        // Packed run for reference.
        let mut packed_re = sig_re.clone();
        let mut packed_im = sig_im.clone();
        let mut packed = make_plan(
            TableKind::Full,
            DftwProblem::in_place(r, m, 1, DecimationMode::Time),
        );
        packed.awake().unwrap();
        packed.execute(&mut packed_re, &mut packed_im).unwrap();
        packed.sleep();

        // Same data spread to even offsets, sentinels in the gaps.
        let mut re = vec![99.0; s * n];
        let mut im = vec![99.0; s * n];
        for i in 0..n {
            re[s * i] = sig_re[i];
            im[s * i] = sig_im[i];
        }
        let mut plan = make_plan(
            TableKind::Full,
            DftwProblem::in_place(r, m, s, DecimationMode::Time),
        );
        plan.awake().unwrap();
        plan.execute(&mut re, &mut im).unwrap();
        plan.sleep();

        for i in 0..n {
            assert!((re[s * i] - packed_re[i]).abs() < 1e-12);
            assert!((im[s * i] - packed_im[i]).abs() < 1e-12);
            assert_eq!(re[s * i + 1], 99.0);
            assert_eq!(im[s * i + 1], 99.0);
        }
    }

    #[test]
    fn test_restricted_size_heuristics() {
        let dense = DftwDftSolver::new(TableKind::Full);
        let split = DftwDftSolver::new(TableKind::Split);
        let probe = |r, m| DftwProblem::in_place(r, m, 1, DecimationMode::Time);

        assert!(dense.applicable(&probe(128, 128), PlannerMode::Restricted));
        assert!(!dense.applicable(&probe(5, 3277), PlannerMode::Restricted));
        assert!(!split.applicable(&probe(256, 256), PlannerMode::Restricted));
        assert!(split.applicable(&probe(65537, 1), PlannerMode::Restricted));

        // Unrestricted planning may still try both at any size.
        assert!(dense.applicable(&probe(5, 3277), PlannerMode::Unrestricted));
        assert!(split.applicable(&probe(3, 5), PlannerMode::Unrestricted));
    }

    #[test]
    fn test_inadmissible_layouts_are_refused() {
        let solver = DftwDftSolver::new(TableKind::Full);
        let mut batched = DftwProblem::in_place(3, 5, 1, DecimationMode::Time);
        batched.batch = 2;
        assert!(!solver.applicable(&batched, PlannerMode::Unrestricted));

        let mut out_of_place = DftwProblem::in_place(3, 5, 1, DecimationMode::Time);
        out_of_place.twiddle_stride = 2;
        assert!(!solver.applicable(&out_of_place, PlannerMode::Unrestricted));

        let mut planner = Planner::<f64>::new(PlannerMode::Unrestricted);
        register_generic_dft(&mut planner);
        assert!(solver
            .plan(&Problem::Dftw(batched), &mut planner)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cost_model_exactness() {
        use crate::dft::GenericDft;

        let plan = make_plan(
            TableKind::Full,
            DftwProblem::in_place(3, 5, 1, DecimationMode::Time),
        );
        let child = GenericDft::<f64>::new(DftProblem {
            size: Dim::new(3, 5),
            vector: Dim::new(5, 1),
        });
        let expected = child.ops() + Ops::new(32., 64., 64.);
        assert_eq!(plan.ops(), expected);
    }

    #[test]
    fn test_lifecycle_leaves_no_resources() {
        let mut planner = Planner::<f64>::new(PlannerMode::Unrestricted);
        register_generic_dft(&mut planner);
        register_dftw_solvers(&mut planner);
        let cache = planner.twiddle_cache();

        let problem = Problem::Dftw(DftwProblem::in_place(4, 6, 1, DecimationMode::Time));
        let mut plan = planner.plan(&problem).unwrap().unwrap();

        let (mut re, mut im) = synthetic(24);
        for _ in 0..2 {
            plan.awake().unwrap();
            plan.execute(&mut re, &mut im).unwrap();
            plan.execute(&mut re, &mut im).unwrap();
            assert!(!cache.lock().unwrap().is_empty());
            plan.sleep();
            assert!(cache.lock().unwrap().is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "executed while asleep")]
    fn test_execute_before_awake_is_a_contract_violation() {
        let plan = make_plan(
            TableKind::Full,
            DftwProblem::in_place(3, 5, 1, DecimationMode::Time),
        );
        let mut re = vec![0.0; 15];
        let mut im = vec![0.0; 15];
        let _ = plan.execute(&mut re, &mut im);
    }

    #[test]
    fn test_plan_printer() {
        let plan = make_plan(
            TableKind::Full,
            DftwProblem::in_place(3, 5, 1, DecimationMode::Time),
        );
        assert_eq!(plan.describe(), "(dftw-dft1-3-5 (dft-generic-3x5))");
        let plan = make_plan(
            TableKind::Split,
            DftwProblem::in_place(3, 5, 1, DecimationMode::Frequency),
        );
        assert_eq!(plan.describe(), "(dftw-dft2-3-5 (dft-generic-3x5))");
    }
}
