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
use crate::err::DftwError;
use crate::problem::Problem;
use crate::traits::FftSample;
use crate::twiddles::TwiddleCache;
use num_traits::AsPrimitive;
use std::ops::{Add, AddAssign};
use std::sync::{Arc, Mutex};

/// Floating-point operation counts a plan reports to the planner. Kept as
/// `f64` so deep recursion never saturates.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Ops {
    pub add: f64,
    pub mul: f64,
    pub other: f64,
}

impl Ops {
    pub const fn new(add: f64, mul: f64, other: f64) -> Ops {
        Ops { add, mul, other }
    }

    /// Scalar the planner minimizes when comparing candidate plans.
    pub fn total(&self) -> f64 {
        self.add + self.mul + self.other
    }
}

impl Add for Ops {
    type Output = Ops;

    fn add(self, rhs: Ops) -> Ops {
        Ops {
            add: self.add + rhs.add,
            mul: self.mul + rhs.mul,
            other: self.other + rhs.other,
        }
    }
}

impl AddAssign for Ops {
    fn add_assign(&mut self, rhs: Ops) {
        *self = *self + rhs;
    }
}

/// An executable realization of a solved problem.
///
/// Lifecycle: `constructed → awake → (executed)* → asleep → dropped`.
/// [`Plan::awake`] must be called exactly once before any execution and
/// [`Plan::sleep`] exactly once after the last one; the pair may then be
/// repeated. Executing while asleep, waking twice without an intervening
/// sleep, or dropping an awake plan are contract violations checked by
/// assertions, not recoverable errors.
pub trait Plan<T> {
    /// Transforms the split real/imaginary buffer pair in place. Reentrant
    /// across sequential calls with buffers of the same geometry.
    fn execute(&self, rio: &mut [T], iio: &mut [T]) -> Result<(), DftwError>;

    /// Allocates the resources execution needs, child plans first.
    fn awake(&mut self) -> Result<(), DftwError>;

    /// Releases everything [`Plan::awake`] allocated, in reverse order.
    fn sleep(&mut self);

    /// The operation-count estimate fixed at construction time.
    fn ops(&self) -> Ops;

    /// A parenthesized one-line rendering of the plan tree.
    fn describe(&self) -> String;
}

pub type BoxedPlan<T> = Box<dyn Plan<T> + Send + Sync>;

/// A factory that either refuses a problem or produces a plan for it.
///
/// `Ok(None)` means "no plan": the problem is inadmissible to this solver or
/// a recursive child request failed, and the planner moves on. `Err` is
/// reserved for unrecoverable resource failures.
pub trait Solver<T>: Send + Sync {
    fn plan(
        &self,
        problem: &Problem,
        planner: &mut Planner<T>,
    ) -> Result<Option<BoxedPlan<T>>, DftwError>;
}

/// Whether the planner applies the empirical size heuristics that prune
/// representations unlikely to win at a given scale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlannerMode {
    /// Every registered solver may bid on every problem.
    Unrestricted,
    /// Solvers additionally apply their size heuristics.
    Restricted,
}

/// A cost-comparing solver registry.
///
/// Solvers are registered explicitly at session initialization; there is no
/// global state. Planning queries every registered solver and keeps the
/// cheapest candidate by [`Ops::total`].
pub struct Planner<T> {
    solvers: Vec<Arc<dyn Solver<T>>>,
    mode: PlannerMode,
    twiddles: Arc<Mutex<TwiddleCache<T>>>,
}

impl<T: FftSample> Planner<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new(mode: PlannerMode) -> Planner<T> {
        Planner {
            solvers: Vec::new(),
            mode,
            twiddles: Arc::new(Mutex::new(TwiddleCache::new())),
        }
    }

    pub fn register(&mut self, solver: Arc<dyn Solver<T>>) {
        self.solvers.push(solver);
    }

    pub fn mode(&self) -> PlannerMode {
        self.mode
    }

    /// Handle to the shared full-table cache plans acquire from on wake.
    pub fn twiddle_cache(&self) -> Arc<Mutex<TwiddleCache<T>>> {
        self.twiddles.clone()
    }

    /// Plans `problem`, recursing through registered solvers. Returns
    /// `Ok(None)` when no solver accepts it.
    pub fn plan(&mut self, problem: &Problem) -> Result<Option<BoxedPlan<T>>, DftwError> {
        // Snapshot the registry so solvers may recurse into the planner.
        let solvers = self.solvers.clone();
        let mut best: Option<BoxedPlan<T>> = None;
        for solver in solvers.iter() {
            if let Some(candidate) = solver.plan(problem, self)? {
                let wins = match best {
                    None => true,
                    Some(ref incumbent) => candidate.ops().total() < incumbent.ops().total(),
                };
                if wins {
                    best = Some(candidate);
                }
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dftw::register_dftw_solvers;
    use crate::problem::{DecimationMode, DftwProblem};

    #[test]
    fn test_ops_accumulate() {
        let mut ops = Ops::new(1., 2., 3.);
        ops += Ops::new(10., 20., 30.);
        assert_eq!(ops, Ops::new(11., 22., 33.));
        assert_eq!(ops.total(), 66.);
    }

    #[test]
    fn test_child_failure_propagates_as_no_plan() {
        // Only the twiddle solvers are registered, so the recursive child
        // request has nobody to answer it.
        let mut planner = Planner::<f64>::new(PlannerMode::Unrestricted);
        register_dftw_solvers(&mut planner);
        let problem = Problem::Dftw(DftwProblem::in_place(3, 5, 1, DecimationMode::Time));
        assert!(planner.plan(&problem).unwrap().is_none());
    }
}
