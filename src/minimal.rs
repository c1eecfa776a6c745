//   Copyright 2018 Egor Larionov
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.

//! The one problem this crate solves:
//!
//! ```text
//! minimize (x - 2)^2  subject to  x >= 0
//! ```
//!
//! There are no constraints and the Hessian is the constant `2`, so the problem is pure data
//! plumbing between Ipopt and three formulas.

use crate::problem::{BasicProblem, ConstrainedProblem, Solution, SolutionRecord, SolveStatistics};
use crate::{Index, Number, NLP_INFINITY};

/// Minimizer of the objective.
const TARGET: Number = 2.0;
/// Lower bound on `x`.
const LOWER_BOUND: Number = 0.0;
/// Default starting point.
const DEFAULT_START: Number = 5.0;

/// One variable, no constraints, objective `(x - 2)^2`, bound `x >= 0`.
#[derive(Clone, Debug, Default)]
pub struct MinimalNlp {
    start: Option<Number>,
    finalize_count: usize,
    solution: Option<SolutionRecord>,
}

impl MinimalNlp {
    /// Problem starting from `x = 5`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Problem starting from `x = start`. The start point does not have to satisfy the bound.
    pub fn with_start(start: Number) -> Self {
        MinimalNlp {
            start: Some(start),
            ..Self::default()
        }
    }

    /// The starting point handed to Ipopt.
    pub fn start(&self) -> Number {
        self.start.unwrap_or(DEFAULT_START)
    }

    /// Number of times Ipopt reported a final result to this problem.
    pub fn finalize_count(&self) -> usize {
        self.finalize_count
    }

    /// The most recent result, if a solve has finished.
    pub fn solution(&self) -> Option<&SolutionRecord> {
        self.solution.as_ref()
    }
}

impl BasicProblem for MinimalNlp {
    fn num_variables(&self) -> usize {
        1
    }
    fn bounds(&self, x_l: &mut [Number], x_u: &mut [Number]) -> bool {
        x_l[0] = LOWER_BOUND;
        x_u[0] = NLP_INFINITY;
        true
    }
    fn initial_point(&self, x: &mut [Number]) -> bool {
        x[0] = self.start();
        true
    }
    fn objective(&self, x: &[Number], obj: &mut Number) -> bool {
        let d = x[0] - TARGET;
        *obj = d * d;
        obj.is_finite()
    }
    fn objective_grad(&self, x: &[Number], grad_f: &mut [Number]) -> bool {
        grad_f[0] = 2.0 * (x[0] - TARGET);
        grad_f[0].is_finite()
    }
    fn finalize_solution(&mut self, solution: &Solution, statistics: &SolveStatistics) {
        self.finalize_count += 1;
        log::info!(
            "finished after {} iterations: {} (x = {}, f(x) = {})",
            statistics.iterations,
            solution.status,
            solution.primal_variables[0],
            solution.objective_value
        );
        self.solution = Some(solution.to_record());
    }
}

impl ConstrainedProblem for MinimalNlp {
    fn num_constraints(&self) -> usize {
        0
    }
    fn num_constraint_jacobian_non_zeros(&self) -> usize {
        0
    }
    fn constraint(&self, _x: &[Number], _g: &mut [Number]) -> bool {
        true
    }
    fn constraint_bounds(&self, _g_l: &mut [Number], _g_u: &mut [Number]) -> bool {
        true
    }
    fn constraint_jacobian_indices(&self, _rows: &mut [Index], _cols: &mut [Index]) -> bool {
        true
    }
    fn constraint_jacobian_values(&self, _x: &[Number], _vals: &mut [Number]) -> bool {
        true
    }
    fn num_hessian_non_zeros(&self) -> usize {
        1
    }
    fn hessian_indices(&self, rows: &mut [Index], cols: &mut [Index]) -> bool {
        rows[0] = 0;
        cols[0] = 0;
        true
    }
    // With no constraints `lambda` is always empty, leaving only the objective term.
    fn hessian_values(
        &self,
        _x: &[Number],
        obj_factor: Number,
        _lambda: &[Number],
        vals: &mut [Number],
    ) -> bool {
        vals[0] = obj_factor * 2.0;
        vals[0].is_finite()
    }
}
