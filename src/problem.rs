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

//! The callback contract a problem has to implement to be solved by Ipopt.

use crate::{Index, IndexingStyle, Number, SolveStatus};

/// The non-linear problem to be solved by Ipopt. This trait specifies all the
/// information needed to construct the unconstrained optimization problem (although the
/// variables are allowed to be bounded).
/// In the callbacks within, `x` is the independent variable and must be the same size
/// as returned by `num_variables`.
/// Each of the callbacks required during interior point iterations are allowed to fail.
/// In case of failure to produce values, simply return `false` where applicable.
/// This feature could be used to tell Ipopt to try smaller perturbations for `x` for
/// instance.
pub trait BasicProblem {
    /// Specify the indexing style used for arrays in this problem.
    /// (Default is zero-based)
    fn indexing_style(&self) -> IndexingStyle {
        IndexingStyle::CStyle
    }
    /// Total number of variables of the non-linear problem.
    fn num_variables(&self) -> usize;

    /// Specify lower and upper variable bounds given by `x_l` and `x_u` respectively.
    ///
    /// Both slices have the same size as `num_variables`. Use `NLP_INFINITY` and
    /// `NLP_NEG_INFINITY` for directions without a bound.
    fn bounds(&self, x_l: &mut [Number], x_u: &mut [Number]) -> bool;

    /// Construct the initial guess of the primal variables for Ipopt to start with.
    ///
    /// The given slice has the same size as `num_variables`. Returning `false` means no
    /// starting point could be provided, in which case the solve is not attempted.
    fn initial_point(&self, x: &mut [Number]) -> bool;

    /// Initial guess for the lower and upper bound multipliers.
    ///
    /// Only requested when the `warm_start_init_point` option is set to `"yes"`.
    fn initial_bounds_multipliers(&self, _z_l: &mut [Number], _z_u: &mut [Number]) -> bool {
        false
    }

    /// Objective function. This is the function being minimized.
    /// This function is internally called by Ipopt callback `eval_f`.
    fn objective(&self, x: &[Number], obj: &mut Number) -> bool;
    /// Gradient of the objective function.
    /// This function is internally called by Ipopt callback `eval_grad_f`.
    fn objective_grad(&self, x: &[Number], grad_f: &mut [Number]) -> bool;

    /// Receive the outcome of a solve.
    ///
    /// Called exactly once at the end of every call to `Ipopt::solve`, whatever the status.
    /// The solution borrows solver owned buffers, so copy out anything that should outlive
    /// this call.
    fn finalize_solution(&mut self, _solution: &Solution, _statistics: &SolveStatistics) {}
}

/// Extends the `BasicProblem` trait to enable equality and inequality constraints and exact
/// second derivatives.
/// Equality constraints are enforced by setting the lower and upper bounds for the constraint to
/// the same value.
/// This type of problem is the target use case for Ipopt.
pub trait ConstrainedProblem: BasicProblem {
    /// Number of equality and inequality constraints.
    fn num_constraints(&self) -> usize;
    /// Number of non-zeros in the constraint Jacobian.
    fn num_constraint_jacobian_non_zeros(&self) -> usize;
    /// Constraint function. This gives the value of each constraint.
    /// The output slice `g` is guaranteed to be the same size as `num_constraints`.
    /// This function is internally called by Ipopt callback `eval_g`.
    fn constraint(&self, x: &[Number], g: &mut [Number]) -> bool;
    /// Specify lower and upper bounds, `g_l` and `g_u` respectively, on the value of the
    /// constraint function.
    /// Both slices have the same size as `num_constraints`.
    fn constraint_bounds(&self, g_l: &mut [Number], g_u: &mut [Number]) -> bool;
    /// Initial guess for the constraint multipliers.
    ///
    /// Only requested when the `warm_start_init_point` option is set to `"yes"`.
    fn initial_constraint_multipliers(&self, _lambda: &mut [Number]) -> bool {
        false
    }
    /// Constraint Jacobian indices. These are the row and column indices of the
    /// non-zeros in the sparse representation of the matrix.
    /// This function is internally called by Ipopt callback `eval_jac_g` with a null value
    /// buffer. The order of the entries must not change between calls.
    fn constraint_jacobian_indices(&self, rows: &mut [Index], cols: &mut [Index]) -> bool;
    /// Constraint Jacobian values. Each value must correspond to the `row` and
    /// `column` as specified in `constraint_jacobian_indices`.
    /// This function is internally called by Ipopt callback `eval_jac_g`.
    fn constraint_jacobian_values(&self, x: &[Number], vals: &mut [Number]) -> bool;

    /// Number of non-zeros in the Hessian of the Lagrangian, lower triangle only.
    fn num_hessian_non_zeros(&self) -> usize;
    /// Hessian indices. These are the row and column indices of the non-zeros
    /// in the sparse representation of the matrix.
    /// This is a symmetric matrix, fill the lower left triangular half only.
    /// This function is internally called by Ipopt callback `eval_h` with a null value buffer.
    fn hessian_indices(&self, rows: &mut [Index], cols: &mut [Index]) -> bool;
    /// Hessian of the Lagrangian values. Each value must correspond to the `row` and `column`
    /// as specified in `hessian_indices`.
    ///
    /// The expected value is `obj_factor * ∇²f(x) + Σ_k lambda[k] * ∇²g_k(x)`.
    /// This function is internally called by Ipopt callback `eval_h`.
    fn hessian_values(
        &self,
        x: &[Number],
        obj_factor: Number,
        lambda: &[Number],
        vals: &mut [Number],
    ) -> bool;

    /// Problem dimensions as reported to Ipopt when the problem is created.
    fn nlp_info(&self) -> NlpInfo {
        NlpInfo {
            num_variables: self.num_variables(),
            num_constraints: self.num_constraints(),
            num_jacobian_non_zeros: self.num_constraint_jacobian_non_zeros(),
            num_hessian_non_zeros: self.num_hessian_non_zeros(),
            indexing_style: self.indexing_style(),
        }
    }
}

/// Sizes of a problem. These are fixed for the duration of a solve.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NlpInfo {
    pub num_variables: usize,
    pub num_constraints: usize,
    pub num_jacobian_non_zeros: usize,
    pub num_hessian_non_zeros: usize,
    pub indexing_style: IndexingStyle,
}

/// The final state of a solve, borrowed from the solver.
#[derive(Copy, Clone, Debug)]
pub struct Solution<'a> {
    pub status: SolveStatus,
    pub objective_value: Number,
    /// Final values of the variables.
    pub primal_variables: &'a [Number],
    /// Multipliers of the variable lower bounds.
    pub lower_bound_multipliers: &'a [Number],
    /// Multipliers of the variable upper bounds.
    pub upper_bound_multipliers: &'a [Number],
    /// Multipliers of the constraints.
    pub constraint_multipliers: &'a [Number],
    /// Constraint function values at the final point.
    pub constraint_values: &'a [Number],
}

impl<'a> Solution<'a> {
    /// Copy the solution into an owned record.
    pub fn to_record(&self) -> SolutionRecord {
        SolutionRecord {
            status: self.status,
            objective_value: self.objective_value,
            primal_variables: self.primal_variables.to_vec(),
            lower_bound_multipliers: self.lower_bound_multipliers.to_vec(),
            upper_bound_multipliers: self.upper_bound_multipliers.to_vec(),
            constraint_multipliers: self.constraint_multipliers.to_vec(),
            constraint_values: self.constraint_values.to_vec(),
        }
    }
}

/// Owned copy of a `Solution`.
#[derive(Clone, Debug, PartialEq)]
pub struct SolutionRecord {
    pub status: SolveStatus,
    pub objective_value: Number,
    pub primal_variables: Vec<Number>,
    pub lower_bound_multipliers: Vec<Number>,
    pub upper_bound_multipliers: Vec<Number>,
    pub constraint_multipliers: Vec<Number>,
    pub constraint_values: Vec<Number>,
}

/// Diagnostics gathered while Ipopt was running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveStatistics {
    /// Last iteration count reported by Ipopt through the intermediate callback.
    pub iterations: Index,
    /// Whether the restoration phase was ever entered.
    pub entered_restoration: bool,
}
