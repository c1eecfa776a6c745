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

//! Safe wrapper around an Ipopt problem handle.

use crate::callbacks::{self, CallbackData, IntermediateCallback};
use crate::error::Error;
use crate::ffi;
use crate::options::{IpoptOption, SolverOptions};
use crate::problem::{ConstrainedProblem, Solution, SolveStatistics};
use crate::{Index, Number, SolveStatus};
use std::ffi::CString;
use std::os::raw::c_char;

/// Mutable access to the problem together with the solution it was just finalized with.
pub struct SolverDataMut<'a, P> {
    pub problem: &'a mut P,
    pub solution: Solution<'a>,
}

/// Outcome of `Ipopt::solve`.
pub struct SolveResult<'a, P> {
    pub solver_data: SolverDataMut<'a, P>,
    pub objective_value: Number,
    pub status: SolveStatus,
    pub statistics: SolveStatistics,
}

/// An Ipopt problem ready to be solved.
///
/// The user problem is moved in on construction and can be reached through `problem`,
/// `problem_mut` and the result of every `solve`.
pub struct Ipopt<P: ConstrainedProblem> {
    /// Internal (opaque) Ipopt problem representation.
    nlp_internal: ffi::IpoptProblem,
    /// User problem and callback state. Ipopt receives a pointer to this during `solve`.
    data: CallbackData<P>,
    /// Status and objective of the last solve, if there was one.
    last_solve: Option<(SolveStatus, Number)>,
    /// Vector of variables. This stores the initial guess and the solution.
    x: Vec<Number>,
    /// Variable lower bound multipliers.
    mult_x_l: Vec<Number>,
    /// Variable upper bound multipliers.
    mult_x_u: Vec<Number>,
    /// Constraint multipliers.
    mult_g: Vec<Number>,
    /// Constraint values at the solution.
    g: Vec<Number>,
    /// Whether `warm_start_init_point` was set, in which case multipliers are requested too.
    warm_start: bool,
}

impl<P: ConstrainedProblem> Ipopt<P> {
    /// Create the Ipopt problem from the dimensions and bounds reported by `problem`.
    ///
    /// This is the initialization step: it fails if the problem reports inconsistent bounds or
    /// if Ipopt rejects the definition.
    pub fn new(problem: P) -> Result<Self, Error> {
        let info = problem.nlp_info();
        let n = to_index("num_variables", info.num_variables)?;
        let m = to_index("num_constraints", info.num_constraints)?;
        let nele_jac = to_index("num_jacobian_non_zeros", info.num_jacobian_non_zeros)?;
        let nele_hess = to_index("num_hessian_non_zeros", info.num_hessian_non_zeros)?;

        let mut x_l = vec![0.0; info.num_variables];
        let mut x_u = vec![0.0; info.num_variables];
        if !problem.bounds(&mut x_l, &mut x_u) {
            return Err(Error::MissingBounds { kind: "variable" });
        }
        validate_bounds("variable", &x_l, &x_u)?;

        let mut g_l = vec![0.0; info.num_constraints];
        let mut g_u = vec![0.0; info.num_constraints];
        if !problem.constraint_bounds(&mut g_l, &mut g_u) {
            return Err(Error::MissingBounds { kind: "constraint" });
        }
        validate_bounds("constraint", &g_l, &g_u)?;

        let nlp_internal = unsafe {
            ffi::CreateIpoptProblem(
                n,
                x_l.as_mut_ptr(),
                x_u.as_mut_ptr(),
                m,
                g_l.as_mut_ptr(),
                g_u.as_mut_ptr(),
                nele_jac,
                nele_hess,
                info.indexing_style.offset(),
                Some(callbacks::eval_f::<P>),
                Some(callbacks::eval_g::<P>),
                Some(callbacks::eval_grad_f::<P>),
                Some(callbacks::eval_jac_g::<P>),
                Some(callbacks::eval_h::<P>),
            )
        };

        if nlp_internal.is_null() {
            return Err(Error::CreateProblem);
        }

        let registered = unsafe {
            ffi::SetIntermediateCallback(nlp_internal, Some(callbacks::intermediate_cb::<P>))
        };
        if !registered {
            unsafe { ffi::FreeIpoptProblem(nlp_internal) };
            return Err(Error::CreateProblem);
        }

        log::debug!(
            "created Ipopt problem: n = {}, m = {}, nnz_jac = {}, nnz_hess = {}",
            n,
            m,
            nele_jac,
            nele_hess
        );

        Ok(Ipopt {
            nlp_internal,
            data: CallbackData::new(problem),
            last_solve: None,
            x: vec![0.0; info.num_variables],
            mult_x_l: vec![0.0; info.num_variables],
            mult_x_u: vec![0.0; info.num_variables],
            mult_g: vec![0.0; info.num_constraints],
            g: vec![0.0; info.num_constraints],
            warm_start: false,
        })
    }

    /// Get an immutable reference to the provided problem.
    pub fn problem(&self) -> &P {
        &self.data.problem
    }

    /// Get a mutable reference to the provided problem.
    pub fn problem_mut(&mut self) -> &mut P {
        &mut self.data.problem
    }

    /// The problem together with the result of the last solve, or `None` before the first one.
    pub fn solver_data(&mut self) -> Option<SolverDataMut<'_, P>> {
        let (status, objective_value) = self.last_solve?;
        Some(self.data_mut(status, objective_value))
    }

    fn data_mut(&mut self, status: SolveStatus, objective_value: Number) -> SolverDataMut<'_, P> {
        SolverDataMut {
            problem: &mut self.data.problem,
            solution: Solution {
                status,
                objective_value,
                primal_variables: &self.x,
                lower_bound_multipliers: &self.mult_x_l,
                upper_bound_multipliers: &self.mult_x_u,
                constraint_multipliers: &self.mult_g,
                constraint_values: &self.g,
            },
        }
    }

    /// Set an Ipopt option.
    pub fn set_option<'a, O>(&mut self, name: &str, option: O) -> Result<&mut Self, Error>
    where
        O: Into<IpoptOption<'a>>,
    {
        let option = option.into();
        // Convert the input name string to a `char *` C type
        let name_cstr =
            CString::new(name).map_err(|_| Error::InvalidOptionName(name.to_string()))?;
        let name_ptr = name_cstr.as_ptr() as *mut c_char;

        // Match option to one of the three types of options Ipopt can receive.
        let success = match option {
            IpoptOption::Num(opt) => unsafe {
                ffi::AddIpoptNumOption(self.nlp_internal, name_ptr, opt as Number)
            },
            IpoptOption::Str(opt) => {
                // Convert option string to `char *`
                let opt_cstr =
                    CString::new(opt).map_err(|_| Error::InvalidOptionName(opt.to_string()))?;
                unsafe {
                    ffi::AddIpoptStrOption(
                        self.nlp_internal,
                        name_ptr,
                        opt_cstr.as_ptr() as *mut c_char,
                    )
                }
            }
            IpoptOption::Int(opt) => unsafe {
                ffi::AddIpoptIntOption(self.nlp_internal, name_ptr, opt as ffi::Int)
            },
        };

        if !success {
            return Err(Error::InvalidOption {
                name: name.to_string(),
                value: option.to_string(),
            });
        }

        if name == "warm_start_init_point" {
            self.warm_start = option.is_yes();
        }
        log::debug!("set option {} = {}", name, option);
        Ok(self)
    }

    /// Set every option in `options`, stopping at the first one Ipopt rejects.
    pub fn apply_options(&mut self, options: &SolverOptions) -> Result<&mut Self, Error> {
        for (name, value) in options.to_pairs() {
            self.set_option(name, value)?;
        }
        Ok(self)
    }

    /// Set intermediate callback.
    pub fn set_intermediate_callback(&mut self, cb: Option<IntermediateCallback<P>>) {
        self.data.intermediate_callback = cb;
    }

    /// Solve non-linear problem.
    ///
    /// `finalize_solution` is called on the problem exactly once before this returns, whatever
    /// the outcome.
    pub fn solve(&mut self) -> SolveResult<'_, P> {
        self.data.statistics = SolveStatistics::default();
        let mut objective_value = 0.0;

        let status = if !self.data.problem.initial_point(&mut self.x) {
            log::error!("problem did not provide a starting point");
            SolveStatus::InvalidProblemDefinition
        } else {
            if self.warm_start {
                self.init_multipliers();
            }

            let udata_ptr = (&mut self.data) as *mut CallbackData<P>;
            let raw = unsafe {
                ffi::IpoptSolve(
                    self.nlp_internal,
                    self.x.as_mut_ptr(),
                    ptr_or_null(&mut self.g),
                    &mut objective_value as *mut Number,
                    ptr_or_null(&mut self.mult_g),
                    self.mult_x_l.as_mut_ptr(),
                    self.mult_x_u.as_mut_ptr(),
                    udata_ptr as ffi::UserDataPtr,
                )
            };
            SolveStatus::new(raw)
        };

        if status.is_success() {
            log::info!("Ipopt: {} (f = {:e})", status, objective_value);
        } else {
            log::warn!("Ipopt: {} (f = {:e})", status, objective_value);
        }

        let statistics = self.data.statistics;
        self.last_solve = Some((status, objective_value));
        let SolverDataMut { problem, solution } = self.data_mut(status, objective_value);
        problem.finalize_solution(&solution, &statistics);

        SolveResult {
            solver_data: SolverDataMut { problem, solution },
            objective_value,
            status,
            statistics,
        }
    }

    /// Ask the problem for starting multipliers, falling back to zero.
    fn init_multipliers(&mut self) {
        let nlp = &self.data.problem;
        if !nlp.initial_bounds_multipliers(&mut self.mult_x_l, &mut self.mult_x_u) {
            log::debug!("no initial bound multipliers provided, using zero");
            zero(&mut self.mult_x_l);
            zero(&mut self.mult_x_u);
        }
        if !nlp.initial_constraint_multipliers(&mut self.mult_g) {
            log::debug!("no initial constraint multipliers provided, using zero");
            zero(&mut self.mult_g);
        }
    }
}

impl<P: ConstrainedProblem> Drop for Ipopt<P> {
    fn drop(&mut self) {
        unsafe {
            ffi::FreeIpoptProblem(self.nlp_internal);
        }
    }
}

fn to_index(name: &'static str, value: usize) -> Result<Index, Error> {
    if value > Index::MAX as usize {
        Err(Error::InvalidDimensions { name, value })
    } else {
        Ok(value as Index)
    }
}

/// Every pair must satisfy `lower <= upper`. NaN bounds are rejected as well.
fn validate_bounds(kind: &'static str, lower: &[Number], upper: &[Number]) -> Result<(), Error> {
    for (index, (&l, &u)) in lower.iter().zip(upper.iter()).enumerate() {
        if !(l <= u) {
            return Err(Error::InvalidBounds {
                kind,
                index,
                lower: l,
                upper: u,
            });
        }
    }
    Ok(())
}

fn ptr_or_null(buf: &mut [Number]) -> *mut Number {
    if buf.is_empty() {
        ::std::ptr::null_mut()
    } else {
        buf.as_mut_ptr()
    }
}

fn zero(buf: &mut [Number]) {
    buf.iter_mut().for_each(|v| *v = 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_validation() {
        assert!(validate_bounds("variable", &[0.0, -1e19], &[1e19, 1e19]).is_ok());
        assert!(validate_bounds("variable", &[1.0], &[1.0]).is_ok());
        assert_eq!(
            validate_bounds("constraint", &[0.0, 2.0], &[1.0, 1.0]),
            Err(Error::InvalidBounds {
                kind: "constraint",
                index: 1,
                lower: 2.0,
                upper: 1.0
            })
        );
        assert!(validate_bounds("variable", &[f64::NAN], &[1.0]).is_err());
    }

    #[test]
    fn index_range() {
        assert_eq!(to_index("n", 1), Ok(1));
        assert!(to_index("n", usize::MAX).is_err());
    }
}
