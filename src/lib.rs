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

//! A minimal client of the [Ipopt](https://github.com/coin-or/Ipopt) interior point solver.
//!
//! A problem is described by implementing [`BasicProblem`] and [`ConstrainedProblem`]. The
//! [`Ipopt`] solver turns such an implementation into the callback table of Ipopt's C
//! interface, runs a solve and reports the result back through
//! [`BasicProblem::finalize_solution`].
//!
//! The crate ships one problem, [`MinimalNlp`]:
//!
//! ```text
//! minimize (x - 2)^2  subject to  x >= 0
//! ```
//!
//! The solver is only compiled when the build found an Ipopt installation (see
//! [`IPOPT_AVAILABLE`]). Everything else, including the problem definition, is always available.

use ipopt_sys as ffi;

// The trampolines are only reachable from the solver.
#[cfg_attr(not(ipopt_linked), allow(dead_code))]
mod callbacks;
mod error;
mod minimal;
mod options;
mod problem;
#[cfg(ipopt_linked)]
mod solver;

pub use callbacks::{AlgorithmMode, IntermediateCallback, IntermediateCallbackData};
pub use error::Error;
pub use ffi::{Index, Number};
pub use minimal::MinimalNlp;
pub use options::{IpoptOption, SolverOptions};
pub use problem::{
    BasicProblem, ConstrainedProblem, NlpInfo, Solution, SolutionRecord, SolveStatistics,
};
#[cfg(ipopt_linked)]
pub use solver::{Ipopt, SolveResult, SolverDataMut};

use std::fmt;

/// Whether this build is linked against Ipopt.
pub const IPOPT_AVAILABLE: bool = cfg!(ipopt_linked);

/// Bound value Ipopt treats as `+∞` (its default `nlp_upper_bound_inf`).
pub const NLP_INFINITY: Number = 1e19;
/// Bound value Ipopt treats as `-∞` (its default `nlp_lower_bound_inf`).
pub const NLP_NEG_INFINITY: Number = -1e19;

/// Zero-based indexing (C Style) or one-based indexing (Fortran style).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexingStyle {
    CStyle,
    FortranStyle,
}

impl IndexingStyle {
    /// Index of the first row or column.
    pub fn offset(self) -> Index {
        match self {
            IndexingStyle::CStyle => ffi::C_STYLE,
            IndexingStyle::FortranStyle => ffi::FORTRAN_STYLE,
        }
    }
}

/// Program return status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    SolveSucceeded,
    SolvedToAcceptableLevel,
    InfeasibleProblemDetected,
    SearchDirectionBecomesTooSmall,
    DivergingIterates,
    UserRequestedStop,
    FeasiblePointFound,
    MaximumIterationsExceeded,
    RestorationFailed,
    ErrorInStepComputation,
    MaximumCpuTimeExceeded,
    MaximumWallTimeExceeded,
    NotEnoughDegreesOfFreedom,
    InvalidProblemDefinition,
    InvalidOption,
    InvalidNumberDetected,
    UnrecoverableException,
    NonIpoptExceptionThrown,
    InsufficientMemory,
    InternalError,
    UnknownError,
}

impl SolveStatus {
    /// Convert a raw `IpoptSolve` return code.
    pub fn new(status: ffi::ApplicationReturnStatus) -> Self {
        use SolveStatus as RS;
        match status {
            ffi::ApplicationReturnStatus_Solve_Succeeded => RS::SolveSucceeded,
            ffi::ApplicationReturnStatus_Solved_To_Acceptable_Level => RS::SolvedToAcceptableLevel,
            ffi::ApplicationReturnStatus_Infeasible_Problem_Detected => {
                RS::InfeasibleProblemDetected
            }
            ffi::ApplicationReturnStatus_Search_Direction_Becomes_Too_Small => {
                RS::SearchDirectionBecomesTooSmall
            }
            ffi::ApplicationReturnStatus_Diverging_Iterates => RS::DivergingIterates,
            ffi::ApplicationReturnStatus_User_Requested_Stop => RS::UserRequestedStop,
            ffi::ApplicationReturnStatus_Feasible_Point_Found => RS::FeasiblePointFound,
            ffi::ApplicationReturnStatus_Maximum_Iterations_Exceeded => {
                RS::MaximumIterationsExceeded
            }
            ffi::ApplicationReturnStatus_Restoration_Failed => RS::RestorationFailed,
            ffi::ApplicationReturnStatus_Error_In_Step_Computation => RS::ErrorInStepComputation,
            ffi::ApplicationReturnStatus_Maximum_CpuTime_Exceeded => RS::MaximumCpuTimeExceeded,
            ffi::ApplicationReturnStatus_Maximum_WallTime_Exceeded => RS::MaximumWallTimeExceeded,
            ffi::ApplicationReturnStatus_Not_Enough_Degrees_Of_Freedom => {
                RS::NotEnoughDegreesOfFreedom
            }
            ffi::ApplicationReturnStatus_Invalid_Problem_Definition => RS::InvalidProblemDefinition,
            ffi::ApplicationReturnStatus_Invalid_Option => RS::InvalidOption,
            ffi::ApplicationReturnStatus_Invalid_Number_Detected => RS::InvalidNumberDetected,
            ffi::ApplicationReturnStatus_Unrecoverable_Exception => RS::UnrecoverableException,
            ffi::ApplicationReturnStatus_NonIpopt_Exception_Thrown => RS::NonIpoptExceptionThrown,
            ffi::ApplicationReturnStatus_Insufficient_Memory => RS::InsufficientMemory,
            ffi::ApplicationReturnStatus_Internal_Error => RS::InternalError,
            _ => RS::UnknownError,
        }
    }

    /// Only an optimal solution within the requested tolerance counts as success.
    pub fn is_success(self) -> bool {
        self == SolveStatus::SolveSucceeded
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SolveStatus as RS;
        let msg = match self {
            RS::SolveSucceeded => "optimal solution found",
            RS::SolvedToAcceptableLevel => "solved to acceptable level",
            RS::InfeasibleProblemDetected => "converged to a point of local infeasibility",
            RS::SearchDirectionBecomesTooSmall => "search direction becomes too small",
            RS::DivergingIterates => "iterates diverging",
            RS::UserRequestedStop => "stopping optimization at user request",
            RS::FeasiblePointFound => "feasible point found",
            RS::MaximumIterationsExceeded => "maximum number of iterations exceeded",
            RS::RestorationFailed => "restoration phase failed",
            RS::ErrorInStepComputation => "error in step computation",
            RS::MaximumCpuTimeExceeded => "maximum CPU time exceeded",
            RS::MaximumWallTimeExceeded => "maximum wall time exceeded",
            RS::NotEnoughDegreesOfFreedom => "problem has too few degrees of freedom",
            RS::InvalidProblemDefinition => "invalid problem definition",
            RS::InvalidOption => "invalid option",
            RS::InvalidNumberDetected => "invalid number in NLP function or derivative detected",
            RS::UnrecoverableException => "unrecoverable exception",
            RS::NonIpoptExceptionThrown => "unknown exception caught in Ipopt",
            RS::InsufficientMemory => "not enough memory",
            RS::InternalError => "internal error in Ipopt",
            RS::UnknownError => "unknown return code",
        };
        write!(f, "{}", msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(SolveStatus::new(0), SolveStatus::SolveSucceeded);
        assert_eq!(SolveStatus::new(1), SolveStatus::SolvedToAcceptableLevel);
        assert_eq!(SolveStatus::new(2), SolveStatus::InfeasibleProblemDetected);
        assert_eq!(SolveStatus::new(-1), SolveStatus::MaximumIterationsExceeded);
        assert_eq!(SolveStatus::new(-5), SolveStatus::MaximumWallTimeExceeded);
        assert_eq!(SolveStatus::new(-12), SolveStatus::InvalidOption);
        assert_eq!(SolveStatus::new(-199), SolveStatus::InternalError);
        assert_eq!(SolveStatus::new(42), SolveStatus::UnknownError);
    }

    #[test]
    fn only_optimal_is_success() {
        assert!(SolveStatus::SolveSucceeded.is_success());
        for code in [
            1, 2, 3, 4, 5, 6, -1, -2, -3, -4, -5, -10, -11, -12, -13, -100, -101, -102, -199,
        ] {
            assert!(!SolveStatus::new(code).is_success(), "code {}", code);
        }
    }

    #[test]
    fn sentinel_bounds() {
        assert_eq!(NLP_INFINITY, 1e19);
        assert_eq!(NLP_NEG_INFINITY, -NLP_INFINITY);
        assert_eq!(IndexingStyle::CStyle.offset(), 0);
        assert_eq!(IndexingStyle::FortranStyle.offset(), 1);
    }
}
