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

use thiserror::Error;

/// Errors raised while setting up a solve. Failures of the solve itself are reported through
/// `SolveStatus` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A dimension does not fit in Ipopt's index type.
    #[error("problem dimension {name} = {value} exceeds the Ipopt index range")]
    InvalidDimensions { name: &'static str, value: usize },
    /// The problem could not report its bounds, or a lower bound exceeds its upper bound.
    #[error("invalid {kind} bounds at index {index}: [{lower}, {upper}]")]
    InvalidBounds {
        kind: &'static str,
        index: usize,
        lower: f64,
        upper: f64,
    },
    /// The problem refused to report its bounds.
    #[error("problem did not provide {kind} bounds")]
    MissingBounds { kind: &'static str },
    /// Ipopt rejected the problem definition.
    #[error("Ipopt failed to create the problem")]
    CreateProblem,
    /// Ipopt rejected an option name or value.
    #[error("invalid Ipopt option {name} = {value}")]
    InvalidOption { name: String, value: String },
    /// Option names and string values cannot contain interior NUL bytes.
    #[error("option {0:?} contains a NUL byte")]
    InvalidOptionName(String),
    /// This build is not linked against Ipopt.
    #[error("Ipopt is not available in this build")]
    SolverUnavailable,
}
