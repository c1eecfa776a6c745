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

//! Options handed to Ipopt before a solve.

use crate::{Index, Number};
use std::fmt;
use std::str::FromStr;

/// Type of option you can specify to Ipopt.
/// This is used internally for conversion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IpoptOption<'a> {
    /// Numeric option.
    Num(f64),
    /// String option.
    Str(&'a str),
    /// Integer option.
    Int(i32),
}

impl<'a> From<f64> for IpoptOption<'a> {
    fn from(opt: f64) -> Self {
        IpoptOption::Num(opt)
    }
}

impl<'a> From<&'a str> for IpoptOption<'a> {
    fn from(opt: &'a str) -> Self {
        IpoptOption::Str(opt)
    }
}

impl<'a> From<i32> for IpoptOption<'a> {
    fn from(opt: i32) -> Self {
        IpoptOption::Int(opt)
    }
}

impl<'a> IpoptOption<'a> {
    /// Whether this is the string `"yes"`. Ipopt compares string values case-insensitively.
    pub fn is_yes(&self) -> bool {
        matches!(self, IpoptOption::Str(v) if v.eq_ignore_ascii_case("yes"))
    }
}

impl<'a> fmt::Display for IpoptOption<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpoptOption::Num(v) => write!(f, "{:e}", v),
            IpoptOption::Str(v) => write!(f, "{}", v),
            IpoptOption::Int(v) => write!(f, "{}", v),
        }
    }
}

/// The handful of Ipopt options the driver sets.
///
/// Defaults reproduce the reference setup: MUMPS as the linear solver, the adaptive barrier
/// parameter strategy and full console output.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    /// Sparse symmetric indefinite solver used for the KKT systems (`linear_solver`).
    pub linear_solver: String,
    /// Barrier parameter update strategy (`mu_strategy`).
    pub mu_strategy: String,
    /// Desired convergence tolerance (`tol`).
    pub tol: Number,
    /// Maximum number of iterations (`max_iter`).
    pub max_iter: Index,
    /// Console verbosity from 0 to 12 (`print_level`).
    pub print_level: Index,
    /// Suppress the Ipopt banner (`sb`).
    pub suppress_banner: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            linear_solver: String::from("mumps"),
            mu_strategy: String::from("adaptive"),
            tol: 1e-8,
            max_iter: 3000,
            print_level: 5,
            suppress_banner: false,
        }
    }
}

impl SolverOptions {
    /// Defaults overridden by the `IPOPT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    ///
    /// Recognized names are `IPOPT_LINEAR_SOLVER`, `IPOPT_MU_STRATEGY`, `IPOPT_TOL`,
    /// `IPOPT_MAX_ITER`, `IPOPT_PRINT_LEVEL` and `IPOPT_SUPPRESS_BANNER`. Values that fail to
    /// parse are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = SolverOptions::default();
        if let Some(v) = lookup("IPOPT_LINEAR_SOLVER") {
            log::info!("IPOPT_LINEAR_SOLVER: {}", v);
            opts.linear_solver = v;
        }
        if let Some(v) = lookup("IPOPT_MU_STRATEGY") {
            log::info!("IPOPT_MU_STRATEGY: {}", v);
            opts.mu_strategy = v;
        }
        opts.tol = parse_by(&lookup, "IPOPT_TOL").unwrap_or(opts.tol);
        opts.max_iter = parse_by(&lookup, "IPOPT_MAX_ITER").unwrap_or(opts.max_iter);
        opts.print_level = parse_by(&lookup, "IPOPT_PRINT_LEVEL").unwrap_or(opts.print_level);
        opts.suppress_banner =
            parse_by(&lookup, "IPOPT_SUPPRESS_BANNER").unwrap_or(opts.suppress_banner);
        opts
    }

    /// The options as `(name, value)` pairs in the order they are handed to Ipopt.
    pub fn to_pairs(&self) -> Vec<(&'static str, IpoptOption<'_>)> {
        vec![
            ("linear_solver", IpoptOption::Str(&self.linear_solver)),
            ("mu_strategy", IpoptOption::Str(&self.mu_strategy)),
            ("tol", IpoptOption::Num(self.tol)),
            ("max_iter", IpoptOption::Int(self.max_iter)),
            ("print_level", IpoptOption::Int(self.print_level)),
            (
                "sb",
                IpoptOption::Str(if self.suppress_banner { "yes" } else { "no" }),
            ),
        ]
    }
}

fn parse_by<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr + fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => {
            log::info!("{}: {}", key, v);
            Some(v)
        }
        Err(_) => {
            log::warn!("ignoring {}: cannot parse {:?}", key, raw);
            None
        }
    }
}
