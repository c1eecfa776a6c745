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

//! Minimal Ipopt example: minimize `(x-2)^2` subject to `x >= 0`, starting from `x = 5`.
//!
//! Options can be overridden with the `IPOPT_*` environment variables (see `SolverOptions`),
//! and `RUST_LOG` controls the log output of this program.

use std::process::ExitCode;

use ipopt_minimal::*;

fn main() -> ExitCode {
    env_logger::init();

    println!("IPOPT Minimal Example");
    println!("Minimize: (x-2)^2");
    println!("Subject to: x >= 0");
    println!("Starting point: x = {}", MinimalNlp::new().start());

    let options = SolverOptions::from_env();
    log::debug!("{:?}", options);

    match run(&options) {
        Ok(status) if status.is_success() => {
            println!("\nOptimization succeeded!");
            ExitCode::SUCCESS
        }
        Ok(status) => {
            eprintln!("\nOptimization failed with status {:?}: {}", status, status);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("IPOPT initialization failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(ipopt_linked)]
fn run(options: &SolverOptions) -> Result<SolveStatus, Error> {
    let mut ipopt = Ipopt::new(MinimalNlp::new())?;
    ipopt.apply_options(options)?;

    let SolveResult {
        solver_data: SolverDataMut { solution, .. },
        objective_value: obj,
        status,
        statistics,
    } = ipopt.solve();

    println!("\n=== Solution ===");
    println!("x = {}", solution.primal_variables[0]);
    println!("f(x) = {}", obj);
    println!("iterations = {}", statistics.iterations);
    println!("Expected: x = 2.0, f(x) = 0.0");

    Ok(status)
}

#[cfg(not(ipopt_linked))]
fn run(_options: &SolverOptions) -> Result<SolveStatus, Error> {
    log::error!("this binary was built without Ipopt; install it and rebuild");
    Err(Error::SolverUnavailable)
}
