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

//! End-to-end solves of `MinimalNlp`. The solves need a build that found Ipopt.

use ipopt_minimal::IPOPT_AVAILABLE;

#[test]
fn solver_availability() {
    if !IPOPT_AVAILABLE {
        eprintln!(
            "WARNING: built without Ipopt; convergence, finalize and iteration limit \
             checks in this file were skipped"
        );
    }
    assert_eq!(IPOPT_AVAILABLE, cfg!(ipopt_linked));
}

#[cfg(ipopt_linked)]
mod solves {
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;

    use ipopt_minimal::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Quiet solver with the reference options.
    fn solver(nlp: MinimalNlp) -> Ipopt<MinimalNlp> {
        init_logger();
        let options = SolverOptions {
            print_level: 0,
            suppress_banner: true,
            ..SolverOptions::default()
        };
        let mut ipopt = Ipopt::new(nlp).unwrap();
        ipopt.apply_options(&options).unwrap();
        ipopt
    }

    #[test]
    fn converges_from_default_start() {
        let mut ipopt = solver(MinimalNlp::new());
        let SolveResult {
            solver_data: SolverDataMut { problem, solution },
            objective_value: obj,
            status,
            statistics,
        } = ipopt.solve();

        assert_eq!(status, SolveStatus::SolveSucceeded);
        assert!(status.is_success());
        assert_abs_diff_eq!(solution.primal_variables[0], 2.0, epsilon = 1e-6);
        assert!(obj.abs() < 1e-6);
        assert!(solution.primal_variables[0] >= 0.0);
        assert!(solution.constraint_multipliers.is_empty());
        assert!(statistics.iterations > 0);

        assert_eq!(problem.finalize_count(), 1);
        let record = problem.solution().unwrap();
        assert_eq!(record.status, SolveStatus::SolveSucceeded);
        assert_abs_diff_eq!(record.primal_variables[0], 2.0, epsilon = 1e-6);
        // The bound is inactive at the optimum.
        assert_abs_diff_eq!(record.lower_bound_multipliers[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn converges_from_infeasible_start() {
        let mut ipopt = solver(MinimalNlp::with_start(-5.0));
        let result = ipopt.solve();
        assert_eq!(result.status, SolveStatus::SolveSucceeded);
        assert_abs_diff_eq!(
            result.solver_data.solution.primal_variables[0],
            2.0,
            epsilon = 1e-6
        );
        assert_eq!(ipopt.problem().finalize_count(), 1);
    }

    #[test]
    fn iteration_limit() {
        let mut ipopt = solver(MinimalNlp::new());
        ipopt.set_option("max_iter", 1).unwrap();
        let result = ipopt.solve();
        assert_eq!(result.status, SolveStatus::MaximumIterationsExceeded);
        assert!(!result.status.is_success());
        assert_eq!(result.solver_data.problem.finalize_count(), 1);
        assert_eq!(
            ipopt.problem().solution().map(|s| s.status),
            Some(SolveStatus::MaximumIterationsExceeded)
        );
    }

    #[test]
    fn repeated_solves_finalize_once_each() {
        let mut ipopt = solver(MinimalNlp::new());
        assert_eq!(ipopt.solve().status, SolveStatus::SolveSucceeded);
        assert_eq!(ipopt.solve().status, SolveStatus::SolveSucceeded);
        assert_eq!(ipopt.problem().finalize_count(), 2);
    }

    #[test]
    fn intermediate_callback_can_stop() {
        fn stop_immediately(_nlp: &mut MinimalNlp, data: IntermediateCallbackData) -> bool {
            data.iter_count < 1
        }

        let mut ipopt = solver(MinimalNlp::new());
        ipopt.set_intermediate_callback(Some(stop_immediately));
        let result = ipopt.solve();
        assert_eq!(result.status, SolveStatus::UserRequestedStop);
        assert_eq!(result.statistics.iterations, 1);
        assert_eq!(ipopt.problem().finalize_count(), 1);
    }

    /// `MinimalNlp` that counts how often Ipopt asks for starting multipliers.
    #[derive(Default)]
    struct WarmStartNlp {
        inner: MinimalNlp,
        multiplier_requests: Cell<usize>,
    }

    impl BasicProblem for WarmStartNlp {
        fn num_variables(&self) -> usize {
            self.inner.num_variables()
        }
        fn bounds(&self, x_l: &mut [Number], x_u: &mut [Number]) -> bool {
            self.inner.bounds(x_l, x_u)
        }
        fn initial_point(&self, x: &mut [Number]) -> bool {
            self.inner.initial_point(x)
        }
        fn initial_bounds_multipliers(&self, z_l: &mut [Number], z_u: &mut [Number]) -> bool {
            self.multiplier_requests.set(self.multiplier_requests.get() + 1);
            z_l[0] = 0.0;
            z_u[0] = 0.0;
            true
        }
        fn objective(&self, x: &[Number], obj: &mut Number) -> bool {
            self.inner.objective(x, obj)
        }
        fn objective_grad(&self, x: &[Number], grad_f: &mut [Number]) -> bool {
            self.inner.objective_grad(x, grad_f)
        }
    }

    impl ConstrainedProblem for WarmStartNlp {
        fn num_constraints(&self) -> usize {
            self.inner.num_constraints()
        }
        fn num_constraint_jacobian_non_zeros(&self) -> usize {
            self.inner.num_constraint_jacobian_non_zeros()
        }
        fn constraint(&self, x: &[Number], g: &mut [Number]) -> bool {
            self.inner.constraint(x, g)
        }
        fn constraint_bounds(&self, g_l: &mut [Number], g_u: &mut [Number]) -> bool {
            self.inner.constraint_bounds(g_l, g_u)
        }
        fn constraint_jacobian_indices(&self, rows: &mut [Index], cols: &mut [Index]) -> bool {
            self.inner.constraint_jacobian_indices(rows, cols)
        }
        fn constraint_jacobian_values(&self, x: &[Number], vals: &mut [Number]) -> bool {
            self.inner.constraint_jacobian_values(x, vals)
        }
        fn num_hessian_non_zeros(&self) -> usize {
            self.inner.num_hessian_non_zeros()
        }
        fn hessian_indices(&self, rows: &mut [Index], cols: &mut [Index]) -> bool {
            self.inner.hessian_indices(rows, cols)
        }
        fn hessian_values(
            &self,
            x: &[Number],
            obj_factor: Number,
            lambda: &[Number],
            vals: &mut [Number],
        ) -> bool {
            self.inner.hessian_values(x, obj_factor, lambda, vals)
        }
    }

    #[test]
    fn warm_start_requests_multipliers() {
        init_logger();
        let mut ipopt = Ipopt::new(WarmStartNlp::default()).unwrap();
        ipopt.set_option("print_level", 0).unwrap();
        ipopt.set_option("sb", "yes").unwrap();

        assert_eq!(ipopt.solve().status, SolveStatus::SolveSucceeded);
        assert_eq!(ipopt.problem().multiplier_requests.get(), 0);

        // Ipopt accepts the value in any case, so the multipliers must be requested either way.
        ipopt.set_option("warm_start_init_point", "YES").unwrap();
        let result = ipopt.solve();
        assert_eq!(result.status, SolveStatus::SolveSucceeded);
        assert_abs_diff_eq!(
            result.solver_data.solution.primal_variables[0],
            2.0,
            epsilon = 1e-6
        );
        assert_eq!(ipopt.problem().multiplier_requests.get(), 1);

        ipopt.set_option("warm_start_init_point", "no").unwrap();
        ipopt.solve();
        assert_eq!(ipopt.problem().multiplier_requests.get(), 1);
    }

    #[test]
    fn solver_data_reflects_last_solve() {
        let mut ipopt = solver(MinimalNlp::new());
        assert!(ipopt.solver_data().is_none());

        let obj = ipopt.solve().objective_value;
        let SolverDataMut { problem, solution } = ipopt.solver_data().unwrap();
        assert_eq!(solution.status, SolveStatus::SolveSucceeded);
        assert_eq!(solution.objective_value, obj);
        assert_abs_diff_eq!(solution.primal_variables[0], 2.0, epsilon = 1e-6);
        assert_eq!(solution.lower_bound_multipliers.len(), 1);
        assert!(solution.constraint_values.is_empty());
        assert_eq!(problem.finalize_count(), 1);
        assert_eq!(
            problem.solution().map(|s| s.primal_variables.clone()),
            Some(solution.primal_variables.to_vec())
        );

        ipopt.set_option("max_iter", 1).unwrap();
        ipopt.solve();
        assert_eq!(
            ipopt.solver_data().map(|data| data.solution.status),
            Some(SolveStatus::MaximumIterationsExceeded)
        );
    }

    #[test]
    fn rejected_options() {
        init_logger();
        let mut ipopt = Ipopt::new(MinimalNlp::new()).unwrap();
        assert_eq!(
            ipopt.set_option("not_an_option", 1.0).err(),
            Some(Error::InvalidOption {
                name: "not_an_option".to_string(),
                value: "1e0".to_string(),
            })
        );
        assert!(ipopt.set_option("mu_strategy", "sideways").is_err());
        assert_eq!(
            ipopt.set_option("bad\0name", 1).err(),
            Some(Error::InvalidOptionName("bad\0name".to_string()))
        );
        assert!(ipopt.set_option("print_level", 0).is_ok());
    }
}
