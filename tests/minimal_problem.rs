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

/**
 * These tests exercise the callbacks of `MinimalNlp` directly, the way Ipopt would call them,
 * without running a solve. They hold with or without an Ipopt installation.
 */
use approx::{assert_abs_diff_eq, assert_relative_eq};

use ipopt_minimal::*;

const POINTS: [f64; 5] = [-3.0, 0.0, 2.0, 5.0, 100.0];

#[test]
fn dimensions() {
    let nlp = MinimalNlp::new();
    let info = nlp.nlp_info();
    assert_eq!(
        info,
        NlpInfo {
            num_variables: 1,
            num_constraints: 0,
            num_jacobian_non_zeros: 0,
            num_hessian_non_zeros: 1,
            indexing_style: IndexingStyle::CStyle,
        }
    );

    // Reporting the dimensions again must not change anything.
    assert_eq!(nlp.nlp_info(), info);
}

#[test]
fn bounds_are_ordered() {
    let nlp = MinimalNlp::new();
    let mut x_l = vec![f64::NAN; nlp.num_variables()];
    let mut x_u = vec![f64::NAN; nlp.num_variables()];
    assert!(nlp.bounds(&mut x_l, &mut x_u));
    assert_eq!(x_l, vec![0.0]);
    assert_eq!(x_u, vec![NLP_INFINITY]);
    assert!(x_l.iter().zip(x_u.iter()).all(|(l, u)| l <= u));

    let mut g_l: Vec<Number> = vec![];
    let mut g_u: Vec<Number> = vec![];
    assert!(nlp.constraint_bounds(&mut g_l, &mut g_u));
}

#[test]
fn objective_values() {
    let nlp = MinimalNlp::new();
    let f = |x: f64| {
        let mut obj = f64::NAN;
        assert!(nlp.objective(&[x], &mut obj));
        obj
    };

    assert_eq!(f(2.0), 0.0);
    assert_eq!(f(5.0), 9.0);
    for &x in POINTS.iter().chain([-1e6, 1e-9, 2.0 + 1e-12].iter()) {
        assert!(f(x) >= 0.0, "f({}) = {}", x, f(x));
    }
}

#[test]
fn gradient_matches_central_differences() {
    let nlp = MinimalNlp::new();
    let f = |x: f64| {
        let mut obj = 0.0;
        assert!(nlp.objective(&[x], &mut obj));
        obj
    };

    let h = 1e-5;
    for &x in POINTS.iter() {
        let mut grad = [f64::NAN];
        assert!(nlp.objective_grad(&[x], &mut grad));
        assert_relative_eq!(grad[0], 2.0 * (x - 2.0));

        let fd = (f(x + h) - f(x - h)) / (2.0 * h);
        assert_abs_diff_eq!(grad[0], fd, epsilon = 1e-4 * (1.0 + x.abs()));
    }
}

#[test]
fn hessian_values_scale_with_objective_factor() {
    let nlp = MinimalNlp::new();
    let lambda: [Number; 0] = [];
    for &obj_factor in &[0.0, 1.0, 2.5] {
        for &x in POINTS.iter() {
            let mut vals = vec![f64::NAN; nlp.num_hessian_non_zeros()];
            assert!(nlp.hessian_values(&[x], obj_factor, &lambda, &mut vals));
            assert_eq!(vals.len(), 1);
            assert_relative_eq!(vals[0], obj_factor * 2.0);
        }
    }
}

#[test]
fn hessian_structure_is_lower_triangular_and_stable() {
    let nlp = MinimalNlp::new();
    let nnz = nlp.num_hessian_non_zeros();

    let query = || {
        let mut rows = vec![-1 as Index; nnz];
        let mut cols = vec![-1 as Index; nnz];
        assert!(nlp.hessian_indices(&mut rows, &mut cols));
        rows.into_iter().zip(cols).collect::<Vec<_>>()
    };

    let first = query();
    assert_eq!(first, vec![(0, 0)]);
    assert!(first.iter().all(|&(r, c)| r >= c));
    assert_eq!(query(), first);
}

#[test]
fn jacobian_is_empty() {
    let nlp = MinimalNlp::new();
    let nnz = nlp.num_constraint_jacobian_non_zeros();
    assert_eq!(nnz, 0);

    let mut rows: Vec<Index> = vec![];
    let mut cols: Vec<Index> = vec![];
    let mut vals: Vec<Number> = vec![];
    for _ in 0..2 {
        assert!(nlp.constraint_jacobian_indices(&mut rows, &mut cols));
        assert!(rows.is_empty() && cols.is_empty());
    }
    assert!(nlp.constraint_jacobian_values(&[5.0], &mut vals));

    let mut g: Vec<Number> = vec![];
    assert!(nlp.constraint(&[5.0], &mut g));
}

#[test]
fn non_finite_evaluations_fail() {
    let nlp = MinimalNlp::new();
    let mut obj = 0.0;
    let mut grad = [0.0];
    assert!(!nlp.objective(&[f64::INFINITY], &mut obj));
    assert!(!nlp.objective(&[f64::NAN], &mut obj));
    assert!(!nlp.objective_grad(&[f64::NEG_INFINITY], &mut grad));

    let mut vals = [0.0];
    assert!(!nlp.hessian_values(&[1.0], f64::NAN, &[], &mut vals));
}

#[test]
fn start_point_is_not_required_to_be_feasible() {
    let mut x = [0.0];
    assert!(MinimalNlp::new().initial_point(&mut x));
    assert_eq!(x[0], 5.0);
    assert!(MinimalNlp::with_start(-5.0).initial_point(&mut x));
    assert_eq!(x[0], -5.0);
}
