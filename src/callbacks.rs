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

//! Ipopt C API callbacks.
//!
//! Each function here has the exact signature Ipopt expects and forwards to the
//! `ConstrainedProblem` stored behind the user data pointer.

use crate::ffi::{self, Bool, Index, Number};
use crate::problem::{ConstrainedProblem, SolveStatistics};
use std::slice;

/// Phase of the interior point algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmMode {
    Regular,
    RestorationPhase,
}

impl AlgorithmMode {
    fn new(mode: ffi::AlgorithmMode) -> Self {
        if mode == ffi::AlgorithmMode_RestorationPhaseMode {
            AlgorithmMode::RestorationPhase
        } else {
            AlgorithmMode::Regular
        }
    }
}

/// Per-iteration progress information handed to an `IntermediateCallback`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntermediateCallbackData {
    pub alg_mod: AlgorithmMode,
    pub iter_count: Index,
    pub obj_value: Number,
    pub inf_pr: Number,
    pub inf_du: Number,
    pub mu: Number,
    pub d_norm: Number,
    pub regularization_size: Number,
    pub alpha_du: Number,
    pub alpha_pr: Number,
    pub ls_trials: Index,
}

/// Type defining the callback function for giving intermediate execution control to
/// the user. If set, it is called once per iteration, providing the user with some
/// information on the state of the optimization. This can be used to print some user-
/// defined output. It also gives the user a way to terminate the optimization
/// prematurely. If this method returns false, Ipopt will terminate the optimization.
pub type IntermediateCallback<P> = fn(&mut P, IntermediateCallbackData) -> bool;

/// Everything the callbacks need, reachable through Ipopt's user data pointer.
pub(crate) struct CallbackData<P> {
    pub problem: P,
    pub intermediate_callback: Option<IntermediateCallback<P>>,
    pub statistics: SolveStatistics,
}

impl<P> CallbackData<P> {
    pub fn new(problem: P) -> Self {
        CallbackData {
            problem,
            intermediate_callback: None,
            statistics: SolveStatistics::default(),
        }
    }
}

/// Build a slice from a buffer owned by Ipopt. Null or empty buffers become empty slices.
unsafe fn slice_from<'a, T>(ptr: *mut T, len: Index) -> &'a [T] {
    if ptr.is_null() || len <= 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len as usize)
    }
}

/// Mutable counterpart of `slice_from`.
unsafe fn slice_from_mut<'a, T>(ptr: *mut T, len: Index) -> &'a mut [T] {
    if ptr.is_null() || len <= 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len as usize)
    }
}

unsafe fn nlp_from<'a, P>(user_data: ffi::UserDataPtr) -> &'a P {
    &(*(user_data as *const CallbackData<P>)).problem
}

/// Evaluate the objective function.
pub(crate) unsafe extern "C" fn eval_f<P: ConstrainedProblem>(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    obj_value: *mut Number,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let nlp = nlp_from::<P>(user_data);
    nlp.objective(slice_from(x, n), &mut *obj_value)
}

/// Evaluate the objective gradient.
pub(crate) unsafe extern "C" fn eval_grad_f<P: ConstrainedProblem>(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    grad_f: *mut Number,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let nlp = nlp_from::<P>(user_data);
    nlp.objective_grad(slice_from(x, n), slice_from_mut(grad_f, n))
}

/// Evaluate the constraint function.
pub(crate) unsafe extern "C" fn eval_g<P: ConstrainedProblem>(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    m: Index,
    g: *mut Number,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let nlp = nlp_from::<P>(user_data);
    nlp.constraint(slice_from(x, n), slice_from_mut(g, m))
}

/// Evaluate the constraint Jacobian.
pub(crate) unsafe extern "C" fn eval_jac_g<P: ConstrainedProblem>(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    _m: Index,
    nele_jac: Index,
    irow: *mut Index,
    jcol: *mut Index,
    values: *mut Number,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let nlp = nlp_from::<P>(user_data);
    if values.is_null() {
        /* return the structure of the jacobian */
        log::trace!("constraint jacobian structure requested ({} entries)", nele_jac);
        nlp.constraint_jacobian_indices(
            slice_from_mut(irow, nele_jac),
            slice_from_mut(jcol, nele_jac),
        )
    } else {
        /* return the values of the jacobian of the constraints */
        nlp.constraint_jacobian_values(slice_from(x, n), slice_from_mut(values, nele_jac))
    }
}

/// Evaluate the Hessian of the Lagrangian.
pub(crate) unsafe extern "C" fn eval_h<P: ConstrainedProblem>(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    obj_factor: Number,
    m: Index,
    lambda: *mut Number,
    _new_lambda: Bool,
    nele_hess: Index,
    irow: *mut Index,
    jcol: *mut Index,
    values: *mut Number,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let nlp = nlp_from::<P>(user_data);
    if values.is_null() {
        /* return the structure. */
        log::trace!("hessian structure requested ({} entries)", nele_hess);
        nlp.hessian_indices(
            slice_from_mut(irow, nele_hess),
            slice_from_mut(jcol, nele_hess),
        )
    } else {
        /* return the values. */
        nlp.hessian_values(
            slice_from(x, n),
            obj_factor,
            slice_from(lambda, m),
            slice_from_mut(values, nele_hess),
        )
    }
}

/// Record progress and forward to the user's intermediate callback if there is one.
pub(crate) unsafe extern "C" fn intermediate_cb<P: ConstrainedProblem>(
    alg_mod: ffi::AlgorithmMode,
    iter_count: Index,
    obj_value: Number,
    inf_pr: Number,
    inf_du: Number,
    mu: Number,
    d_norm: Number,
    regularization_size: Number,
    alpha_du: Number,
    alpha_pr: Number,
    ls_trials: Index,
    user_data: ffi::UserDataPtr,
) -> Bool {
    let data = &mut *(user_data as *mut CallbackData<P>);
    let alg_mod = AlgorithmMode::new(alg_mod);

    data.statistics.iterations = iter_count;
    if alg_mod == AlgorithmMode::RestorationPhase {
        data.statistics.entered_restoration = true;
    }
    log::debug!(
        "iter {:>4}: f = {:.8e}, inf_pr = {:.2e}, inf_du = {:.2e}, mu = {:.2e}",
        iter_count,
        obj_value,
        inf_pr,
        inf_du,
        mu
    );

    match data.intermediate_callback {
        Some(callback) => callback(
            &mut data.problem,
            IntermediateCallbackData {
                alg_mod,
                iter_count,
                obj_value,
                inf_pr,
                inf_du,
                mu,
                d_norm,
                regularization_size,
                alpha_du,
                alpha_pr,
                ls_trials,
            },
        ),
        None => true,
    }
}
