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

//! Enables the `ipopt_linked` cfg when `ipopt-sys` managed to link against Ipopt.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(ipopt_linked)");
    println!("cargo:rerun-if-env-changed=DEP_IPOPT_FOUND");

    // Exported by the `ipopt-sys` build script through `links = "ipopt"`.
    let found = env::var("DEP_IPOPT_FOUND").map_or(false, |v| v == "1");
    if found {
        println!("cargo:rustc-cfg=ipopt_linked");
    }
}
