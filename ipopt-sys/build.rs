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
 * This build file is responsible for locating a preinstalled Ipopt and telling cargo how to link
 * against it. Building Ipopt from source or fetching binaries is left to the system package
 * manager (e.g. `coinor-libipopt-dev`, `brew install ipopt` or `conda install ipopt`).
 *
 * # Search order
 *
 * 1. pkg-config, which is how most distributions ship Ipopt.
 * 2. The `IPOPT_DIR` environment variable pointing to an install prefix containing `lib/`.
 *
 * The outcome is published to dependent build scripts through the `links = "ipopt"` metadata as
 * `DEP_IPOPT_FOUND` (`1` or `0`). When Ipopt is missing nothing is linked, so crates that only
 * use the type definitions from this crate still build.
 */
use std::env;
use std::path::PathBuf;

const LIBRARY: &str = "ipopt";
// The C interface switched its boolean type from `int` to C99 `bool` in 3.14.
const MIN_VERSION: &str = "3.14.0";

#[cfg(target_os = "macos")]
static LIB_EXT: &str = "dylib";
#[cfg(target_os = "windows")]
static LIB_EXT: &str = "dll";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
static LIB_EXT: &str = "so";

fn main() {
    println!("cargo:rerun-if-env-changed=IPOPT_DIR");
    println!("cargo:rustc-check-cfg=cfg(ipopt_linked)");

    let found = probe_pkg_config() || probe_install_dir();

    if found {
        println!("cargo:rustc-cfg=ipopt_linked");
        println!("cargo:found=1");
    } else {
        println!(
            "cargo:warning=Ipopt >= {} was not found via pkg-config or IPOPT_DIR; \
             the solver will be unavailable in this build",
            MIN_VERSION
        );
        println!("cargo:found=0");
    }
}

/// Try to find Ipopt preinstalled. On success `pkg-config` emits the link flags itself.
fn probe_pkg_config() -> bool {
    match pkg_config::Config::new()
        .atleast_version(MIN_VERSION)
        .probe(LIBRARY)
    {
        Ok(lib) => {
            for path in &lib.include_paths {
                println!("cargo:include={}", path.display());
            }
            true
        }
        Err(_) => false,
    }
}

/// Link against `$IPOPT_DIR/lib/libipopt.*` if that file exists.
fn probe_install_dir() -> bool {
    let prefix = match env::var_os("IPOPT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return false,
    };

    let lib_dir = prefix.join("lib");
    let library_file = if cfg!(target_os = "windows") {
        format!("{}.{}", LIBRARY, LIB_EXT)
    } else {
        format!("lib{}.{}", LIBRARY, LIB_EXT)
    };

    if !lib_dir.join(&library_file).exists() {
        println!(
            "cargo:warning=IPOPT_DIR is set but {} does not exist",
            lib_dir.join(&library_file).display()
        );
        return false;
    }

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=dylib={}", LIBRARY);
    println!(
        "cargo:include={}",
        prefix.join("include").join("coin-or").display()
    );
    true
}
