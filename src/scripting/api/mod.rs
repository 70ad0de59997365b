//! API modules for the `pipette` namespace
//!
//! Each submodule provides functions under `pipette::<module>::*`

pub mod config;
