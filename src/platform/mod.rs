//! Platform abstraction layer
//!
//! The simulation and renderer are host-agnostic. This module holds the browser
//! host: canvas and marker elements, window listeners and the animation-frame
//! loop. Native builds drive the field headlessly from `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;
