//! Vibescape - generative music driving six audio-reactive 3D visuals
//!
//! Four synthesised voices are analysed every frame; their levels swell,
//! spin and stretch the shapes on stage.

pub mod audio;
pub mod camera;
pub mod cli;
pub mod control;
pub mod error;
pub mod logging;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod visuals;
