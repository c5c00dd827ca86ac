#![deny(unsafe_code)]
//! Core types and traits for the motes particle effects.
//!
//! Provides the `Simulation` trait, the `Animator` lifecycle and its
//! `FrameScheduler` seam, `Frame`/`Primitive` draw lists with the `Painter`
//! seam, `RasterImage`, `Srgb`, `DeviceClass`, the `RandomSource` streams,
//! `Seed`, and parameter helpers.

pub mod animator;
pub mod color;
pub mod device;
pub mod error;
pub mod frame;
pub mod image;
pub mod params;
pub mod prng;
pub mod seed;
pub mod simulation;

pub use animator::{Animator, FrameHandle, FrameScheduler, Lifecycle, ManualScheduler};
pub use color::Srgb;
pub use device::DeviceClass;
pub use error::SimError;
pub use frame::{Backdrop, Frame, Painter, Primitive, Shape};
pub use image::RasterImage;
pub use prng::{RandomSource, ScriptedRandom, Xorshift64};
pub use seed::Seed;
pub use simulation::Simulation;
