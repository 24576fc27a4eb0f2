//! Voxel-space terrain renderer
//!
//! Draws a first-person view of a heightfield by casting one ray per screen
//! column at increasing depth, with back-to-front occlusion through a
//! per-column horizon buffer. No polygons, no GPU.
//!
//! Per frame: the [`Observer`] integrates a [`MotionIntent`] snapshot and is
//! clamped above the terrain, the [`ColumnRaycaster`] fills the
//! [`FrameBuffer`], and the [`Presenter`] hands it to a [`DisplaySink`].
//! [`RenderContext`] bundles those steps for one view.

#![no_std]

extern crate alloc;

pub mod config;
pub mod context;
pub mod error;
pub mod framebuffer;
pub mod heightfield;
pub mod intent;
pub mod math;
pub mod observer;
pub mod presenter;
pub mod raycaster;

pub use config::{ObserverConfig, RaycastConfig, StepMode};
pub use context::{ContextConfig, RenderContext};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{Background, ColumnTarget, FrameBuffer, HorizonBuffer};
pub use heightfield::{HeightField, HeightmapSource, TerrainSample};
pub use intent::{IntentSlot, MotionIntent};
pub use observer::Observer;
pub use presenter::{DisplaySink, FpsCounter, FrameStats, NullSink, Presenter};
pub use raycaster::{ColumnRaycaster, DepthStep, RenderStats};
