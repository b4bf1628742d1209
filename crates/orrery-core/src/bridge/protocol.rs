//! Per-frame buffer layout read by the UI.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values f32):
//! ```text
//! [Header: 8 floats]
//! [Instances: max_instances × 16 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities live in the header so the reader can compute offsets itself.

use bytemuck::{Pod, Zeroable};

use crate::api::types::ExplorerEvent;

pub const HEADER_FLOATS: usize = 8;

pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
/// Selected body id, or -1.
pub const HEADER_SELECTED_BODY: usize = 6;
/// 1 while a scene is mounted.
pub const HEADER_SCENE_MOUNTED: usize = 7;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// One drawable disc in screen space: a body or the sun.
/// 16 floats = 64 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub x: f32,
    pub y: f32,
    /// Projected radius in pixels.
    pub radius: f32,
    pub depth: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Self-rotation phase in radians.
    pub rotation: f32,
    pub ring_r: f32,
    pub ring_g: f32,
    pub ring_b: f32,
    /// Ring band in pixels; zero when the body has no rings.
    pub ring_inner: f32,
    pub ring_outer: f32,
    /// Body id, or -1 for the sun.
    pub body_id: f32,
    /// Bitwise OR of the FLAG_* constants.
    pub flags: f32,
    pub _pad: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_SELECTED: u32 = 1;
    pub const FLAG_RINGS: u32 = 2;
    pub const FLAG_SUN: u32 = 4;

    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

/// Offsets for a given pair of capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub max_instances: usize,
    pub max_events: usize,
    pub instance_data_offset: usize,
    pub event_data_offset: usize,
    pub buffer_total_floats: usize,
}

impl FrameLayout {
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + max_instances * BodyInstance::FLOATS;
        let buffer_total_floats = event_data_offset + max_events * ExplorerEvent::FLOATS;
        Self {
            max_instances,
            max_events,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
        }
    }
}

/// Contiguous frame buffer the UI reads through a single pointer.
/// Allocated once per layout; writing a frame never reallocates.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    layout: FrameLayout,
    data: Vec<f32>,
    frame: u32,
}

impl FrameBuffer {
    pub fn new(layout: FrameLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        data[HEADER_MAX_INSTANCES] = layout.max_instances as f32;
        data[HEADER_MAX_EVENTS] = layout.max_events as f32;
        data[HEADER_SELECTED_BODY] = -1.0;
        Self { layout, data, frame: 0 }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Write one frame. Input beyond capacity is dropped; returns the
    /// (instances, events) counts actually written.
    pub fn write(
        &mut self,
        instances: &[BodyInstance],
        events: &[ExplorerEvent],
        selected: Option<u32>,
        scene_mounted: bool,
    ) -> (usize, usize) {
        let n_inst = instances.len().min(self.layout.max_instances);
        let n_ev = events.len().min(self.layout.max_events);

        let inst_start = self.layout.instance_data_offset;
        let inst_src: &[f32] = bytemuck::cast_slice(&instances[..n_inst]);
        self.data[inst_start..inst_start + inst_src.len()].copy_from_slice(inst_src);

        let ev_start = self.layout.event_data_offset;
        let ev_src: &[f32] = bytemuck::cast_slice(&events[..n_ev]);
        self.data[ev_start..ev_start + ev_src.len()].copy_from_slice(ev_src);

        self.frame = self.frame.wrapping_add(1);
        self.data[HEADER_FRAME_COUNTER] = self.frame as f32;
        self.data[HEADER_INSTANCE_COUNT] = n_inst as f32;
        self.data[HEADER_EVENT_COUNT] = n_ev as f32;
        self.data[HEADER_SELECTED_BODY] = selected.map(|id| id as f32).unwrap_or(-1.0);
        self.data[HEADER_SCENE_MOUNTED] = if scene_mounted { 1.0 } else { 0.0 };

        (n_inst, n_ev)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}
