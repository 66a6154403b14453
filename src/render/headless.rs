//! Render adapter that keeps the latest frame in memory

use glam::Vec3;

use crate::core::Result;
use super::adapter::RenderAdapter;
use super::instance::InstanceData;

/// Keeps the last uploaded frame for inspection. Used by headless runs.
#[derive(Debug, Default)]
pub struct HeadlessAdapter {
    capacity: Option<usize>,
    frame: Vec<InstanceData>,
    frames_presented: u64,
    acquisitions: u32,
}

impl HeadlessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity of the live allocation, if any
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn last_frame(&self) -> &[InstanceData] {
        &self.frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn acquisitions(&self) -> u32 {
        self.acquisitions
    }

    /// Axis-aligned bounds of the last frame's instance centers
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.frame.iter().map(|i| Vec3::from_array(i.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl RenderAdapter for HeadlessAdapter {
    fn acquire(&mut self, capacity: usize) -> Result<()> {
        self.capacity = Some(capacity);
        self.frame = Vec::with_capacity(capacity);
        self.acquisitions += 1;
        Ok(())
    }

    fn write_instances(&mut self, instances: &[InstanceData]) {
        self.frame.clear();
        self.frame.extend_from_slice(instances);
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    fn release(&mut self) {
        self.capacity = None;
        self.frame = Vec::new();
    }
}
