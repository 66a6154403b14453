//! Frame loop glue: engine update, instance upload, present

use crate::core::Result;
use crate::simulation::engine::Engine;
use super::adapter::RenderAdapter;
use super::instance::InstanceData;

/// Owns an engine and a render adapter for one session.
///
/// Adapter resources are acquired on construction and released when the
/// driver is dropped, whatever state the engine is in at that point.
pub struct FrameDriver<A: RenderAdapter> {
    engine: Engine,
    adapter: A,
    /// Capacity of the live adapter allocation
    acquired: Option<usize>,
    running: bool,
    scratch: Vec<InstanceData>,
}

impl<A: RenderAdapter> FrameDriver<A> {
    pub fn new(engine: Engine, mut adapter: A) -> Result<Self> {
        let capacity = engine.voxel_count();
        adapter.acquire(capacity)?;
        log::debug!("Render adapter acquired for {} instances", capacity);

        Ok(Self {
            engine,
            adapter,
            acquired: Some(capacity),
            running: true,
            scratch: Vec::with_capacity(capacity),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable engine access for load/dismantle/rebuild between frames
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame at session time `now`.
    ///
    /// Returns `Ok(false)` without doing anything once the driver is stopped.
    pub fn frame(&mut self, now: f32) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }

        self.engine.tick(now);

        let count = self.engine.voxel_count();
        if self.acquired != Some(count) {
            self.release_adapter();
            self.adapter.acquire(count)?;
            self.acquired = Some(count);
            log::debug!("Render adapter reacquired for {} instances", count);
        }

        self.engine.write_instances(&mut self.scratch);
        self.adapter.write_instances(&self.scratch);
        self.adapter.present();
        Ok(true)
    }

    /// Stop the frame loop; later `frame` calls are no-ops
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame loop stopped");
        }
        self.running = false;
    }

    /// Stop and release everything
    pub fn dispose(self) {
        drop(self);
    }

    fn release_adapter(&mut self) {
        if self.acquired.take().is_some() {
            self.adapter.release();
        }
    }
}

impl<A: RenderAdapter> Drop for FrameDriver<A> {
    fn drop(&mut self) {
        self.running = false;
        self.release_adapter();
        log::debug!("Frame driver disposed in {} state", self.engine.state());
    }
}
