//! Preview slots.
//!
//! Each slot is one display region (the main preview or a palette thumbnail)
//! with its own render configuration, generation counter, mounted surface and
//! artifact handle. Slots never share artifacts.
//!
//! A configuration change bumps the generation and queues a [`RenderJob`]
//! that captures it. When the job's result comes back, it is mounted only if
//! the generation still matches; anything older is dropped.

use image::RgbaImage;
use std::sync::Arc;

use crate::error::Result;
use crate::render::{Artifact, RenderConfig};

/// Identifies a preview slot within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    Main,
    Thumbnail(usize),
}

/// A render request captured at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub slot: SlotId,
    pub generation: u64,
    pub config: RenderConfig,
}

/// The drawable currently mounted in a slot.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: Arc<RgbaImage>,
}

impl Surface {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// The slot's current artifact, tagged with the generation it was rendered for.
#[derive(Debug, Clone)]
pub struct ArtifactHandle {
    generation: u64,
    artifact: Arc<Artifact>,
}

impl ArtifactHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }
}

/// Outcome of handing a finished job back to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Mounted,
    Failed,
    Stale,
}

#[derive(Debug)]
pub struct PreviewSlot {
    id: SlotId,
    generation: u64,
    config: Option<RenderConfig>,
    pending: Option<RenderJob>,
    surface: Option<Surface>,
    handle: Option<ArtifactHandle>,
}

impl PreviewSlot {
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            generation: 0,
            config: None,
            pending: None,
            surface: None,
            handle: None,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> Option<&RenderConfig> {
        self.config.as_ref()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn handle(&self) -> Option<&ArtifactHandle> {
        self.handle.as_ref()
    }

    /// Sets the slot's inputs. `None` blanks the slot.
    ///
    /// Every call starts a new generation, so results of earlier jobs are
    /// ignored even if they are still in flight. The mounted surface and
    /// handle stay until a newer render replaces them; `None` drops them
    /// immediately.
    pub fn configure(&mut self, config: Option<RenderConfig>) {
        self.generation += 1;
        match config {
            Some(config) => {
                tracing::trace!(slot = ?self.id, generation = self.generation, "render dispatched");
                self.pending = Some(RenderJob {
                    slot: self.id,
                    generation: self.generation,
                    config: config.clone(),
                });
                self.config = Some(config);
            }
            None => {
                self.pending = None;
                self.config = None;
                self.surface = None;
                self.handle = None;
            }
        }
    }

    /// Hands out the queued job, if any.
    pub fn take_job(&mut self) -> Option<RenderJob> {
        self.pending.take()
    }

    /// Accepts a finished job.
    ///
    /// A failed render blanks the slot; the failure is logged, not surfaced.
    pub fn complete(&mut self, generation: u64, result: Result<Artifact>) -> Completion {
        if generation != self.generation {
            tracing::debug!(
                slot = ?self.id,
                generation,
                current = self.generation,
                "discarding stale render"
            );
            return Completion::Stale;
        }

        match result {
            Ok(artifact) => {
                self.surface = Some(Surface {
                    pixels: artifact.pixels(),
                });
                self.handle = Some(ArtifactHandle {
                    generation,
                    artifact: Arc::new(artifact),
                });
                Completion::Mounted
            }
            Err(err) => {
                tracing::warn!(slot = ?self.id, error = %err, "render failed");
                self.surface = None;
                self.handle = None;
                Completion::Failed
            }
        }
    }
}
