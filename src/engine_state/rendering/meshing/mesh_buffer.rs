//! # Mesh Buffer
//!
//! Append-only vertex storage backed by the linear heap, plus a compiled draw-command
//! cache.
//!
//! ## Lifecycle
//!
//! 1. [`MeshBuffer::allocate`] reserves a region sized exactly for the geometry
//! 2. [`MeshBuffer::append`] copies vertex bytes in; overflowing the region is an error
//! 3. The first [`MeshBuffer::draw`] compiles the draw into a command blob; later
//!    draws replay it
//! 4. [`MeshBuffer::destroy`] releases the region and the blob and resets every field
//!
//! The cache is keyed by the owning cluster and its generation. It is never rebuilt
//! implicitly: a new generation gets a new buffer (or a new key), which drops the blob.

use cgmath::Point3;
use log::{trace, warn};

use crate::engine_state::linear_heap::{AllocatorHandle, LinearAllocation};
use crate::error::{AllocationError, MeshBufferError};

use super::super::backend::{CommandBlob, RenderBackend, VertexSource};
use super::super::transform::TransformStack;

/// Identity of the geometry a compiled command blob was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Position of the owning cluster, in cluster units.
    pub cluster: Point3<i32>,
    /// Generation of the owning cluster when the geometry was installed.
    pub generation: u64,
}

/// How a draw reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPath {
    /// A compiled command blob was replayed.
    Replayed,
    /// The draw was encoded directly because no blob could be compiled.
    Direct,
}

/// Vertex storage for one cluster.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    /// The backing region, absent until allocated
    data: Option<LinearAllocation>,
    /// Bytes written so far
    current_size: u64,
    /// Size of the backing region
    max_size: u64,
    vertex_count: u32,
    cache_key: Option<CacheKey>,
    /// Compiled draw commands for the current generation
    commands: Option<CommandBlob>,
    /// Set when the backend declined to capture this generation's draw
    capture_declined: bool,
}

impl MeshBuffer {
    /// An empty, unallocated buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer backed by `size` bytes from the heap.
    pub fn allocate(allocator: &AllocatorHandle, size: u64) -> Result<Self, AllocationError> {
        let data = allocator.alloc(size)?;
        Ok(Self {
            data: Some(data),
            max_size: size,
            ..Self::default()
        })
    }

    /// Copies `bytes` after the data already written and counts `unit_count` more
    /// vertices.
    pub fn append(&mut self, bytes: &[u8], unit_count: u32) -> Result<(), MeshBufferError> {
        if bytes.is_empty() {
            return Err(MeshBufferError::EmptyWrite);
        }

        let remaining = self.max_size - self.current_size;
        let data = self.data.as_mut().ok_or(MeshBufferError::NotAllocated)?;
        let requested = bytes.len() as u64;
        if requested > remaining {
            return Err(MeshBufferError::CapacityExceeded {
                requested,
                remaining,
            });
        }

        let start = self.current_size as usize;
        data.bytes_mut()[start..start + bytes.len()].copy_from_slice(bytes);
        self.current_size += requested;
        self.vertex_count += unit_count;
        Ok(())
    }

    /// Bytes written so far.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Size of the backing region.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Vertices written so far.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.current_size == 0
    }

    /// Whether a backing region is held.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// The written vertex bytes.
    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            Some(data) => &data.bytes()[..self.current_size as usize],
            None => &[],
        }
    }

    /// Key of the geometry this buffer holds.
    pub fn cache_key(&self) -> Option<CacheKey> {
        self.cache_key
    }

    /// The compiled draw commands, if any.
    pub fn commands(&self) -> Option<&CommandBlob> {
        self.commands.as_ref()
    }

    /// Whether draw commands are compiled.
    pub fn is_compiled(&self) -> bool {
        self.commands.is_some()
    }

    /// Tags the buffer with the generation it belongs to. A different key invalidates
    /// any compiled commands.
    pub(crate) fn bind_cache_key(&mut self, key: CacheKey) {
        if self.cache_key != Some(key) {
            self.commands = None;
            self.capture_declined = false;
        }
        self.cache_key = Some(key);
    }

    /// Captures the draw of the current contents into a command blob.
    ///
    /// Returns `Ok(false)` when the backend cannot capture; the buffer stays
    /// uncompiled and draws directly.
    pub fn compile_draw_commands<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<bool, MeshBufferError> {
        if self.commands.is_some() {
            return Err(MeshBufferError::AlreadyCompiled);
        }

        let data = self.data.as_ref().ok_or(MeshBufferError::NotAllocated)?;
        if self.current_size == 0 {
            return Err(MeshBufferError::NothingToDraw);
        }

        if !backend.begin_command_capture() {
            return Ok(false);
        }

        backend.submit_vertices(
            VertexSource {
                handle: data.id(),
                bytes: &data.bytes()[..self.current_size as usize],
            },
            self.vertex_count,
        );

        match backend.end_command_capture() {
            Some(blob) => {
                trace!("Compiled {} command bytes for {:?}", blob.len(), self.cache_key);
                self.commands = Some(blob);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Uploads dirty transforms, then draws the buffer.
    ///
    /// Compiles the command cache on first use and replays it afterwards. If the
    /// backend declines to capture, the draw is encoded directly; both paths hand the
    /// backend the same commands.
    pub fn draw<B: RenderBackend + ?Sized>(
        &mut self,
        transforms: &mut TransformStack,
        backend: &mut B,
    ) -> Result<DrawPath, MeshBufferError> {
        if self.data.is_none() {
            return Err(MeshBufferError::NotAllocated);
        }
        if self.current_size == 0 {
            return Err(MeshBufferError::NothingToDraw);
        }

        transforms.flush(backend);

        if self.commands.is_none() && !self.capture_declined {
            if !self.compile_draw_commands(backend)? {
                warn!(
                    "Backend declined command capture for {:?}, drawing directly",
                    self.cache_key
                );
                self.capture_declined = true;
            }
        }

        if let Some(blob) = &self.commands {
            backend.replay_commands(blob);
            return Ok(DrawPath::Replayed);
        }

        let data = self.data.as_ref().ok_or(MeshBufferError::NotAllocated)?;
        backend.submit_vertices(
            VertexSource {
                handle: data.id(),
                bytes: &data.bytes()[..self.current_size as usize],
            },
            self.vertex_count,
        );
        Ok(DrawPath::Direct)
    }

    /// Releases the region and the compiled commands and resets every field.
    pub fn destroy(&mut self) {
        *self = Self::new();
    }
}
