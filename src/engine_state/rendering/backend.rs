//! # Render Backends
//!
//! The seam between mesh buffers and whatever issues the actual draw calls.
//!
//! A backend receives vertex bytes it never has to interpret beyond the [`Vertex`]
//! layout, and can optionally capture the commands for one draw into an opaque
//! [`CommandBlob`] that is replayed on later frames instead of re-encoding the draw.
//!
//! [`CommandListBackend`] is a software backend that encodes everything as 32-bit
//! register/parameter words, the way a command-list GPU expects them. It is what the
//! binary renders into, and what the tests inspect.
//!
//! [`Vertex`]: super::vertex::Vertex

use cgmath::Matrix4;
use log::trace;

use crate::engine_state::linear_heap::AllocationId;

use super::transform::MatrixType;

/// A captured command sequence. Mesh buffers store and replay it without looking
/// inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBlob(Vec<u8>);

impl CommandBlob {
    /// Wraps captured bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The captured bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Vertex data handed to a backend for drawing.
#[derive(Debug, Clone, Copy)]
pub struct VertexSource<'a> {
    /// Identity of the linear allocation holding the vertices.
    pub handle: AllocationId,
    /// The written part of the allocation.
    pub bytes: &'a [u8],
}

/// Consumer of transforms, vertex data and command blobs.
pub trait RenderBackend {
    /// Uploads the top of a matrix stack.
    fn upload_transform(&mut self, matrix: MatrixType, value: &Matrix4<f32>);

    /// Draws `vertex_count` vertices as a triangle list. Between a successful
    /// [`begin_command_capture`](Self::begin_command_capture) and the matching
    /// [`end_command_capture`](Self::end_command_capture) the draw is captured instead.
    fn submit_vertices(&mut self, source: VertexSource<'_>, vertex_count: u32);

    /// Starts capturing commands. Returns `false` if this backend cannot capture, in
    /// which case nothing was started.
    fn begin_command_capture(&mut self) -> bool;

    /// Stops capturing and returns the captured commands, or `None` if the capture
    /// failed.
    fn end_command_capture(&mut self) -> Option<CommandBlob>;

    /// Issues previously captured commands.
    fn replay_commands(&mut self, blob: &CommandBlob);
}

/// Attribute buffer address register.
pub const REG_ATTRIBUTE_BUFFER: u32 = 0x0200;
/// Primitive mode register.
pub const REG_PRIMITIVE: u32 = 0x025E;
/// Vertex count register.
pub const REG_VERTEX_COUNT: u32 = 0x0228;
/// Draw trigger register.
pub const REG_DRAW_TRIGGER: u32 = 0x022E;
/// Float uniform register.
pub const REG_UNIFORM: u32 = 0x02C0;
/// Triangle list primitive mode.
pub const PRIMITIVE_TRIANGLES: u32 = 0x0000;

/// Uniform slot each matrix stack uploads into.
pub fn uniform_slot(matrix: MatrixType) -> u32 {
    match matrix {
        MatrixType::PROJECTION => 0x20,
        MatrixType::MODELVIEW => 0x24,
    }
}

/// Command header: register in the low half-word, parameter count in the high one.
pub fn command_header(register: u32, parameters: u32) -> u32 {
    register | (parameters << 16)
}

/// Counters kept by [`CommandListBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Draws encoded straight into the frame.
    pub direct_draws: u64,
    /// Blobs replayed into the frame.
    pub replays: u64,
    /// Blobs produced by captures.
    pub captures: u64,
    /// Vertices submitted, captured ones included.
    pub vertices_submitted: u64,
    /// Matrices uploaded.
    pub transform_uploads: u64,
}

/// Software backend encoding draws as 32-bit command words.
#[derive(Debug)]
pub struct CommandListBackend {
    /// Words emitted for the current frame
    frame: Vec<u32>,
    /// Scratch for the capture in progress, owned by that capture
    capture: Option<Vec<u32>>,
    capture_enabled: bool,
    stats: BackendStats,
}

impl Default for CommandListBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandListBackend {
    /// Creates a backend with capture enabled and an empty frame.
    pub fn new() -> Self {
        Self {
            frame: Vec::new(),
            capture: None,
            capture_enabled: true,
            stats: BackendStats::default(),
        }
    }

    /// Creates a backend that refuses every capture, forcing direct draws.
    pub fn without_capture() -> Self {
        Self {
            capture_enabled: false,
            ..Self::new()
        }
    }

    /// Enables or disables capture for later draws.
    pub fn set_capture_enabled(&mut self, enabled: bool) {
        self.capture_enabled = enabled;
    }

    /// Clears the frame.
    pub fn begin_frame(&mut self) {
        self.frame.clear();
    }

    /// Takes the words emitted so far, leaving an empty frame.
    pub fn take_frame(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.frame)
    }

    /// Words emitted so far this frame.
    pub fn frame_words(&self) -> &[u32] {
        &self.frame
    }

    /// Counters since creation.
    pub fn stats(&self) -> &BackendStats {
        &self.stats
    }

    fn emit(&mut self, words: &[u32]) {
        match &mut self.capture {
            Some(scratch) => scratch.extend_from_slice(words),
            None => self.frame.extend_from_slice(words),
        }
    }
}

impl RenderBackend for CommandListBackend {
    fn upload_transform(&mut self, matrix: MatrixType, value: &Matrix4<f32>) {
        let columns: &[f32; 16] = value.as_ref();

        let mut words = Vec::with_capacity(18);
        words.push(command_header(REG_UNIFORM, 17));
        words.push(uniform_slot(matrix));
        words.extend(columns.iter().map(|value| value.to_bits()));

        self.emit(&words);
        self.stats.transform_uploads += 1;
    }

    fn submit_vertices(&mut self, source: VertexSource<'_>, vertex_count: u32) {
        let words = [
            command_header(REG_ATTRIBUTE_BUFFER, 2),
            source.handle as u32,
            (source.handle >> 32) as u32,
            command_header(REG_PRIMITIVE, 1),
            PRIMITIVE_TRIANGLES,
            command_header(REG_VERTEX_COUNT, 1),
            vertex_count,
            command_header(REG_DRAW_TRIGGER, 1),
            1,
        ];

        if self.capture.is_none() {
            self.stats.direct_draws += 1;
        }
        self.stats.vertices_submitted += vertex_count as u64;
        self.emit(&words);
    }

    fn begin_command_capture(&mut self) -> bool {
        if !self.capture_enabled || self.capture.is_some() {
            return false;
        }

        self.capture = Some(Vec::new());
        true
    }

    fn end_command_capture(&mut self) -> Option<CommandBlob> {
        let words = self.capture.take()?;
        self.stats.captures += 1;

        let bytes = words.iter().flat_map(|word| word.to_le_bytes()).collect();
        Some(CommandBlob::new(bytes))
    }

    fn replay_commands(&mut self, blob: &CommandBlob) {
        trace!("Replaying {} command bytes", blob.len());

        let words: Vec<u32> = blob
            .as_bytes()
            .chunks_exact(4)
            .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect();

        self.emit(&words);
        self.stats.replays += 1;
    }
}
