use serde::{Deserialize, Serialize};

/// Opaque kernel-internal id for a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireId(pub u64);

/// Opaque kernel-internal id for a planar face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u64);

/// Handle to a solid owned by the kernel. Runtime-only, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidHandle(pub u64);

/// Errors raised at the geometry-kernel boundary.
///
/// These never leak past the shape handlers; the handlers convert them
/// into their own error taxonomy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("degenerate wire: {reason}")]
    DegenerateWire { reason: String },

    #[error("wire is not closed: gap of {gap} between consecutive edges")]
    OpenWire { gap: f64 },

    #[error("face has zero area")]
    ZeroAreaFace,

    #[error("unknown kernel entity")]
    UnknownEntity,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}
