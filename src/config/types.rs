/// Core types and structures for the tunebox extension layer
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource identifier handed to us by the host runtime.
///
/// Opaque 32-bit key: a category nibble plus an instance code. The core never
/// interprets the internal structure; it is a registry lookup key and nothing
/// else.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// CPU frequency-scaling governor family (apply + tear).
    pub const GOVERNOR: ResourceId = ResourceId(0x0080_0000);
    /// Kernel work-queue CPU affinity family (apply only).
    pub const WORKQUEUE: ResourceId = ResourceId(0x0080_0002);
    /// CPU frequency cap family (apply + tear with snapshot/restore).
    pub const CPU_FREQ: ResourceId = ResourceId(0x0090_0001);
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Transport/semantics tag attached to a post-process signal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SignalType {
    /// Descriptor has not been stamped yet.
    Unspecified,
    /// Standard host-side routing.
    Default,
}

/// The transport tag every tagger stamps today.
pub const DEFAULT_SIGNAL_TYPE: SignalType = SignalType::Default;

/// Compose a signal code from a category byte and a sequence number.
pub const fn sig_code(category: u8, sequence: u16) -> u32 {
    ((category as u32) << 16) | sequence as u32
}

/// Mutable signal descriptor owned by the host.
///
/// Post-process taggers stamp `signal_id` and `signal_type` in place and
/// return nothing; the host reads the fields back after the callback.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignalDescriptor {
    pub signal_id: u32,
    pub signal_type: SignalType,
}

impl SignalDescriptor {
    pub fn new() -> Self {
        Self {
            signal_id: 0,
            signal_type: SignalType::Unspecified,
        }
    }
}

impl Default for SignalDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency bounds requested by the host for the frequency-cap family.
///
/// The apply callback downcasts its context to this shape; a context of any
/// other shape (or no context at all) makes the apply a no-op.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CpuFreqRequest {
    /// Maximum frequency in kHz, applied to every cluster. `None` leaves the
    /// current maximum untouched.
    pub max_khz: Option<u64>,
    /// Minimum frequency in kHz, applied to every cluster. `None` leaves the
    /// current minimum untouched.
    pub min_khz: Option<u64>,
}

/// Custom error types for tunebox
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate resource registration: {0}")]
    DuplicateResource(ResourceId),

    #[error("Duplicate post-process registration: {0}")]
    DuplicateProcessName(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Reasons a best-effort operation was skipped.
///
/// Nothing inside this core escalates: every failure mode is absorbed locally
/// as one of these, logged at the registry layer, and dropped. The host only
/// ever sees "callback returned". The typed reason exists so tests can prove
/// a write was omitted rather than attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    #[error("control surface unavailable: {path}")]
    IoUnavailable { path: String },

    #[error("no policy value for machine identity {identity:?}")]
    NoPolicyForMachine { identity: String },

    #[error("callback context absent or not usable")]
    NullContext,
}

/// Result type for best-effort control-surface operations.
pub type SkipResult<T> = std::result::Result<T, Skip>;
