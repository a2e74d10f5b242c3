use std::path::Path;

/// Domain interface for the preprocessing stage.
///
/// Rewrites an arbitrary input recording as canonical audio (mono, fixed
/// sample rate) at `output`. The transform is deterministic and its
/// parameters are crate constants, never caller input. A failure drops the
/// item from its batch; it must not affect sibling items.
pub trait AudioNormalizer: Send {
    fn normalize(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
