use gesuch_core::SubProjectCandidate;

use crate::text_processing::char_len;

/// Names of this many characters or fewer are treated as noise.
pub const NOISE_NAME_CHARS: usize = 3;

/// Decide whether `candidate` is a new sub-project.
///
/// Rejected when an existing candidate carries the same label, or the same
/// trimmed name (only for names longer than [`NOISE_NAME_CHARS`]). The name
/// key catches a sub-project re-detected by another marker family under a
/// different number.
pub fn should_add(existing: &[SubProjectCandidate], candidate: &SubProjectCandidate) -> bool {
    let name = candidate.name.trim();
    let name_is_key = char_len(name) > NOISE_NAME_CHARS;

    !existing.iter().any(|sp| {
        sp.label == candidate.label || (name_is_key && sp.name.trim() == name)
    })
}
