//! Preset name validation: names double as filename stems.

/// Characters that cannot appear in a filename on any supported platform.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum length of a preset name in bytes.
const MAX_NAME_LEN: usize = 256;

/// Why a name was rejected, or `None` when the name is usable as a filename stem.
pub(crate) fn name_error(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }
    if name.len() > MAX_NAME_LEN {
        return Some("name is longer than 256 characters");
    }
    if name.contains(RESERVED_CHARS) {
        return Some("name contains a reserved filesystem character");
    }
    None
}

/// True when `name` can be used as a preset filename stem.
pub fn is_valid_preset_name(name: &str) -> bool {
    name_error(name).is_none()
}
