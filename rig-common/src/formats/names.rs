//! Fixed-width, NUL-terminated name fields.

/// Copy `name` into `field`, zero-filling the remainder.
///
/// At most `field.len() - 1` bytes are copied so the field always keeps a
/// terminating NUL. Truncation never splits a UTF-8 sequence. Returns `true`
/// if the name had to be truncated.
pub fn encode_name(name: &str, field: &mut [u8]) -> bool {
    field.fill(0);

    let max = field.len().saturating_sub(1);
    let mut end = name.len().min(max);
    while !name.is_char_boundary(end) {
        end -= 1;
    }

    field[..end].copy_from_slice(&name.as_bytes()[..end]);
    end < name.len()
}

/// Read a NUL-terminated name out of a fixed field.
pub fn decode_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Whether `name` fits a field of `field_len` bytes without truncation.
pub fn name_fits(name: &str, field_len: usize) -> bool {
    name.len() < field_len
}
