flat_mod!(select, source, profiling);

/// Decodes a NUL-terminated string returned by an info query.
pub(crate) fn c_string (mut bytes: Vec<u8>) -> String {
    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(nul);
    }

    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::c_string;

    #[test]
    fn c_string_stops_at_nul () {
        assert_eq!(c_string(b"NVIDIA CUDA\0".to_vec()), "NVIDIA CUDA");
        assert_eq!(c_string(b"abc\0def".to_vec()), "abc");
        assert_eq!(c_string(Vec::new()), "");
    }
}
