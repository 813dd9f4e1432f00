//! Syntactic IPv4 check: four dotted decimal octets, no leading zeros.

/// Returns true iff `input` is a dotted-quad IPv4 address.
///
/// Each of the four segments must be non-empty ASCII digits with a value in
/// 0..=255, and multi-digit segments must not start with '0' ("01" is
/// rejected, "0" and "10" are fine). No trimming is done here.
pub fn is_valid_ipv4(input: &str) -> bool {
    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if part.len() > 1 && part.starts_with('0') {
            return false;
        }
        // Long digit runs overflow u8 and fail here as well.
        part.parse::<u8>().is_ok()
    })
}
