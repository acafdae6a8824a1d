//! Percent-decoding of captured parameter values.

/// Decode `raw` into `out`, replacing its contents.
///
/// `%XX` escapes are decoded and `+` becomes a space. A malformed escape or a
/// result that is not UTF-8 leaves `out` empty; lookups never fail on encoding.
pub(crate) fn decode_into(raw: &str, out: &mut String) {
    out.clear();
    if !raw.bytes().any(|b| b == b'%' || b == b'+') {
        out.push_str(raw);
        return;
    }
    if !escapes_well_formed(raw.as_bytes()) {
        return;
    }

    // split on '+' before decoding so that an escaped "%2B" stays a plus;
    // well-formed escapes never straddle a '+'
    for (i, piece) in raw.split('+').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if !piece.contains('%') {
            out.push_str(piece);
            continue;
        }
        match std::str::from_utf8(&urlencoding::decode_binary(piece.as_bytes())) {
            Ok(text) => out.push_str(text),
            Err(_) => {
                out.clear();
                return;
            }
        }
    }
}

fn escapes_well_formed(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    i += 3;
                    continue;
                }
                _ => return false,
            }
        }
        i += 1;
    }
    true
}
