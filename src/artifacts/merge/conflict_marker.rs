use bytes::{BufMut, Bytes, BytesMut};

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR: &[u8] = b"=======\n";
const GIVEN_MARKER: &[u8] = b">>>>>>>\n";

/// Content of a conflicting file
///
/// A side missing from its branch contributes nothing between its markers.
/// Contents are concatenated byte for byte, so a version without a trailing
/// newline runs straight into the following marker.
pub fn conflict_marker(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let given = given.unwrap_or_default();

    let mut content = BytesMut::with_capacity(
        CURRENT_MARKER.len() + current.len() + SEPARATOR.len() + given.len() + GIVEN_MARKER.len(),
    );
    content.put_slice(CURRENT_MARKER);
    content.put_slice(current);
    content.put_slice(SEPARATOR);
    content.put_slice(given);
    content.put_slice(GIVEN_MARKER);

    content.freeze()
}
