use bytes::{BufMut, Bytes, BytesMut};

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR_MARKER: &[u8] = b"=======\n";
const GIVEN_MARKER: &[u8] = b">>>>>>>\n";

/// Content written for a conflicting file
///
/// Both sides are copied verbatim; an absent side contributes nothing.
pub fn conflict_content(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let given = given.unwrap_or_default();

    let mut content = BytesMut::with_capacity(
        CURRENT_MARKER.len()
            + current.len()
            + SEPARATOR_MARKER.len()
            + given.len()
            + GIVEN_MARKER.len(),
    );
    content.put_slice(CURRENT_MARKER);
    content.put_slice(current);
    content.put_slice(SEPARATOR_MARKER);
    content.put_slice(given);
    content.put_slice(GIVEN_MARKER);

    content.freeze()
}
