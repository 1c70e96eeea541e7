//! Attachment references embedded in survey records.

/// The survey field that holds embedded attachment references.
pub const ATTACHMENTS_FIELD: &str = "RelationAttachments";

/// A reference to a binary attachment, extracted from a survey record.
///
/// The `stamp` is the reference's date value and doubles as the content
/// validator for existence checks against the blob store: clients send the
/// same stamp as the `ETag` when uploading the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// The attachment name (a path relative to the trench).
    pub name: String,
    /// The date stamp, used as the content validator.
    pub stamp: String,
}

/// Parses the attachment references out of a record's attachments field.
///
/// The field holds zero or more blocks separated by a blank line; each block
/// is newline-separated `key=value` lines, cut on the first `=`. A block
/// contributes a reference only if both its `n` (name) and `d` (date) values
/// are non-empty once the whole block has been scanned; later lines for the
/// same key overwrite earlier ones. Blocks missing either key are silently
/// ignored.
#[must_use]
pub fn parse_attachment_refs(field: &str) -> Vec<AttachmentRef> {
    let mut refs = Vec::new();
    for block in field.split("\n\n") {
        let mut name = "";
        let mut stamp = "";
        for line in block.lines() {
            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            if key == "n" {
                name = value;
            } else if key == "d" {
                stamp = value;
            }
        }
        if !name.is_empty() && !stamp.is_empty() {
            refs.push(AttachmentRef {
                name: name.to_string(),
                stamp: stamp.to_string(),
            });
        }
    }
    refs
}
