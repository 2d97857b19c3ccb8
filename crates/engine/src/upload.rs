use crate::state::AttachmentThumb;
use forms_protocol::{file_name_from_path, is_image_filename};

/// A file picked by the user, read into memory before upload.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Append a pending preview for each picked file. Previews render before any
/// network write so the gallery never blocks on upload latency.
pub(crate) fn push_previews(thumbs: &mut Vec<AttachmentThumb>, files: &[LocalFile]) {
    for file in files {
        thumbs.push(AttachmentThumb {
            is_image: is_image_filename(&file.name),
            name: file.name.clone(),
            url: None,
            pending: true,
        });
    }
}

/// Promote previews matching `local_name` to the server-confirmed filename
/// and URL.
pub(crate) fn confirm_preview(thumbs: &mut [AttachmentThumb], local_name: &str, stored: &str) {
    let server_name = file_name_from_path(stored);
    for thumb in thumbs.iter_mut().filter(|thumb| thumb.name == local_name) {
        thumb.name = server_name.to_string();
        thumb.url = Some(stored.to_string());
        thumb.is_image = is_image_filename(server_name);
        thumb.pending = false;
    }
}

/// Drop the previews created for a file whose upload failed.
pub(crate) fn drop_preview(thumbs: &mut Vec<AttachmentThumb>, local_name: &str) {
    thumbs.retain(|thumb| thumb.name != local_name);
}
