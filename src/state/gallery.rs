/// Photo repository and intake pipeline state
///
/// Owns the in-memory mirror of persisted photos plus the pending files
/// waiting for a save decision. Store I/O happens elsewhere: mutations
/// that depend on a network result are split into a `*_request` method
/// that builds the outgoing snapshot without touching state, and an
/// `apply_*` method invoked only on success. A failed store call
/// therefore leaves everything here exactly as it was.
use super::data::{PendingFile, PhotoRecord};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct Gallery {
    /// Persisted photos, loaded once at startup and mirrored thereafter
    pub photos: Vec<PhotoRecord>,
    /// Files selected or dropped, awaiting preview + commit
    pub pending: Vec<PendingFile>,
    /// Store key of the photo open in the detail panel
    pub selected: Option<String>,
    /// Note-editing buffer for the open photo
    pub note_buffer: String,
    pub editing_note: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with freshly listed records
    pub fn set_photos(&mut self, photos: Vec<PhotoRecord>) {
        self.photos = photos;
    }

    /// Allocate a pending entry for a newly selected file
    ///
    /// The entry appears immediately (file name first, preview later);
    /// the returned id ties the decode task's result back to it.
    pub fn queue_file(&mut self, path: PathBuf) -> Uuid {
        let id = Uuid::new_v4();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        self.pending.push(PendingFile {
            id,
            path,
            file_name,
            note: String::new(),
            preview: None,
        });
        id
    }

    /// Patch a finished preview into its entry, matched by id
    ///
    /// Entries may resolve in any order; a preview for an entry that was
    /// discarded in the meantime is dropped on the floor.
    pub fn attach_preview(&mut self, id: Uuid, data_url: String) {
        if let Some(entry) = self.pending.iter_mut().find(|p| p.id == id) {
            entry.preview = Some(data_url);
        }
    }

    pub fn set_pending_note(&mut self, id: Uuid, note: String) {
        if let Some(entry) = self.pending.iter_mut().find(|p| p.id == id) {
            entry.note = note;
        }
    }

    /// Drop a pending entry without any store interaction
    pub fn discard_pending(&mut self, id: Uuid) {
        self.pending.retain(|p| p.id != id);
    }

    pub fn pending_file(&self, id: Uuid) -> Option<&PendingFile> {
        self.pending.iter().find(|p| p.id == id)
    }

    /// Build the record to save for a pending entry
    ///
    /// Returns `None` while the preview has not finished decoding; the
    /// commit is then a no-op and the user retries once it lands. State
    /// is untouched either way; the entry only leaves the pending list
    /// in `apply_commit` once the store accepted the record.
    pub fn commit_request(&self, id: Uuid, uploaded_at: String) -> Option<PhotoRecord> {
        let entry = self.pending_file(id)?;
        let preview = entry.preview.clone()?;
        Some(PhotoRecord {
            id: String::new(),
            file_name: entry.file_name.clone(),
            image_url: preview,
            note: entry.note.clone(),
            uploaded_at,
        })
    }

    /// A commit succeeded: adopt the keyed record, retire the entry
    pub fn apply_commit(&mut self, pending_id: Uuid, photo: PhotoRecord) {
        self.pending.retain(|p| p.id != pending_id);
        self.photos.push(photo);
    }

    /// Select a photo for detail viewing and seed the note buffer
    pub fn open(&mut self, id: &str) {
        if let Some(photo) = self.photos.iter().find(|p| p.id == id) {
            self.note_buffer = photo.note.clone();
            self.selected = Some(photo.id.clone());
            self.editing_note = false;
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.editing_note = false;
    }

    pub fn selected_photo(&self) -> Option<&PhotoRecord> {
        let id = self.selected.as_deref()?;
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn start_note_edit(&mut self) {
        if let Some(photo) = self.selected_photo() {
            self.note_buffer = photo.note.clone();
            self.editing_note = true;
        }
    }

    pub fn cancel_note_edit(&mut self) {
        if let Some(photo) = self.selected_photo() {
            self.note_buffer = photo.note.clone();
        }
        self.editing_note = false;
    }

    /// Snapshot of the open photo with the buffer's note, for the store
    ///
    /// Nothing in memory changes until `apply_note_saved` runs on
    /// success; a failed update leaves the record byte-for-byte intact.
    pub fn note_update_request(&self) -> Option<PhotoRecord> {
        let photo = self.selected_photo()?;
        let mut updated = photo.clone();
        updated.note = self.note_buffer.clone();
        Some(updated)
    }

    /// A note update succeeded: replace the record and the selection
    pub fn apply_note_saved(&mut self, photo: PhotoRecord) {
        if let Some(slot) = self.photos.iter_mut().find(|p| p.id == photo.id) {
            *slot = photo;
        }
        self.editing_note = false;
    }

    /// A delete succeeded: drop the record and clear the selection
    pub fn apply_deleted(&mut self, id: &str) {
        self.photos.retain(|p| p.id != id);
        if self.selected.as_deref() == Some(id) {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(gallery: &mut Gallery) -> Uuid {
        gallery.queue_file(PathBuf::from("/tmp/photos/order-form.png"))
    }

    fn saved_photo(id: &str, note: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            file_name: "order-form.png".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            note: note.to_string(),
            uploaded_at: "2025-06-01T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn queued_file_appears_without_preview() {
        let mut gallery = Gallery::new();
        let id = queued(&mut gallery);

        let entry = gallery.pending_file(id).unwrap();
        assert_eq!(entry.file_name, "order-form.png");
        assert!(entry.preview.is_none());
        assert!(entry.note.is_empty());
    }

    #[test]
    fn commit_without_preview_is_a_no_op() {
        let mut gallery = Gallery::new();
        let id = queued(&mut gallery);

        let request = gallery.commit_request(id, "2025-06-01T09:00:00+00:00".to_string());
        assert!(request.is_none());
        assert_eq!(gallery.pending.len(), 1);
        assert!(gallery.photos.is_empty());
    }

    #[test]
    fn commit_after_preview_builds_record() {
        let mut gallery = Gallery::new();
        let id = queued(&mut gallery);
        gallery.attach_preview(id, "data:image/png;base64,AAAA".to_string());
        gallery.set_pending_note(id, "งานด่วน".to_string());

        let record = gallery
            .commit_request(id, "2025-06-01T09:00:00+00:00".to_string())
            .unwrap();
        assert!(record.id.is_empty());
        assert_eq!(record.note, "งานด่วน");
        // Building the request changes nothing yet
        assert_eq!(gallery.pending.len(), 1);

        let mut keyed = record;
        keyed.id = "-Nabc123".to_string();
        gallery.apply_commit(id, keyed);
        assert!(gallery.pending.is_empty());
        assert_eq!(gallery.photos.len(), 1);
        assert_eq!(gallery.photos[0].id, "-Nabc123");
    }

    #[test]
    fn preview_for_discarded_entry_is_dropped() {
        let mut gallery = Gallery::new();
        let id = queued(&mut gallery);
        gallery.discard_pending(id);
        gallery.attach_preview(id, "data:image/png;base64,AAAA".to_string());
        assert!(gallery.pending.is_empty());
    }

    #[test]
    fn failed_note_update_leaves_record_unchanged() {
        let mut gallery = Gallery::new();
        gallery.set_photos(vec![saved_photo("-Nabc123", "เดิม")]);
        gallery.open("-Nabc123");
        gallery.start_note_edit();
        gallery.note_buffer = "ใหม่".to_string();

        let request = gallery.note_update_request().unwrap();
        assert_eq!(request.note, "ใหม่");
        // The store call failed: apply_note_saved never runs
        assert_eq!(gallery.photos[0].note, "เดิม");
        assert_eq!(gallery.selected_photo().unwrap().note, "เดิม");

        gallery.apply_note_saved(request);
        assert_eq!(gallery.photos[0].note, "ใหม่");
        assert!(!gallery.editing_note);
    }

    #[test]
    fn delete_clears_selection() {
        let mut gallery = Gallery::new();
        gallery.set_photos(vec![saved_photo("-Na", ""), saved_photo("-Nb", "")]);
        gallery.open("-Na");

        gallery.apply_deleted("-Na");
        assert_eq!(gallery.photos.len(), 1);
        assert!(gallery.selected.is_none());

        // Deleting an unselected photo keeps the current selection
        gallery.open("-Nb");
        gallery.apply_deleted("-Nzz");
        assert_eq!(gallery.selected.as_deref(), Some("-Nb"));
    }
}
