use chrono::Utc;
use iced::widget::image::Handle;
use iced::widget::{button, column, row, text};
use iced::{window, Element, Event, Length, Size, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

mod config;
mod intake;
mod print;
mod state;
mod store;
mod ui;

use config::AppConfig;
use state::data::{DocType, Document, PhotoRecord};
use state::documents::{DocField, Documents, ItemField};
use state::gallery::Gallery;
use store::StoreClient;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Gallery,
    Documents,
}

/// Main application state
struct Piscopy {
    config: AppConfig,
    store: StoreClient,
    view: View,
    /// Photo repository and intake pipeline
    gallery: Gallery,
    /// Document collection and invoice engine
    documents: Documents,
    /// Kind selected for the next new document
    doc_type_choice: DocType,
    /// Decoded image handles for display, keyed by photo or pending id
    previews: HashMap<String, Handle>,
    /// Status message shown at the bottom of the window
    status: String,
    /// Outstanding startup fetches
    loading: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    SwitchView(View),
    PhotosLoaded(Result<Vec<PhotoRecord>, String>),
    DocumentsLoaded(Result<Vec<Document>, String>),

    // Photo intake
    PickFiles,
    FileDropped(PathBuf),
    PreviewDecoded(Uuid, Result<String, String>),
    PendingNoteChanged(Uuid, String),
    DiscardPending(Uuid),
    CommitPending(Uuid),
    PhotoSaved(Uuid, Result<PhotoRecord, String>),

    // Photo repository
    OpenPhoto(String),
    ClosePhoto,
    EditNote,
    CancelNoteEdit,
    NoteBufferChanged(String),
    SaveNote,
    NoteSaved(Result<PhotoRecord, String>),
    DeletePhoto(String),
    PhotoDeleted(String, Result<(), String>),
    ExportPhoto(String),

    // Documents
    DocTypePicked(DocType),
    CreateDocument,
    OpenDocument(String),
    CloseDocument,
    FieldChanged(DocField, String),
    AddItem,
    ItemChanged(usize, ItemField, String),
    RemoveItem(usize),
    SaveDocument,
    CompleteAndPrint,
    DeleteDocument(String),
    DocumentSynced(Result<(), String>),
    DocumentDeleted(Result<(), String>),
}

impl Piscopy {
    fn new() -> (Self, Task<Message>) {
        let config = config::load();
        let store = StoreClient::new(&config.store_url);
        info!(store_url = %config.store_url, "🖨️ Piscopy started");

        let photo_store = store.clone();
        let load_photos = Task::perform(
            async move {
                photo_store
                    .list::<PhotoRecord>(store::PHOTOS)
                    .await
                    .map(|listing| {
                        // The store key is the record's identity
                        listing
                            .into_iter()
                            .map(|(key, mut photo)| {
                                photo.id = key;
                                photo
                            })
                            .collect()
                    })
                    .map_err(|e| e.to_string())
            },
            Message::PhotosLoaded,
        );

        let document_store = store.clone();
        let load_documents = Task::perform(
            async move {
                document_store
                    .list::<Document>(store::DOCUMENTS)
                    .await
                    .map(|listing| {
                        listing
                            .into_iter()
                            .map(|(key, mut doc)| {
                                doc.id = key;
                                doc
                            })
                            .collect()
                    })
                    .map_err(|e| e.to_string())
            },
            Message::DocumentsLoaded,
        );

        (
            Piscopy {
                config,
                store,
                view: View::Gallery,
                gallery: Gallery::new(),
                documents: Documents::new(),
                doc_type_choice: DocType::Receipt,
                previews: HashMap::new(),
                status: "กำลังโหลดข้อมูลจากร้าน...".to_string(),
                loading: 2,
            },
            Task::batch([load_photos, load_documents]),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SwitchView(view) => {
                self.view = view;
                Task::none()
            }

            Message::PhotosLoaded(result) => {
                self.finish_loading();
                match result {
                    Ok(photos) => {
                        for photo in &photos {
                            self.cache_preview(photo.id.clone(), &photo.image_url);
                        }
                        info!(count = photos.len(), "photos loaded");
                        self.gallery.set_photos(photos);
                    }
                    Err(error) => {
                        error!(%error, "loading photos failed");
                        self.status = "โหลดรูปภาพไม่สำเร็จ".to_string();
                    }
                }
                Task::none()
            }

            Message::DocumentsLoaded(result) => {
                self.finish_loading();
                match result {
                    Ok(documents) => {
                        info!(count = documents.len(), "documents loaded");
                        self.documents.set_documents(documents);
                    }
                    Err(error) => {
                        error!(%error, "loading documents failed");
                        self.status = "โหลดเอกสารไม่สำเร็จ".to_string();
                    }
                }
                Task::none()
            }

            // ---- Photo intake ----
            Message::PickFiles => {
                let files = FileDialog::new()
                    .set_title("เลือกไฟล์รูปภาพ")
                    .add_filter("รูปภาพ", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                    .pick_files()
                    .unwrap_or_default();

                let tasks: Vec<_> = files
                    .into_iter()
                    .map(|path| self.queue_decode(path))
                    .collect();
                Task::batch(tasks)
            }

            Message::FileDropped(path) => self.queue_decode(path),

            Message::PreviewDecoded(id, Ok(data_url)) => {
                self.cache_preview(id.to_string(), &data_url);
                self.gallery.attach_preview(id, data_url);
                Task::none()
            }
            Message::PreviewDecoded(id, Err(error)) => {
                let path = self
                    .gallery
                    .pending_file(id)
                    .map(|entry| entry.path.display().to_string())
                    .unwrap_or_default();
                warn!(%id, %path, %error, "preview decode failed");
                self.status = format!("อ่านไฟล์ไม่สำเร็จ: {}", error);
                Task::none()
            }

            Message::PendingNoteChanged(id, note) => {
                self.gallery.set_pending_note(id, note);
                Task::none()
            }

            Message::DiscardPending(id) => {
                self.gallery.discard_pending(id);
                self.previews.remove(&id.to_string());
                Task::none()
            }

            Message::CommitPending(id) => {
                // Still decoding: ignore, the user retries once the preview lands
                let Some(record) = self.gallery.commit_request(id, Utc::now().to_rfc3339())
                else {
                    return Task::none();
                };

                self.status = format!("กำลังบันทึก {}...", record.file_name);
                let store = self.store.clone();
                Task::perform(
                    async move {
                        let key = store
                            .create(store::PHOTOS, &record)
                            .await
                            .map_err(|e| e.to_string())?;
                        Ok(PhotoRecord { id: key, ..record })
                    },
                    move |result| Message::PhotoSaved(id, result),
                )
            }

            Message::PhotoSaved(pending_id, Ok(photo)) => {
                // The preview handle moves from the temporary id to the store key
                if let Some(handle) = self.previews.remove(&pending_id.to_string()) {
                    self.previews.insert(photo.id.clone(), handle);
                }
                self.status = format!("บันทึก {} แล้ว", photo.file_name);
                self.gallery.apply_commit(pending_id, photo);
                Task::none()
            }
            Message::PhotoSaved(_, Err(error)) => {
                error!(%error, "saving photo failed");
                self.status = "บันทึกรูปภาพไม่สำเร็จ".to_string();
                alert("เกิดข้อผิดพลาดในการบันทึกรูปภาพ");
                Task::none()
            }

            // ---- Photo repository ----
            Message::OpenPhoto(id) => {
                self.gallery.open(&id);
                Task::none()
            }
            Message::ClosePhoto => {
                self.gallery.close();
                Task::none()
            }
            Message::EditNote => {
                self.gallery.start_note_edit();
                Task::none()
            }
            Message::CancelNoteEdit => {
                self.gallery.cancel_note_edit();
                Task::none()
            }
            Message::NoteBufferChanged(note) => {
                self.gallery.note_buffer = note;
                Task::none()
            }

            Message::SaveNote => {
                let Some(updated) = self.gallery.note_update_request() else {
                    return Task::none();
                };
                let store = self.store.clone();
                Task::perform(
                    async move {
                        store
                            .update(store::PHOTOS, &updated.id, &updated)
                            .await
                            .map_err(|e| e.to_string())?;
                        Ok(updated)
                    },
                    Message::NoteSaved,
                )
            }

            Message::NoteSaved(Ok(photo)) => {
                self.status = format!("บันทึกบันทึกของ {} แล้ว", photo.file_name);
                self.gallery.apply_note_saved(photo);
                Task::none()
            }
            Message::NoteSaved(Err(error)) => {
                error!(%error, "updating note failed");
                self.status = "บันทึกบันทึกไม่สำเร็จ".to_string();
                alert("เกิดข้อผิดพลาดในการบันทึกบันทึก");
                Task::none()
            }

            Message::DeletePhoto(id) => {
                if !confirm("คุณต้องการลบรูปภาพนี้ใช่หรือไม่?") {
                    return Task::none();
                }
                let store = self.store.clone();
                let photo_id = id.clone();
                Task::perform(
                    async move {
                        store
                            .delete(store::PHOTOS, &photo_id)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    move |result| Message::PhotoDeleted(id.clone(), result),
                )
            }

            Message::PhotoDeleted(id, Ok(())) => {
                self.previews.remove(&id);
                self.gallery.apply_deleted(&id);
                self.status = "ลบรูปภาพแล้ว".to_string();
                Task::none()
            }
            Message::PhotoDeleted(_, Err(error)) => {
                error!(%error, "deleting photo failed");
                self.status = "ลบรูปภาพไม่สำเร็จ".to_string();
                alert("เกิดข้อผิดพลาดในการลบรูปภาพ");
                Task::none()
            }

            Message::ExportPhoto(id) => {
                let Some(photo) = self.gallery.photos.iter().find(|p| p.id == id) else {
                    return Task::none();
                };
                match intake::export::export_photo(photo) {
                    Ok(Some(path)) => {
                        self.status = format!("บันทึกไฟล์ไปที่ {}", path.display());
                    }
                    Ok(None) => {}
                    Err(error) => {
                        error!(%error, "exporting photo failed");
                        self.status = "ดาวน์โหลดรูปภาพไม่สำเร็จ".to_string();
                    }
                }
                Task::none()
            }

            // ---- Documents ----
            Message::DocTypePicked(doc_type) => {
                self.doc_type_choice = doc_type;
                Task::none()
            }

            Message::CreateDocument => {
                let now = Utc::now();
                self.documents.create(
                    self.doc_type_choice,
                    Uuid::new_v4().to_string(),
                    now.to_rfc3339(),
                    now.format("%Y-%m-%d").to_string(),
                );
                Task::none()
            }

            Message::OpenDocument(id) => {
                self.documents.open(&id);
                Task::none()
            }
            Message::CloseDocument => {
                self.documents.close();
                Task::none()
            }

            Message::FieldChanged(field, value) => {
                self.documents.set_field(field, value);
                Task::none()
            }
            Message::AddItem => {
                self.documents.add_item();
                Task::none()
            }
            Message::ItemChanged(index, field, value) => {
                self.documents.set_item(index, field, &value);
                Task::none()
            }
            Message::RemoveItem(index) => {
                self.documents.remove_item(index);
                Task::none()
            }

            Message::SaveDocument => {
                let Some(doc) = self.documents.save_active() else {
                    return Task::none();
                };
                self.status = "บันทึกเอกสารเรียบร้อย".to_string();
                self.sync_document(doc)
            }

            Message::CompleteAndPrint => {
                let Some(doc) = self.documents.complete_active(Utc::now().to_rfc3339()) else {
                    return Task::none();
                };
                match print::print_document(&doc, &self.config.shop) {
                    Ok(path) => {
                        debug!(path = %path.display(), "print page written");
                        self.status = format!("ส่ง{}ไปพิมพ์แล้ว", doc.content.title);
                    }
                    Err(error) => {
                        error!(%error, "printing failed");
                        self.status = "เปิดหน้าพิมพ์ไม่สำเร็จ".to_string();
                    }
                }
                self.sync_document(doc)
            }

            Message::DeleteDocument(id) => {
                if !confirm("ต้องการลบเอกสารนี้?") {
                    return Task::none();
                }
                let Some(doc) = self.documents.remove(&id) else {
                    return Task::none();
                };
                self.status = "ลบเอกสารแล้ว".to_string();
                if !self.config.persist_documents {
                    return Task::none();
                }
                let store = self.store.clone();
                Task::perform(
                    async move {
                        store
                            .delete(store::DOCUMENTS, &doc.id)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::DocumentDeleted,
                )
            }

            Message::DocumentSynced(Ok(())) => Task::none(),
            Message::DocumentSynced(Err(error)) => {
                warn!(%error, "syncing document to the store failed");
                self.status = "ซิงก์เอกสารไปยังร้านค้าไม่สำเร็จ".to_string();
                Task::none()
            }

            Message::DocumentDeleted(Ok(())) => Task::none(),
            Message::DocumentDeleted(Err(error)) => {
                warn!(%error, "deleting document from the store failed");
                self.status = "ลบเอกสารออกจากร้านค้าไม่สำเร็จ".to_string();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let nav = row![
            tab("แกลเลอรี่รูปภาพ", View::Gallery, self.view),
            tab("จัดการเอกสาร", View::Documents, self.view),
        ]
        .spacing(10);

        let content = match self.view {
            View::Gallery => ui::gallery::view(&self.gallery, &self.previews),
            View::Documents => ui::documents::view(&self.documents, self.doc_type_choice),
        };

        let status = if self.loading > 0 {
            text("กำลังโหลด...").size(13)
        } else {
            text(&self.status).size(13)
        };

        column![
            ui::header(&self.config.shop),
            nav,
            column![content].height(Length::Fill),
            status,
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Window-level drag and drop lands here, one event per file
    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }

    /// Allocate a pending entry and launch its decode task
    fn queue_decode(&mut self, path: PathBuf) -> Task<Message> {
        let id = self.gallery.queue_file(path.clone());
        Task::perform(intake::decode::read_preview(path), move |result| {
            Message::PreviewDecoded(id, result)
        })
    }

    /// Keep a displayable handle for an inline image, keyed by id
    fn cache_preview(&mut self, key: String, data_url: &str) {
        match intake::decode::data_url_bytes(data_url) {
            Ok(bytes) => {
                self.previews.insert(key, Handle::from_bytes(bytes));
            }
            Err(error) => warn!(%key, %error, "stored image data is not displayable"),
        }
    }

    /// Sync a document snapshot to the store when the policy asks for it
    fn sync_document(&self, doc: Document) -> Task<Message> {
        if !self.config.persist_documents {
            return Task::none();
        }
        let store = self.store.clone();
        Task::perform(
            async move {
                store
                    .update(store::DOCUMENTS, &doc.id, &doc)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::DocumentSynced,
        )
    }

    fn finish_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
        if self.loading == 0 {
            self.status = "พร้อมใช้งาน".to_string();
        }
    }
}

fn tab(label: &str, target: View, current: View) -> Element<'_, Message> {
    button(text(label).size(15))
        .style(if target == current {
            button::primary
        } else {
            button::secondary
        })
        .on_press(Message::SwitchView(target))
        .padding(8)
        .into()
}

fn alert(description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("ถ่ายเอกสารพิส")
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn confirm(description: &str) -> bool {
    let choice = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("ถ่ายเอกสารพิส")
        .set_description(description)
        .set_buttons(MessageButtons::OkCancel)
        .show();
    matches!(choice, MessageDialogResult::Ok)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("piscopy=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application("ถ่ายเอกสารพิส (Piscopy)", Piscopy::update, Piscopy::view)
        .subscription(Piscopy::subscription)
        .theme(Piscopy::theme)
        .window_size(Size::new(1100.0, 760.0))
        .centered()
        .run_with(Piscopy::new)
}
