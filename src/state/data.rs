/// Shared data structures for the application state
///
/// These structs represent the records that flow between the remote
/// store, the state modules and the UI layer. Wire field names are
/// camelCase so the records stay compatible with what earlier clients
/// wrote into the store.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// A persisted, annotated photo of a customer document
///
/// The `id` is the store-assigned key. It is never part of the record
/// body: list/create responses carry it separately and callers merge it
/// back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Store key, merged in after list/create (empty until assigned)
    #[serde(skip)]
    pub id: String,
    /// Original file name (e.g. "quotation-page-1.jpg")
    pub file_name: String,
    /// Inline image data as a base64 data URL
    pub image_url: String,
    /// Free-text annotation, may be empty
    #[serde(default)]
    pub note: String,
    /// ISO-8601 timestamp, set once at commit time
    pub uploaded_at: String,
}

/// A user-selected image awaiting preview decoding and a save decision
///
/// Never persisted. The id is a session-local UUID; the preview stays
/// `None` until the decode task for this file completes.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub id: Uuid,
    /// Source file on disk
    pub path: PathBuf,
    pub file_name: String,
    /// Editable before commit
    pub note: String,
    /// Data URL, populated asynchronously by the decode task
    pub preview: Option<String>,
}

/// The closed set of billing document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Receipt,
    DeliveryNote,
    PurchaseOrder,
}

impl DocType {
    pub const ALL: [DocType; 3] = [DocType::Receipt, DocType::DeliveryNote, DocType::PurchaseOrder];

    /// Fixed document title per kind
    pub fn title(self) -> &'static str {
        match self {
            DocType::Receipt => "ใบเสร็จรับเงิน",
            DocType::DeliveryNote => "ใบส่งของ",
            DocType::PurchaseOrder => "ใบสั่งซื้อ",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Two-state document lifecycle: draft until explicitly completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    Completed,
}

/// One billable row: subtotal is always derived, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.price
    }
}

/// Editable document content
///
/// `total` must always equal the sum of item subtotals; every item
/// mutation in the engine recomputes it before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocContent {
    pub title: String,
    pub company_name: String,
    /// Document date as YYYY-MM-DD
    pub date: String,
    pub items: Vec<LineItem>,
    pub total: f64,
}

/// A billing document (receipt, delivery note or purchase order)
///
/// The id is a client-generated UUID string assigned at creation and
/// used directly as the store key, so it stays stable across syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip)]
    pub id: String,
    pub doc_type: DocType,
    pub status: DocStatus,
    pub content: DocContent,
    /// ISO-8601 timestamp, set at creation, immutable
    pub created_at: String,
    /// Null until the draft is completed, then set once
    pub completed_at: Option<String>,
}

impl Document {
    pub fn is_draft(&self) -> bool {
        self.status == DocStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_wire_names() {
        let json = serde_json::to_string(&DocType::PurchaseOrder).unwrap();
        assert_eq!(json, "\"purchase_order\"");
        assert_eq!(
            serde_json::from_str::<DocType>("\"delivery_note\"").unwrap(),
            DocType::DeliveryNote
        );
    }

    #[test]
    fn photo_record_body_has_no_id() {
        let photo = PhotoRecord {
            id: "-Nabc123".to_string(),
            file_name: "doc.png".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            note: String::new(),
            uploaded_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let body = serde_json::to_value(&photo).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["fileName"], "doc.png");
        assert_eq!(body["uploadedAt"], "2025-01-01T00:00:00Z");
    }

    #[test]
    fn draft_document_serializes_null_completed_at() {
        let doc = Document {
            id: String::new(),
            doc_type: DocType::Receipt,
            status: DocStatus::Draft,
            content: DocContent {
                title: DocType::Receipt.title().to_string(),
                company_name: "บริษัทลูกค้า".to_string(),
                date: "2025-01-01".to_string(),
                items: vec![],
                total: 0.0,
            },
            created_at: "2025-01-01T00:00:00Z".to_string(),
            completed_at: None,
        };

        let body = serde_json::to_value(&doc).unwrap();
        assert_eq!(body["status"], "draft");
        assert!(body["completedAt"].is_null());
    }
}
