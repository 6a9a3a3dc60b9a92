/// Document templates and the invoice engine
///
/// Holds the in-memory document collection plus the document currently
/// open in the editor. All mutations go through the methods here so the
/// lifecycle rules (draft → completed, one way) and the total invariant
/// are enforced in one place, independent of the rendering layer.
use super::data::{DocContent, DocStatus, DocType, Document, LineItem};

/// Top-level content fields editable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocField {
    CompanyName,
    Date,
}

/// Line-item fields editable by index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    Price,
}

/// Build the starter content for a new document of the given kind
///
/// Every kind shares the same starter rows and default customer name;
/// only the title differs.
pub fn template(doc_type: DocType, date: String) -> DocContent {
    let mut content = DocContent {
        title: doc_type.title().to_string(),
        company_name: "บริษัทลูกค้า".to_string(),
        date,
        items: vec![
            LineItem {
                description: "ถ่ายเอกสาร A4".to_string(),
                quantity: 100.0,
                price: 1.00,
            },
            LineItem {
                description: "เข้าเล่มสันกาว".to_string(),
                quantity: 1.0,
                price: 50.00,
            },
        ],
        total: 0.0,
    };
    recompute_total(&mut content);
    content
}

/// Parse a numeric field typed by the user; anything unparsable is zero
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

fn recompute_total(content: &mut DocContent) {
    content.total = content.items.iter().map(LineItem::subtotal).sum();
}

/// The document collection and the editor's active document
#[derive(Debug, Default)]
pub struct Documents {
    pub documents: Vec<Document>,
    pub active: Option<Document>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with freshly listed records
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    /// Create a new draft from the kind's template and open it for editing
    ///
    /// The caller supplies the id and timestamps so this stays
    /// deterministic under test. Creation is local only; nothing is
    /// synced until an explicit save.
    pub fn create(&mut self, doc_type: DocType, id: String, created_at: String, date: String) {
        let doc = Document {
            id,
            doc_type,
            status: DocStatus::Draft,
            content: template(doc_type, date),
            created_at,
            completed_at: None,
        };
        self.documents.push(doc.clone());
        self.active = Some(doc);
    }

    /// Open an existing document in the editor
    pub fn open(&mut self, id: &str) {
        self.active = self.documents.iter().find(|d| d.id == id).cloned();
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    /// Active document still in its editable state, if any
    fn active_draft(&mut self) -> Option<&mut Document> {
        self.active.as_mut().filter(|d| d.status == DocStatus::Draft)
    }

    /// Replace a top-level content field; rejected once completed
    pub fn set_field(&mut self, field: DocField, value: String) -> bool {
        let Some(doc) = self.active_draft() else {
            return false;
        };
        match field {
            DocField::CompanyName => doc.content.company_name = value,
            DocField::Date => doc.content.date = value,
        }
        true
    }

    /// Append an empty line item and recompute the total
    pub fn add_item(&mut self) -> bool {
        let Some(doc) = self.active_draft() else {
            return false;
        };
        doc.content.items.push(LineItem {
            description: String::new(),
            quantity: 1.0,
            price: 0.0,
        });
        recompute_total(&mut doc.content);
        true
    }

    /// Replace one field of one item by index and recompute the total
    pub fn set_item(&mut self, index: usize, field: ItemField, value: &str) -> bool {
        let Some(doc) = self.active_draft() else {
            return false;
        };
        let Some(item) = doc.content.items.get_mut(index) else {
            return false;
        };
        match field {
            ItemField::Description => item.description = value.to_string(),
            ItemField::Quantity => item.quantity = parse_amount(value),
            ItemField::Price => item.price = parse_amount(value),
        }
        recompute_total(&mut doc.content);
        true
    }

    /// Delete one item by index and recompute the total
    pub fn remove_item(&mut self, index: usize) -> bool {
        let Some(doc) = self.active_draft() else {
            return false;
        };
        if index >= doc.content.items.len() {
            return false;
        }
        doc.content.items.remove(index);
        recompute_total(&mut doc.content);
        true
    }

    /// Persist the active draft over its entry in the collection
    ///
    /// Returns a snapshot for the caller to sync to the store when the
    /// persistence policy asks for it.
    pub fn save_active(&mut self) -> Option<Document> {
        let doc = self.active.clone().filter(Document::is_draft)?;
        self.upsert(doc.clone());
        Some(doc)
    }

    /// Transition the active draft to completed
    ///
    /// One-way: a completed document never goes back to draft, and a
    /// second completion is a no-op returning `None`.
    pub fn complete_active(&mut self, completed_at: String) -> Option<Document> {
        let doc = self.active.as_mut().filter(|d| d.status == DocStatus::Draft)?;
        doc.status = DocStatus::Completed;
        doc.completed_at = Some(completed_at);
        let doc = doc.clone();
        self.upsert(doc.clone());
        Some(doc)
    }

    /// Remove a document from the collection, closing it if it was open
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        let doc = self.documents.remove(index);
        if self.active.as_ref().is_some_and(|d| d.id == id) {
            self.active = None;
        }
        Some(doc)
    }

    pub fn drafts(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.status == DocStatus::Draft)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.status == DocStatus::Completed)
    }

    fn upsert(&mut self, doc: Document) {
        match self.documents.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => *slot = doc,
            None => self.documents.push(doc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn open_new(doc_type: DocType) -> Documents {
        let mut docs = Documents::new();
        docs.create(
            doc_type,
            "doc-1".to_string(),
            "2025-06-01T09:00:00+00:00".to_string(),
            "2025-06-01".to_string(),
        );
        docs
    }

    fn active_total(docs: &Documents) -> f64 {
        docs.active.as_ref().unwrap().content.total
    }

    #[test]
    fn template_has_starter_rows_and_total() {
        for doc_type in DocType::ALL {
            let content = template(doc_type, "2025-06-01".to_string());
            assert_eq!(content.title, doc_type.title());
            assert_eq!(content.company_name, "บริษัทลูกค้า");
            assert_eq!(content.items.len(), 2);
            assert_eq!(content.total, 150.00);
        }
    }

    #[test]
    fn purchase_order_title() {
        let docs = open_new(DocType::PurchaseOrder);
        let doc = docs.active.as_ref().unwrap();
        assert_eq!(doc.content.title, "ใบสั่งซื้อ");
        assert_eq!(doc.status, DocStatus::Draft);
        assert!(doc.completed_at.is_none());
        assert_eq!(doc.content.total, 150.00);
    }

    #[test]
    fn added_item_extends_total() {
        let mut docs = open_new(DocType::Receipt);
        assert!(docs.add_item());
        // A fresh row is empty and contributes nothing yet
        assert_eq!(active_total(&docs), 150.00);

        assert!(docs.set_item(2, ItemField::Description, "Test"));
        assert!(docs.set_item(2, ItemField::Quantity, "3"));
        assert!(docs.set_item(2, ItemField::Price, "2.5"));
        assert_eq!(active_total(&docs), 157.50);
    }

    #[test]
    fn unparsable_quantity_becomes_zero() {
        let mut docs = open_new(DocType::Receipt);
        assert!(docs.set_item(0, ItemField::Quantity, "abc"));
        let doc = docs.active.as_ref().unwrap();
        assert_eq!(doc.content.items[0].quantity, 0.0);
        // 0 × 1.00 + 1 × 50.00
        assert_eq!(doc.content.total, 50.00);
    }

    #[test]
    fn remove_item_recomputes_total() {
        let mut docs = open_new(DocType::DeliveryNote);
        assert!(docs.remove_item(0));
        assert_eq!(active_total(&docs), 50.00);
        assert!(!docs.remove_item(5));
    }

    #[test]
    fn completion_is_one_way() {
        let mut docs = Documents::new();
        let created_at = Utc::now().to_rfc3339();
        docs.create(
            DocType::Receipt,
            "doc-1".to_string(),
            created_at.clone(),
            "2025-06-01".to_string(),
        );

        let completed = docs.complete_active(Utc::now().to_rfc3339()).unwrap();
        assert_eq!(completed.status, DocStatus::Completed);

        let completed_at = completed.completed_at.unwrap();
        let t0 = DateTime::parse_from_rfc3339(&created_at).unwrap();
        let t1 = DateTime::parse_from_rfc3339(&completed_at).unwrap();
        assert!(t1 >= t0);

        // A second completion finds no draft to act on
        assert!(docs.complete_active(Utc::now().to_rfc3339()).is_none());
        assert_eq!(
            docs.active.as_ref().unwrap().completed_at,
            Some(completed_at)
        );
    }

    #[test]
    fn completed_documents_reject_mutations() {
        let mut docs = open_new(DocType::Receipt);
        docs.complete_active("2025-06-01T10:00:00+00:00".to_string());
        let before = docs.active.clone().unwrap();

        assert!(!docs.set_field(DocField::CompanyName, "อื่น".to_string()));
        assert!(!docs.add_item());
        assert!(!docs.set_item(0, ItemField::Price, "999"));
        assert!(!docs.remove_item(0));
        assert!(docs.save_active().is_none());

        assert_eq!(docs.active.unwrap(), before);
    }

    #[test]
    fn save_replaces_collection_entry() {
        let mut docs = open_new(DocType::Receipt);
        docs.set_field(DocField::CompanyName, "ร้านตัวอย่าง".to_string());
        // The collection still holds the snapshot taken at creation
        assert_eq!(docs.documents[0].content.company_name, "บริษัทลูกค้า");

        let saved = docs.save_active().unwrap();
        assert_eq!(saved.content.company_name, "ร้านตัวอย่าง");
        assert_eq!(docs.documents.len(), 1);
        assert_eq!(docs.documents[0].content.company_name, "ร้านตัวอย่าง");
    }

    #[test]
    fn remove_closes_open_document() {
        let mut docs = open_new(DocType::Receipt);
        let removed = docs.remove("doc-1").unwrap();
        assert_eq!(removed.id, "doc-1");
        assert!(docs.active.is_none());
        assert!(docs.documents.is_empty());
        assert!(docs.remove("doc-1").is_none());
    }

    #[derive(Debug, Clone)]
    enum ItemOp {
        Add,
        Edit(usize, ItemField, String),
        Remove(usize),
    }

    fn item_field() -> impl Strategy<Value = ItemField> {
        prop_oneof![
            Just(ItemField::Description),
            Just(ItemField::Quantity),
            Just(ItemField::Price),
        ]
    }

    fn item_op() -> impl Strategy<Value = ItemOp> {
        prop_oneof![
            Just(ItemOp::Add),
            (any::<usize>(), item_field(), "[a-z0-9.]{0,6}")
                .prop_map(|(i, f, v)| ItemOp::Edit(i, f, v)),
            any::<usize>().prop_map(ItemOp::Remove),
        ]
    }

    proptest! {
        // Whatever sequence of item mutations runs, the stored total
        // matches the sum of subtotals over the current rows.
        #[test]
        fn total_always_matches_items(ops in proptest::collection::vec(item_op(), 0..32)) {
            let mut docs = open_new(DocType::PurchaseOrder);
            for op in ops {
                let len = docs.active.as_ref().unwrap().content.items.len();
                match op {
                    ItemOp::Add => {
                        docs.add_item();
                    }
                    ItemOp::Edit(i, field, value) if len > 0 => {
                        docs.set_item(i % len, field, &value);
                    }
                    ItemOp::Remove(i) if len > 0 => {
                        docs.remove_item(i % len);
                    }
                    _ => {}
                }
            }

            let doc = docs.active.as_ref().unwrap();
            let expected: f64 = doc.content.items.iter().map(LineItem::subtotal).sum();
            prop_assert!((doc.content.total - expected).abs() < 1e-9);
        }
    }
}
