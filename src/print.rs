/// Printing of completed documents
///
/// The app does not render print layouts itself. A completed document
/// is written out as a small HTML page and handed to the host system's
/// opener; the page asks the viewer to print itself on load, so the
/// host's native print facility takes over from there.
use crate::config::ShopInfo;
use crate::state::data::Document;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Render the document and open it through the host system
pub fn print_document(doc: &Document, shop: &ShopInfo) -> Result<PathBuf, String> {
    let html = render_html(doc, shop);
    let path = std::env::temp_dir().join(format!("piscopy-{}.html", doc.id));

    std::fs::write(&path, html)
        .map_err(|e| format!("Failed to write print file {}: {}", path.display(), e))?;
    open_with_system(&path).map_err(|e| format!("Failed to open print file: {}", e))?;
    Ok(path)
}

/// Build the printable page for a document
pub fn render_html(doc: &Document, shop: &ShopInfo) -> String {
    let mut rows = String::new();
    for item in &doc.content.items {
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.2}</td><td class=\"num\">{:.2}</td></tr>\n",
            escape(&item.description),
            item.quantity,
            item.price,
            item.subtotal(),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="th">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
h1 {{ font-size: 1.4em; margin-bottom: 0; }}
.shop {{ color: #444; font-size: 0.85em; margin-bottom: 1.5em; }}
table {{ width: 100%; border-collapse: collapse; margin-top: 1em; }}
th, td {{ border: 1px solid #999; padding: 0.4em 0.6em; text-align: left; }}
td.num, th.num {{ text-align: right; }}
.total {{ margin-top: 1em; font-size: 1.1em; font-weight: bold; text-align: right; }}
</style>
</head>
<body onload="window.print()">
<h1>{shop_name}</h1>
<div class="shop">☎️ {phone1} | 📞 {phone2} | Line: {line_id}<br>{location} | เปิด {hours}</div>
<h2>{title}</h2>
<p>ลูกค้า: {company}<br>วันที่: {date}</p>
<table>
<tr><th>รายการ</th><th class="num">จำนวน</th><th class="num">ราคาต่อหน่วย</th><th class="num">รวม</th></tr>
{rows}</table>
<div class="total">รวมทั้งสิ้น {total:.2} บาท</div>
</body>
</html>
"#,
        title = escape(&doc.content.title),
        shop_name = escape(&shop.name),
        phone1 = escape(&shop.phone1),
        phone2 = escape(&shop.phone2),
        line_id = escape(&shop.line_id),
        location = escape(&shop.location),
        hours = escape(&shop.hours),
        company = escape(&doc.content.company_name),
        date = escape(&doc.content.date),
        rows = rows,
        total = doc.content.total,
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn open_with_system(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut command = Command::new("xdg-open");

    command.arg(path).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{DocStatus, DocType, Document};
    use crate::state::documents::template;

    fn completed_doc() -> Document {
        Document {
            id: "doc-1".to_string(),
            doc_type: DocType::Receipt,
            status: DocStatus::Completed,
            content: template(DocType::Receipt, "2025-06-01".to_string()),
            created_at: "2025-06-01T09:00:00+00:00".to_string(),
            completed_at: Some("2025-06-01T09:05:00+00:00".to_string()),
        }
    }

    #[test]
    fn page_carries_title_items_and_total() {
        let html = render_html(&completed_doc(), &ShopInfo::default());
        assert!(html.contains("ใบเสร็จรับเงิน"));
        assert!(html.contains("ถ่ายเอกสาร A4"));
        assert!(html.contains("รวมทั้งสิ้น 150.00 บาท"));
        assert!(html.contains("window.print()"));
    }

    #[test]
    fn markup_in_user_fields_is_escaped() {
        let mut doc = completed_doc();
        doc.content.company_name = "<script>alert(1)</script>".to_string();
        let html = render_html(&doc, &ShopInfo::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
