/// Documents view: draft/completed listings and the document editor
use crate::state::data::{DocType, Document, LineItem};
use crate::state::documents::{DocField, Documents, ItemField};
use crate::Message;
use iced::widget::{
    button, column, pick_list, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{Alignment, Element, Length};

pub fn view(docs: &Documents, doc_type_choice: DocType) -> Element<'_, Message> {
    match &docs.active {
        Some(doc) => editor(doc),
        None => listing(docs, doc_type_choice),
    }
}

fn listing(docs: &Documents, doc_type_choice: DocType) -> Element<'_, Message> {
    let controls = row![
        text("จัดการเอกสาร").size(20).width(Length::Fill),
        pick_list(
            &DocType::ALL[..],
            Some(doc_type_choice),
            Message::DocTypePicked
        ),
        button("สร้างเอกสารใหม่")
            .on_press(Message::CreateDocument)
            .padding(8),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let mut drafts = Column::new()
        .spacing(8)
        .push(text("เอกสารฉบับร่าง").size(18));
    let mut has_drafts = false;
    for doc in docs.drafts() {
        has_drafts = true;
        drafts = drafts.push(listing_row(doc, true));
    }
    if !has_drafts {
        drafts = drafts.push(text("ไม่มีเอกสารฉบับร่าง").size(14));
    }

    let mut completed = Column::new()
        .spacing(8)
        .push(text("เอกสารที่เสร็จสิ้น").size(18));
    let mut has_completed = false;
    for doc in docs.completed() {
        has_completed = true;
        completed = completed.push(listing_row(doc, false));
    }
    if !has_completed {
        completed = completed.push(text("ไม่มีเอกสารที่เสร็จสิ้น").size(14));
    }

    scrollable(
        column![
            controls,
            row![
                drafts.width(Length::Fill),
                completed.width(Length::Fill)
            ]
            .spacing(20),
        ]
        .spacing(20)
        .padding(20),
    )
    .into()
}

fn listing_row(doc: &Document, draft: bool) -> Element<'_, Message> {
    let mut actions = Row::new().spacing(8).push(
        button(if draft { "แก้ไข" } else { "เปิดดู" })
            .on_press(Message::OpenDocument(doc.id.clone()))
            .padding(6),
    );
    // Completed documents are kept; only drafts offer deletion
    if draft {
        actions = actions.push(
            button("ลบ")
                .style(button::danger)
                .on_press(Message::DeleteDocument(doc.id.clone()))
                .padding(6),
        );
    }

    let when = match &doc.completed_at {
        Some(ts) if !draft => format!("เสร็จเมื่อ: {}", display_date(ts)),
        _ => format!("สร้างเมื่อ: {}", display_date(&doc.created_at)),
    };

    row![
        column![
            text(&doc.content.title).size(15),
            text(&doc.content.company_name).size(13),
            text(when).size(12),
        ]
        .spacing(2)
        .width(Length::Fill),
        actions,
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn editor(doc: &Document) -> Element<'_, Message> {
    let draft = doc.is_draft();

    let mut actions = Row::new()
        .spacing(8)
        .push(button("กลับ").on_press(Message::CloseDocument).padding(8));
    if draft {
        actions = actions
            .push(
                button("บันทึก")
                    .on_press(Message::SaveDocument)
                    .padding(8),
            )
            .push(
                button("พิมพ์เอกสาร")
                    .style(button::primary)
                    .on_press(Message::CompleteAndPrint)
                    .padding(8),
            );
    }

    let mut content = Column::new()
        .spacing(14)
        .padding(20)
        .push(
            row![
                text(&doc.content.title).size(24).width(Length::Fill),
                actions
            ]
            .align_y(Alignment::Center),
        )
        .push(field_row("ชื่อลูกค้า", &doc.content.company_name, DocField::CompanyName, draft))
        .push(field_row("วันที่", &doc.content.date, DocField::Date, draft))
        .push(items_table(doc, draft))
        .push(
            row![
                text("รวมทั้งสิ้น").size(18).width(Length::Fill),
                text(format!("{:.2} บาท", doc.content.total)).size(18),
            ]
            .spacing(10),
        );

    if let Some(ts) = &doc.completed_at {
        content = content.push(text(format!("พิมพ์เมื่อ: {}", ts)).size(12));
    }

    scrollable(content).into()
}

fn field_row<'a>(
    label: &'a str,
    value: &'a str,
    field: DocField,
    editable: bool,
) -> Element<'a, Message> {
    let input = text_input("", value);
    // Without an on_input handler the widget renders read-only
    let input = if editable {
        input.on_input(move |v| Message::FieldChanged(field, v))
    } else {
        input
    };

    row![
        text(label).size(14).width(Length::Fixed(120.0)),
        input.width(Length::Fill),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn items_table(doc: &Document, draft: bool) -> Element<'_, Message> {
    let mut table = Column::new().spacing(6).push(
        row![
            text("รายการ").size(13).width(Length::Fill),
            text("จำนวน").size(13).width(Length::Fixed(90.0)),
            text("ราคาต่อหน่วย").size(13).width(Length::Fixed(90.0)),
            text("รวม").size(13).width(Length::Fixed(90.0)),
            Space::with_width(Length::Fixed(60.0)),
        ]
        .spacing(8),
    );

    for (index, item) in doc.content.items.iter().enumerate() {
        table = table.push(item_row(index, item, draft));
    }

    if draft {
        table = table.push(button("เพิ่มรายการ").on_press(Message::AddItem).padding(6));
    }

    table.into()
}

fn item_row(index: usize, item: &LineItem, draft: bool) -> Element<'_, Message> {
    let description = text_input("รายละเอียด", &item.description);
    let quantity = text_input("0", &item.quantity.to_string());
    let price = text_input("0", &item.price.to_string());

    let (description, quantity, price) = if draft {
        (
            description.on_input(move |v| Message::ItemChanged(index, ItemField::Description, v)),
            quantity.on_input(move |v| Message::ItemChanged(index, ItemField::Quantity, v)),
            price.on_input(move |v| Message::ItemChanged(index, ItemField::Price, v)),
        )
    } else {
        (description, quantity, price)
    };

    let mut cells = row![
        description.width(Length::Fill),
        quantity.width(Length::Fixed(90.0)),
        price.width(Length::Fixed(90.0)),
        text(format!("{:.2}", item.subtotal()))
            .size(14)
            .width(Length::Fixed(90.0)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    if draft {
        cells = cells.push(
            button("ลบ")
                .style(button::danger)
                .on_press(Message::RemoveItem(index))
                .padding(4),
        );
    } else {
        cells = cells.push(Space::with_width(Length::Fixed(60.0)));
    }

    cells.into()
}
