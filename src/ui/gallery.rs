/// Gallery view: upload area, pending files, photo grid, detail panel
use crate::state::data::{PendingFile, PhotoRecord};
use crate::state::gallery::Gallery;
use crate::Message;
use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{Alignment, Element, Length};
use std::collections::HashMap;

const TILE_WIDTH: f32 = 160.0;
const TILE_HEIGHT: f32 = 120.0;
const TILES_PER_ROW: usize = 4;

pub fn view<'a>(
    gallery: &'a Gallery,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let mut content = Column::new().spacing(20).padding(20).push(upload_card());

    if !gallery.pending.is_empty() {
        content = content.push(pending_card(gallery, previews));
    }
    content = content.push(photo_grid(gallery, previews));

    let main = scrollable(content).width(Length::Fill).height(Length::Fill);

    match gallery.selected_photo() {
        Some(photo) => row![main, detail_panel(gallery, photo, previews)]
            .spacing(10)
            .into(),
        None => main.into(),
    }
}

fn upload_card<'a>() -> Element<'a, Message> {
    container(
        column![
            text("อัปโหลดรูปภาพ").size(20),
            text("ลากและวางไฟล์รูปภาพลงในหน้าต่าง หรือคลิกเพื่อเลือกไฟล์").size(14),
            button("เลือกไฟล์").on_press(Message::PickFiles).padding(10),
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(20)
    .center_x(Length::Fill)
    .into()
}

fn pending_card<'a>(
    gallery: &'a Gallery,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let mut card = Column::new()
        .spacing(10)
        .push(text(format!("ไฟล์ที่รอบันทึก ({})", gallery.pending.len())).size(20));

    for entry in &gallery.pending {
        card = card.push(pending_row(entry, previews));
    }

    container(card).width(Length::Fill).padding(10).into()
}

fn pending_row<'a>(
    entry: &'a PendingFile,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let id = entry.id;

    let preview: Element<'a, Message> = match previews.get(&entry.id.to_string()) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(96.0))
            .height(Length::Fixed(96.0))
            .into(),
        // Decoding still in flight; the save action is a no-op until it lands
        None => container(text("กำลังอ่านไฟล์...").size(12))
            .width(Length::Fixed(96.0))
            .height(Length::Fixed(96.0))
            .into(),
    };

    row![
        preview,
        column![
            text(&entry.file_name).size(16),
            text_input("เขียนบันทึกเกี่ยวกับไฟล์นี้...", &entry.note)
                .on_input(move |note| Message::PendingNoteChanged(id, note)),
            row![
                button("บันทึก")
                    .on_press(Message::CommitPending(id))
                    .padding(6),
                button("ลบออก")
                    .style(button::danger)
                    .on_press(Message::DiscardPending(id))
                    .padding(6),
            ]
            .spacing(8),
        ]
        .spacing(6)
        .width(Length::Fill),
    ]
    .spacing(12)
    .into()
}

fn photo_grid<'a>(
    gallery: &'a Gallery,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let mut grid = Column::new()
        .spacing(12)
        .push(text(format!("รูปภาพที่บันทึกแล้ว ({})", gallery.photos.len())).size(20));

    if gallery.photos.is_empty() {
        grid = grid.push(text("ยังไม่มีรูปภาพที่บันทึกไว้").size(14));
    }

    for chunk in gallery.photos.chunks(TILES_PER_ROW) {
        let mut tiles = Row::new().spacing(12);
        for photo in chunk {
            tiles = tiles.push(photo_tile(photo, previews));
        }
        grid = grid.push(tiles);
    }

    grid.into()
}

fn photo_tile<'a>(
    photo: &'a PhotoRecord,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match previews.get(&photo.id) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(TILE_HEIGHT))
            .into(),
        None => container(text("ไม่มีตัวอย่าง").size(12))
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(TILE_HEIGHT))
            .into(),
    };

    button(
        column![preview, text(&photo.file_name).size(13)]
            .spacing(4)
            .align_x(Alignment::Center),
    )
    .style(button::text)
    .on_press(Message::OpenPhoto(photo.id.clone()))
    .padding(4)
    .into()
}

fn detail_panel<'a>(
    gallery: &'a Gallery,
    photo: &'a PhotoRecord,
    previews: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match previews.get(&photo.id) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(320.0))
            .into(),
        None => Space::with_height(Length::Fixed(120.0)).into(),
    };

    let note_section: Element<'a, Message> = if gallery.editing_note {
        column![
            text_input("บันทึกเกี่ยวกับรูปนี้...", &gallery.note_buffer)
                .on_input(Message::NoteBufferChanged),
            row![
                button("บันทึกบันทึก").on_press(Message::SaveNote).padding(6),
                button("ยกเลิก").on_press(Message::CancelNoteEdit).padding(6),
            ]
            .spacing(8),
        ]
        .spacing(8)
        .into()
    } else {
        let note = if photo.note.is_empty() {
            text("ไม่มีบันทึก").size(14)
        } else {
            text(&photo.note).size(14)
        };
        column![
            note,
            button("แก้ไขบันทึก").on_press(Message::EditNote).padding(6),
        ]
        .spacing(8)
        .into()
    };

    container(
        column![
            row![
                text(&photo.file_name).size(18).width(Length::Fill),
                button("ปิด").on_press(Message::ClosePhoto).padding(6),
            ],
            preview,
            text(format!("อัปโหลดเมื่อ: {}", photo.uploaded_at)).size(12),
            note_section,
            row![
                button("ดาวน์โหลด")
                    .on_press(Message::ExportPhoto(photo.id.clone()))
                    .padding(6),
                button("ลบรูปภาพ")
                    .style(button::danger)
                    .on_press(Message::DeletePhoto(photo.id.clone()))
                    .padding(6),
            ]
            .spacing(8),
        ]
        .spacing(12),
    )
    .width(Length::Fixed(360.0))
    .padding(16)
    .into()
}
