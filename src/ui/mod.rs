/// View layer
///
/// Pure widget construction from the state modules; every interaction
/// is a `crate::Message` handled back in the update loop.
pub mod documents;
pub mod gallery;

use crate::config::ShopInfo;
use crate::Message;
use iced::widget::{column, text};
use iced::Element;

/// Shop header shown above both views
pub fn header(shop: &ShopInfo) -> Element<'_, Message> {
    column![
        text(&shop.name).size(26),
        text(format!(
            "☎️ {} | 📞 {} | Line: {}",
            shop.phone1, shop.phone2, shop.line_id
        ))
        .size(13),
        text(format!("🕰️ เปิด {} | 📍 {}", shop.hours, shop.location)).size(13),
    ]
    .spacing(2)
    .into()
}
