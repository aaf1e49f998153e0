use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, icon, row, text};

use gestao::pages::{Notice, Severity};

use crate::message::Message;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "emblem-ok-symbolic",
        Severity::Info => "dialog-information-symbolic",
        Severity::Warning => "dialog-warning-symbolic",
        Severity::Error => "dialog-error-symbolic",
    }
}

/// Stacked notices, newest last, each with a dismiss button.
pub fn notice_bar<'a>(notices: &'a [Notice]) -> Option<Element<'a, Message>> {
    if notices.is_empty() {
        return None;
    }
    let mut col = column().spacing(4);
    for (i, notice) in notices.iter().enumerate() {
        col = col.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(icon::from_name(severity_icon(notice.severity)).size(16).icon())
                .push(text::body(notice.message.as_str()).width(Length::Fill))
                .push(
                    button::icon(icon::from_name("window-close-symbolic"))
                        .on_press(Message::DismissNotice(i)),
                ),
        );
    }
    Some(col.into())
}
