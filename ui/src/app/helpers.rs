use std::fmt;

use iced::theme;
use iced::widget::{Text, text};
use iced::Color;
use ims_core::{PrinterStatus, ReferenceOption};

pub(crate) fn text_dark() -> Color {
    Color::from_rgb8(0x12, 0x12, 0x12)
}

pub(crate) fn text_muted() -> Color {
    Color::from_rgb8(0x5f, 0x6b, 0x7a)
}

pub(crate) fn text_error() -> Color {
    Color::from_rgb8(0xe0, 0x4f, 0x4f)
}

fn text_warn() -> Color {
    Color::from_rgb8(0xe0, 0xb0, 0x4f)
}

pub(crate) fn level_color(level: tracing::Level) -> Color {
    match level {
        tracing::Level::ERROR => text_error(),
        tracing::Level::WARN => text_warn(),
        tracing::Level::INFO => Color::from_rgb8(0x3b, 0x82, 0xf6),
        tracing::Level::DEBUG => Color::from_rgb8(0x22, 0x7d, 0x64),
        tracing::Level::TRACE => Color::from_rgb8(0x6b, 0x72, 0x80),
    }
}

pub(crate) fn printer_status_color(status: &PrinterStatus) -> Color {
    match status {
        PrinterStatus::Active => Color::from_rgb8(0x22, 0x7d, 0x64),
        PrinterStatus::Maintenance => text_warn(),
        PrinterStatus::Inactive => Color::from_rgb8(0x6b, 0x72, 0x80),
        PrinterStatus::Other(_) => text_muted(),
    }
}

pub(crate) fn heading<'a>(label: impl ToString) -> Text<'a> {
    text(label).size(22).style(theme::Text::Color(text_dark()))
}

pub(crate) fn muted<'a>(label: impl ToString) -> Text<'a> {
    text(label).size(14).style(theme::Text::Color(text_muted()))
}

pub(crate) fn error_text<'a>(label: impl ToString) -> Text<'a> {
    text(label).size(14).style(theme::Text::Color(text_error()))
}

/// Pick-list entry carrying the draft's string form of a reference id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectOption {
    pub(crate) value: String,
    pub(crate) label: String,
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Optional references get a leading "None" entry that maps to an empty value.
pub(crate) fn select_options(options: &[ReferenceOption], optional: bool) -> Vec<SelectOption> {
    let none = optional.then(|| SelectOption {
        value: String::new(),
        label: "None".to_string(),
    });
    none.into_iter()
        .chain(options.iter().map(|option| SelectOption {
            value: option.id.to_string(),
            label: option.label.clone(),
        }))
        .collect()
}

pub(crate) fn selected_option(options: &[SelectOption], value: &str) -> Option<SelectOption> {
    options
        .iter()
        .find(|option| option.value == value.trim())
        .cloned()
}

pub(crate) fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_core::RecordId;

    #[test]
    fn optional_select_starts_with_none() {
        let options = select_options(
            &[ReferenceOption::new(RecordId(4), "IM C3000 (Main School)")],
            true,
        );
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].to_string(), "None");
        assert_eq!(options[0].value, "");
        assert_eq!(
            selected_option(&options, "4").map(|option| option.label),
            Some("IM C3000 (Main School)".to_string())
        );
        assert_eq!(selected_option(&options, ""), Some(options[0].clone()));
    }

    #[test]
    fn required_select_has_no_placeholder_entry() {
        let options = select_options(&[ReferenceOption::new(RecordId(1), "Toner")], false);
        assert_eq!(options.len(), 1);
        assert_eq!(selected_option(&options, ""), None);
    }

    #[test]
    fn title_case_capitalizes_first_letter() {
        assert_eq!(title_case("printer"), "Printer");
        assert_eq!(title_case(""), "");
    }
}
