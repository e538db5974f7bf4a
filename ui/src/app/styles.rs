use iced::{Background, Border, Color, Theme, Vector};

/// Sidebar entry; the active tab reads as a filled pill.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SidebarItemStyle {
    pub(crate) active: bool,
}

impl iced::widget::button::StyleSheet for SidebarItemStyle {
    type Style = Theme;

    fn active(&self, style: &Self::Style) -> iced::widget::button::Appearance {
        let palette = style.extended_palette();
        let (background, text_color) = if self.active {
            (palette.primary.base.color, palette.primary.base.text)
        } else {
            (Color::TRANSPARENT, palette.background.base.text)
        };

        iced::widget::button::Appearance {
            background: Some(Background::Color(background)),
            text_color,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 8.0.into(),
            },
            shadow_offset: Vector::new(0.0, 0.0),
            ..iced::widget::button::Appearance::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> iced::widget::button::Appearance {
        let mut appearance = self.active(style);
        if !self.active {
            appearance.background = Some(Background::Color(
                style.extended_palette().background.weak.color,
            ));
        }
        appearance
    }
}

/// Blocking banner for failed deletes and similar alerts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AlertStyle;

impl iced::widget::container::StyleSheet for AlertStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> iced::widget::container::Appearance {
        iced::widget::container::Appearance {
            text_color: Some(Color::from_rgb8(0x7f, 0x1d, 0x1d)),
            background: Some(Background::Color(Color::from_rgb8(0xfe, 0xe2, 0xe2))),
            border: Border {
                color: Color::from_rgb8(0xe0, 0x4f, 0x4f),
                width: 1.0,
                radius: 6.0.into(),
            },
            ..iced::widget::container::Appearance::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CardStyle {
    pub(crate) highlight: bool,
}

impl iced::widget::container::StyleSheet for CardStyle {
    type Style = Theme;

    fn appearance(&self, style: &Self::Style) -> iced::widget::container::Appearance {
        let palette = style.extended_palette();
        let border_color = if self.highlight {
            Color::from_rgb8(0xe0, 0xb0, 0x4f)
        } else {
            palette.background.strong.color
        };

        iced::widget::container::Appearance {
            background: Some(Background::Color(palette.background.weak.color)),
            border: Border {
                color: border_color,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..iced::widget::container::Appearance::default()
        }
    }
}
