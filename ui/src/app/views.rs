use iced::alignment::Horizontal;
use iced::theme;
use iced::widget::{
    Space, button, checkbox, column, container, pick_list, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length};
use ims_core::{LoadStatus, LogLevel, MetricCard, Role, format_money};

use super::{ImsApp, records};
use super::helpers::{error_text, heading, level_color, muted, text_dark, text_muted};
use super::styles::{CardStyle, SidebarItemStyle};
use super::types::{LoginState, Message, SignupState, Tab, Workspace};
use crate::logging::LogEntry;

impl ImsApp {
    pub(super) fn login_view<'a>(&'a self, login: &'a LoginState) -> Element<'a, Message> {
        let submit = button(text(if login.submitting { "Signing in..." } else { "Sign In" }))
            .width(Length::Fill)
            .on_press_maybe((!login.submitting).then_some(Message::SubmitLogin));

        let mut form = column![
            text("IMS").size(36).style(theme::Text::Color(text_dark())),
            muted("Inventory management for schools and offices"),
            text_input("Username", &login.username)
                .on_input(Message::LoginUsernameChanged)
                .on_submit(Message::SubmitLogin)
                .padding(10),
            text_input("Password", &login.password)
                .on_input(Message::LoginPasswordChanged)
                .on_submit(Message::SubmitLogin)
                .secure(true)
                .padding(10),
        ]
        .spacing(14);

        if let Some(error) = &login.error {
            form = form.push(error_text(error));
        }

        form = form.push(submit).push(
            row![
                muted("No account yet?"),
                button(text("Sign up"))
                    .style(theme::Button::Text)
                    .on_press(Message::ShowSignup),
            ]
            .spacing(6)
            .align_items(Alignment::Center),
        );

        auth_card(form.into())
    }

    pub(super) fn signup_view<'a>(&'a self, signup: &'a SignupState) -> Element<'a, Message> {
        let form_state = &signup.form;
        let submit = button(text(if signup.submitting {
            "Creating account..."
        } else {
            "Create Account"
        }))
        .width(Length::Fill)
        .on_press_maybe((!signup.submitting).then_some(Message::SubmitSignup));

        let mut form = column![
            heading("Create your account"),
            text_input("Username", &form_state.username)
                .on_input(Message::SignupUsernameChanged)
                .padding(10),
            text_input("Email", &form_state.email)
                .on_input(Message::SignupEmailChanged)
                .padding(10),
            text_input("Password", &form_state.password)
                .on_input(Message::SignupPasswordChanged)
                .secure(true)
                .padding(10),
            text_input("Confirm password", &form_state.confirm_password)
                .on_input(Message::SignupConfirmChanged)
                .on_submit(Message::SubmitSignup)
                .secure(true)
                .padding(10),
            row![
                muted("Role"),
                pick_list(
                    Role::SIGNUP_CHOICES.to_vec(),
                    Some(form_state.role.clone()),
                    Message::SignupRoleChanged,
                ),
            ]
            .spacing(12)
            .align_items(Alignment::Center),
        ]
        .spacing(14);

        if let Some(error) = &signup.error {
            form = form.push(error_text(error));
        }

        form = form.push(submit).push(
            row![
                muted("Already have an account?"),
                button(text("Sign in"))
                    .style(theme::Button::Text)
                    .on_press(Message::ShowLogin),
            ]
            .spacing(6)
            .align_items(Alignment::Center),
        );

        auth_card(form.into())
    }

    pub(super) fn workspace_view<'a>(&'a self, workspace: &'a Workspace) -> Element<'a, Message> {
        let body = match workspace.tab {
            Tab::Dashboard => dashboard_view(workspace),
            Tab::Inventory => records::inventory_view(&workspace.inventory),
            Tab::Locations => records::locations_view(&workspace.locations),
            Tab::Printers => records::printers_view(&workspace.printers),
            Tab::Reports => reports_view(workspace),
            Tab::Diagnostics => self.diagnostics_view(),
        };

        let content = column![header_view(workspace), body]
            .spacing(20)
            .padding(20)
            .width(Length::Fill);

        row![sidebar_view(workspace.tab), content]
            .height(Length::Fill)
            .into()
    }

    fn diagnostics_view(&self) -> Element<'_, Message> {
        let level_picker = pick_list(
            &LogLevel::ALL[..],
            Some(self.log_level),
            Message::LogLevelChanged,
        )
        .placeholder("Log level");

        let console_header = row![
            text("Console")
                .size(20)
                .style(theme::Text::Color(text_dark())),
            level_picker
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        let console = column![console_header, self.target_filters_view(), self.log_lines_view()]
            .spacing(12)
            .width(Length::FillPortion(2));

        row![console, self.diagnostics_panel_view()]
            .spacing(16)
            .align_items(Alignment::Start)
            .into()
    }

    fn target_filters_view(&self) -> Element<'_, Message> {
        let mut filter_column = column![
            text("Targets")
                .size(14)
                .style(theme::Text::Color(text_muted()))
        ]
        .spacing(6);

        for target in self.sorted_targets() {
            let enabled = self.enabled_targets.contains(&target);
            filter_column = filter_column.push(
                checkbox(target.clone(), enabled)
                    .on_toggle(move |value| Message::ToggleTarget(target.clone(), value)),
            );
        }

        container(filter_column)
            .padding(8)
            .style(theme::Container::Box)
            .into()
    }

    fn log_lines_view(&self) -> Element<'_, Message> {
        let mut lines = column![].spacing(4);

        for entry in self.visible_entries() {
            let line = text(entry.format_line())
                .size(14)
                .horizontal_alignment(Horizontal::Left)
                .style(theme::Text::Color(level_color(entry.level)));
            lines = lines.push(line);
        }

        scrollable(lines)
            .height(Length::Fill)
            .width(Length::Fill)
            .into()
    }

    fn diagnostics_panel_view(&self) -> Element<'_, Message> {
        let copy_status = self.copy_status.as_deref().unwrap_or("Ready");
        let mut panel = column![
            text("Diagnostics")
                .size(20)
                .style(theme::Text::Color(text_dark())),
            muted(format!("Backend: {}", self.client.base_url())),
            muted(format!("Config file: {}", self.config_path.display())),
            button("Copy diagnostics").on_press(Message::CopyDiagnostics),
            muted(format!("Clipboard: {copy_status}")),
            button("Save log level to config").on_press(Message::SaveLogLevel),
        ]
        .spacing(10);

        if let Some(status) = &self.config_status {
            panel = panel.push(muted(status));
        }

        container(panel)
            .padding(12)
            .width(Length::FillPortion(1))
            .style(theme::Container::Box)
            .into()
    }

    pub(super) fn sorted_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.known_targets.iter().cloned().collect();
        targets.sort();
        targets
    }

    pub(super) fn visible_entries(&self) -> Vec<&LogEntry> {
        self.log_entries
            .iter()
            .filter(|entry| self.enabled_targets.contains(&entry.target))
            .collect()
    }
}

fn auth_card(form: Element<'_, Message>) -> Element<'_, Message> {
    let card = container(form)
        .padding(28)
        .max_width(420.0)
        .style(theme::Container::Box);

    container(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}

fn sidebar_view<'a>(active: Tab) -> Element<'a, Message> {
    let mut items = column![
        text("IMS")
            .size(26)
            .style(theme::Text::Color(text_dark())),
        muted("Inventory"),
    ]
    .spacing(8)
    .padding(16)
    .width(Length::Fixed(200.0));

    for tab in Tab::ALL {
        items = items.push(
            button(text(tab.label()))
                .width(Length::Fill)
                .padding([8, 12])
                .style(theme::Button::custom(SidebarItemStyle {
                    active: tab == active,
                }))
                .on_press(Message::SelectTab(tab)),
        );
    }

    container(items)
        .height(Length::Fill)
        .style(theme::Container::Box)
        .into()
}

fn header_view(workspace: &Workspace) -> Element<'_, Message> {
    let session = &workspace.session;
    let mut who = column![text(&session.username).size(16)].align_items(Alignment::End);
    who = who.push(muted(session.role.to_string()));
    if let Some(email) = &session.email {
        who = who.push(muted(email));
    }

    row![
        heading(workspace.tab.label()),
        Space::with_width(Length::Fill),
        who,
        button(text("Logout"))
            .style(theme::Button::Secondary)
            .on_press(Message::Logout),
    ]
    .spacing(16)
    .align_items(Alignment::Center)
    .into()
}

fn dashboard_view(workspace: &Workspace) -> Element<'_, Message> {
    let snapshot = &workspace.dashboard;
    let toolbar = row![
        muted(format!("Welcome back, {}", workspace.session.username)),
        Space::with_width(Length::Fill),
        button(text("Refresh")).on_press(Message::RefreshDashboard),
    ]
    .align_items(Alignment::Center);

    let mut content = column![toolbar].spacing(18);

    match &snapshot.status {
        LoadStatus::Loading => content = content.push(muted("Loading dashboard...")),
        LoadStatus::Error(error) => content = content.push(error_text(error.user_summary())),
        LoadStatus::Ready => {
            content = content
                .push(card_row(snapshot.metric_cards(), false))
                .push(heading("Financial overview"))
                .push(card_row(snapshot.financial_cards(), false));

            let spends = &snapshot.financial.transactions_by_location;
            if !spends.is_empty() {
                let mut table = column![table_row(
                    ["Location", "Total", "Pending", "Paid"].map(String::from)
                )]
                .spacing(6);
                for spend in spends {
                    table = table.push(table_row([
                        spend.location.clone(),
                        format_money(spend.total),
                        format_money(spend.pending),
                        format_money(spend.paid),
                    ]));
                }
                content = content
                    .push(heading("Spending by location"))
                    .push(container(table).padding(12).style(theme::Container::Box));
            }
        }
    }

    scrollable(content).height(Length::Fill).into()
}

fn reports_view(workspace: &Workspace) -> Element<'_, Message> {
    let snapshot = &workspace.reports;
    let toolbar = row![
        muted("Stock levels and inventory value"),
        Space::with_width(Length::Fill),
        button(text("Refresh")).on_press(Message::RefreshReports),
    ]
    .align_items(Alignment::Center);

    let mut content = column![toolbar].spacing(18);

    match &snapshot.status {
        LoadStatus::Loading => content = content.push(muted("Loading reports...")),
        LoadStatus::Error(error) => content = content.push(error_text(error.user_summary())),
        LoadStatus::Ready => {
            content = content.push(card_row(
                vec![
                    MetricCard {
                        label: "Inventory Value",
                        value: format_money(snapshot.total_inventory_value()),
                        note: "Across all categories",
                    },
                    MetricCard {
                        label: "Total Quantity",
                        value: snapshot.total_quantity().to_string(),
                        note: "Units in stock",
                    },
                    MetricCard {
                        label: "Low Stock Items",
                        value: snapshot.low_stock.len().to_string(),
                        note: "Need reordering",
                    },
                ],
                !snapshot.low_stock.is_empty(),
            ));

            let mut low_stock = column![table_row(
                ["Item", "SKU", "Location", "Quantity", "Min"].map(String::from)
            )]
            .spacing(6);
            if snapshot.low_stock.is_empty() {
                low_stock = low_stock.push(muted("All items are above their minimum stock."));
            }
            for item in &snapshot.low_stock {
                low_stock = low_stock.push(table_row([
                    item.name.clone(),
                    item.sku.clone(),
                    item.location_name.clone(),
                    item.quantity.to_string(),
                    item.min_stock.to_string(),
                ]));
            }

            let mut by_category = column![table_row(
                ["Category", "Value", "Quantity", "Share"].map(String::from)
            )]
            .spacing(6);
            for category in &snapshot.by_category {
                by_category = by_category.push(table_row([
                    category.category.clone(),
                    format_money(category.total_value),
                    category.total_quantity.to_string(),
                    format!("{:.1}%", snapshot.share_of_total(category.total_value)),
                ]));
            }

            let mut by_location = column![table_row(
                ["Location", "Value", "Items", "Share"].map(String::from)
            )]
            .spacing(6);
            for location in &snapshot.by_location {
                by_location = by_location.push(table_row([
                    location.location.clone(),
                    format_money(location.total_value),
                    location.item_count.to_string(),
                    format!("{:.1}%", snapshot.share_of_total(location.total_value)),
                ]));
            }

            content = content
                .push(heading("Low stock"))
                .push(container(low_stock).padding(12).style(theme::Container::Box))
                .push(heading("Value by category"))
                .push(container(by_category).padding(12).style(theme::Container::Box))
                .push(heading("Value by location"))
                .push(container(by_location).padding(12).style(theme::Container::Box));
        }
    }

    scrollable(content).height(Length::Fill).into()
}

/// Text cards in one row; `highlight_last` outlines the final card.
fn card_row<'a>(cards: Vec<MetricCard>, highlight_last: bool) -> Element<'a, Message> {
    let last = cards.len().saturating_sub(1);
    let mut cards_row = row![].spacing(12);
    for (index, card) in cards.into_iter().enumerate() {
        let body = column![
            muted(card.label),
            text(card.value).size(28).style(theme::Text::Color(text_dark())),
            muted(card.note),
        ]
        .spacing(4);
        cards_row = cards_row.push(
            container(body)
                .padding(14)
                .width(Length::Fill)
                .style(theme::Container::Custom(Box::new(CardStyle {
                    highlight: highlight_last && index == last,
                }))),
        );
    }
    cards_row.into()
}

pub(super) fn table_row<'a, const N: usize>(cells: [String; N]) -> Element<'a, Message> {
    let mut line = row![].spacing(12);
    for cell in cells {
        line = line.push(text(cell).size(14).width(Length::FillPortion(1)));
    }
    line.into()
}
