use iced::theme;
use iced::widget::{Space, button, column, container, pick_list, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length};
use ims_core::{
    CollectionView, Draft, FormMode, InventoryField, InventoryResource, LoadStatus,
    LocationField, LocationResource, PrinterField, PrinterResource, PrinterStatus, ReferenceKind,
    Resource, format_money,
};

use super::helpers::{
    error_text, heading, muted, printer_status_color, select_options, selected_option,
    text_error, title_case,
};
use super::styles::AlertStyle;
use super::types::{CollectionMessage, Message};
use super::views::table_row;

type Wrap<R> = fn(CollectionMessage<R>) -> Message;
type FieldOf<R> = <<R as Resource>::Draft as Draft>::Field;

pub(super) fn inventory_view(view: &CollectionView<InventoryResource>) -> Element<'_, Message> {
    let wrap: Wrap<InventoryResource> = Message::Inventory;

    let rows = view
        .records()
        .iter()
        .map(|item| {
            let quantity = if item.is_low_stock() {
                text(format!("{} (low)", item.quantity)).style(theme::Text::Color(text_error()))
            } else {
                text(item.quantity.to_string())
            };
            row![
                cell(&item.name),
                cell(&item.sku),
                cell(&item.category_name),
                quantity.size(14).width(Length::FillPortion(1)),
                cell(format_money(item.price)),
                cell(format_money(item.total_price)),
                cell(&item.location_name),
                cell(item.printer_name.as_deref().unwrap_or("-")),
                record_actions(view, item.id, wrap),
            ]
            .spacing(12)
            .align_items(Alignment::Center)
            .into()
        })
        .collect();

    let form = view.form().draft().map(|draft| {
        let references = view.references();
        let total = draft
            .line_total_label()
            .map(|total| format!("Line total: ${total}"))
            .unwrap_or_else(|| "Line total: -".to_string());
        form_panel(
            view,
            vec![
                text_field(view, "Item name", draft, InventoryField::Name, wrap),
                text_field(view, "SKU", draft, InventoryField::Sku, wrap),
                reference_field(
                    "Category",
                    references.get(ReferenceKind::Categories),
                    false,
                    draft,
                    InventoryField::CategoryId,
                    wrap,
                ),
                text_field(view, "Quantity", draft, InventoryField::Quantity, wrap),
                text_field(view, "Min stock", draft, InventoryField::MinStock, wrap),
                text_field(view, "Unit price", draft, InventoryField::Price, wrap),
                reference_field(
                    "Location",
                    references.get(ReferenceKind::Locations),
                    false,
                    draft,
                    InventoryField::LocationId,
                    wrap,
                ),
                reference_field(
                    "Printer",
                    references.get(ReferenceKind::Printers),
                    true,
                    draft,
                    InventoryField::PrinterId,
                    wrap,
                ),
                muted(total).into(),
            ],
            wrap,
        )
    });

    collection_frame(
        view,
        "Track consumables across locations",
        ["Name", "SKU", "Category", "Qty", "Price", "Total", "Location", "Printer", ""],
        rows,
        form,
        wrap,
    )
}

pub(super) fn locations_view(view: &CollectionView<LocationResource>) -> Element<'_, Message> {
    let wrap: Wrap<LocationResource> = Message::Locations;

    let rows = view
        .records()
        .iter()
        .map(|location| {
            row![
                cell(&location.name),
                cell(if location.address.is_empty() {
                    "-"
                } else {
                    location.address.as_str()
                }),
                cell(location.items.to_string()),
                cell(location.printers.to_string()),
                record_actions(view, location.id, wrap),
            ]
            .spacing(12)
            .align_items(Alignment::Center)
            .into()
        })
        .collect();

    let form = view.form().draft().map(|draft| {
        form_panel(
            view,
            vec![
                text_field(view, "Location name", draft, LocationField::Name, wrap),
                text_field(view, "Address", draft, LocationField::Address, wrap),
            ],
            wrap,
        )
    });

    collection_frame(
        view,
        "Schools and offices holding stock",
        ["Name", "Address", "Items", "Printers", ""],
        rows,
        form,
        wrap,
    )
}

pub(super) fn printers_view(view: &CollectionView<PrinterResource>) -> Element<'_, Message> {
    let wrap: Wrap<PrinterResource> = Message::Printers;

    let rows = view
        .records()
        .iter()
        .map(|printer| {
            row![
                cell(&printer.model),
                cell(&printer.serial_number),
                cell(&printer.location_name),
                text(printer.status.to_string())
                    .size(14)
                    .width(Length::FillPortion(1))
                    .style(theme::Text::Color(printer_status_color(&printer.status))),
                cell(printer.supplies.as_deref().unwrap_or("-")),
                record_actions(view, printer.id, wrap),
            ]
            .spacing(12)
            .align_items(Alignment::Center)
            .into()
        })
        .collect();

    let form = view.form().draft().map(|draft| {
        let status = PrinterStatus::from(draft.field(PrinterField::Status).to_string());
        let status_picker = column![
            muted("Status"),
            pick_list(PrinterStatus::CHOICES.to_vec(), Some(status), move |status| {
                wrap(CollectionMessage::FieldChanged(
                    PrinterField::Status,
                    status.to_string(),
                ))
            }),
        ]
        .spacing(4);

        form_panel(
            view,
            vec![
                text_field(view, "Model", draft, PrinterField::Model, wrap),
                text_field(view, "Serial number", draft, PrinterField::SerialNumber, wrap),
                reference_field(
                    "Location",
                    view.references().get(ReferenceKind::Locations),
                    false,
                    draft,
                    PrinterField::LocationId,
                    wrap,
                ),
                status_picker.into(),
                text_field(view, "Supplies", draft, PrinterField::Supplies, wrap),
            ],
            wrap,
        )
    });

    collection_frame(
        view,
        "Devices and their supplies",
        ["Model", "Serial", "Location", "Status", "Supplies", ""],
        rows,
        form,
        wrap,
    )
}

fn cell<'a>(value: impl ToString) -> Element<'a, Message> {
    text(value).size(14).width(Length::FillPortion(1)).into()
}

fn record_actions<'a, R: Resource>(
    view: &CollectionView<R>,
    id: ims_core::RecordId,
    wrap: Wrap<R>,
) -> Element<'a, Message> {
    let idle = view.deleting().is_none();
    let saving = view.form().is_submitting();
    row![
        button(text("Edit"))
            .style(theme::Button::Secondary)
            .on_press_maybe((!saving).then(|| wrap(CollectionMessage::OpenEdit(id)))),
        button(text(if view.deleting() == Some(id) {
            "Deleting..."
        } else {
            "Delete"
        }))
        .style(theme::Button::Destructive)
        .on_press_maybe(idle.then(|| wrap(CollectionMessage::RequestDelete(id)))),
    ]
    .spacing(6)
    .width(Length::FillPortion(1))
    .into()
}

fn text_field<'a, R: Resource>(
    view: &CollectionView<R>,
    label: &'a str,
    draft: &'a R::Draft,
    field: FieldOf<R>,
    wrap: Wrap<R>,
) -> Element<'a, Message> {
    let mut input = text_input(label, draft.field(field)).padding(8);
    if !view.form().is_submitting() {
        input = input.on_input(move |value| wrap(CollectionMessage::FieldChanged(field, value)));
    }
    column![muted(label), input].spacing(4).into()
}

fn reference_field<'a, R: Resource>(
    label: &'a str,
    options: &[ims_core::ReferenceOption],
    optional: bool,
    draft: &'a R::Draft,
    field: FieldOf<R>,
    wrap: Wrap<R>,
) -> Element<'a, Message> {
    let choices = select_options(options, optional);
    let selected = selected_option(&choices, draft.field(field));
    let picker = pick_list(choices, selected, move |option| {
        wrap(CollectionMessage::FieldChanged(field, option.value))
    })
    .placeholder(format!("Select {}", label.to_lowercase()));

    column![muted(label), picker].spacing(4).into()
}

/// Inline add/edit panel with the error slot and Cancel/Save.
fn form_panel<'a, R: Resource>(
    view: &CollectionView<R>,
    fields: Vec<Element<'a, Message>>,
    wrap: Wrap<R>,
) -> Element<'a, Message> {
    let form = view.form();
    let submitting = form.is_submitting();
    let title = match form.mode() {
        Some(FormMode::Editing(_)) => format!("Edit {}", title_case(R::LABEL)),
        _ => format!("Add {}", title_case(R::LABEL)),
    };

    let mut panel = column![heading(title)].spacing(10);
    for field in fields {
        panel = panel.push(field);
    }
    if let Some(error) = form.error() {
        panel = panel.push(error_text(error));
    }
    panel = panel.push(
        row![
            Space::with_width(Length::Fill),
            button(text("Cancel"))
                .style(theme::Button::Secondary)
                .on_press_maybe((!submitting).then(|| wrap(CollectionMessage::Cancel))),
            button(text(if submitting { "Saving..." } else { "Save" }))
                .on_press_maybe((!submitting).then(|| wrap(CollectionMessage::Submit))),
        ]
        .spacing(8),
    );

    container(panel)
        .padding(16)
        .style(theme::Container::Box)
        .into()
}

fn collection_frame<'a, R: Resource, const N: usize>(
    view: &CollectionView<R>,
    subtitle: &'a str,
    columns: [&str; N],
    rows: Vec<Element<'a, Message>>,
    form: Option<Element<'a, Message>>,
    wrap: Wrap<R>,
) -> Element<'a, Message> {
    let toolbar = row![
        muted(subtitle),
        Space::with_width(Length::Fill),
        button(text("Refresh"))
            .style(theme::Button::Secondary)
            .on_press(wrap(CollectionMessage::Refresh)),
        button(text(format!("Add {}", title_case(R::LABEL))))
            .on_press_maybe((!view.form().is_open()).then(|| wrap(CollectionMessage::OpenCreate))),
    ]
    .spacing(8)
    .align_items(Alignment::Center);

    let mut content = column![toolbar].spacing(14);

    if let Some(alert) = view.alert() {
        content = content.push(banner(
            row![
                text(alert.to_string()),
                Space::with_width(Length::Fill),
                button(text("Dismiss")).on_press(wrap(CollectionMessage::DismissAlert)),
            ]
            .align_items(Alignment::Center)
            .into(),
        ));
    }

    if view.pending_delete().is_some() {
        content = content.push(banner(
            row![
                text(format!(
                    "Delete this {}? This cannot be undone.",
                    R::LABEL
                )),
                Space::with_width(Length::Fill),
                button(text("Delete"))
                    .style(theme::Button::Destructive)
                    .on_press(wrap(CollectionMessage::ConfirmDelete)),
                button(text("Cancel"))
                    .style(theme::Button::Secondary)
                    .on_press(wrap(CollectionMessage::DeclineDelete)),
            ]
            .spacing(8)
            .align_items(Alignment::Center)
            .into(),
        ));
    }

    if let Some(form) = form {
        content = content.push(form);
    }

    let body: Element<'a, Message> = match view.status() {
        LoadStatus::Loading => muted(format!("Loading {}s...", R::LABEL)).into(),
        LoadStatus::Error(error) => {
            error_text(error.user_message(&format!("Failed to load {}s.", R::LABEL))).into()
        }
        LoadStatus::Ready if rows.is_empty() => muted(format!("No {}s yet.", R::LABEL)).into(),
        LoadStatus::Ready => {
            let mut table = column![table_row(columns.map(String::from))].spacing(8);
            for record_row in rows {
                table = table.push(record_row);
            }
            scrollable(table).height(Length::Fill).into()
        }
    };

    content.push(body).into()
}

fn banner(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .padding(12)
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(AlertStyle)))
        .into()
}
