use std::sync::Arc;

use iced::Command;
use ims_core::{
    AuthError, CollectionView, Credentials, InsightSource, InventoryResource, LocationResource,
    LoadStatus, PrinterResource, Reconciliation, Registrar, Resource, Session, load_dashboard,
    load_reports, sign_up, targets,
};

use super::ImsApp;
use super::types::{CollectionMessage, LoginState, Message, Screen, SignupState, Tab, Workspace};

impl ImsApp {
    pub(super) fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        match &mut self.screen {
            Screen::Dashboard(workspace) => Some(workspace.as_mut()),
            _ => None,
        }
    }

    pub(super) fn with_login(&mut self, edit: impl FnOnce(&mut LoginState)) -> Command<Message> {
        if let Screen::Login(login) = &mut self.screen {
            edit(login);
        }
        Command::none()
    }

    pub(super) fn with_signup(&mut self, edit: impl FnOnce(&mut SignupState)) -> Command<Message> {
        if let Screen::Signup(signup) = &mut self.screen {
            edit(signup);
        }
        Command::none()
    }

    pub(super) fn submit_login(&mut self) -> Command<Message> {
        let Screen::Login(login) = &mut self.screen else {
            return Command::none();
        };
        if login.submitting {
            return Command::none();
        }
        login.submitting = true;
        login.error = None;

        let credentials = Credentials {
            username: login.username.clone(),
            password: login.password.clone(),
        };
        let authenticator = Arc::clone(&self.authenticator);
        Command::perform(
            async move { authenticator.authenticate(credentials).await },
            Message::LoginFinished,
        )
    }

    pub(super) fn finish_login(&mut self, result: Result<Session, AuthError>) -> Command<Message> {
        match result {
            Ok(session) => self.enter_workspace(session),
            Err(error) => {
                if let Screen::Login(login) = &mut self.screen {
                    login.submitting = false;
                    login.error = Some(error.user_summary());
                }
                Command::none()
            }
        }
    }

    pub(super) fn show_signup(&mut self) -> Command<Message> {
        self.screen = Screen::Signup(SignupState::default());
        Command::none()
    }

    pub(super) fn submit_signup(&mut self) -> Command<Message> {
        let Screen::Signup(signup) = &mut self.screen else {
            return Command::none();
        };
        if signup.submitting {
            return Command::none();
        }
        if let Err(error) = signup.form.validate() {
            signup.error = Some(error.user_summary());
            return Command::none();
        }
        signup.submitting = true;
        signup.error = None;

        let registrar: Arc<dyn Registrar> = self.client.clone();
        Command::perform(
            sign_up(registrar, signup.form.clone()),
            Message::SignupFinished,
        )
    }

    pub(super) fn finish_signup(&mut self, result: Result<Session, AuthError>) -> Command<Message> {
        match result {
            // Registration logs the new account straight in.
            Ok(session) => self.enter_workspace(session),
            Err(error) => {
                if let Screen::Signup(signup) = &mut self.screen {
                    signup.submitting = false;
                    signup.error = Some(error.user_summary());
                }
                Command::none()
            }
        }
    }

    fn enter_workspace(&mut self, session: Session) -> Command<Message> {
        tracing::info!(
            target: targets::UI,
            username = %session.username,
            role = %session.role,
            "Session started"
        );
        self.screen = Screen::Dashboard(Box::new(Workspace::new(session, &self.client)));
        self.refresh_dashboard()
    }

    pub(super) fn logout(&mut self) -> Command<Message> {
        if let Screen::Dashboard(workspace) = &self.screen {
            tracing::info!(
                target: targets::UI,
                username = %workspace.session.username,
                "Session ended"
            );
        }
        self.screen = Screen::Login(LoginState::default());
        Command::none()
    }

    /// Switching tabs reloads the tab's data, as mounting a view would.
    pub(super) fn select_tab(&mut self, tab: Tab) -> Command<Message> {
        let Some(workspace) = self.workspace_mut() else {
            return Command::none();
        };
        workspace.tab = tab;
        tracing::debug!(target: targets::UI, tab = tab.label(), "Tab selected");

        match tab {
            Tab::Dashboard => self.refresh_dashboard(),
            Tab::Inventory => self.update_inventory(CollectionMessage::Refresh),
            Tab::Locations => self.update_locations(CollectionMessage::Refresh),
            Tab::Printers => self.update_printers(CollectionMessage::Refresh),
            Tab::Reports => self.refresh_reports(),
            Tab::Diagnostics => {
                self.refresh_logs();
                Command::none()
            }
        }
    }

    pub(super) fn update_inventory(
        &mut self,
        message: CollectionMessage<InventoryResource>,
    ) -> Command<Message> {
        match self.workspace_mut() {
            Some(workspace) => {
                update_collection(&mut workspace.inventory, message, Message::Inventory)
            }
            None => Command::none(),
        }
    }

    pub(super) fn update_locations(
        &mut self,
        message: CollectionMessage<LocationResource>,
    ) -> Command<Message> {
        match self.workspace_mut() {
            Some(workspace) => {
                update_collection(&mut workspace.locations, message, Message::Locations)
            }
            None => Command::none(),
        }
    }

    pub(super) fn update_printers(
        &mut self,
        message: CollectionMessage<PrinterResource>,
    ) -> Command<Message> {
        match self.workspace_mut() {
            Some(workspace) => {
                update_collection(&mut workspace.printers, message, Message::Printers)
            }
            None => Command::none(),
        }
    }

    pub(super) fn refresh_dashboard(&mut self) -> Command<Message> {
        let insights: Arc<dyn InsightSource> = self.client.clone();
        let Some(workspace) = self.workspace_mut() else {
            return Command::none();
        };
        workspace.dashboard.status = LoadStatus::Loading;
        Command::perform(load_dashboard(insights), Message::DashboardLoaded)
    }

    pub(super) fn refresh_reports(&mut self) -> Command<Message> {
        let insights: Arc<dyn InsightSource> = self.client.clone();
        let Some(workspace) = self.workspace_mut() else {
            return Command::none();
        };
        workspace.reports.status = LoadStatus::Loading;
        Command::perform(load_reports(insights), Message::ReportsLoaded)
    }

    pub(super) fn refresh_logs(&mut self) {
        let entries = self.log_store.snapshot();
        for entry in &entries {
            if self.known_targets.insert(entry.target.clone()) {
                self.enabled_targets.insert(entry.target.clone());
            }
        }
        self.log_entries = entries;
    }

    pub(super) fn copy_diagnostics(&self) -> String {
        let text = self.diagnostics_text();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                tracing::info!(target: targets::UI, "Diagnostics copied to clipboard");
                "Copied".to_string()
            }
            Err(error) => {
                tracing::warn!(target: targets::UI, "Clipboard copy failed: {}", error);
                format!("Failed: {error}")
            }
        }
    }

    pub(super) fn save_log_level(&mut self) -> String {
        self.config.log_level = self.log_level;
        match self.config.save(&self.config_path) {
            Ok(()) => {
                tracing::info!(
                    target: targets::CONFIG,
                    path = %self.config_path.display(),
                    level = %self.log_level,
                    "Configuration saved"
                );
                format!("Saved to {}", self.config_path.display())
            }
            Err(error) => {
                tracing::warn!(target: targets::CONFIG, "{}", error.technical_detail());
                error.user_summary()
            }
        }
    }

    pub(super) fn diagnostics_text(&self) -> String {
        let mut output = String::new();
        output.push_str("IMS diagnostics\n");
        output.push_str(&format!("Backend: {}\n", self.client.base_url()));
        output.push_str(&format!("Log level: {}\n", self.log_level));
        match &self.screen {
            Screen::Dashboard(workspace) => {
                output.push_str(&format!(
                    "Session: {} ({})\n",
                    workspace.session.username, workspace.session.role
                ));
                output.push_str(&format!(
                    "Inventory: {}\n",
                    status_summary(&workspace.inventory)
                ));
                output.push_str(&format!(
                    "Locations: {}\n",
                    status_summary(&workspace.locations)
                ));
                output.push_str(&format!(
                    "Printers: {}\n",
                    status_summary(&workspace.printers)
                ));
                output.push_str(&format!(
                    "Dashboard: {}\n",
                    load_status_label(&workspace.dashboard.status)
                ));
                output.push_str(&format!(
                    "Reports: {}\n",
                    load_status_label(&workspace.reports.status)
                ));
            }
            _ => output.push_str("Session: signed out\n"),
        }
        output.push_str(&format!(
            "Targets enabled: {}\n",
            self.sorted_targets()
                .into_iter()
                .filter(|target| self.enabled_targets.contains(target))
                .collect::<Vec<String>>()
                .join(", ")
        ));
        output.push_str("Recent logs:\n");

        let entries = self.visible_entries();
        let start = entries.len().saturating_sub(50);
        for entry in entries.into_iter().skip(start) {
            output.push_str(&entry.format_line());
            output.push('\n');
        }

        output
    }
}

/// Applies one view message and returns the follow-up network work.
fn update_collection<R: Resource>(
    view: &mut CollectionView<R>,
    message: CollectionMessage<R>,
    wrap: fn(CollectionMessage<R>) -> Message,
) -> Command<Message> {
    match message {
        CollectionMessage::Refresh => {
            Command::perform(view.load_task(), move |outcome| {
                wrap(CollectionMessage::Loaded(outcome))
            })
        }
        CollectionMessage::Loaded(outcome) => {
            view.apply_load(outcome);
            Command::none()
        }
        CollectionMessage::OpenCreate => {
            view.open_create();
            Command::none()
        }
        CollectionMessage::OpenEdit(id) => {
            view.open_edit(id);
            Command::none()
        }
        CollectionMessage::FieldChanged(field, value) => {
            view.set_field(field, value);
            Command::none()
        }
        CollectionMessage::Cancel => {
            view.cancel_form();
            Command::none()
        }
        CollectionMessage::Submit => match view.submit_task() {
            Some(task) => Command::perform(task, move |result| {
                wrap(CollectionMessage::Submitted(result))
            }),
            None => Command::none(),
        },
        CollectionMessage::Submitted(result) => {
            let reconciliation = view.apply_submit(result);
            follow_up(view, reconciliation, wrap)
        }
        CollectionMessage::RequestDelete(id) => {
            view.request_delete(id);
            Command::none()
        }
        CollectionMessage::DeclineDelete => {
            view.decline_delete();
            Command::none()
        }
        CollectionMessage::ConfirmDelete => match view.confirm_delete_task() {
            Some(task) => Command::perform(task, move |outcome| {
                wrap(CollectionMessage::Deleted(outcome))
            }),
            None => Command::none(),
        },
        CollectionMessage::Deleted(outcome) => {
            let reconciliation = view.apply_delete(outcome);
            follow_up(view, reconciliation, wrap)
        }
        CollectionMessage::DismissAlert => {
            view.dismiss_alert();
            Command::none()
        }
    }
}

fn follow_up<R: Resource>(
    view: &mut CollectionView<R>,
    reconciliation: Option<Reconciliation>,
    wrap: fn(CollectionMessage<R>) -> Message,
) -> Command<Message> {
    match reconciliation {
        Some(Reconciliation::Refetch) => Command::perform(view.refetch_task(), move |outcome| {
            wrap(CollectionMessage::Loaded(outcome))
        }),
        Some(Reconciliation::RemoveLocal) | None => Command::none(),
    }
}

fn status_summary<R: Resource>(view: &CollectionView<R>) -> String {
    format!(
        "{} ({} records)",
        load_status_label(view.status()),
        view.records().len()
    )
}

fn load_status_label(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Loading => "loading".to_string(),
        LoadStatus::Ready => "ready".to_string(),
        LoadStatus::Error(error) => format!("error: {}", error.technical_detail()),
    }
}
