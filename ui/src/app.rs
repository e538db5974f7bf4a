use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use iced::widget::container;
use iced::{Application, Command, Element, Length, Subscription, Theme};
use ims_core::{AppConfig, Authenticator, LogLevel, RestClient, targets};

use crate::logging::{LogEntry, LogStore, ReloadHandle};

mod actions;
mod helpers;
mod records;
mod styles;
mod types;
mod views;

pub use types::{CollectionMessage, Flags, Message, Tab};

use types::{LoginState, Screen};

pub struct ImsApp {
    log_store: LogStore,
    reload_handle: ReloadHandle,
    log_entries: Vec<LogEntry>,
    log_level: LogLevel,
    known_targets: HashSet<String>,
    enabled_targets: HashSet<String>,
    copy_status: Option<String>,
    config: AppConfig,
    config_path: PathBuf,
    config_status: Option<String>,
    client: Arc<RestClient>,
    authenticator: Arc<dyn Authenticator>,
    screen: Screen,
}

impl Application for ImsApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Flags;

    fn new(flags: Flags) -> (Self, Command<Message>) {
        let known_targets: HashSet<String> =
            targets::ALL.iter().map(|value| value.to_string()).collect();
        let enabled_targets = known_targets.clone();

        tracing::info!(
            target: targets::UI,
            base_url = %flags.client.base_url(),
            "Inventory client ready"
        );

        (
            Self {
                log_store: flags.log_store,
                reload_handle: flags.reload_handle,
                log_entries: Vec::new(),
                log_level: flags.config.log_level,
                known_targets,
                enabled_targets,
                copy_status: None,
                config: flags.config,
                config_path: flags.config_path,
                config_status: None,
                client: Arc::new(flags.client),
                authenticator: flags.authenticator,
                screen: Screen::Login(LoginState::default()),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        match &self.screen {
            Screen::Dashboard(workspace) => format!("IMS - {}", workspace.tab.label()),
            _ => "IMS - Inventory Management".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::LoginUsernameChanged(value) => self.with_login(|login| login.username = value),
            Message::LoginPasswordChanged(value) => self.with_login(|login| login.password = value),
            Message::SubmitLogin => self.submit_login(),
            Message::LoginFinished(result) => self.finish_login(result),
            Message::ShowSignup => self.show_signup(),
            Message::ShowLogin => {
                self.screen = Screen::Login(LoginState::default());
                Command::none()
            }
            Message::SignupUsernameChanged(value) => {
                self.with_signup(|signup| signup.form.username = value)
            }
            Message::SignupEmailChanged(value) => {
                self.with_signup(|signup| signup.form.email = value)
            }
            Message::SignupPasswordChanged(value) => {
                self.with_signup(|signup| signup.form.password = value)
            }
            Message::SignupConfirmChanged(value) => {
                self.with_signup(|signup| signup.form.confirm_password = value)
            }
            Message::SignupRoleChanged(role) => self.with_signup(|signup| signup.form.role = role),
            Message::SubmitSignup => self.submit_signup(),
            Message::SignupFinished(result) => self.finish_signup(result),
            Message::Logout => self.logout(),
            Message::SelectTab(tab) => self.select_tab(tab),
            Message::Inventory(message) => self.update_inventory(message),
            Message::Locations(message) => self.update_locations(message),
            Message::Printers(message) => self.update_printers(message),
            Message::RefreshDashboard => self.refresh_dashboard(),
            Message::DashboardLoaded(snapshot) => {
                if let Some(workspace) = self.workspace_mut() {
                    workspace.dashboard = snapshot;
                }
                Command::none()
            }
            Message::RefreshReports => self.refresh_reports(),
            Message::ReportsLoaded(snapshot) => {
                if let Some(workspace) = self.workspace_mut() {
                    workspace.reports = snapshot;
                }
                Command::none()
            }
            Message::LogTick => {
                self.refresh_logs();
                Command::none()
            }
            Message::LogLevelChanged(level) => {
                self.log_level = level;
                crate::logging::apply_log_level(&self.reload_handle, level);
                tracing::info!(target: targets::UI, level = %level, "Log level changed");
                Command::none()
            }
            Message::ToggleTarget(target, enabled) => {
                if enabled {
                    self.enabled_targets.insert(target);
                } else {
                    self.enabled_targets.remove(&target);
                }
                Command::none()
            }
            Message::CopyDiagnostics => {
                self.copy_status = Some(self.copy_diagnostics());
                Command::none()
            }
            Message::SaveLogLevel => {
                self.config_status = Some(self.save_log_level());
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_millis(250)).map(|_| Message::LogTick)
    }

    fn view(&self) -> Element<'_, Message> {
        let content = match &self.screen {
            Screen::Login(login) => self.login_view(login),
            Screen::Signup(signup) => self.signup_view(signup),
            Screen::Dashboard(workspace) => self.workspace_view(workspace),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
