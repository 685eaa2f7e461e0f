use std::{sync::Arc, time::Duration};

use crossterm::event::{self, Event, KeyEvent};
use ledger::{
    AuthService, Currency, DocumentStore, ExpenseRecord, ExpenseStore, SessionHandle,
    SessionManager, validation,
};

use crate::{
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Welcome Back!",
            Self::Signup => "Create Account",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Signup => "SIGN UP",
        }
    }

    pub fn switch_hint(self) -> &'static str {
        match self {
            Self::Login => "New here? Create an account",
            Self::Signup => "Already have an account? Login",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            focus: AuthField::Email,
        }
    }
}

impl AuthForm {
    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    fn advance_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
    }

    fn clear_credentials(&mut self) {
        self.email.clear();
        self.password.clear();
        self.focus = AuthField::Email;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Title,
    Amount,
}

#[derive(Debug)]
pub struct ExpenseForm {
    pub title: String,
    pub amount: String,
    pub focus: ExpenseField,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            amount: String::new(),
            focus: ExpenseField::Title,
        }
    }
}

impl ExpenseForm {
    /// ADD stays disabled until both fields hold something.
    pub fn can_submit(&self) -> bool {
        validation::can_submit(&self.title, &self.amount)
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            ExpenseField::Title => &mut self.title,
            ExpenseField::Amount => &mut self.amount,
        }
    }

    fn advance_focus(&mut self) {
        self.focus = match self.focus {
            ExpenseField::Title => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::Title,
        };
    }

    fn clear(&mut self) {
        self.title.clear();
        self.amount.clear();
        self.focus = ExpenseField::Title;
    }
}

/// Delete awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub title: String,
}

/// Blocking message shown over the current screen until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub currency: Currency,
    pub auth: AuthForm,
    pub expense: ExpenseForm,
    pub expenses: ExpenseStore,
    pub selected: usize,
    pub confirm: Option<PendingDelete>,
    pub alert: Option<Alert>,
    /// Last reload failure, shown as a banner with a retry hint.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn selected_record(&self) -> Option<&ExpenseRecord> {
        self.expenses.records().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.expenses.len().saturating_sub(1));
    }

    fn select_next(&mut self) {
        if self.expenses.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.expenses.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(Alert {
            message: message.into(),
        });
    }
}

pub struct App {
    session: SessionManager,
    watch: SessionHandle,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    /// Must be called inside a tokio runtime: the session manager starts its
    /// tracking task right away.
    pub fn new(
        auth: Arc<dyn AuthService>,
        store: Arc<dyn DocumentStore>,
        currency: Currency,
        splash: Duration,
    ) -> Self {
        let session = SessionManager::start(auth, splash);
        let watch = session.session();
        let state = AppState {
            screen: Screen::Splash,
            currency,
            auth: AuthForm::default(),
            expense: ExpenseForm::default(),
            expenses: ExpenseStore::new(store, session.session()),
            selected: 0,
            confirm: None,
            alert: None,
            load_error: None,
        };

        Self {
            session,
            watch,
            state,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit() {
            self.sync_session().await;

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        self.handle_action(map_key(key)).await;
    }

    /// Move to the screen matching the current session, reloading or
    /// clearing the list on sign-in and sign-out transitions.
    pub async fn sync_session(&mut self) {
        let session = self.watch.current();
        let next = if session.resolving {
            Screen::Splash
        } else if session.principal.is_some() {
            Screen::Authenticated
        } else {
            Screen::Unauthenticated
        };

        match next {
            Screen::Authenticated => {
                let owner_changed = self.state.expenses.owner() != session.owner();
                if self.state.screen != Screen::Authenticated || owner_changed {
                    self.state.screen = next;
                    self.state.selected = 0;
                    self.state.confirm = None;
                    self.state.expense.clear();
                    self.reload().await;
                }
            }
            Screen::Unauthenticated => {
                if self.state.screen != Screen::Unauthenticated {
                    if self.state.screen == Screen::Authenticated {
                        tracing::debug!("signed out, clearing expenses");
                    }
                    self.state.expenses.clear();
                    self.state.selected = 0;
                    self.state.confirm = None;
                    self.state.load_error = None;
                }
            }
            Screen::Splash => {}
        }

        self.state.screen = next;
    }

    pub async fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if self.state.alert.is_some() {
            if matches!(action, AppAction::Submit | AppAction::Cancel) {
                self.state.alert = None;
            }
            return;
        }

        match self.state.screen {
            Screen::Splash => {}
            Screen::Unauthenticated => self.handle_auth_action(action).await,
            Screen::Authenticated if self.state.confirm.is_some() => {
                self.handle_confirm_action(action).await;
            }
            Screen::Authenticated => self.handle_ledger_action(action).await,
        }
    }

    async fn handle_auth_action(&mut self, action: AppAction) {
        match action {
            AppAction::NextField => self.state.auth.advance_focus(),
            AppAction::ToggleMode => self.state.auth.mode = self.state.auth.mode.toggled(),
            AppAction::Submit => self.submit_auth().await,
            AppAction::Backspace => {
                self.state.auth.active_field_mut().pop();
            }
            AppAction::Input(ch) => self.state.auth.active_field_mut().push(ch),
            _ => {}
        }
    }

    async fn handle_ledger_action(&mut self, action: AppAction) {
        match action {
            AppAction::NextField => self.state.expense.advance_focus(),
            AppAction::Submit => self.add_expense().await,
            AppAction::Up => self.state.select_prev(),
            AppAction::Down => self.state.select_next(),
            AppAction::Delete => self.ask_delete(),
            AppAction::Retry => self.reload().await,
            AppAction::Logout => self.logout().await,
            AppAction::Backspace => {
                self.state.expense.active_field_mut().pop();
            }
            AppAction::Input(ch) => self.state.expense.active_field_mut().push(ch),
            _ => {}
        }
    }

    async fn handle_confirm_action(&mut self, action: AppAction) {
        match action {
            AppAction::Submit | AppAction::Input('y' | 'Y') => self.confirm_delete().await,
            AppAction::Cancel | AppAction::Input('n' | 'N') => self.state.confirm = None,
            _ => {}
        }
    }

    async fn submit_auth(&mut self) {
        let email = self.state.auth.email.trim().to_string();
        let password = self.state.auth.password.clone();

        let result = match self.state.auth.mode {
            AuthMode::Login => self.session.login(&email, &password).await,
            AuthMode::Signup => self.session.signup(&email, &password).await,
        };

        match result {
            Ok(_) => self.state.auth.clear_credentials(),
            Err(err) => self.state.show_alert(err.to_string()),
        }
    }

    async fn logout(&mut self) {
        if let Err(err) = self.session.logout().await {
            self.state.show_alert(err.to_string());
        }
    }

    async fn reload(&mut self) {
        match self.state.expenses.reload().await {
            Ok(_) => self.state.load_error = None,
            Err(err) => self.state.load_error = Some(err.to_string()),
        }
        self.state.clamp_selection();
    }

    async fn add_expense(&mut self) {
        if !self.state.expense.can_submit() {
            return;
        }

        let title = self.state.expense.title.clone();
        let amount = self.state.expense.amount.clone();
        match self.state.expenses.add(&title, &amount).await {
            Ok(_) => {
                self.state.expense.clear();
                self.state.selected = self.state.expenses.len().saturating_sub(1);
            }
            Err(ledger::LedgerError::Validation(err)) => self.state.show_alert(err.to_string()),
            Err(err) => self
                .state
                .show_alert(format!("Error adding expense: {err}")),
        }
    }

    fn ask_delete(&mut self) {
        let Some(record) = self.state.selected_record() else {
            return;
        };
        self.state.confirm = Some(PendingDelete {
            id: record.id.clone(),
            title: record.title.clone(),
        });
    }

    async fn confirm_delete(&mut self) {
        let Some(pending) = self.state.confirm.take() else {
            return;
        };

        match self.state.expenses.remove(&pending.id).await {
            Ok(_) => self.state.clamp_selection(),
            Err(err) => self
                .state
                .show_alert(format!("Error deleting expense: {err}")),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
