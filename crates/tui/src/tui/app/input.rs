use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::StatusFilter;

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    OpenForm,
    ShowHelp,
    Refresh,
    Complete,
    Delete,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    NextFilter,
    PrevFilter,
    Filter(StatusFilter),
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') | KeyCode::Char('n') => Some(Self::OpenForm),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('r') => Some(Self::Refresh),
            KeyCode::Char('d') | KeyCode::Char(' ') => Some(Self::Complete),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextFilter),
            KeyCode::Left | KeyCode::BackTab => Some(Self::PrevFilter),
            KeyCode::Char('1') => Some(Self::Filter(StatusFilter::All)),
            KeyCode::Char('2') => Some(Self::Filter(StatusFilter::Pending)),
            KeyCode::Char('3') => Some(Self::Filter(StatusFilter::Completed)),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Form => self.handle_form_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::OpenForm => self.open_form(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Refresh => self.refresh(),
            NormalAction::Complete => self.complete_selected(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_edge(false),
            NormalAction::SelectLast => self.select_edge(true),
            NormalAction::NextFilter => self.switch_filter(self.view.filter().next()),
            NormalAction::PrevFilter => self.switch_filter(self.view.filter().prev()),
            NormalAction::Filter(filter) => self.switch_filter(filter),
        }
    }

    fn handle_form_mode(&mut self, key: KeyEvent) {
        let newline = is_newline_key(&key);
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.status = None;
                return;
            }
            KeyCode::Enter if !newline => {
                self.submit_form();
                return;
            }
            _ => {}
        }

        let form = self.view.form_mut();
        if newline {
            form.insert_newline();
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Delete => form.delete_char(),
            KeyCode::Left => form.move_left(),
            KeyCode::Right => form.move_right(),
            KeyCode::Home => form.move_home(),
            KeyCode::End => form.move_end(),
            KeyCode::Char(c) => form.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => self.answer_delete(false),
            KeyCode::Char('y') => self.answer_delete(true),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => self.answer_delete(self.confirm_choice == ConfirmChoice::Yes),
            _ => {}
        }
    }
}

/// Keys that start a new description line. Plain terminals only report Shift
/// on Enter with keyboard enhancement, so Alt+Enter and Ctrl+J are accepted too.
pub(crate) fn is_newline_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => key
            .modifiers
            .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT),
        KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
