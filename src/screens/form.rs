use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharFilter {
    Any,
    Alnum,
    Digits,
}

impl CharFilter {
    fn accepts(self, c: char) -> bool {
        match self {
            CharFilter::Any => !c.is_control(),
            CharFilter::Alnum => c.is_ascii_alphanumeric(),
            CharFilter::Digits => c.is_ascii_digit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
    pub filter: CharFilter,
    pub max_len: usize,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
            filter: CharFilter::Any,
            max_len: 64,
        }
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn filter(mut self, filter: CharFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = n;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// What the field shows: bullets for masked fields.
    pub fn display(&self) -> String {
        if self.masked {
            "\u{2022}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn push(&mut self, c: char) {
        if self.filter.accepts(c) && self.value.chars().count() < self.max_len {
            self.value.push(c);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Text fields with one focused entry.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<TextField>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn clear(&mut self) {
        for f in &mut self.fields {
            f.value.clear();
        }
        self.focus = 0;
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.prev_field(),
            KeyCode::Tab => self.next_field(),
            KeyCode::BackTab => self.prev_field(),
            KeyCode::Backspace => {
                if let Some(f) = self.fields.get_mut(self.focus) {
                    f.value.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(f) = self.fields.get_mut(self.focus) {
                    f.push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }
}
