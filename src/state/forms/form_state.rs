//! Section navigation state

/// Trait for common focus operations over a list of fields
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// One step of the multi-step form
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Field ids in display order
    pub field_ids: Vec<String>,
    pub is_active: bool,
}

impl Section {
    pub fn new(id: &str, title: &str, field_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            field_ids: field_ids.iter().map(|s| s.to_string()).collect(),
            is_active: false,
        }
    }
}

/// Which navigation buttons are shown for the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub previous: bool,
    pub next: bool,
    pub submit: bool,
}

/// Current step plus the ordered sections
#[derive(Debug, Clone)]
pub struct FormState {
    current_step: usize,
    sections: Vec<Section>,
}

impl FormState {
    /// Start on step 0
    pub fn new(sections: Vec<Section>) -> Self {
        let mut state = Self {
            current_step: 0,
            sections,
        };
        state.activate(0);
        state
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.sections.len()
    }

    #[allow(dead_code)]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.sections.get(self.current_step)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.sections.len()
    }

    /// Move one step forward. Returns false (and changes nothing) on the
    /// last step; section validation is the caller's job.
    pub fn advance(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.activate(self.current_step + 1);
        true
    }

    /// Move one step back; false on the first step
    pub fn retreat(&mut self) -> bool {
        if self.current_step == 0 {
            return false;
        }
        self.activate(self.current_step - 1);
        true
    }

    /// Back to step 0
    pub fn reset(&mut self) {
        self.activate(0);
    }

    fn activate(&mut self, step: usize) {
        self.current_step = step;
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.is_active = i == step;
        }
        tracing::debug!(step, "Section activated");
    }

    /// `(step + 1) / steps * 100`
    pub fn progress_percent(&self) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        (self.current_step + 1) as f64 / self.sections.len() as f64 * 100.0
    }

    pub fn progress_label(&self) -> String {
        format!("{:.0}%", self.progress_percent())
    }

    pub fn nav_buttons(&self) -> NavButtons {
        let last = self.is_last_step();
        NavButtons {
            previous: self.current_step > 0,
            next: !last,
            submit: last,
        }
    }
}
