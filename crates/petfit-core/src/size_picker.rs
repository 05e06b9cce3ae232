#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenInput {
    pub id: String,
    pub value: String,
}

/// One size option list bound to its own display value and optional hidden
/// form value. Instances never reference each other.
#[derive(Debug, Clone)]
pub struct SizePicker {
    options: Vec<String>,
    active: Option<usize>,
    cursor: usize,
    display: String,
    hidden: Option<HiddenInput>,
}

impl SizePicker {
    pub fn new(options: Vec<String>, display: Option<&str>, hidden_id: Option<&str>) -> Self {
        let display = display.map(str::trim).unwrap_or_default().to_string();
        let active = if display.is_empty() {
            None
        } else {
            options.iter().position(|option| option == &display)
        };
        let hidden = hidden_id.map(|id| HiddenInput {
            id: id.to_string(),
            value: display.clone(),
        });

        Self {
            options,
            active,
            cursor: active.unwrap_or(0),
            display,
            hidden,
        }
    }

    pub fn click(&mut self, index: usize) -> Option<&str> {
        let value = self.options.get(index)?.clone();
        self.active = Some(index);
        self.cursor = index;
        if let Some(hidden) = &mut self.hidden {
            hidden.value = value.clone();
        }
        self.display = value;
        Some(self.display.as_str())
    }

    pub fn click_cursor(&mut self) -> Option<&str> {
        self.click(self.cursor)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
        }
    }

    pub fn value(&self) -> Option<&str> {
        if self.display.is_empty() {
            None
        } else {
            Some(self.display.as_str())
        }
    }

    pub fn hidden(&self) -> Option<&HiddenInput> {
        self.hidden.as_ref()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
