use interpreter::Number;

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryAction {
    Set(Number),
    Add(Number),
    Subtract(Number),
    Clear,
    /// Look at the register without changing it.
    Recall,
}

/// The single memory slot. Starts at `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRegister {
    value: Number,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> &Number {
        &self.value
    }

    pub fn set(&mut self, value: Number) {
        self.value = value;
    }

    pub fn add(&mut self, value: &Number) {
        self.value = &self.value + value;
    }

    pub fn subtract(&mut self, value: &Number) {
        self.value = &self.value - value;
    }

    pub fn clear(&mut self) {
        self.value = Number::default();
    }

    pub fn apply(&mut self, action: MemoryAction) -> &Number {
        match action {
            MemoryAction::Set(value) => self.set(value),
            MemoryAction::Add(value) => self.add(&value),
            MemoryAction::Subtract(value) => self.subtract(&value),
            MemoryAction::Clear => self.clear(),
            MemoryAction::Recall => {}
        }
        &self.value
    }
}
