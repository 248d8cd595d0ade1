/// Which typing rules the evaluator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Typed numeric operands of different types combine by promotion and
    /// typed float constants keep their exact value.
    #[default]
    Lenient,
    /// The Go specification's rules: identical operand types and
    /// float constants rounded to their type's precision.
    Go,
}

/// How a second declaration of the same name is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redeclaration {
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    pub mode: Mode,
    /// Bit width of `int`, `uint` and `uintptr`.
    pub int_size: u32,
    /// Largest shift count accepted in a constant shift.
    pub max_shift: u32,
    pub redeclaration: Redeclaration,
}

impl EvalOptions {
    /// Options matching the Go compiler.
    pub fn go() -> Self {
        Self {
            mode: Mode::Go,
            redeclaration: Redeclaration::Error,
            ..Self::default()
        }
    }

    pub fn redeclaration_is_error(&self) -> bool {
        self.mode == Mode::Go || self.redeclaration == Redeclaration::Error
    }

    pub fn rounds_floats(&self) -> bool {
        self.mode == Mode::Go
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Lenient,
            int_size: 64,
            max_shift: 10_000,
            redeclaration: Redeclaration::Warn,
        }
    }
}
