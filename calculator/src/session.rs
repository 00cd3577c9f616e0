use interpreter::Number;
use tracing::{debug, warn};

use crate::{
    history::HistoryLog,
    memory::{MemoryAction, MemoryRegister},
    operation::{Calculation, Operation, OperationKind},
    CalcError,
};

/// Snapshot of the session counters, for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_operations: u64,
    pub history_len: usize,
    pub last_result: Option<Number>,
    pub memory: Number,
    pub counts_by_kind: Vec<(OperationKind, usize)>,
}

/// All mutable calculator state for one run of the program.
#[derive(Debug, Clone, Default)]
pub struct Session {
    memory: MemoryRegister,
    history: HistoryLog,
    last_result: Option<Number>,
    total_operations: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &Number {
        self.memory.read()
    }

    pub fn last_result(&self) -> Option<&Number> {
        self.last_result.as_ref()
    }

    /// Operations performed since the last reset, including evicted ones.
    pub fn total_operations(&self) -> u64 {
        self.total_operations
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Reads an operand typed by the user. `M` stands for the memory value and
    /// `U` for the last result; anything else must parse as a number.
    pub fn resolve_operand(&self, input: &str) -> Result<Number, CalcError> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("m") {
            return Ok(self.memory().clone());
        }
        if input.eq_ignore_ascii_case("u") {
            if let Some(last) = &self.last_result {
                return Ok(last.clone());
            }
        }
        input
            .parse::<f64>()
            .map(Number::collapse)
            .map_err(|_| CalcError::InvalidOperand(input.to_string()))
    }

    pub fn perform(&mut self, operation: Operation) -> Result<Calculation, CalcError> {
        let calculation = operation.compute()?;
        if let Some(advisory) = calculation.advisory {
            warn!(%advisory, expression = %calculation.expression, "advisory");
        }
        self.record(&calculation);
        Ok(calculation)
    }

    pub fn evaluate_expression(&mut self, raw: &str) -> Result<Calculation, CalcError> {
        let evaluation = interpreter::evaluate(raw, self.memory(), self.last_result())?;
        let calculation = Calculation {
            kind: OperationKind::Expression,
            expression: evaluation.expression,
            value: evaluation.value,
            advisory: None,
        };
        self.record(&calculation);
        Ok(calculation)
    }

    fn record(&mut self, calculation: &Calculation) {
        debug!(
            kind = %calculation.kind,
            expression = %calculation.expression,
            result = %calculation.value,
            "operation recorded"
        );
        self.history.append(
            calculation.expression.clone(),
            calculation.value.clone(),
            calculation.kind,
        );
        self.last_result = Some(calculation.value.clone());
        self.total_operations += 1;
    }

    /// Applies a memory action and returns the register afterwards.
    pub fn manage_memory(&mut self, action: MemoryAction) -> Number {
        debug!(?action, "memory");
        self.memory.apply(action).clone()
    }

    /// Empties the history. Memory, last result and the counter are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn reset_all(&mut self) {
        *self = Session::default();
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_operations: self.total_operations,
            history_len: self.history.len(),
            last_result: self.last_result.clone(),
            memory: self.memory().clone(),
            counts_by_kind: self.history.counts_by_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;

    fn sum(session: &mut Session, a: i64, b: i64) -> Result<Calculation, CalcError> {
        session.perform(Operation::Sum(Number::from(a), Number::from(b)))
    }

    #[test]
    fn sum_records_one_entry() {
        let mut session = Session::new();
        let calc = sum(&mut session, 2, 3).unwrap();
        assert_eq!(calc.value, Number::from(5));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().snapshot()[0].kind(), OperationKind::Sum);
        assert_eq!(session.last_result(), Some(&Number::from(5)));
        assert_eq!(session.total_operations(), 1);
    }

    #[test]
    fn counter_outlives_history() {
        let mut session = Session::new();
        for i in 0..60 {
            sum(&mut session, i, 1).unwrap();
        }
        assert_eq!(session.history().len(), HISTORY_CAPACITY);
        assert_eq!(session.total_operations(), 60);

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.total_operations(), 60);
        assert_eq!(session.last_result(), Some(&Number::from(60)));

        sum(&mut session, 1, 1).unwrap();
        assert_eq!(session.total_operations(), 61);
    }

    #[test]
    fn failures_leave_state_alone() {
        let mut session = Session::new();
        sum(&mut session, 1, 1).unwrap();
        let err = session.perform(Operation::Divide(Number::from(1), Number::from(0)));
        assert_eq!(err, Err(CalcError::DivisionByZero));
        let err = session.perform(Operation::Modulo(Number::from(1), Number::from(0)));
        assert_eq!(err, Err(CalcError::DivisionByZero));
        let err = session.evaluate_expression("5 / 0");
        assert_eq!(err, Err(CalcError::DivisionByZero));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.total_operations(), 1);
        assert_eq!(session.last_result(), Some(&Number::from(2)));
    }

    #[test]
    fn expression_uses_memory_and_last_result() {
        let mut session = Session::new();
        session.manage_memory(MemoryAction::Set(Number::from(7)));
        let calc = session.evaluate_expression("M + 1").unwrap();
        assert_eq!(calc.value, Number::from(8));
        assert_eq!(calc.expression, "7 + 1");

        let calc = session.evaluate_expression("U * 2").unwrap();
        assert_eq!(calc.value, Number::from(16));
        assert_eq!(
            session.history().snapshot()[1].kind(),
            OperationKind::Expression
        );
        assert_eq!(
            session.evaluate_expression("  "),
            Err(CalcError::EmptyExpression)
        );
    }

    #[test]
    fn resolves_operands() {
        let mut session = Session::new();
        assert_eq!(session.resolve_operand(" 3 "), Ok(Number::from(3)));
        assert_eq!(session.resolve_operand("2.5"), Ok(Number::Float(2.5)));
        assert_eq!(session.resolve_operand("m"), Ok(Number::Float(0.0)));
        assert_eq!(
            session.resolve_operand("U"),
            Err(CalcError::InvalidOperand("U".to_string()))
        );
        assert_eq!(
            session.resolve_operand("two"),
            Err(CalcError::InvalidOperand("two".to_string()))
        );

        sum(&mut session, 4, 5).unwrap();
        assert_eq!(session.resolve_operand("u"), Ok(Number::from(9)));
    }

    #[test]
    fn memory_actions() {
        let mut session = Session::new();
        assert_eq!(session.manage_memory(MemoryAction::Set(Number::from(10))), Number::from(10));
        assert_eq!(session.manage_memory(MemoryAction::Add(Number::from(5))), Number::from(15));
        assert_eq!(
            session.manage_memory(MemoryAction::Subtract(Number::from(20))),
            Number::from(-5)
        );
        assert_eq!(session.manage_memory(MemoryAction::Recall), Number::from(-5));
        assert_eq!(session.manage_memory(MemoryAction::Clear), Number::Float(0.0));
        assert_eq!(session.total_operations(), 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = Session::new();
        session.manage_memory(MemoryAction::Set(Number::from(3)));
        sum(&mut session, 1, 2).unwrap();
        session.reset_all();
        assert_eq!(
            session.statistics(),
            Statistics {
                total_operations: 0,
                history_len: 0,
                last_result: None,
                memory: Number::Float(0.0),
                counts_by_kind: Vec::new(),
            }
        );
    }

    #[test]
    fn statistics_count_current_history() {
        let mut session = Session::new();
        sum(&mut session, 1, 2).unwrap();
        sum(&mut session, 3, 4).unwrap();
        session
            .perform(Operation::Factorial(Number::from(3)))
            .unwrap();
        let stats = session.statistics();
        assert_eq!(stats.total_operations, 3);
        assert_eq!(stats.history_len, 3);
        assert_eq!(stats.last_result, Some(Number::from(6)));
        assert_eq!(
            stats.counts_by_kind,
            vec![(OperationKind::Sum, 2), (OperationKind::Factorial, 1)]
        );
    }
}
