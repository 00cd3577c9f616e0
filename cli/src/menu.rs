use std::io::{self, Write};

use anyhow::{anyhow, Result};
use calculator::{
    persistence, CalcError, Calculation, MemoryAction, Operation, OperationKind, PersistError,
    Session,
};
use colored::Colorize;

use crate::{
    config::Config,
    input::{Interrupted, Prompter},
};

const WIDTH: usize = 60;
const RESULT_WIDTH: usize = 40;

enum Flow {
    Continue,
    Exit,
}

fn operand_prompts(kind: OperationKind) -> &'static [&'static str] {
    match kind {
        OperationKind::Sum | OperationKind::Sub | OperationKind::Mul => {
            &["Enter the first number: ", "Enter the second number: "]
        }
        OperationKind::Div => &["Enter the dividend: ", "Enter the divisor: "],
        OperationKind::Mod => &[
            "Enter the first number (integer): ",
            "Enter the second number (integer): ",
        ],
        OperationKind::Pow => &["Enter the base: ", "Enter the exponent: "],
        OperationKind::Sqrt => &["Enter the number: "],
        OperationKind::Percent => &["Enter the value: ", "Enter the percentage: "],
        OperationKind::Factorial => &["Enter a whole number (0-20): "],
        OperationKind::Expression => &[],
    }
}

fn line(c: char, width: usize) {
    println!("{}", c.to_string().repeat(width));
}

fn error(err: &dyn std::fmt::Display) {
    eprintln!("{} {err}", "Error:".red().bold());
}

pub struct App {
    session: Session,
    config: Config,
    prompter: Prompter,
}

impl App {
    pub fn new(session: Session, config: Config) -> Result<Self> {
        Ok(App {
            session,
            config,
            prompter: Prompter::new()?,
        })
    }

    pub fn run(mut self) -> Result<()> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    println!("\nThank you for using the calculator!");
                    line('=', WIDTH);
                    return Ok(());
                }
                Err(err) if err.is::<Interrupted>() => {
                    println!("\n\nProgram interrupted by the user!");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn step(&mut self) -> Result<Flow> {
        self.draw_main_menu();
        let choice = self.prompter.line("\nChoose an option: ")?.to_uppercase();
        match choice.as_str() {
            "0" => return Ok(Flow::Exit),
            "E" => self.expression()?,
            "H" => self.history()?,
            "M" => self.memory()?,
            "S" => self.statistics()?,
            "G" => self.save()?,
            "C" => {
                self.session.clear_history();
                println!("History cleared!");
                self.pause()?;
            }
            "R" => {
                self.session.reset_all();
                println!("Calculator reset!");
                self.pause()?;
            }
            choice => match OperationKind::from_menu(choice) {
                Some(kind) => self.operation(kind)?,
                None => {
                    error(&"invalid option, try again");
                    self.pause()?;
                }
            },
        }
        Ok(Flow::Continue)
    }

    fn clear(&self) {
        if self.config.clear_screen {
            print!("\x1B[2J\x1B[1;1H");
            let _ = io::stdout().flush();
        }
    }

    fn pause(&mut self) -> Result<()> {
        if self.config.pause {
            self.prompter.line("\nPress Enter to continue...")?;
        }
        Ok(())
    }

    fn screen(&self, title: &str) {
        self.clear();
        println!("{}", title.bold());
        line('-', WIDTH);
    }

    fn header() {
        line('=', WIDTH);
        println!("{:^width$}", "BASIC CALCULATOR", width = WIDTH);
        line('=', WIDTH);
    }

    fn draw_main_menu(&self) {
        self.clear();
        Self::header();
        println!(
            "Statistics: {} operations | Memory: {}",
            self.session.total_operations(),
            self.session.memory()
        );
        if let Some(last) = self.session.last_result() {
            println!("Last result: {last}");
        }
        line('-', WIDTH);
        println!("BASIC OPERATIONS:");
        println!("  1. Sum (+)");
        println!("  2. Subtraction (-)");
        println!("  3. Multiplication (×)");
        println!("  4. Division (÷)");
        println!("  5. Modulo (%)");
        println!("\nADVANCED OPERATIONS:");
        println!("  6. Power (^)");
        println!("  7. Square root (√)");
        println!("  8. Percentage (%)");
        println!("  9. Factorial (!)");
        println!("\nFEATURES:");
        println!("  E. Evaluate expression");
        println!("  H. Show history");
        println!("  M. Manage memory");
        println!("  S. Statistics");
        println!("  G. Save history");
        println!("\nSETTINGS:");
        println!("  C. Clear history");
        println!("  R. Reset calculator");
        println!("  0. Exit");
        line('-', WIDTH);
    }

    fn show_calculation(calculation: &Calculation) {
        println!();
        line('=', RESULT_WIDTH);
        println!(
            "{} {} = {}",
            "RESULT:".green().bold(),
            calculation.expression,
            calculation.value
        );
        if let Some(advisory) = calculation.advisory {
            println!("{} {advisory}", "Warning:".yellow().bold());
        }
        line('=', RESULT_WIDTH);
    }

    fn operation(&mut self, kind: OperationKind) -> Result<()> {
        self.screen(&format!("OPERATION: {}", kind.name().to_uppercase()));
        let prompts = operand_prompts(kind);
        let mut operands = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            operands.push(self.prompter.operand(&self.session, prompt)?);
        }
        loop {
            let operation = Operation::new(kind, operands.clone())
                .ok_or_else(|| anyhow!("wrong number of operands for {kind}"))?;
            match self.session.perform(operation) {
                Ok(calculation) => {
                    Self::show_calculation(&calculation);
                    break;
                }
                // Ask again for the operand that made the operation invalid.
                Err(err @ (CalcError::DivisionByZero | CalcError::NegativeInput(_))) => {
                    error(&err);
                    let last = operands.len() - 1;
                    operands[last] = self.prompter.operand(&self.session, prompts[last])?;
                }
                Err(err) => {
                    error(&err);
                    break;
                }
            }
        }
        self.pause()
    }

    fn expression(&mut self) -> Result<()> {
        self.screen("EVALUATE EXPRESSION");
        println!("Enter a simple arithmetic expression (e.g. 2 + 3 * 4)");
        println!("Supported operators: +, -, *, /, ^, %");
        println!("Use 'M' for memory, 'U' for the last result");
        let raw = self.prompter.line("\nExpression: ")?;
        match self.session.evaluate_expression(&raw) {
            Ok(calculation) => Self::show_calculation(&calculation),
            Err(err) => error(&err),
        }
        self.pause()
    }

    fn history(&mut self) -> Result<()> {
        self.screen("OPERATION HISTORY");
        let history = self.session.history();
        if history.is_empty() {
            println!("No operations in history!");
        } else {
            println!("Operations in history: {}", history.len());
            line('-', WIDTH);
            for (i, entry) in history.most_recent_first().enumerate() {
                println!("{}. [{}]", i + 1, entry.timestamp_text());
                println!("   {} = {}", entry.expression(), entry.result());
                println!("   Kind: {}", entry.kind());
                println!();
            }
        }
        self.pause()
    }

    fn memory(&mut self) -> Result<()> {
        self.screen("MANAGE MEMORY");
        println!("Current memory value: {}", self.session.memory());
        println!("\n1. Set a new value");
        println!("2. Add to memory");
        println!("3. Subtract from memory");
        println!("4. Clear memory");
        println!("5. Use memory in a calculation");
        println!("0. Back");
        let choice = self.prompter.line("\nChoose an option: ")?;
        match choice.as_str() {
            "1" => {
                let value = self.prompter.operand(&self.session, "Enter the new value: ")?;
                let memory = self.session.manage_memory(MemoryAction::Set(value));
                println!("Memory set to: {memory}");
            }
            "2" => {
                let value = self.prompter.operand(&self.session, "Enter the value to add: ")?;
                let memory = self.session.manage_memory(MemoryAction::Add(value));
                println!("Value added. Memory is now: {memory}");
            }
            "3" => {
                let value = self
                    .prompter
                    .operand(&self.session, "Enter the value to subtract: ")?;
                let memory = self.session.manage_memory(MemoryAction::Subtract(value));
                println!("Value subtracted. Memory is now: {memory}");
            }
            "4" => {
                self.session.manage_memory(MemoryAction::Clear);
                println!("Memory cleared!");
            }
            "5" => {
                let memory = self.session.manage_memory(MemoryAction::Recall);
                println!("Enter 'M' as an operand to use the memory value: {memory}");
            }
            _ => {}
        }
        self.pause()
    }

    fn statistics(&mut self) -> Result<()> {
        self.screen("CALCULATOR STATISTICS");
        let stats = self.session.statistics();
        println!("Total operations performed: {}", stats.total_operations);
        println!("Operations in history: {}", stats.history_len);
        match &stats.last_result {
            Some(last) => println!("Last result: {last}"),
            None => println!("Last result: none"),
        }
        println!("Memory value: {}", stats.memory);
        if !stats.counts_by_kind.is_empty() {
            println!("\nOperations by kind:");
            for (kind, count) in &stats.counts_by_kind {
                println!("  {kind}: {count} operations");
            }
        }
        self.pause()
    }

    fn save(&mut self) -> Result<()> {
        self.screen("SAVE HISTORY");
        if self.session.history().is_empty() {
            println!("No operations to save!");
            return self.pause();
        }
        let name = self
            .prompter
            .line("Enter the file name (without extension): ")?;
        match persistence::save(&self.session, &self.config.save_dir(), &name) {
            Ok(path) => println!("History saved to: {}", path.display()),
            Err(err @ (PersistError::Io(_) | PersistError::Serialize(_))) => {
                error(&format!("failed to save history: {err}"))
            }
            Err(err) => error(&err),
        }
        self.pause()
    }
}
