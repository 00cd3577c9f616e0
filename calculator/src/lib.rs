//! Session state for the interactive calculator: memory register, bounded
//! history, the arithmetic operations and saving a session to disk.

mod error;
pub mod history;
pub mod memory;
pub mod operation;
pub mod persistence;
mod session;

pub use error::CalcError;
pub use history::{HistoryEntry, HistoryLog, HISTORY_CAPACITY};
pub use memory::{MemoryAction, MemoryRegister};
pub use operation::{Advisory, Calculation, Operation, OperationKind};
pub use persistence::PersistError;
pub use session::{Session, Statistics};

pub use interpreter::Number;
