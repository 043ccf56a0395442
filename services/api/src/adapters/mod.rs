pub mod drive;
pub mod memory;
pub mod sheets;
pub mod token;

pub use drive::DriveAdapter;
pub use memory::{MemoryFileStore, MemoryTabularStore};
pub use sheets::SheetsAdapter;
pub use token::{TokenGate, TokenState};
