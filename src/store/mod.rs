pub mod csv_file;
pub mod sqlite;

pub use sqlite::{BankStore, QueryOutput};
