pub mod export;
pub mod load;

pub use export::export_table;
pub use load::{parse_assignment_json, parse_signal_json, parse_table, ParsedTable, TableRow};
