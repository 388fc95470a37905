mod chat_ledger;

pub use chat_ledger::*;
