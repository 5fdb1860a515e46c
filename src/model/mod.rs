pub mod document;
pub mod ledger;
pub mod record;
