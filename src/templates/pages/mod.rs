pub mod advisor;
pub mod detail;
pub mod ledger;
pub mod scout;

pub use advisor::advisor_page;
pub use detail::detail_page;
pub use ledger::ledger_page;
pub use scout::scout_page;
