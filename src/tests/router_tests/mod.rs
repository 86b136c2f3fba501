mod ledger_tests;
mod scout_tests;
