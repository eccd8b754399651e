pub mod run_store;
