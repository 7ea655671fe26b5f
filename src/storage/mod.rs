pub mod result_store;
