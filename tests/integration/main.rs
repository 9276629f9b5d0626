//! Integration tests driven by the in-memory version store, plus
//! PostgreSQL store tests that run when `DATABASE_URL` is set.

mod helpers;

mod concurrency_test;
mod listener_test;
mod postgres_test;
mod protection_test;
mod versioning_test;
