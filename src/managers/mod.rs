// Watchtime state managers
// Managers own persisted state: the bounded watch history.

pub mod history_store;
