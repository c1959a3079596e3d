//! # Repository Module
//!
//! Database repository implementations for MyShop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  OrderService                                                          │
//! │       │                                                                 │
//! │       │  pool-backed reads          tx-bound writes (&mut *tx)          │
//! │       ▼                              ▼                                  │
//! │  ProductRepository              order::insert(conn, &order)            │
//! │  ├── get_by_id                  stock::reserve(conn, id, qty)          │
//! │  ├── insert / update                                                   │
//! │  ├── soft_delete / list                                                │
//! │  OrderRepository                                                       │
//! │  ├── get_by_id                                                         │
//! │  └── list_by_user                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories own a pool and serve single-statement reads and catalog
//! writes. Functions that must join the placement transaction take a
//! `&mut SqliteConnection` instead.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD
//! - [`order::OrderRepository`] - Order reads; [`order::insert`] for writes
//! - [`stock`] - Conditional stock decrement

pub mod order;
pub mod product;
pub mod stock;
