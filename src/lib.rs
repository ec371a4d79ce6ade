// Library root
// -----------
// The bookshare client as a library. The binary (`main.rs`) wires these
// modules into the interactive terminal client.
//
// Module responsibilities:
// - `api`: HTTP calls to the bookshare backend behind the `BookshareApi` trait.
// - `auth`: login / registration while no session exists.
// - `config`: settings read from the environment.
// - `dashboard`: the logged-in controller owning the book snapshots.
// - `error`: error types and the user-facing text for each failure.
// - `models`: wire types.
// - `session`: the persisted token and user record.
// - `ui`: terminal menus and rendering.
// - `view`: pure view models (cards, badges, request forms).
pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;
pub mod view;
