//! Interactive lookup screen
//!
//! ```text
//! ╭ Pokémon ─────────────────────────────╮╭──────────╮
//! │ pikachu█                             ││  Search  │
//! ╰──────────────────────────────────────╯╰──────────╯
//!            ╭ #025 ──────────────────────────╮
//!            │            Pikachu             │
//!            │           ELECTRIC             │
//!            │ HEIGHT 0.4m  WEIGHT 6kg  XP 112│
//!            │ Default    Shiny   Back View   │
//!            ╰────────────────────────────────╯
//!  ⠋ Searching pikachu…   [Enter] search  [Esc] quit
//! ```
//!
//! Lookups run on a worker thread; the event loop never blocks on the network.

mod app;
mod image;
mod ui;
mod worker;

pub use app::run;
