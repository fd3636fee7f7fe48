//! Live feed for the phone UI.
//!
//! The simulations run natively on real timers while the browser subscribes
//! to snapshots over a WebSocket and sends commands back.
//!
//! ## Usage
//!
//! Build with web feature:
//! ```sh
//! cargo build --features web
//! ```
//!
//! Run with the live feed:
//! ```sh
//! ./target/debug/chatwatch --serve        # Default port 3000
//! ./target/debug/chatwatch --serve=8080   # Custom port
//! ```

mod driver;
mod server;

pub use driver::{spawn_driver, DriverHandle, LivePhone, SharedPhone, SnapshotSender};
pub use server::{parse_command, start_live_server};
