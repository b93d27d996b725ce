//! rss-notifier: announces new RSS items in a Discord channel.
//!
//! ## Architecture overview
//!
//! ```text
//!  config ──► DiscordClient::login ──► Poller::start
//!                                         │ every CHECK_INTERVAL
//!                                         ▼
//!            source (fetch) ──► novelty (filter) ──► notify (send)
//! ```
//!
//! * **`config`**: reads and validates the environment.
//! * **`source/`**: the `DataSource` trait and the RSS implementation.
//! * **`novelty`**: single-link memory of the last announced item.
//! * **`notify/`**: message formatting and the Discord REST client.
//! * **`poll`**: the `Poller`: timer, state, one cycle per tick.
//! * **`supervisor`**: panic boundary for the main thread and spawned tasks.
//! * **`logging`**: tracing subscriber setup.
//! * **`main`** (binary): lifecycle: validate, connect, poll until Ctrl-C.

pub mod config;
pub mod logging;
pub mod notify;
pub mod novelty;
pub mod poll;
pub mod source;
pub mod supervisor;
