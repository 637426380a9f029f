//! # Events Module
//!
//! Notifications emitted by the scanner while it runs.
//!
//! ## Design
//! The scanner never talks to a UI directly. It reports through an
//! [`EventSink`], which any front end (CLI, GUI, tests) can implement.
//! For GUI-style consumers on another thread, [`EventChannel`] provides a
//! sink that forwards everything over a crossbeam channel.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Comparison(c) => println!("{} -> {}: {}", c.reference.display(), c.candidate.display(), c.distance),
//!             Event::Summary(s) => println!("moved {}", s.moved_count),
//!             Event::Log { level, message } => println!("{level}: {message}"),
//!         }
//!     }
//! });
//!
//! let mut sink = sender.clone();
//! scanner.run(&source, &mut sink, &mut AlwaysKeep)?;
//! ```

mod channel;
mod sink;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use sink::{EventSink, NullSink, TracingSink};
pub use types::*;
