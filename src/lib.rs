//! # Observer Subject
//!
//! An in-process publish/subscribe primitive: observers register for named
//! topics on a [`Subject`] and are called synchronously when a payload is
//! published to one of those topics.
//!
//! ## Core Concepts
//!
//! - **Topics**: Non-empty string keys, each with an ordered observer list
//! - **Observers**: Anything implementing [`Observer`], held by the subject
//!   through non-owning [`ObserverRef`] handles
//! - **Snapshots**: Every broadcast walks a copy-on-write snapshot of the
//!   topic's list, so observers may register, unregister or publish from
//!   inside their callbacks
//!
//! ## Example
//!
//! ```
//! use observer_subject::{ObserverRef, ObserverResult, Subject};
//! use serde_json::{json, Value};
//! use std::rc::Rc;
//!
//! let subject: Subject = Subject::new();
//!
//! let logger = Rc::new(|topic: &str, payload: &Value| -> ObserverResult {
//!     println!("{topic}: {payload}");
//!     Ok(())
//! });
//! let handle = ObserverRef::new(&logger);
//!
//! subject.register("message", &handle)?;
//! assert_eq!(subject.notify("message", &json!({"text": "Hello"}))?, 1);
//!
//! subject.unregister("message", &handle)?;
//! assert_eq!(subject.notify("message", &Value::Null)?, 0);
//! # Ok::<(), observer_subject::SubjectError>(())
//! ```

pub mod error;
pub mod observer;
mod registry;
pub mod subject;
pub mod types;

// Re-exports
pub use error::{Result, SubjectError};
pub use observer::{Observer, ObserverError, ObserverRef, ObserverResult};
pub use subject::{Subject, SubjectConfig};
pub use types::{DeliveryPolicy, SubjectStats};
