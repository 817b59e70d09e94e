//! Board DragDrop
//!
//! Headless drag-and-drop reordering engine for the task board.
//!
//! A gesture flows leaf to root: the input driver records a [`DragSession`],
//! the [`BoardLayout`] resolver turns pointer positions into a column and an
//! insertion index, the [`DragController`] keeps the live indicator, and on
//! release the [`ReorderDispatcher`] turns the [`DropRequest`] into backend
//! calls through [`TaskApi`].
//!
//! Everything here is plain data and runs on any target. The `web` feature
//! adds [`web::BoardDnd`], the Leptos binding that measures the DOM.

pub mod autoscroll;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod input;
pub mod model;
pub mod resolver;
pub mod session;

#[cfg(feature = "web")]
pub mod web;

pub use config::{DragConfig, MoveStrategy};
pub use controller::{CancelReason, DragController, DragPhase, DropIndicator, DropOutcome, DropRequest};
pub use dispatch::{plan, DispatchOutcome, Notice, NoticeVariant, ReorderDispatcher, ReorderPlan, TaskApi};
pub use error::{ApiError, DragError};
pub use geometry::{Point, Rect};
pub use input::{driver_for, DragDriver, MouseDriver, StartEffect, TouchDriver, TrackEffect};
pub use model::{
    Board, ColumnKey, DragPayload, Page, Priority, ReorderCommand, Task, TaskId, TaskStatus, TaskUpdate,
};
pub use resolver::{BoardLayout, ColumnRegion, Slot};
pub use session::{DragSession, Grab, InputMode};
