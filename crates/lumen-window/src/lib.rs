//! Lumen Window - page runtime
//!
//! The platform surface page behaviors are written against: a hosted
//! document, a virtual millisecond clock, timers and animation frames,
//! bubbling event dispatch, smooth scrolling and intersection observers.
//!
//! Nothing here is `Send`. Time only moves when the host calls
//! [`Window::advance`].

mod events;
mod intersection_observer;
mod scroll;
mod timers;
mod window;

pub use events::{Event, EventKind, EventTarget, Listener, ListenerId};
pub use intersection_observer::{
    IntersectionObserverEntry, IntersectionObserverOptions, MarginLength, ObserverCallback,
    ObserverId, RootMargin, RootMarginError,
};
pub use scroll::{Easing, SMOOTH_SCROLL_MS, ScrollBehavior, ScrollToOptions};
pub use timers::TimerId;
pub use window::{FRAME_MS, Viewport, Window};
