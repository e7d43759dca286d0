//! Request plumbing shared by every provider widget.
//!
//! - [`generation`] tags each request so late responses can be discarded.
//! - [`view`] is the loading / error / data tri-state a widget displays.
//! - [`debounce`] delays search-as-you-type until the input goes quiet.
//! - [`throttle`] enforces a minimum spacing between requests.

pub mod debounce;
pub mod generation;
pub mod throttle;
pub mod view;
