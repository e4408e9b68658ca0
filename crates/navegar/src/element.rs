//! Lazily-resolved element references.
//!
//! An [`ElementRef`] is a handle to a DOM element, not the element itself:
//! the underlying node is fetched fresh on every operation because target
//! pages re-render freely. Action Layer operations accept either a raw
//! selector string or a previously-resolved handle and normalize through
//! this one type at the top of each call.

use serde::{Deserialize, Serialize};

/// Bounding box of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the box has a visible area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A resolved element handle: the selector it was located through plus the
/// last-known metadata. The handle never pins a DOM node; re-using it just
/// re-queries the same selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandle {
    /// Selector the element was located through
    pub selector: String,
    /// Tag name at resolution time, if known
    pub tag_name: Option<String>,
    /// Bounding box at resolution time, if the element was rendered
    pub bounding_box: Option<BoundingBox>,
}

impl ElementHandle {
    /// Create a handle for a selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag_name: None,
            bounding_box: None,
        }
    }
}

/// Reference to a UI element: either a bare selector descriptor or a
/// resolved handle. Both carry a selector string; the distinction only
/// records whether the element has been located before.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementRef {
    /// An unresolved selector string
    Selector(String),
    /// A previously-resolved handle
    Handle(ElementHandle),
}

impl ElementRef {
    /// The selector string this reference re-queries on each operation
    #[must_use]
    pub fn selector(&self) -> &str {
        match self {
            Self::Selector(s) => s,
            Self::Handle(h) => &h.selector,
        }
    }

    /// Derive a reference to the n-th matching element (0-based), for
    /// index-addressed collections such as account rows or video cards.
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self::Selector(format!("{}:nth-of-type({})", self.selector(), index + 1))
    }
}

impl From<&str> for ElementRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementHandle> for ElementRef {
    fn from(handle: ElementHandle) -> Self {
        Self::Handle(handle)
    }
}

impl From<&ElementRef> for ElementRef {
    fn from(other: &ElementRef) -> Self {
        other.clone()
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_variant() {
        let r = ElementRef::from("#login");
        assert_eq!(r.selector(), "#login");
    }

    #[test]
    fn test_handle_variant_keeps_selector() {
        let handle = ElementHandle::new(".balance");
        let r = ElementRef::from(handle);
        assert_eq!(r.selector(), ".balance");
    }

    #[test]
    fn test_nth_derivation() {
        let r = ElementRef::from(".bili-video-card");
        assert_eq!(r.nth(0).selector(), ".bili-video-card:nth-of-type(1)");
        assert_eq!(r.nth(2).selector(), ".bili-video-card:nth-of-type(3)");
    }

    #[test]
    fn test_bounding_box_area() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0).has_area());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 10.0).has_area());
    }

    #[test]
    fn test_display_is_selector() {
        let r = ElementRef::from("input[name='username']");
        assert_eq!(r.to_string(), "input[name='username']");
    }
}
