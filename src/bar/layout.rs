use super::Registry;
use crate::rectangle::Rectangle;

/// The area of the bar reserved for one widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub rect: Rectangle,
    pub border_width: u16,
}

impl Slot {
    pub fn new(x: i16, width: u16, height: u16, border_width: u16) -> Self {
        Self {
            rect: Rectangle::new(x, 0, width, height),
            border_width,
        }
    }

    /// The area inside the border, where the background and text go.
    pub fn inner(&self) -> Rectangle {
        self.rect.inset(self.border_width)
    }
}

/// Horizontal placement of all widgets, computed once at startup. Every
/// widget keeps its slot whether or not it is redrawn on a given tick.
/// Slots that would start or end past `i16::MAX` are cut off there.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BarLayout {
    slots: Vec<Slot>,
}

impl BarLayout {
    pub fn compute(registry: &Registry) -> Self {
        const MAX_X: i32 = i16::MAX as i32;
        let mut x = 0i32;
        let slots = registry
            .iter()
            .map(|widget| {
                let left = x.min(MAX_X);
                let width = (widget.pixel_width() as i32).min(MAX_X - left);
                x = left + width + widget.descriptor.padding as i32;
                Slot::new(
                    left as i16,
                    width as u16,
                    registry.height(),
                    widget.descriptor.border_width,
                )
            })
            .collect();
        Self { slots }
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Total width used by the widgets, including padding between them.
    pub fn width(&self) -> u16 {
        self.slots()
            .last()
            .map_or(0, |slot| slot.rect.right_edge().max(0) as u16)
    }
}
