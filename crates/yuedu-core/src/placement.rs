use yuedu_types::{Position, Rect, Size};

pub const DEFAULT_GAP: f32 = 8.0;

/// Where to put a popup of `popup` size for `anchor` inside `viewport`.
///
/// Prefers above the anchor, horizontally centred. Flips below when the
/// top would overflow and below still fits, otherwise pins to the top
/// margin. The horizontal axis is clamped on its own. Returns `None` while
/// the popup has not been laid out yet (non-positive size).
pub fn compute_position(anchor: Rect, popup: Size, viewport: Size, gap: f32) -> Option<Position> {
    if !(popup.width > 0.0 && popup.height > 0.0) {
        return None;
    }

    let mut top = anchor.top - popup.height - gap;
    let mut left = anchor.left + anchor.width / 2.0 - popup.width / 2.0;

    if top < gap {
        let below = anchor.bottom() + gap;
        top = if below + popup.height < viewport.height - gap {
            below
        } else {
            gap
        };
    } else if top + popup.height > viewport.height - gap {
        top = (viewport.height - popup.height - gap).max(gap);
    }

    if left < gap {
        left = gap;
    }
    if left + popup.width > viewport.width - gap {
        left = (viewport.width - popup.width - gap).max(gap);
    }

    if top.is_finite() && left.is_finite() {
        Some(Position { top, left })
    } else {
        tracing::error!("Popup position calculation produced a non-finite value");
        None
    }
}

/// Last computed popup position, updated on every popup state change.
///
/// Moves of one unit or less are ignored so re-measuring the same content
/// does not make the popup jitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PopupPlacement {
    position: Option<Position>,
}

impl PopupPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }

    pub fn update(&mut self, anchor: Rect, popup: Size, viewport: Size, gap: f32) -> Option<Position> {
        match compute_position(anchor, popup, viewport, gap) {
            Some(next) => {
                let moved = self.position.is_none_or(|current| {
                    (current.top - next.top).abs() > 1.0 || (current.left - next.left).abs() > 1.0
                });
                if moved {
                    self.position = Some(next);
                }
            }
            None => self.position = None,
        }
        self.position
    }

    pub fn reset(&mut self) {
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn places_above_and_centred() {
        let anchor = Rect::new(100.0, 100.0, 50.0, 20.0);
        let popup = Size::new(200.0, 80.0);

        let pos = compute_position(anchor, popup, VIEWPORT, DEFAULT_GAP).unwrap();

        assert_eq!(pos.top, 100.0 - 80.0 - DEFAULT_GAP);
        // centred would be 25.0, which is already inside the margin
        assert_eq!(pos.left, 25.0);
        assert!(pos.left >= DEFAULT_GAP);
        assert!(pos.left + popup.width <= VIEWPORT.width - DEFAULT_GAP);
    }

    #[test]
    fn flips_below_when_top_overflows() {
        let anchor = Rect::new(30.0, 300.0, 40.0, 20.0);
        let popup = Size::new(200.0, 80.0);

        let pos = compute_position(anchor, popup, VIEWPORT, DEFAULT_GAP).unwrap();

        assert_eq!(pos.top, anchor.bottom() + DEFAULT_GAP);
    }

    #[test]
    fn pins_to_top_margin_when_neither_side_fits() {
        let viewport = Size::new(800.0, 150.0);
        let anchor = Rect::new(60.0, 300.0, 40.0, 20.0);
        let popup = Size::new(200.0, 100.0);

        let pos = compute_position(anchor, popup, viewport, DEFAULT_GAP).unwrap();

        assert_eq!(pos.top, DEFAULT_GAP);
    }

    #[test]
    fn clamps_bottom_overflow() {
        let viewport = Size::new(800.0, 200.0);
        let anchor = Rect::new(500.0, 300.0, 40.0, 20.0);
        let popup = Size::new(200.0, 80.0);

        let pos = compute_position(anchor, popup, viewport, DEFAULT_GAP).unwrap();

        assert_eq!(pos.top, 200.0 - 80.0 - DEFAULT_GAP);
    }

    #[test]
    fn clamps_horizontally_on_both_edges() {
        let popup = Size::new(200.0, 80.0);

        let left_edge = compute_position(Rect::new(300.0, 0.0, 10.0, 20.0), popup, VIEWPORT, DEFAULT_GAP)
            .unwrap();
        assert_eq!(left_edge.left, DEFAULT_GAP);

        let right_edge = compute_position(Rect::new(300.0, 790.0, 10.0, 20.0), popup, VIEWPORT, DEFAULT_GAP)
            .unwrap();
        assert_eq!(right_edge.left, 800.0 - 200.0 - DEFAULT_GAP);
    }

    #[test]
    fn popup_wider_than_viewport_sticks_to_left_margin() {
        let pos = compute_position(
            Rect::new(300.0, 400.0, 10.0, 20.0),
            Size::new(900.0, 80.0),
            VIEWPORT,
            DEFAULT_GAP,
        )
        .unwrap();

        assert_eq!(pos.left, DEFAULT_GAP);
    }

    #[test]
    fn unmeasured_popup_is_not_positioned() {
        let anchor = Rect::new(100.0, 100.0, 50.0, 20.0);

        assert_eq!(compute_position(anchor, Size::new(0.0, 80.0), VIEWPORT, DEFAULT_GAP), None);
        assert_eq!(compute_position(anchor, Size::new(200.0, -1.0), VIEWPORT, DEFAULT_GAP), None);
    }

    #[test]
    fn placement_ignores_sub_unit_moves_and_retries_after_unmeasured() {
        let mut placement = PopupPlacement::new();
        let anchor = Rect::new(300.0, 300.0, 50.0, 20.0);

        assert_eq!(placement.update(anchor, Size::new(0.0, 0.0), VIEWPORT, DEFAULT_GAP), None);
        assert!(!placement.is_positioned());

        let first = placement
            .update(anchor, Size::new(200.0, 80.0), VIEWPORT, DEFAULT_GAP)
            .unwrap();
        let nudged = placement
            .update(anchor, Size::new(201.0, 80.5), VIEWPORT, DEFAULT_GAP)
            .unwrap();
        assert_eq!(first, nudged);

        let grown = placement
            .update(anchor, Size::new(200.0, 120.0), VIEWPORT, DEFAULT_GAP)
            .unwrap();
        assert_eq!(grown.top, 300.0 - 120.0 - DEFAULT_GAP);
    }
}
