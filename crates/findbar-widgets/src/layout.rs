//! Geometry of the find bar and the stable identifiers of its controls.
//!
//! Controls are placed right to left from the trailing edge: close, next and
//! previous are square (width equal to the bar height), the match counter
//! keeps its content width, and the query field takes whatever is left after
//! a one-cell leading inset. When space runs out the field shrinks first,
//! then the counter, then the buttons.

use ratatui::layout::{Position, Rect};

/// Columns kept free before the query field.
pub const FIELD_LEADING_INSET: u16 = 1;

/// Blank columns on each side of the counter text.
pub const COUNTER_PADDING: u16 = 1;

/// The controls of a find bar, in leading-to-trailing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    QueryField,
    MatchCount,
    Previous,
    Next,
    Close,
}

impl Control {
    /// Every control, leading to trailing.
    pub const ALL: [Control; 5] = [
        Control::QueryField,
        Control::MatchCount,
        Control::Previous,
        Control::Next,
        Control::Close,
    ];

    /// Stable identifier for UI automation.
    pub fn identifier(self) -> &'static str {
        match self {
            Control::QueryField => "FindInPage.searchField",
            Control::MatchCount => "FindInPage.matchCount",
            Control::Previous => "FindInPage.find_previous",
            Control::Next => "FindInPage.find_next",
            Control::Close => "FindInPage.close",
        }
    }

    /// Human-readable accessibility label.
    pub fn label(self) -> &'static str {
        match self {
            Control::QueryField => "Find in page",
            Control::MatchCount => "Match count",
            Control::Previous => "Previous in-page result",
            Control::Next => "Next in-page result",
            Control::Close => "Done",
        }
    }
}

/// One entry of the accessibility tree exposed by
/// [`FindBar::accessibility_nodes`](crate::find_bar::FindBar::accessibility_nodes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityNode {
    pub control: Control,
    pub identifier: &'static str,
    pub label: &'static str,
    pub area: Rect,
    pub enabled: bool,
    pub hidden: bool,
}

/// Resolved rectangles of every part of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindBarLayout {
    pub field: Rect,
    pub counter: Rect,
    pub previous: Rect,
    pub next: Rect,
    pub close: Rect,
    /// The one-row divider along the top edge. Empty when the bar is a
    /// single row tall.
    pub border: Rect,
}

impl FindBarLayout {
    /// Lay out a bar occupying `area` whose counter text is
    /// `counter_text_width` columns wide.
    pub fn compute(area: Rect, counter_text_width: u16) -> Self {
        let side = area.height;
        let mut trailing = area.right();

        let mut take = |width: u16| {
            let width = width.min(trailing - area.x);
            trailing -= width;
            Rect::new(trailing, area.y, width, area.height)
        };
        let close = take(side);
        let next = take(side);
        let previous = take(side);
        let counter = take(counter_text_width.saturating_add(2 * COUNTER_PADDING));

        let field_x = area.x.saturating_add(FIELD_LEADING_INSET).min(trailing);
        let field = Rect::new(field_x, area.y, trailing - field_x, area.height);

        Self {
            field,
            counter,
            previous,
            next,
            close,
            border: Rect::new(area.x, area.y, area.width, divider_height(area.height)),
        }
    }

    /// Rectangle of a control.
    pub fn rect(&self, control: Control) -> Rect {
        match control {
            Control::QueryField => self.field,
            Control::MatchCount => self.counter,
            Control::Previous => self.previous,
            Control::Next => self.next,
            Control::Close => self.close,
        }
    }

    /// The control under a terminal cell, if any.
    pub fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        let position = Position::new(column, row);
        Control::ALL
            .into_iter()
            .find(|control| self.rect(*control).contains(position))
    }
}

/// A one-row bar has no room for the divider above its content row.
fn divider_height(bar_height: u16) -> u16 {
    if bar_height < 2 {
        0
    } else {
        1
    }
}

/// The single row on which text and glyphs are drawn.
pub(crate) fn centre_row(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_square_and_trailing() {
        let layout = FindBarLayout::compute(Rect::new(0, 0, 40, 3), 4);
        assert_eq!(layout.close, Rect::new(37, 0, 3, 3));
        assert_eq!(layout.next, Rect::new(34, 0, 3, 3));
        assert_eq!(layout.previous, Rect::new(31, 0, 3, 3));
        assert_eq!(layout.counter, Rect::new(25, 0, 6, 3));
        assert_eq!(layout.field, Rect::new(1, 0, 24, 3));
        assert_eq!(layout.border, Rect::new(0, 0, 40, 1));
    }

    #[test]
    fn respects_area_offset() {
        let layout = FindBarLayout::compute(Rect::new(10, 20, 30, 2), 3);
        assert_eq!(layout.close, Rect::new(38, 20, 2, 2));
        assert_eq!(layout.field.x, 11);
        assert_eq!(layout.field.right(), layout.counter.x);
        assert_eq!(layout.border, Rect::new(10, 20, 30, 1));
    }

    #[test]
    fn field_shrinks_first() {
        // 3 buttons * 3 + counter 5 = 14; one column left after the inset.
        let layout = FindBarLayout::compute(Rect::new(0, 0, 15, 3), 3);
        assert_eq!(layout.counter.width, 5);
        assert_eq!(layout.field.width, 0);

        let layout = FindBarLayout::compute(Rect::new(0, 0, 11, 3), 3);
        assert_eq!(layout.field.width, 0);
        assert_eq!(layout.counter.width, 2);
        assert_eq!(layout.previous.width, 3);
    }

    #[test]
    fn single_row_bar_has_no_divider() {
        let layout = FindBarLayout::compute(Rect::new(0, 5, 40, 1), 4);
        assert_eq!(layout.border.height, 0);
        assert!(layout.border.is_empty());
        assert_eq!(layout.close, Rect::new(39, 5, 1, 1));
        assert_eq!(centre_row(layout.field).y, 5);

        let layout = FindBarLayout::compute(Rect::new(0, 5, 40, 2), 4);
        assert_eq!(layout.border, Rect::new(0, 5, 40, 1));
        assert_eq!(centre_row(layout.field).y, 6);
    }

    #[test]
    fn tiny_area_never_panics() {
        let layout = FindBarLayout::compute(Rect::new(0, 0, 4, 3), 10);
        assert_eq!(layout.close.width, 3);
        assert_eq!(layout.next.width, 1);
        assert_eq!(layout.previous.width, 0);
        assert_eq!(layout.field.width, 0);

        let empty = FindBarLayout::compute(Rect::default(), 3);
        assert_eq!(empty, FindBarLayout::default());
    }

    #[test]
    fn hit_testing() {
        let layout = FindBarLayout::compute(Rect::new(0, 0, 40, 3), 4);
        assert_eq!(layout.control_at(38, 1), Some(Control::Close));
        assert_eq!(layout.control_at(34, 2), Some(Control::Next));
        assert_eq!(layout.control_at(33, 0), Some(Control::Previous));
        assert_eq!(layout.control_at(26, 1), Some(Control::MatchCount));
        assert_eq!(layout.control_at(5, 1), Some(Control::QueryField));
        assert_eq!(layout.control_at(0, 1), None);
        assert_eq!(layout.control_at(38, 3), None);
    }

    #[test]
    fn identifiers_are_stable() {
        let ids: Vec<_> = Control::ALL.iter().map(|c| c.identifier()).collect();
        assert_eq!(
            ids,
            vec![
                "FindInPage.searchField",
                "FindInPage.matchCount",
                "FindInPage.find_previous",
                "FindInPage.find_next",
                "FindInPage.close",
            ]
        );
        assert_eq!(Control::Close.label(), "Done");
    }
}
