use scrollwin::{Size, VisibleRange};

/// The boundary between the scroller and the scrollable surface it drives.
///
/// One object usually plays both roles: the container that sizes the
/// viewport and the scroll target that produces offsets. When they differ,
/// implement the trait on a binding type that consults both.
///
/// The scroller never creates or destroys rendered children. It reads
/// geometry, writes the simulated content extent and corrected scroll
/// offsets, and delivers range-change notifications for the host to pass to
/// the view layer and bubble to observing ancestors.
pub trait ScrollHost {
    /// Current viewport dimensions; `None` while the host is not attached
    /// to a live view, where geometry would read as zero.
    fn viewport(&self) -> Option<Size>;

    /// Current scroll position along the main axis.
    fn scroll_offset(&self) -> u64;

    /// Moves the real scroll position. Called for scroll-to-index targets
    /// and anchor corrections; the resulting scroll event is absorbed by
    /// the scroller, so implementations need no re-entrancy guard.
    fn set_scroll_offset(&mut self, offset: u64);

    /// Sizes the spacer that gives the container its native scrollable
    /// extent. Called only when the extent actually changes.
    fn set_content_extent(&mut self, extent: u64);

    /// Receives the range-change notification.
    fn on_range_changed(&mut self, range: VisibleRange);
}
