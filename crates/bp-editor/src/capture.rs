//! Scoped pointer capture.
//!
//! Capture is acquired when a session starts and released on every way a
//! session can end (up, cancel, lost capture, engine drop), so move and up
//! events keep arriving after the pointer leaves the canvas.

use crate::bridge::HostBridge;
use crate::input::PointerId;

#[derive(Debug, Default)]
pub struct PointerCapture {
    held: Option<PointerId>,
}

impl PointerCapture {
    pub fn held(&self) -> Option<PointerId> {
        self.held
    }

    /// Capture `pointer_id`, releasing any other pointer still held.
    pub fn acquire<H: HostBridge>(&mut self, pointer_id: PointerId, host: &mut H) {
        if self.held == Some(pointer_id) {
            return;
        }
        self.release(host);
        host.capture_pointer(pointer_id);
        self.held = Some(pointer_id);
    }

    /// Release the held pointer. Safe to call when nothing is held.
    pub fn release<H: HostBridge>(&mut self, host: &mut H) {
        if let Some(id) = self.held.take() {
            host.release_pointer(id);
        }
    }

    /// Forget the held pointer without asking the host; the platform already
    /// took capture away.
    pub fn forget(&mut self) {
        self.held = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{HostEvent, RecordingHost};
    use pretty_assertions::assert_eq;

    #[test]
    fn release_is_idempotent() {
        let mut host = RecordingHost::default();
        let mut capture = PointerCapture::default();
        capture.acquire(7, &mut host);
        capture.release(&mut host);
        capture.release(&mut host);
        assert_eq!(host.events, vec![HostEvent::Captured(7), HostEvent::Released(7)]);
    }

    #[test]
    fn acquiring_another_pointer_releases_the_first() {
        let mut host = RecordingHost::default();
        let mut capture = PointerCapture::default();
        capture.acquire(1, &mut host);
        capture.acquire(1, &mut host);
        capture.acquire(2, &mut host);
        assert_eq!(
            host.events,
            vec![HostEvent::Captured(1), HostEvent::Released(1), HostEvent::Captured(2)]
        );
        assert_eq!(capture.held(), Some(2));
    }

    #[test]
    fn forget_skips_the_host() {
        let mut host = RecordingHost::default();
        let mut capture = PointerCapture::default();
        capture.acquire(3, &mut host);
        capture.forget();
        capture.release(&mut host);
        assert_eq!(host.events, vec![HostEvent::Captured(3)]);
    }
}
